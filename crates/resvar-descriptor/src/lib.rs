//! Resource descriptor model and variant index.
//!
//! A package ships a resource descriptor listing, per resource class, the
//! variant folders it provides and the device conditions under which each
//! folder applies. This crate owns the descriptor schema, its parser, and
//! the read-only index the resolver queries.

pub mod index;
pub mod model;
pub mod parse;

pub use index::VariantIndex;
pub use model::{
    AttributeKind, NodeAttributes, ResourceGroup, ResourceNode, ResourceType, ValueRange,
};
pub use parse::{Descriptor, DescriptorError};
