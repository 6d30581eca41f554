//! resvar - device-variant resource resolution
//!
//! Selects the best-matching rendition of a packaged asset (image, layout,
//! sound, binary) for the running device, with a bounded result cache and
//! a language-change invalidation hook.

pub mod cache;
pub mod config;
pub mod resolver;
pub mod scan;

pub use cache::{CacheConfig, ResultCache};
pub use config::Settings;
pub use resolver::{ResolutionArtifact, ResolveError, Resolver, ResolverStats};
pub use resvar_descriptor::{
    Descriptor, DescriptorError, ResourceGroup, ResourceNode, ResourceType, VariantIndex,
};
pub use resvar_device::{DeviceContext, DeviceProbe, FileProbe, StaticProbe};
