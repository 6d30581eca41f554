//! Descriptor data model.
//!
//! Groups and nodes are immutable once parsed. A node binds a variant
//! folder to the set of device conditions under which that folder applies;
//! a group collects the nodes for one resource class plus the fallback
//! folder used when no node qualifies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource class a group serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Bitmap and vector image assets
    Image,
    /// UI layout definitions
    Layout,
    /// Audio assets
    Sound,
    /// Opaque binary payloads
    #[serde(rename = "bin")]
    Binary,
}

impl ResourceType {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "image" => Some(Self::Image),
            "layout" => Some(Self::Layout),
            "sound" => Some(Self::Sound),
            "bin" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Layout => "layout",
            Self::Sound => "sound",
            Self::Binary => "bin",
        }
    }

    /// All known resource types, in descriptor convention order.
    pub fn all() -> [ResourceType; 4] {
        [Self::Image, Self::Layout, Self::Sound, Self::Binary]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric range, `from <= value <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound (inclusive)
    pub from: u32,

    /// Upper bound (inclusive)
    pub to: u32,
}

impl ValueRange {
    /// Whether `value` falls within the range, both bounds included.
    pub fn contains(&self, value: u32) -> bool {
        self.from <= value && value <= self.to
    }

    /// A range is well-formed when the bounds are ordered.
    pub fn is_well_formed(&self) -> bool {
        self.from <= self.to
    }
}

/// Attribute kinds a node condition can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    ScreenDpi,
    ScreenDpiRange,
    ScreenWidthRange,
    ScreenLarge,
    ScreenBpp,
    PlatformVersion,
    Language,
}

impl AttributeKind {
    /// Descriptor field name for this attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScreenDpi => "screen_dpi",
            Self::ScreenDpiRange => "screen_dpi_range",
            Self::ScreenWidthRange => "screen_width_range",
            Self::ScreenLarge => "screen_large",
            Self::ScreenBpp => "screen_bpp",
            Self::PlatformVersion => "platform_version",
            Self::Language => "language",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device conditions attached to a node.
///
/// Every field is optional; an absent field places no constraint on the
/// device. A node with no conditions at all matches any device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Required exact screen DPI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_dpi: Option<u32>,

    /// Required screen DPI range (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_dpi_range: Option<ValueRange>,

    /// Required screen width range in pixels (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_width_range: Option<ValueRange>,

    /// Required large-screen flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_large: Option<bool>,

    /// Required screen bits-per-pixel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_bpp: Option<u32>,

    /// Minimum platform version (e.g., "2.3", "2.3.1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,

    /// Required language tag (exact match, e.g., "en", "ko")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl NodeAttributes {
    /// Whether the node places no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.screen_dpi.is_none()
            && self.screen_dpi_range.is_none()
            && self.screen_width_range.is_none()
            && self.screen_large.is_none()
            && self.screen_bpp.is_none()
            && self.platform_version.is_none()
            && self.language.is_none()
    }

    /// The attribute kinds present on this node.
    pub fn kinds(&self) -> Vec<AttributeKind> {
        let mut kinds = Vec::new();
        if self.screen_dpi.is_some() {
            kinds.push(AttributeKind::ScreenDpi);
        }
        if self.screen_dpi_range.is_some() {
            kinds.push(AttributeKind::ScreenDpiRange);
        }
        if self.screen_width_range.is_some() {
            kinds.push(AttributeKind::ScreenWidthRange);
        }
        if self.screen_large.is_some() {
            kinds.push(AttributeKind::ScreenLarge);
        }
        if self.screen_bpp.is_some() {
            kinds.push(AttributeKind::ScreenBpp);
        }
        if self.platform_version.is_some() {
            kinds.push(AttributeKind::PlatformVersion);
        }
        if self.language.is_some() {
            kinds.push(AttributeKind::Language);
        }
        kinds
    }
}

/// A variant folder plus the conditions under which it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Folder relative to the resource root (e.g., "res/hdpi")
    pub folder: String,

    /// Device conditions; all present conditions must hold
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

/// All nodes for one resource class, plus the fallback folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    /// Resource class this group serves
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Folder consulted when no node qualifies
    pub default_folder: String,

    /// Variant nodes in declaration order; earlier wins score ties
    #[serde(default, rename = "node")]
    pub nodes: Vec<ResourceNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trip() {
        for ty in ResourceType::all() {
            assert_eq!(ResourceType::from_str(ty.as_str()), Some(ty));
        }
        assert_eq!(ResourceType::from_str("IMAGE"), Some(ResourceType::Image));
        assert_eq!(ResourceType::from_str("font"), None);
    }

    #[test]
    fn test_value_range_inclusive_bounds() {
        let range = ValueRange { from: 100, to: 200 };
        assert!(range.contains(100));
        assert!(range.contains(150));
        assert!(range.contains(200));
        assert!(!range.contains(99));
        assert!(!range.contains(201));
    }

    #[test]
    fn test_value_range_well_formed() {
        assert!(ValueRange { from: 1, to: 1 }.is_well_formed());
        assert!(!ValueRange { from: 2, to: 1 }.is_well_formed());
    }

    #[test]
    fn test_empty_attributes() {
        let attrs = NodeAttributes::default();
        assert!(attrs.is_empty());
        assert!(attrs.kinds().is_empty());
    }

    #[test]
    fn test_attribute_kinds_listed() {
        let attrs = NodeAttributes {
            screen_dpi: Some(300),
            language: Some("en".to_string()),
            ..Default::default()
        };
        assert_eq!(
            attrs.kinds(),
            vec![AttributeKind::ScreenDpi, AttributeKind::Language]
        );
    }
}
