//! Attribute condition evaluation and additive scoring.
//!
//! A node matches when every condition it declares holds for the device
//! (AND semantics). Matching nodes score the sum of a fixed weight per
//! declared attribute kind, so nodes constraining more — and more
//! specific — attributes outrank looser ones.

use std::cmp::Ordering;

use resvar_descriptor::{AttributeKind, NodeAttributes};
use resvar_device::DeviceContext;

/// Per-attribute weights. Magnitudes are spaced so that a higher-ranked
/// kind always outweighs any combination of lower-ranked ones.
pub const WEIGHT_PLATFORM_VERSION: u64 = 1_000_000;
pub const WEIGHT_LANGUAGE: u64 = 100_000;
pub const WEIGHT_SCREEN_DPI: u64 = 10_000;
pub const WEIGHT_SCREEN_DPI_RANGE: u64 = 10_000;
pub const WEIGHT_SCREEN_BPP: u64 = 1_000;
pub const WEIGHT_SCREEN_WIDTH_RANGE: u64 = 100;
pub const WEIGHT_SCREEN_LARGE: u64 = 10;

/// Weight contributed by one attribute kind.
pub fn attribute_weight(kind: AttributeKind) -> u64 {
    match kind {
        AttributeKind::PlatformVersion => WEIGHT_PLATFORM_VERSION,
        AttributeKind::Language => WEIGHT_LANGUAGE,
        AttributeKind::ScreenDpi => WEIGHT_SCREEN_DPI,
        AttributeKind::ScreenDpiRange => WEIGHT_SCREEN_DPI_RANGE,
        AttributeKind::ScreenBpp => WEIGHT_SCREEN_BPP,
        AttributeKind::ScreenWidthRange => WEIGHT_SCREEN_WIDTH_RANGE,
        AttributeKind::ScreenLarge => WEIGHT_SCREEN_LARGE,
    }
}

/// First condition the device fails, or `None` when the node matches.
pub fn first_failed_condition(
    attributes: &NodeAttributes,
    device: &DeviceContext,
) -> Option<AttributeKind> {
    if let Some(dpi) = attributes.screen_dpi {
        if device.screen_dpi != dpi {
            return Some(AttributeKind::ScreenDpi);
        }
    }

    if let Some(range) = attributes.screen_dpi_range {
        if !range.contains(device.screen_dpi) {
            return Some(AttributeKind::ScreenDpiRange);
        }
    }

    if let Some(range) = attributes.screen_width_range {
        if !range.contains(device.screen_width) {
            return Some(AttributeKind::ScreenWidthRange);
        }
    }

    if let Some(large) = attributes.screen_large {
        if device.screen_large != large {
            return Some(AttributeKind::ScreenLarge);
        }
    }

    if let Some(bpp) = attributes.screen_bpp {
        if device.screen_bpp != bpp {
            return Some(AttributeKind::ScreenBpp);
        }
    }

    if let Some(ref version) = attributes.platform_version {
        if compare_versions(&device.platform_version, version) == Ordering::Less {
            return Some(AttributeKind::PlatformVersion);
        }
    }

    if let Some(ref language) = attributes.language {
        if device.language != *language {
            return Some(AttributeKind::Language);
        }
    }

    None
}

/// Whether every condition on the node holds for the device.
pub fn matches(attributes: &NodeAttributes, device: &DeviceContext) -> bool {
    first_failed_condition(attributes, device).is_none()
}

/// Score for a matching node: the sum of weights of its declared kinds.
pub fn node_score(attributes: &NodeAttributes) -> u64 {
    attributes.kinds().into_iter().map(attribute_weight).sum()
}

/// Compare dotted numeric versions (e.g., "2.3" vs "2.4.1").
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u32> {
        v.split('.').filter_map(|s| s.parse::<u32>().ok()).collect()
    };

    let a_parts = parse(a);
    let b_parts = parse(b);

    for (ap, bp) in a_parts.iter().zip(b_parts.iter()) {
        match ap.cmp(bp) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    a_parts.len().cmp(&b_parts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvar_descriptor::ValueRange;

    fn sample_device() -> DeviceContext {
        DeviceContext {
            screen_dpi: 300,
            screen_width: 720,
            screen_large: false,
            screen_bpp: 32,
            platform_version: "2.4.0".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_empty_attributes_match_anything() {
        assert!(matches(&NodeAttributes::default(), &sample_device()));
        assert_eq!(node_score(&NodeAttributes::default()), 0);
    }

    #[test]
    fn test_exact_dpi() {
        let attrs = NodeAttributes {
            screen_dpi: Some(300),
            ..Default::default()
        };
        assert!(matches(&attrs, &sample_device()));
        assert_eq!(node_score(&attrs), WEIGHT_SCREEN_DPI);

        let attrs = NodeAttributes {
            screen_dpi: Some(240),
            ..Default::default()
        };
        assert_eq!(
            first_failed_condition(&attrs, &sample_device()),
            Some(AttributeKind::ScreenDpi)
        );
    }

    #[test]
    fn test_dpi_range_inclusive() {
        let attrs = NodeAttributes {
            screen_dpi_range: Some(ValueRange { from: 100, to: 300 }),
            ..Default::default()
        };
        let mut device = sample_device();

        device.screen_dpi = 100;
        assert!(matches(&attrs, &device));
        device.screen_dpi = 300;
        assert!(matches(&attrs, &device));
        device.screen_dpi = 99;
        assert!(!matches(&attrs, &device));
        device.screen_dpi = 301;
        assert!(!matches(&attrs, &device));
    }

    #[test]
    fn test_and_semantics() {
        let attrs = NodeAttributes {
            screen_dpi: Some(300),
            language: Some("ko".to_string()),
            ..Default::default()
        };
        // DPI holds, language fails, node is out
        assert_eq!(
            first_failed_condition(&attrs, &sample_device()),
            Some(AttributeKind::Language)
        );
    }

    #[test]
    fn test_platform_version_is_minimum() {
        let mut attrs = NodeAttributes {
            platform_version: Some("2.3".to_string()),
            ..Default::default()
        };
        // Device 2.4.0 satisfies a 2.3 node
        assert!(matches(&attrs, &sample_device()));

        attrs.platform_version = Some("2.4.0".to_string());
        assert!(matches(&attrs, &sample_device()));

        attrs.platform_version = Some("2.5".to_string());
        assert_eq!(
            first_failed_condition(&attrs, &sample_device()),
            Some(AttributeKind::PlatformVersion)
        );
    }

    #[test]
    fn test_language_exact_match() {
        let attrs = NodeAttributes {
            language: Some("en".to_string()),
            ..Default::default()
        };
        assert!(matches(&attrs, &sample_device()));

        let mut device = sample_device();
        device.language = "en-US".to_string();
        assert!(!matches(&attrs, &device));
    }

    #[test]
    fn test_weight_ordering() {
        assert!(WEIGHT_PLATFORM_VERSION > WEIGHT_LANGUAGE);
        assert!(WEIGHT_LANGUAGE > WEIGHT_SCREEN_DPI);
        assert_eq!(WEIGHT_SCREEN_DPI, WEIGHT_SCREEN_DPI_RANGE);
        assert!(WEIGHT_SCREEN_DPI_RANGE > WEIGHT_SCREEN_BPP);
        assert!(WEIGHT_SCREEN_BPP > WEIGHT_SCREEN_WIDTH_RANGE);
        assert!(WEIGHT_SCREEN_WIDTH_RANGE > WEIGHT_SCREEN_LARGE);
    }

    #[test]
    fn test_higher_kind_outweighs_combination_of_lower() {
        // A language-only node beats a node matching every screen attribute
        let language_only = NodeAttributes {
            language: Some("en".to_string()),
            ..Default::default()
        };
        let all_screen = NodeAttributes {
            screen_dpi: Some(300),
            screen_dpi_range: Some(ValueRange { from: 100, to: 400 }),
            screen_width_range: Some(ValueRange { from: 480, to: 1080 }),
            screen_large: Some(false),
            screen_bpp: Some(32),
            ..Default::default()
        };
        assert!(node_score(&language_only) > node_score(&all_screen));
    }

    #[test]
    fn test_additive_score() {
        let attrs = NodeAttributes {
            screen_dpi: Some(300),
            language: Some("en".to_string()),
            ..Default::default()
        };
        assert_eq!(node_score(&attrs), WEIGHT_SCREEN_DPI + WEIGHT_LANGUAGE);
    }

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("2.3", "2.4"), Ordering::Less);
        assert_eq!(compare_versions("2.4", "2.3"), Ordering::Greater);
        assert_eq!(compare_versions("2.4", "2.4"), Ordering::Equal);
        assert_eq!(compare_versions("2.4.1", "2.4"), Ordering::Greater);
        assert_eq!(compare_versions("2", "2.0"), Ordering::Less);
    }
}
