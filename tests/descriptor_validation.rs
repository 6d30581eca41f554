//! Integration tests: descriptor loading from disk.

use std::fs;

use tempfile::TempDir;

use resvar::{DescriptorError, ResourceType, VariantIndex};

fn write_descriptor(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("res.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(
        &dir,
        r#"
        schema_version = 1

        [[group]]
        type = "image"
        default_folder = "img/default"

        [[group.node]]
        folder = "img/xhdpi"
        screen_dpi = 320
        platform_version = "2.4"

        [[group.node]]
        folder = "img/wide"
        screen_width_range = { from = 720, to = 1080 }
        screen_large = true

        [[group]]
        type = "layout"
        default_folder = "layout/default"

        [[group]]
        type = "sound"
        default_folder = "snd/default"

        [[group]]
        type = "bin"
        default_folder = "bin/default"
    "#,
    );

    let index = VariantIndex::load(&path).unwrap();
    assert_eq!(index.len(), 4);

    let image = index.find_group(ResourceType::Image).unwrap();
    assert_eq!(image.nodes.len(), 2);
    assert_eq!(image.nodes[0].attributes.screen_dpi, Some(320));
    assert_eq!(
        image.nodes[0].attributes.platform_version.as_deref(),
        Some("2.4")
    );
    assert_eq!(image.nodes[1].attributes.screen_large, Some(true));

    assert!(index.find_group(ResourceType::Binary).is_some());
    assert_eq!(index.digest().len(), 64);
}

#[test]
fn test_missing_descriptor_file() {
    let dir = TempDir::new().unwrap();
    let result = VariantIndex::load(&dir.path().join("res.toml"));
    assert!(matches!(result, Err(DescriptorError::NotFound(_))));
}

#[test]
fn test_malformed_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "[[group]]\ntype = ");

    let result = VariantIndex::load(&path);
    assert!(matches!(result, Err(DescriptorError::Parse(_))));
}

#[test]
fn test_duplicate_group_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(
        &dir,
        r#"
        [[group]]
        type = "sound"
        default_folder = "a"

        [[group]]
        type = "sound"
        default_folder = "b"
    "#,
    );

    let result = VariantIndex::load(&path);
    assert!(matches!(
        result,
        Err(DescriptorError::DuplicateGroup(ResourceType::Sound))
    ));
}

#[test]
fn test_inverted_range_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(
        &dir,
        r#"
        [[group]]
        type = "image"
        default_folder = "img/default"

        [[group.node]]
        folder = "img/wide"
        screen_width_range = { from = 1080, to = 720 }
    "#,
    );

    let result = VariantIndex::load(&path);
    assert!(matches!(result, Err(DescriptorError::InvalidValue { .. })));
}

#[test]
fn test_digest_changes_with_content() {
    let dir = TempDir::new().unwrap();

    let path_a = dir.path().join("a.toml");
    fs::write(
        &path_a,
        "[[group]]\ntype = \"image\"\ndefault_folder = \"a\"\n",
    )
    .unwrap();

    let path_b = dir.path().join("b.toml");
    fs::write(
        &path_b,
        "[[group]]\ntype = \"image\"\ndefault_folder = \"b\"\n",
    )
    .unwrap();

    let index_a = VariantIndex::load(&path_a).unwrap();
    let index_b = VariantIndex::load(&path_b).unwrap();
    assert_ne!(index_a.digest(), index_b.digest());
}
