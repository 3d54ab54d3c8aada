//! Error handling integration tests
//!
//! Tests the fatal error taxonomy:
//! - Missing or invalid root directories
//! - Sources outside the root
//! - Empty, malformed and duplicated module names
//! - Configuration errors surfacing through the build
//! - Filesystem traversal failures

use extbuild::{
    build_all, build_descriptor, BuildConfig, BuildError, DiscoveryOptions, ModuleNaming,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_missing_root_is_configuration_error() {
    let result = build_all(Path::new("/nonexistent/extbuild/src"), &BuildConfig::default());

    match result {
        Err(BuildError::Configuration(message)) => {
            assert!(message.contains("/nonexistent/extbuild/src"));
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
}

#[test]
fn test_root_that_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("module.pyx");
    fs::write(&file_path, "").unwrap();

    let result = build_all(&file_path, &BuildConfig::default());
    assert!(matches!(result, Err(BuildError::Configuration(_))));
}

#[test]
fn test_source_outside_root_is_path_error() {
    let naming = ModuleNaming::new(".pyx");
    let result = build_descriptor(
        Path::new("/elsewhere/pkg/a.pyx"),
        Path::new("/project/src"),
        &naming,
        &[],
        &[],
    );

    match result {
        Err(BuildError::Path { path, root }) => {
            assert_eq!(path, PathBuf::from("/elsewhere/pkg/a.pyx"));
            assert_eq!(root, PathBuf::from("/project/src"));
        }
        other => panic!("Expected Path error, got {:?}", other),
    }
}

#[test]
fn test_depth_consuming_all_segments_is_naming_error() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("top.pyx"), "").unwrap();

    let config = BuildConfig {
        namespace_depth: 2,
        ..Default::default()
    };

    match build_all(&root, &config) {
        Err(BuildError::Naming { path, reason }) => {
            assert_eq!(path, root.join("top.pyx"));
            assert!(reason.contains("namespace depth"));
        }
        other => panic!("Expected Naming error, got {:?}", other),
    }
}

#[test]
fn test_bare_suffix_file_is_naming_error() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::write(root.join("pkg/.pyx"), "").unwrap();

    match build_all(&root, &BuildConfig::default()) {
        Err(BuildError::Naming { reason, .. }) => assert_eq!(reason, "empty file stem"),
        other => panic!("Expected Naming error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_module_names() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    fs::create_dir_all(root.join("v1/codec")).unwrap();
    fs::create_dir_all(root.join("v2/codec")).unwrap();
    fs::write(root.join("v1/codec/fast.pyx"), "").unwrap();
    fs::write(root.join("v2/codec/fast.pyx"), "").unwrap();

    let config = BuildConfig {
        namespace_depth: 2,
        ..Default::default()
    };

    let err = build_all(&root, &config).unwrap_err();
    assert!(matches!(err, BuildError::Naming { .. }));
    assert!(err.to_string().contains("codec.fast"));
}

#[test]
fn test_invalid_configuration_is_rejected_before_scanning() {
    let temp = TempDir::new().unwrap();
    let config = BuildConfig {
        suffix: "nested/.pyx".to_string(),
        ..Default::default()
    };

    let result = build_all(temp.path(), &config);
    assert!(matches!(result, Err(BuildError::Configuration(_))));
}

#[test]
#[cfg(unix)]
fn test_symlink_loop_is_walk_error() {
    use std::os::unix::fs::symlink;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::write(root.join("pkg/mod.pyx"), "").unwrap();
    symlink(&root, root.join("pkg/back")).unwrap();

    let config = BuildConfig {
        discovery: DiscoveryOptions {
            follow_links: true,
            ..Default::default()
        },
        ..Default::default()
    };

    match build_all(&root, &config) {
        Err(BuildError::Walk(err)) => assert!(err.loop_ancestor().is_some()),
        other => panic!("Expected Walk error, got {:?}", other),
    }
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_is_walk_error() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    let locked = root.join("locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("hidden.pyx"), "").unwrap();

    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&locked, perms).unwrap();

    // Privileged users bypass permission bits.
    if fs::read_dir(&locked).is_ok() {
        eprintln!("skipping: running with permission to read mode 000 directories");
    } else {
        let result = build_all(&root, &BuildConfig::default());
        assert!(matches!(result, Err(BuildError::Walk(_))));
    }

    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_mode(0o755);
    let _ = fs::set_permissions(&locked, perms);
}
