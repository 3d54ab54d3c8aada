//! Descriptor generation integration tests
//!
//! These tests drive the public library API against real directory trees:
//! - Discovery counts and filtering
//! - Module naming across namespace depths
//! - Idempotence of repeated builds

use extbuild::{build_all, discover, BuildConfig, BuildDescriptor, DiscoveryOptions};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use yare::parameterized;

/// Creates a tree shaped like a Python package with Cython sources
fn create_python_package(dir: &TempDir) -> PathBuf {
    let root = dir.path().join("src");
    fs::create_dir_all(root.join("hwt/plot")).unwrap();
    fs::create_dir_all(root.join("hwt/signal/filters")).unwrap();

    fs::write(root.join("hwt/__init__.py"), "").unwrap();
    fs::write(root.join("hwt/plot/__init__.py"), "").unwrap();
    fs::write(root.join("hwt/plot/funcs.py"), "def colorbar(): pass\n").unwrap();
    fs::write(root.join("hwt/plot/render.pyx"), "cdef int n = 0\n").unwrap();
    fs::write(root.join("hwt/signal/fft.pyx"), "cdef double x\n").unwrap();
    fs::write(root.join("hwt/signal/fft.pxd"), "cdef double x\n").unwrap();
    fs::write(root.join("hwt/signal/filters/iir.pyx"), "").unwrap();
    fs::write(root.join("hwt/signal/filters/iir.c"), "/* generated */").unwrap();

    root
}

fn module_names(descriptors: &[BuildDescriptor]) -> BTreeSet<String> {
    descriptors
        .iter()
        .map(|d| d.module_name().to_string())
        .collect()
}

#[test]
fn test_package_layout_module_names() {
    let temp = TempDir::new().unwrap();
    let root = create_python_package(&temp);

    let descriptors = build_all(&root, &BuildConfig::default()).unwrap();

    let expected: BTreeSet<String> = ["hwt.plot.render", "hwt.signal.fft", "hwt.signal.filters.iir"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(module_names(&descriptors), expected);

    for descriptor in &descriptors {
        assert_eq!(descriptor.sources().len(), 1);
        assert!(descriptor.sources()[0].starts_with(&root));
        assert_eq!(descriptor.compile_flags(), &["-O3", "-Wall"]);
    }
}

#[parameterized(
    keep_root = { 0, &["src.hwt.plot.render", "src.hwt.signal.fft", "src.hwt.signal.filters.iir"] },
    drop_root = { 1, &["hwt.plot.render", "hwt.signal.fft", "hwt.signal.filters.iir"] },
    drop_package = { 2, &["plot.render", "signal.fft", "signal.filters.iir"] },
)]
fn test_namespace_depth(depth: usize, expected: &[&str]) {
    let temp = TempDir::new().unwrap();
    let root = create_python_package(&temp);
    let config = BuildConfig {
        namespace_depth: depth,
        ..Default::default()
    };

    let descriptors = build_all(&root, &config).unwrap();

    let expected: BTreeSet<String> = expected.iter().map(|s| s.to_string()).collect();
    assert_eq!(module_names(&descriptors), expected);
}

#[parameterized(
    none_matching = { 0, 4 },
    one_matching = { 1, 0 },
    mixed = { 5, 7 },
)]
fn test_discover_counts_matching_files(matching: usize, other: usize) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src/pkg");
    fs::create_dir_all(root.join("nested")).unwrap();

    for i in 0..matching {
        let dir = if i % 2 == 0 { root.clone() } else { root.join("nested") };
        fs::write(dir.join(format!("m{}.ext", i)), "").unwrap();
    }
    for i in 0..other {
        let dir = if i % 2 == 0 { root.clone() } else { root.join("nested") };
        fs::write(dir.join(format!("f{}.txt", i)), "").unwrap();
    }

    let discovery = discover(&root, ".ext").unwrap();
    assert_eq!(discovery.collect_paths().unwrap().len(), matching);
}

#[test]
fn test_module_names_never_contain_separators() {
    let temp = TempDir::new().unwrap();
    let root = create_python_package(&temp);

    for descriptor in build_all(&root, &BuildConfig::default()).unwrap() {
        let name = descriptor.module_name();
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(!name.starts_with("src."));
        assert!(!name.split('.').any(str::is_empty));
    }
}

#[test]
fn test_repeated_builds_are_equal() {
    let temp = TempDir::new().unwrap();
    let root = create_python_package(&temp);
    let config = BuildConfig {
        include_dirs: vec![PathBuf::from("/opt/numpy/include")],
        ..Default::default()
    };

    let first: BTreeSet<(String, Vec<PathBuf>, Vec<String>)> = build_all(&root, &config)
        .unwrap()
        .into_iter()
        .map(|d| {
            (
                d.module_name().to_string(),
                d.include_dirs().to_vec(),
                d.compile_flags().to_vec(),
            )
        })
        .collect();
    let second: BTreeSet<(String, Vec<PathBuf>, Vec<String>)> = build_all(&root, &config)
        .unwrap()
        .into_iter()
        .map(|d| {
            (
                d.module_name().to_string(),
                d.include_dirs().to_vec(),
                d.compile_flags().to_vec(),
            )
        })
        .collect();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_sorted_discovery_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let root = create_python_package(&temp);
    let config = BuildConfig {
        discovery: DiscoveryOptions {
            sorted: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let names: Vec<String> = build_all(&root, &config)
        .unwrap()
        .iter()
        .map(|d| d.module_name().to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "hwt.plot.render",
            "hwt.signal.fft",
            "hwt.signal.filters.iir"
        ]
    );
}
