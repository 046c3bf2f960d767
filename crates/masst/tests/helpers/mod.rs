#![allow(dead_code)]

use std::{fs, path::Path, path::PathBuf};

use masst::ResultLayout;
use tempfile::TempDir;

pub fn data_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

pub fn read_data(rel: &str) -> String {
    let full = data_path(rel);
    fs::read_to_string(&full).unwrap_or_else(|e| panic!("cannot read {:?}: {}", full, e))
}

pub fn temp_root() -> TempDir {
    tempfile::Builder::new()
        .prefix("masst-test-")
        .tempdir()
        .unwrap_or_else(|e| panic!("cannot create temp dir: {e}"))
}

pub fn plant_layout(root: &Path) -> ResultLayout {
    ResultLayout::new(root, "fastMASST_plant.html").with_analog("fastMASST_analog_plant.html")
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir {:?}: {}", parent, e));
    }
    fs::write(path, b"<html></html>").unwrap_or_else(|e| panic!("write {:?}: {}", path, e));
}
