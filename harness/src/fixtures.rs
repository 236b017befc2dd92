//! Image fixtures shipped with the scenario suite.

use std::path::{Path, PathBuf};

pub const CAT_JPG: &str = "images/cat1.jpg";
pub const CAT_PNG: &str = "images/cat1.png";
pub const CAT_TIFF: &str = "images/cat1.tiff";

/// Resolves `relative` against this crate's `tests/` directory.
pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(relative)
}
