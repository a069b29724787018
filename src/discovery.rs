use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::Result;

const RASTER_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            RASTER_EXTENSIONS
                .iter()
                .any(|raster| extension.eq_ignore_ascii_case(raster))
        })
}

/// Raster files anywhere under `root`, sorted by path.
pub fn find_rasters<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let mut rasters = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_raster(entry.path()) {
            debug!("found {}", entry.path().display());
            rasters.push(entry.into_path());
        }
    }
    rasters.sort();
    Ok(rasters)
}
