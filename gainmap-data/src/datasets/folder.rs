// gainmap-data/src/datasets/folder.rs

use gainmap_core::GainmapError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name suffixes recognised as images. Matching is case-sensitive.
pub const IMG_EXTENSIONS: [&str; 8] = [
    ".jpg", ".JPG", ".jpeg", ".JPEG", ".png", ".PNG", ".bmp", ".BMP",
];

/// Returns true if `file_name` ends with one of [`IMG_EXTENSIONS`].
///
/// Compares raw bytes, so names that are not valid UTF-8 still match.
pub fn is_image_file<S: AsRef<OsStr>>(file_name: S) -> bool {
    let name = file_name.as_ref().as_encoded_bytes();
    IMG_EXTENSIONS
        .iter()
        .any(|ext| name.ends_with(ext.as_bytes()))
}

/// An ordered, immutable list of image paths.
///
/// Paths are sorted lexicographically. The collection never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageCollection {
    paths: Vec<PathBuf>,
}

impl ImageCollection {
    /// Builds a collection from arbitrary paths, sorting them by their full
    /// path string (not component-wise).
    pub fn new(mut paths: Vec<PathBuf>) -> Self {
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        ImageCollection { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the path at `index`.
    ///
    /// # Errors
    ///
    /// Returns `GainmapError::IndexOutOfBounds` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&Path, GainmapError> {
        self.paths
            .get(index)
            .map(PathBuf::as_path)
            .ok_or_else(|| GainmapError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![self.paths.len()],
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn into_inner(self) -> Vec<PathBuf> {
        self.paths
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Recursively collects every image file under `dir`.
///
/// Subdirectories are visited in sorted order and the final list is sorted
/// by full path, so the result does not depend on the platform's directory
/// listing order.
///
/// # Errors
///
/// * `GainmapError::NotADirectory` if `dir` does not exist or is not a
///   directory. Checked before any traversal.
/// * `GainmapError::Io` if a subdirectory cannot be read.
pub fn make_dataset<P: AsRef<Path>>(dir: P) -> Result<ImageCollection, GainmapError> {
    let dir = dir.as_ref();
    log::info!("Scanning image directory {}", dir.display());
    if !dir.is_dir() {
        return Err(GainmapError::NotADirectory {
            path: dir.display().to_string(),
        });
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| GainmapError::Io(e.to_string()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        if is_image_file(entry.file_name()) {
            images.push(entry.into_path());
        }
    }

    let collection = ImageCollection::new(images);
    log::debug!(
        "Found {} images under {}",
        collection.len(),
        dir.display()
    );
    Ok(collection)
}

#[cfg(test)]
#[path = "folder_test.rs"]
mod tests;
