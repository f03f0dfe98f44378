// gainmap-data/src/datasets/folder_test.rs

use super::*;
use std::fs;
use tempfile::tempdir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

#[test]
fn test_is_image_file_case_sensitive() {
    assert!(is_image_file("a.jpg"));
    assert!(is_image_file("a.JPG"));
    assert!(is_image_file("a.jpeg"));
    assert!(is_image_file("a.JPEG"));
    assert!(is_image_file("a.png"));
    assert!(is_image_file("a.PNG"));
    assert!(is_image_file("a.bmp"));
    assert!(is_image_file("a.BMP"));

    assert!(!is_image_file("a.Jpg"));
    assert!(!is_image_file("a.pNg"));
    assert!(!is_image_file("a.gif"));
    assert!(!is_image_file("a.jpg.txt"));
    assert!(!is_image_file("jpg"));
}

#[test]
fn test_make_dataset_filters_and_sorts_recursively() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("b.png"));
    touch(&root.join("a.JPG"));
    touch(&root.join("notes.txt"));
    touch(&root.join("mixed.Png"));
    touch(&root.join("zz/inner.bmp"));
    touch(&root.join("aa/deeper/x.jpeg"));
    touch(&root.join("aa/readme.md"));

    let images = make_dataset(root).unwrap();
    let expected = vec![
        root.join("a.JPG"),
        root.join("aa/deeper/x.jpeg"),
        root.join("b.png"),
        root.join("zz/inner.bmp"),
    ];
    assert_eq!(images.as_slice(), expected.as_slice());

    let mut sorted = images.clone().into_inner();
    sorted.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    assert_eq!(images.into_inner(), sorted);
}

#[test]
fn test_make_dataset_sorts_by_full_path_string() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a/b.png"));
    touch(&root.join("a-b.png"));

    // '-' sorts before '/', so the flat file comes first.
    let images = make_dataset(root).unwrap();
    assert_eq!(
        images.as_slice(),
        &[root.join("a-b.png"), root.join("a/b.png")]
    );
}

#[cfg(unix)]
#[test]
fn test_make_dataset_keeps_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    let name = OsStr::from_bytes(b"caf\xe9.png");
    assert!(is_image_file(name));
    assert!(!is_image_file(OsStr::from_bytes(b"caf\xe9.txt")));
    touch(&root.join(name));
    touch(&root.join("plain.png"));

    let images = make_dataset(root).unwrap();
    assert_eq!(
        images.as_slice(),
        &[root.join(name), root.join("plain.png")]
    );
}

#[test]
fn test_make_dataset_empty_directory() {
    let dir = tempdir().unwrap();
    let images = make_dataset(dir.path()).unwrap();
    assert!(images.is_empty());
    assert_eq!(images.len(), 0);
}

#[test]
fn test_make_dataset_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    match make_dataset(&missing) {
        Err(GainmapError::NotADirectory { path }) => {
            assert_eq!(path, missing.display().to_string());
        }
        other => panic!("Expected NotADirectory, got {:?}", other),
    }
}

#[test]
fn test_make_dataset_file_is_not_a_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.png");
    touch(&file);
    assert!(matches!(
        make_dataset(&file),
        Err(GainmapError::NotADirectory { .. })
    ));
}

#[test]
fn test_collection_get_out_of_bounds() {
    let collection = ImageCollection::new(vec![PathBuf::from("/b.png"), PathBuf::from("/a.png")]);
    assert_eq!(collection.get(0).unwrap(), Path::new("/a.png"));
    assert_eq!(collection.get(1).unwrap(), Path::new("/b.png"));
    assert_eq!(
        collection.get(2).unwrap_err(),
        GainmapError::IndexOutOfBounds {
            index: vec![2],
            shape: vec![2]
        }
    );
}
