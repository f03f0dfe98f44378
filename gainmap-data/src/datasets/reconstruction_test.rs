// gainmap-data/src/datasets/reconstruction_test.rs

use super::*;
use std::path::PathBuf;
use std::sync::Arc;

fn collection(prefix: &str, n: usize) -> ImageCollection {
    ImageCollection::new((0..n).map(|i| path(prefix, i)).collect())
}

fn path(prefix: &str, i: usize) -> PathBuf {
    PathBuf::from(format!("/{prefix}{i:05}.png"))
}

fn index_of(collection: &ImageCollection, p: &Path) -> usize {
    collection
        .iter()
        .position(|c| c == p)
        .expect("path should come from the collection")
}

fn small_config() -> ReconstructionConfig {
    ReconstructionConfig {
        held_out_style_count: 4,
        test_set_size: 3,
        train_face_range: IndexRange::new(0, 9),
        test_face_range: IndexRange::new(12, 14),
        seed: Some(1234),
    }
}

#[test]
fn test_split_from_name() {
    assert_eq!(Split::from_name("train").unwrap(), Split::Train);
    assert_eq!(Split::from_name("ffhq_train_v2").unwrap(), Split::Train);
    assert_eq!(Split::from_name("test").unwrap(), Split::Test);
    // "train" wins when both are present.
    assert_eq!(Split::from_name("train_then_test").unwrap(), Split::Train);
    assert!(matches!(
        Split::from_name("validation"),
        Err(GainmapError::InvalidConfiguration(_))
    ));
    assert_eq!("testing".parse::<Split>().unwrap(), Split::Test);
}

#[test]
fn test_train_with_default_ranges() {
    let feat = collection("s", 150);
    let faces = collection("f", 67_001);
    let sampler = ReconstructionSampler::new(
        feat.clone(),
        faces.clone(),
        Split::Train,
        ReconstructionConfig::default(),
    )
    .unwrap();
    assert_eq!(sampler.len(), 50);

    let mut seen_faces = std::collections::HashSet::new();
    for _ in 0..20 {
        let pair = sampler.resolve(3).unwrap();
        assert_eq!(pair.style, path("s", 3));
        let face = index_of(&faces, &pair.input);
        assert!(face <= 67_000);
        seen_faces.insert(face);
    }
    assert!(seen_faces.len() > 1, "face selection should vary between calls");
}

#[test]
fn test_train_style_cycles_over_non_held_out() {
    let sampler =
        ReconstructionSampler::new(collection("s", 10), collection("f", 10), Split::Train, small_config())
            .unwrap();
    assert_eq!(sampler.len(), 6);
    for i in 0..40 {
        let pair = sampler.resolve(i).unwrap();
        assert_eq!(pair.style, path("s", i % 6));
    }
}

#[test]
fn test_train_faces_stay_in_range() {
    let faces = collection("f", 20);
    let sampler =
        ReconstructionSampler::new(collection("s", 10), faces.clone(), Split::Train, small_config()).unwrap();
    let mut seen = std::collections::HashSet::new();
    for i in 0..500 {
        let face = index_of(&faces, &sampler.resolve(i).unwrap().input);
        assert!(small_config().train_face_range.contains(face), "face {face} out of range");
        seen.insert(face);
    }
    // Both ends of the inclusive range are reachable.
    assert!(seen.contains(&0));
    assert!(seen.contains(&9));
}

#[test]
fn test_test_split_len_is_fixed() {
    let sampler =
        ReconstructionSampler::new(collection("s", 10), collection("f", 15), Split::Test, small_config())
            .unwrap();
    assert_eq!(sampler.len(), 3);

    let sampler = ReconstructionSampler::new(
        collection("s", 500),
        collection("f", 69_001),
        Split::Test,
        ReconstructionConfig::default(),
    )
    .unwrap();
    assert_eq!(sampler.len(), 10);
}

#[test]
fn test_test_split_draws_from_held_out_tail() {
    let feat = collection("s", 10);
    let faces = collection("f", 15);
    let sampler = ReconstructionSampler::new(feat.clone(), faces.clone(), Split::Test, small_config()).unwrap();
    assert_eq!(sampler.test_style_range(), IndexRange::new(7, 9));

    for i in 0..300 {
        let pair = sampler.resolve(i).unwrap();
        let style = index_of(&feat, &pair.style);
        assert!((7..=9).contains(&style), "style {style} outside held-out tail");
        let face = index_of(&faces, &pair.input);
        assert!((12..=14).contains(&face), "face {face} outside test range");
    }
}

#[test]
fn test_test_split_default_style_range() {
    let sampler = ReconstructionSampler::new(
        collection("s", 150),
        collection("f", 69_001),
        Split::Test,
        ReconstructionConfig::default(),
    )
    .unwrap();
    assert_eq!(sampler.test_style_range(), IndexRange::new(51, 149));
}

#[test]
fn test_same_seed_same_sequence() {
    let make = || {
        ReconstructionSampler::new(collection("s", 10), collection("f", 15), Split::Test, small_config())
            .unwrap()
    };
    let (a, b) = (make(), make());
    let seq_a: Vec<SamplePair> = (0..25).map(|i| a.resolve(i).unwrap()).collect();
    let seq_b: Vec<SamplePair> = (0..25).map(|i| b.resolve(i).unwrap()).collect();
    assert_eq!(seq_a, seq_b);
}

#[test]
fn test_with_rng_ignores_config_seed() {
    let config = small_config().with_seed(1);
    let a = ReconstructionSampler::with_rng(
        collection("s", 10),
        collection("f", 15),
        Split::Train,
        config.clone(),
        StdRng::seed_from_u64(99),
    )
    .unwrap();
    let b = ReconstructionSampler::new(
        collection("s", 10),
        collection("f", 15),
        Split::Train,
        config.with_seed(99),
    )
    .unwrap();
    for i in 0..10 {
        assert_eq!(a.resolve(i).unwrap(), b.resolve(i).unwrap());
    }
}

#[test]
fn test_too_few_styles() {
    let err = ReconstructionSampler::new(
        collection("s", 100),
        collection("f", 67_001),
        Split::Train,
        ReconstructionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GainmapError::InvalidConfiguration(_)));
}

#[test]
fn test_test_split_held_out_pool_is_whole_collection() {
    let feat = collection("s", 100);
    let sampler = ReconstructionSampler::new(
        feat.clone(),
        collection("f", 69_001),
        Split::Test,
        ReconstructionConfig::default().with_seed(7),
    )
    .unwrap();
    assert_eq!(sampler.len(), 10);
    assert_eq!(sampler.test_style_range(), IndexRange::new(1, 99));
    for i in 0..50 {
        let pair = sampler.resolve(i).unwrap();
        assert!((1..=99).contains(&index_of(&feat, &pair.style)));
    }
}

#[test]
fn test_test_split_one_style_short_of_held_out() {
    // 99 styles with 100 held out: draws cover [0, 98].
    let feat = collection("s", 99);
    let sampler = ReconstructionSampler::new(
        feat.clone(),
        collection("f", 69_001),
        Split::Test,
        ReconstructionConfig::default().with_seed(7),
    )
    .unwrap();
    assert_eq!(sampler.test_style_range(), IndexRange::new(0, 98));
    for i in 0..50 {
        let pair = sampler.resolve(i).unwrap();
        assert!(index_of(&feat, &pair.style) <= 98);
    }

    assert!(matches!(
        ReconstructionSampler::new(
            collection("s", 98),
            collection("f", 69_001),
            Split::Test,
            ReconstructionConfig::default(),
        ),
        Err(GainmapError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_too_few_faces_for_split() {
    // Enough faces for training but not for the test range.
    let faces = collection("f", 12);
    assert!(ReconstructionSampler::new(collection("s", 10), faces.clone(), Split::Train, small_config()).is_ok());
    assert!(matches!(
        ReconstructionSampler::new(collection("s", 10), faces, Split::Test, small_config()),
        Err(GainmapError::InvalidConfiguration(_))
    ));

    assert!(matches!(
        ReconstructionSampler::new(collection("s", 10), collection("f", 10), Split::Train, {
            let mut c = small_config();
            c.train_face_range = IndexRange::new(0, 10);
            c
        }),
        Err(GainmapError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_test_split_needs_two_held_out() {
    let mut config = small_config();
    config.held_out_style_count = 1;
    assert!(matches!(
        ReconstructionSampler::new(collection("s", 10), collection("f", 15), Split::Test, config),
        Err(GainmapError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_concurrent_resolve() {
    let sampler = Arc::new(
        ReconstructionSampler::new(collection("s", 10), collection("f", 15), Split::Train, small_config())
            .unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let sampler = Arc::clone(&sampler);
            std::thread::spawn(move || {
                for i in 0..100 {
                    let pair = sampler.resolve(t * 100 + i).unwrap();
                    assert_eq!(pair.style, path("s", (t * 100 + i) % 6));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_dataset_rejects_unknown_name() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ReconstructionDataset::new(dir.path(), "validation", ReconstructionConfig::default()),
        Err(GainmapError::InvalidConfiguration(_))
    ));
}
