//! Iterates the style-transfer and reconstruction datasets under a data root.
//!
//! Usage: `cargo run --example style_transfer_loading -- <root> [config.json]`
//!
//! Expects `<root>/testing/{style,input}` and, for the reconstruction part,
//! `<root>/styles` and `<root>/ffhq`. The optional JSON file overrides the
//! reconstruction ranges.

use gainmap_data::{
    DataLoader, Dataset, RandomSampler, ReconstructionConfig, ReconstructionDataset,
    SequentialSampler, StyleTransferDataset, StyleTransferMode,
};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| "data".to_string()));
    let config = match args.next() {
        Some(path) => ReconstructionConfig::from_json_file(path)?,
        None => ReconstructionConfig::default().with_seed(0),
    };

    let dataset = StyleTransferDataset::new(&root, "testing", StyleTransferMode::Paired)?;
    println!("\n--- Style transfer ({} samples) ---", dataset.len());
    let loader = DataLoader::new(dataset, 1, SequentialSampler::new(), false, None);
    for (i, batch) in loader.enumerate() {
        for item in batch? {
            println!(
                "Batch {i}: style {:?}, input {:?} (requires_grad={})",
                item.style.shape(),
                item.input.shape(),
                item.input.requires_grad()
            );
        }
    }

    if root.join("styles").is_dir() && root.join("ffhq").is_dir() {
        let dataset = ReconstructionDataset::new(&root, "test", config)?;
        println!("\n--- Reconstruction test split ({} samples) ---", dataset.len());
        let loader = DataLoader::new(dataset, 2, RandomSampler::with_seed(false, None, 0), false, None);
        for (i, batch) in loader.enumerate() {
            println!("Batch {i}: {} items", batch?.len());
        }
    }

    Ok(())
}
