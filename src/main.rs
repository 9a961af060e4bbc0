use std::env;
use std::time::Instant;

use anyhow::Result;
use indexmap::IndexMap;
use log::{info, warn};

use laptok::{tokenize_batch, DatasetLoader, GraphRecord, TokenizerConfig};

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn parse_args() -> Result<String> {
    let mut args = env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "datasets".to_string());
    if let Some(extra) = args.next() {
        anyhow::bail!("Unexpected extra argument: {extra}");
    }
    Ok(root)
}

fn main() -> Result<()> {
    init_logging();
    let root = parse_args()?;
    let config = TokenizerConfig::default();

    let loader = DatasetLoader::new(&root);
    let records = loader.load_dir(".")?;
    if records.is_empty() {
        anyhow::bail!("No graph records available under {root}");
    }
    info!("Loaded {} graph records from {}", records.len(), root);

    // Batches require a uniform (nodes, features) shape; group records by
    // shape and tokenize each group independently.
    let mut groups: IndexMap<(usize, usize), Vec<(String, GraphRecord)>> = IndexMap::new();
    for (name, record) in records {
        groups
            .entry((record.node_count(), record.feature_width()))
            .or_default()
            .push((name, record));
    }

    for ((nodes, feature_width), members) in &groups {
        let start = Instant::now();
        let batch_records: Vec<GraphRecord> =
            members.iter().map(|(_, record)| record.clone()).collect();
        let batch = tokenize_batch(&batch_records, &config)?;
        let duration = start.elapsed();

        info!(
            "Group {}x{}: {} graphs -> tensor {:?} in {:?} ({} edges total)",
            nodes,
            feature_width,
            members.len(),
            batch.tokens.shape(),
            duration,
            batch.stats.total_edges
        );
        if batch.stats.dropped_edges > 0 {
            warn!(
                "Group {}x{}: dropped {} edges beyond capacity {}",
                nodes, feature_width, batch.stats.dropped_edges, config.max_edges
            );
        }
    }

    info!("Tokenized {} shape groups", groups.len());
    Ok(())
}
