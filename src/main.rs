use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use review_miner::{output, scan, BookAggregator, CorpusReader, Lexicon, ScanOptions};

#[derive(Parser)]
#[command(
    name = "review-miner",
    about = "Extract per-book style features from a review dump",
    version
)]
struct Cli {
    /// JSON-lines review dump (.json or .json.gz); reads stdin if omitted
    reviews: Option<PathBuf>,

    /// Where to write the per-book feature table
    #[arg(short, long, default_value = "features_reviews.csv")]
    output: PathBuf,

    /// Stop the scan once this many distinct books have been seen
    #[arg(long)]
    max_books: Option<usize>,

    /// Analyze at most this many reviews per book
    #[arg(long)]
    reviews_per_book: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let corpus = match &cli.reviews {
        Some(path) => {
            info!("reading reviews from {}", path.display());
            CorpusReader::open(path).with_context(|| format!("cannot open {}", path.display()))?
        }
        None => {
            info!("reading reviews from stdin");
            CorpusReader::stdin()
        }
    };

    let options = ScanOptions {
        max_books: cli.max_books,
        reviews_per_book: cli.reviews_per_book,
    };
    let mut aggregator = BookAggregator::new();
    let stats = scan(corpus, Lexicon::shared(), &mut aggregator, options)?;

    let rows = aggregator.finalize();
    output::write_features_file(&cli.output, rows)
        .with_context(|| format!("cannot write {}", cli.output.display()))?;

    info!(
        "{} books, {} reviews scored, {} records skipped, {} reviews sampled out",
        rows.len(),
        stats.scored,
        stats.skipped_malformed,
        stats.sampled_out
    );
    info!("features written to {}", cli.output.display());
    Ok(())
}
