//! Lexicon-based feature extraction over book review dumps.
//!
//! One streaming pass over a JSON-lines review corpus produces one
//! fixed-width feature row per book: keyword hit counts across ten
//! semantic categories (abandonment, engagement, complexity, pace,
//! emotionality, sentiment), word-length statistics, and a sentiment
//! distribution. The corpus never has to fit in memory; only a small
//! per-book accumulator is retained until finalization.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use review_miner::{output, scan, BookAggregator, CorpusReader, Lexicon, ScanOptions};
//!
//! fn main() -> review_miner::Result<()> {
//!     let corpus = CorpusReader::open(Path::new("goodreads_reviews_dedup.json.gz"))?;
//!     let mut aggregator = BookAggregator::new();
//!     let stats = scan(corpus, Lexicon::shared(), &mut aggregator, ScanOptions::default())?;
//!     output::write_features_file(Path::new("features_reviews.csv"), aggregator.finalize())?;
//!     println!("scored {} reviews", stats.scored);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod output;
pub mod scanner;

pub use aggregate::{BookAggregator, BookFeatureVector};
pub use corpus::{CorpusReader, RawReview};
pub use error::{Error, Result};
pub use lexicon::{Lexicon, LexiconCategory};
pub use scanner::{scan, ReviewScanner, ReviewScore, ScanOptions, ScanStats, SentimentBucket};
