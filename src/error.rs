use std::io;

/// Errors that terminate a feature-extraction run. Per-record problems
/// (undecodable lines, missing book ids) are skipped and counted by the
/// scan instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The corpus stream itself failed mid-scan.
    #[error("corpus read failed: {0}")]
    Corpus(#[from] io::Error),

    /// `accumulate` was called on an aggregator that has already been
    /// finalized.
    #[error("aggregator is finalized and no longer accepts reviews")]
    Finalized,

    /// The feature table could not be written.
    #[error("failed to write feature table: {0}")]
    Output(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
