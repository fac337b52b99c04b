//! Feature-table persistence.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::aggregate::BookFeatureVector;
use crate::error::Result;

/// Write finalized vectors as CSV, one row per book, header included.
pub fn write_features<W: Write>(writer: W, rows: &[BookFeatureVector]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the feature table to `path`.
pub fn write_features_file(path: &Path, rows: &[BookFeatureVector]) -> Result<()> {
    let file = File::create(path).map_err(csv::Error::from)?;
    write_features(file, rows)
}
