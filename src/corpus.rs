//! Streaming access to JSON-lines review dumps.
//!
//! The corpus is far too large to hold in memory; records are decoded
//! one line at a time and handed to the scan. A line that fails to
//! decode becomes a record with no book id, which the scan skips and
//! counts; only failures of the underlying stream are fatal.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// One line of the review dump, decoded leniently. The public dump
/// writes `book_id` as a string of digits; plain numbers are accepted
/// too. Non-string review text is treated as absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawReview {
    #[serde(default, deserialize_with = "lenient_book_id")]
    pub book_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub review_text: Option<String>,
}

fn lenient_book_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Line-buffered reader over a JSONL review dump.
pub struct CorpusReader<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> CorpusReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl CorpusReader<Box<dyn BufRead>> {
    /// Open a corpus file, transparently decompressing `*.gz`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(reader))
    }

    /// Read the corpus from stdin.
    pub fn stdin() -> Self {
        Self::new(Box::new(BufReader::new(io::stdin())))
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<RawReview>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    let trimmed = self.line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    // Undecodable lines degrade to an id-less record.
                    let record = serde_json::from_str(trimmed).unwrap_or_default();
                    return Some(Ok(record));
                }
                Err(err) => return Some(Err(Error::Corpus(err))),
            }
        }
    }
}
