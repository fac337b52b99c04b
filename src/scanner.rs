//! Per-review scoring and the single-pass corpus scan.
//!
//! The scanner never holds more than one review in memory: each record
//! is normalized, scored against the lexicon, folded into its book's
//! aggregate, and dropped.

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::aggregate::BookAggregator;
use crate::corpus::RawReview;
use crate::error::Result;
use crate::lexicon::{Lexicon, LexiconCategory};

// Review dumps embed markup like <br> and <spoiler> tags.
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

const PROGRESS_EVERY: u64 = 100_000;

/// Sentiment bucket for one review. Exactly one applies, so the trio is
/// an enum rather than three booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBucket {
    Positive,
    Negative,
    Neutral,
}

impl SentimentBucket {
    fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.1 {
            SentimentBucket::Positive
        } else if polarity < -0.1 {
            SentimentBucket::Negative
        } else {
            SentimentBucket::Neutral
        }
    }
}

/// Ephemeral per-review measurement: consumed by the aggregator right
/// after it is produced, never stored.
#[derive(Debug, Clone)]
pub struct ReviewScore {
    /// Distinct-keyword hit count per category, indexed by
    /// `LexiconCategory as usize`.
    pub hits: [u32; LexiconCategory::COUNT],
    pub word_len_mean: f64,
    pub word_len_median: f64,
    pub word_len_std: f64,
    pub polarity: f64,
    pub bucket: SentimentBucket,
}

impl ReviewScore {
    pub fn category_hits(&self, category: LexiconCategory) -> u32 {
        self.hits[category as usize]
    }
}

/// Scores individual reviews against a lexicon.
pub struct ReviewScanner<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> ReviewScanner<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Normalize raw review text: lowercase, drop HTML tags, collapse
    /// whitespace runs.
    pub fn normalize(raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let stripped = HTML_TAG_RE.replace_all(&lowered, " ");
        let mut out = String::with_capacity(stripped.len());
        for word in stripped.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Score one review. Absent or empty text yields the all-zero score;
    /// the review still counts toward its book's denominator.
    pub fn score(&self, text: Option<&str>) -> ReviewScore {
        let normalized = text.map(Self::normalize).unwrap_or_default();

        let mut hits = [0u32; LexiconCategory::COUNT];
        for category in LexiconCategory::ALL {
            hits[category as usize] = self.lexicon.match_count(&normalized, category) as u32;
        }

        let (word_len_mean, word_len_median, word_len_std) = word_length_stats(&normalized);

        let pos = i64::from(hits[LexiconCategory::SentimentPositive as usize]);
        let neg = i64::from(hits[LexiconCategory::SentimentNegative as usize]);
        let polarity = (pos - neg) as f64 / (pos + neg).max(1) as f64;

        ReviewScore {
            hits,
            word_len_mean,
            word_len_median,
            word_len_std,
            polarity,
            bucket: SentimentBucket::from_polarity(polarity),
        }
    }
}

/// Mean, median, and population standard deviation of per-word character
/// length. Zero tokens yields all zeros.
fn word_length_stats(text: &str) -> (f64, f64, f64) {
    let mut lengths: Vec<usize> = text.unicode_words().map(|w| w.chars().count()).collect();
    if lengths.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    lengths.sort_unstable();

    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / n;
    let mid = lengths.len() / 2;
    let median = if lengths.len() % 2 == 1 {
        lengths[mid] as f64
    } else {
        (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
    };
    let variance = lengths
        .iter()
        .map(|&len| {
            let delta = len as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / n;

    (mean, median, variance.sqrt())
}

/// Caps carried over from the original batch job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Stop the whole scan once this many distinct books have been seen.
    pub max_books: Option<usize>,
    /// Analyze at most this many reviews per book; the rest are dropped
    /// before accumulation.
    pub reviews_per_book: Option<u64>,
}

/// Counters reported after a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Records pulled off the corpus, valid or not.
    pub records: u64,
    /// Reviews scored and handed to the aggregator.
    pub scored: u64,
    /// Records dropped for a missing or undecodable book id, including
    /// lines that failed to decode at all.
    pub skipped_malformed: u64,
    /// Reviews dropped by the per-book sampling cap.
    pub sampled_out: u64,
}

/// Drive one pass over the corpus: score every record and fold it into
/// the aggregator. Per-record problems are skipped and counted; an
/// error from the underlying stream aborts the scan.
pub fn scan<I>(
    records: I,
    lexicon: &Lexicon,
    aggregator: &mut BookAggregator,
    options: ScanOptions,
) -> Result<ScanStats>
where
    I: IntoIterator<Item = Result<RawReview>>,
{
    let scanner = ReviewScanner::new(lexicon);
    let mut stats = ScanStats::default();

    for record in records {
        let record = record?;
        stats.records += 1;
        if stats.records % PROGRESS_EVERY == 0 {
            info!(
                "processed {} records ({} books so far)",
                stats.records,
                aggregator.len()
            );
        }

        let Some(book_id) = record.book_id else {
            stats.skipped_malformed += 1;
            continue;
        };

        if let Some(cap) = options.reviews_per_book {
            if aggregator.reviews_for(book_id) >= cap {
                stats.sampled_out += 1;
                continue;
            }
        }

        let score = scanner.score(record.review_text.as_deref());
        aggregator.accumulate(book_id, &score)?;
        stats.scored += 1;

        if let Some(max) = options.max_books {
            if aggregator.len() >= max {
                info!("book cap of {max} reached, stopping scan");
                break;
            }
        }
    }

    debug!(
        "scan done: {} records, {} scored, {} skipped, {} sampled out",
        stats.records, stats.scored, stats.skipped_malformed, stats.sampled_out
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_markup_and_whitespace() {
        assert_eq!(
            ReviewScanner::normalize("Great <br> Book,\n  REALLY   <spoiler>good</spoiler> "),
            "great book, really good"
        );
    }

    #[test]
    fn word_length_stats_on_known_tokens() {
        // "great book, loved it" -> lengths 5, 4, 5, 2
        let (mean, median, std) = word_length_stats("great book, loved it");
        assert!((mean - 4.0).abs() < 1e-9);
        assert!((median - 4.5).abs() < 1e-9);
        assert!((std - 1.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn empty_text_scores_zero_and_neutral() {
        let lexicon = Lexicon::new();
        let scanner = ReviewScanner::new(&lexicon);
        for text in [None, Some("")] {
            let score = scanner.score(text);
            assert!(score.hits.iter().all(|&h| h == 0));
            assert_eq!(score.word_len_mean, 0.0);
            assert_eq!(score.word_len_median, 0.0);
            assert_eq!(score.word_len_std, 0.0);
            assert_eq!(score.polarity, 0.0);
            assert_eq!(score.bucket, SentimentBucket::Neutral);
        }
    }

    #[test]
    fn bucket_thresholds() {
        assert_eq!(SentimentBucket::from_polarity(0.5), SentimentBucket::Positive);
        assert_eq!(SentimentBucket::from_polarity(0.1), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::from_polarity(-0.1), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::from_polarity(-0.5), SentimentBucket::Negative);
    }
}
