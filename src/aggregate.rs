//! Keyed accumulation of review scores and finalization into feature
//! rows.
//!
//! One `BookAggregate` per distinct book id is all that is retained
//! while the corpus streams by; the raw text and per-review scores are
//! gone as soon as they are folded in. Every field is a plain sum or
//! counter, so partial aggregates from a sharded scan could be merged
//! by field-wise addition.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::lexicon::LexiconCategory;
use crate::scanner::{ReviewScore, SentimentBucket};

/// Running sums for one book. Fixed-size by design: the corpus has
/// millions of distinct books and this record is the entire per-key
/// footprint.
#[derive(Debug, Default, Clone)]
struct BookAggregate {
    reviews: u64,
    hits: [u64; LexiconCategory::COUNT],
    word_len_mean_sum: f64,
    word_len_median_sum: f64,
    word_len_std_sum: f64,
    polarity_sum: f64,
    polarity_sq_sum: f64,
    positive_reviews: u64,
    negative_reviews: u64,
}

impl BookAggregate {
    fn add(&mut self, score: &ReviewScore) {
        self.reviews += 1;
        for (sum, &hit) in self.hits.iter_mut().zip(&score.hits) {
            *sum += u64::from(hit);
        }
        self.word_len_mean_sum += score.word_len_mean;
        self.word_len_median_sum += score.word_len_median;
        self.word_len_std_sum += score.word_len_std;
        self.polarity_sum += score.polarity;
        self.polarity_sq_sum += score.polarity * score.polarity;
        match score.bucket {
            SentimentBucket::Positive => self.positive_reviews += 1,
            SentimentBucket::Negative => self.negative_reviews += 1,
            SentimentBucket::Neutral => {}
        }
    }

    fn finalize(&self, book_id: u64) -> BookFeatureVector {
        use LexiconCategory::*;

        // Only books with at least one review ever get an aggregate, so
        // the denominator is never zero here.
        let n = self.reviews as f64;
        let hit = |category: LexiconCategory| self.hits[category as usize];
        let net = |a: LexiconCategory, b: LexiconCategory| hit(a) as f64 - hit(b) as f64;

        let polarity_mean = self.polarity_sum / n;
        let polarity_var = (self.polarity_sq_sum / n - polarity_mean * polarity_mean).max(0.0);

        BookFeatureVector {
            book_id,
            num_reviews_analyzed: self.reviews,
            abandonment_score: hit(Abandonment) as f64 / n,
            engagement_score: net(EngagementPositive, EngagementNegative) / n,
            complexity_score: net(Complexity, Simplicity) / n,
            pace_score: net(PaceFast, PaceSlow) / n,
            emotional_score: hit(Emotional) as f64 / n,
            abandonment_mentions: hit(Abandonment),
            engagement_positive_mentions: hit(EngagementPositive),
            complexity_mentions: hit(Complexity),
            pace_slow_mentions: hit(PaceSlow),
            emotional_mentions: hit(Emotional),
            word_len_mean: self.word_len_mean_sum / n,
            word_len_median: self.word_len_median_sum / n,
            word_len_std: self.word_len_std_sum / n,
            sentiment_average: polarity_mean,
            sentiment_std: polarity_var.sqrt(),
            sentiment_positive_pct: self.positive_reviews as f64 / n,
            sentiment_negative_pct: self.negative_reviews as f64 / n,
        }
    }
}

/// Finalized per-book feature row. Serialized field names follow the
/// historical output schema the downstream pipeline reads.
///
/// Score fields are ratios of hit counts to review counts and are
/// deliberately not clamped: a book with few reviews and many distinct
/// keyword matches can score past 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookFeatureVector {
    pub book_id: u64,
    pub num_reviews_analyzed: u64,
    #[serde(rename = "abandono_score")]
    pub abandonment_score: f64,
    pub engagement_score: f64,
    #[serde(rename = "complejidad_score")]
    pub complexity_score: f64,
    #[serde(rename = "ritmo_score")]
    pub pace_score: f64,
    #[serde(rename = "emocional_score")]
    pub emotional_score: f64,
    #[serde(rename = "menciones_abandono")]
    pub abandonment_mentions: u64,
    #[serde(rename = "menciones_engagement_positivo")]
    pub engagement_positive_mentions: u64,
    #[serde(rename = "menciones_complejidad")]
    pub complexity_mentions: u64,
    #[serde(rename = "menciones_ritmo_lento")]
    pub pace_slow_mentions: u64,
    #[serde(rename = "menciones_emocional")]
    pub emotional_mentions: u64,
    #[serde(rename = "longitud_palabra_promedio")]
    pub word_len_mean: f64,
    #[serde(rename = "longitud_palabra_mediana")]
    pub word_len_median: f64,
    #[serde(rename = "longitud_palabra_std")]
    pub word_len_std: f64,
    #[serde(rename = "sentimiento_promedio")]
    pub sentiment_average: f64,
    #[serde(rename = "sentimiento_std")]
    pub sentiment_std: f64,
    #[serde(rename = "sentimiento_positivo_pct")]
    pub sentiment_positive_pct: f64,
    #[serde(rename = "sentimiento_negativo_pct")]
    pub sentiment_negative_pct: f64,
}

/// Reduces the scored review stream into one feature vector per book.
///
/// Two states: accumulating, then finalized. Accumulation after
/// `finalize` is an error; `finalize` itself is idempotent and keeps
/// returning the same snapshot.
#[derive(Default)]
pub struct BookAggregator {
    books: HashMap<u64, BookAggregate>,
    snapshot: Option<Vec<BookFeatureVector>>,
}

impl BookAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct books seen so far.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Reviews accumulated for `book_id` so far (0 if unseen).
    pub fn reviews_for(&self, book_id: u64) -> u64 {
        self.books.get(&book_id).map_or(0, |agg| agg.reviews)
    }

    /// Fold one scored review into its book's running aggregate.
    pub fn accumulate(&mut self, book_id: u64, score: &ReviewScore) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(Error::Finalized);
        }
        self.books.entry(book_id).or_default().add(score);
        Ok(())
    }

    /// Derive the feature vector for every book seen. Rows come out in
    /// ascending book id so runs are byte-for-byte reproducible.
    pub fn finalize(&mut self) -> &[BookFeatureVector] {
        self.snapshot.get_or_insert_with(|| {
            let mut rows: Vec<BookFeatureVector> = self
                .books
                .iter()
                .map(|(&book_id, agg)| agg.finalize(book_id))
                .collect();
            rows.sort_unstable_by_key(|row| row.book_id);
            rows
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::scanner::ReviewScanner;

    fn scores(texts: &[&str]) -> Vec<ReviewScore> {
        let lexicon = Lexicon::new();
        let scanner = ReviewScanner::new(&lexicon);
        texts.iter().map(|t| scanner.score(Some(t))).collect()
    }

    // Summation order may legally perturb the last bit of the float
    // fields, so those are compared with a tolerance.
    fn assert_rows_close(a: &BookFeatureVector, b: &BookFeatureVector) {
        assert_eq!(a.book_id, b.book_id);
        assert_eq!(a.num_reviews_analyzed, b.num_reviews_analyzed);
        assert_eq!(a.abandonment_mentions, b.abandonment_mentions);
        assert_eq!(a.engagement_positive_mentions, b.engagement_positive_mentions);
        assert_eq!(a.complexity_mentions, b.complexity_mentions);
        assert_eq!(a.pace_slow_mentions, b.pace_slow_mentions);
        assert_eq!(a.emotional_mentions, b.emotional_mentions);
        for (x, y) in [
            (a.abandonment_score, b.abandonment_score),
            (a.engagement_score, b.engagement_score),
            (a.complexity_score, b.complexity_score),
            (a.pace_score, b.pace_score),
            (a.emotional_score, b.emotional_score),
            (a.word_len_mean, b.word_len_mean),
            (a.word_len_median, b.word_len_median),
            (a.word_len_std, b.word_len_std),
            (a.sentiment_average, b.sentiment_average),
            (a.sentiment_std, b.sentiment_std),
            (a.sentiment_positive_pct, b.sentiment_positive_pct),
            (a.sentiment_negative_pct, b.sentiment_negative_pct),
        ] {
            assert!((x - y).abs() < 1e-9, "{x} vs {y}");
        }
    }

    #[test]
    fn accumulation_is_order_independent() {
        let reviews = scores(&[
            "loved it, a gripping page-turner",
            "boring and slow, i gave up",
            "",
        ]);

        let mut forward = BookAggregator::new();
        for score in &reviews {
            forward.accumulate(9, score).unwrap();
        }
        let mut backward = BookAggregator::new();
        for score in reviews.iter().rev() {
            backward.accumulate(9, score).unwrap();
        }

        let forward_rows = forward.finalize();
        let backward_rows = backward.finalize();
        assert_eq!(forward_rows.len(), backward_rows.len());
        for (a, b) in forward_rows.iter().zip(backward_rows) {
            assert_rows_close(a, b);
        }
    }

    #[test]
    fn finalize_is_idempotent() {
        let reviews = scores(&["great book", "terrible book"]);
        let mut aggregator = BookAggregator::new();
        for score in &reviews {
            aggregator.accumulate(1, score).unwrap();
        }
        let first = aggregator.finalize().to_vec();
        assert_eq!(aggregator.finalize(), first.as_slice());
    }

    #[test]
    fn accumulate_after_finalize_is_an_error() {
        let reviews = scores(&["fine"]);
        let mut aggregator = BookAggregator::new();
        aggregator.accumulate(1, &reviews[0]).unwrap();
        aggregator.finalize();
        assert!(matches!(
            aggregator.accumulate(1, &reviews[0]),
            Err(Error::Finalized)
        ));
    }

    #[test]
    fn scores_are_not_clamped() {
        // One review hitting many distinct abandonment keywords pushes
        // the ratio past 1.0.
        let reviews = scores(&["dnf. abandon. gave up, stopped reading, never finished"]);
        let mut aggregator = BookAggregator::new();
        aggregator.accumulate(5, &reviews[0]).unwrap();
        let rows = aggregator.finalize();
        assert!(rows[0].abandonment_score > 1.0);
    }

    #[test]
    fn sentiment_pcts_stay_within_one() {
        let reviews = scores(&["loved it", "hated it", "meh", "amazing", "awful"]);
        let mut aggregator = BookAggregator::new();
        for score in &reviews {
            aggregator.accumulate(2, score).unwrap();
        }
        let row = &aggregator.finalize()[0];
        assert!(row.sentiment_positive_pct + row.sentiment_negative_pct <= 1.0);
        assert!(row.sentiment_positive_pct >= 0.0 && row.sentiment_negative_pct >= 0.0);
    }
}
