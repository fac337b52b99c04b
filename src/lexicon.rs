//! Static keyword tables and the category matcher built from them.
//!
//! The tables are compile-time constants; the `Lexicon` compiles them
//! into one case-insensitive Aho-Corasick automaton per category and is
//! immutable from then on. Matching is substring-based with no word
//! boundary check: "complex" also hits inside "complexity".

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

// The reader gave up on the book.
static ABANDONMENT: &[&str] = &[
    "abandon", "dnf", "did not finish", "could not finish", "gave up", "stopped reading", "quit",
    "dropped", "couldn't finish", "never finished",
];

// The book pulls the reader along.
static ENGAGEMENT_POSITIVE: &[&str] = &[
    "addictive", "page turner", "page-turner", "couldn't put down", "could not put down",
    "gripping", "compelling", "captivating", "engrossing", "unputdownable", "hooked", "riveting",
    "fast paced", "fast-paced", "kept me reading",
];

// The book is a chore.
static ENGAGEMENT_NEGATIVE: &[&str] = &[
    "boring", "dull", "tedious", "dragged", "slow", "uninteresting", "monotonous",
    "struggled to read",
];

// Demanding prose or structure.
static COMPLEXITY: &[&str] = &[
    "complex", "complicated", "dense", "difficult", "challenging", "hard to follow", "confusing",
    "intricate", "convoluted", "hard to understand", "requires concentration", "demanding",
];

// Light, accessible reading.
static SIMPLICITY: &[&str] = &[
    "easy read", "easy to read", "simple", "straightforward", "accessible", "light", "quick read",
    "breeze", "simple prose", "easy to follow", "effortless",
];

static PACE_FAST: &[&str] = &[
    "fast", "fast paced", "fast-paced", "quick", "action packed", "action-packed", "thrilling",
    "moves quickly", "rapid", "brisk pace",
];

static PACE_SLOW: &[&str] = &[
    "slow", "slow paced", "slow-paced", "dragged", "takes time", "slow start", "slow beginning",
    "plodding", "meandering", "sluggish",
];

static EMOTIONAL: &[&str] = &[
    "emotional", "moving", "touching", "cried", "tears", "heartbreaking", "powerful", "deep",
    "profound", "made me feel", "emotional rollercoaster", "impactful",
];

static SENTIMENT_POSITIVE: &[&str] = &[
    "love", "loved", "amazing", "great", "excellent", "wonderful", "fantastic", "brilliant",
    "perfect", "beautiful", "favorite", "enjoyed", "masterpiece", "incredible", "outstanding",
];

static SENTIMENT_NEGATIVE: &[&str] = &[
    "hate", "hated", "terrible", "awful", "horrible", "worst", "disappointing", "disappointed",
    "waste", "bad", "poor", "boring", "dull", "annoying", "frustrating",
];

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Semantic buckets of review language. The set is fixed at compile
/// time; variants double as indices into per-category arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexiconCategory {
    Abandonment,
    EngagementPositive,
    EngagementNegative,
    Complexity,
    Simplicity,
    PaceFast,
    PaceSlow,
    Emotional,
    SentimentPositive,
    SentimentNegative,
}

impl LexiconCategory {
    /// Every category, in declaration order.
    pub const ALL: [LexiconCategory; 10] = [
        LexiconCategory::Abandonment,
        LexiconCategory::EngagementPositive,
        LexiconCategory::EngagementNegative,
        LexiconCategory::Complexity,
        LexiconCategory::Simplicity,
        LexiconCategory::PaceFast,
        LexiconCategory::PaceSlow,
        LexiconCategory::Emotional,
        LexiconCategory::SentimentPositive,
        LexiconCategory::SentimentNegative,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// The configured phrases for this category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            LexiconCategory::Abandonment => ABANDONMENT,
            LexiconCategory::EngagementPositive => ENGAGEMENT_POSITIVE,
            LexiconCategory::EngagementNegative => ENGAGEMENT_NEGATIVE,
            LexiconCategory::Complexity => COMPLEXITY,
            LexiconCategory::Simplicity => SIMPLICITY,
            LexiconCategory::PaceFast => PACE_FAST,
            LexiconCategory::PaceSlow => PACE_SLOW,
            LexiconCategory::Emotional => EMOTIONAL,
            LexiconCategory::SentimentPositive => SENTIMENT_POSITIVE,
            LexiconCategory::SentimentNegative => SENTIMENT_NEGATIVE,
        }
    }
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Immutable matcher over the keyword tables. Built once, then read-only;
/// pass it by reference into the scanner.
pub struct Lexicon {
    matchers: [AhoCorasick; LexiconCategory::COUNT],
}

impl Lexicon {
    pub fn new() -> Self {
        let matchers = LexiconCategory::ALL.map(|category| {
            let keywords = category.keywords();
            // Hit deduplication below relies on a 32-bit mask.
            debug_assert!(keywords.len() <= 32, "keyword table too large for {category:?}");
            AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(keywords)
                .expect("static keyword table compiles")
        });
        Self { matchers }
    }

    /// Process-wide instance for the common case; built on first use.
    pub fn shared() -> &'static Lexicon {
        static SHARED: Lazy<Lexicon> = Lazy::new(Lexicon::new);
        &SHARED
    }

    /// Number of distinct configured keywords of `category` that occur
    /// as substrings of `text`. A keyword appearing several times still
    /// counts once; several different keywords each count. Empty text
    /// returns 0.
    pub fn match_count(&self, text: &str, category: LexiconCategory) -> usize {
        if text.is_empty() {
            return 0;
        }
        let mut seen = 0u32;
        for m in self.matchers[category as usize].find_overlapping_iter(text) {
            seen |= 1 << m.pattern().as_usize();
        }
        seen.count_ones() as usize
    }

    /// How many phrases are configured for `category`; upper bound for
    /// `match_count`.
    pub fn keyword_count(&self, category: LexiconCategory) -> usize {
        category.keywords().len()
    }

    /// Signed sentiment in [-1, 1]: balance of positive vs negative
    /// sentiment keywords, 0.0 when neither side matches.
    pub fn polarity(&self, text: &str) -> f64 {
        let pos = self.match_count(text, LexiconCategory::SentimentPositive) as i64;
        let neg = self.match_count(text, LexiconCategory::SentimentNegative) as i64;
        (pos - neg) as f64 / (pos + neg).max(1) as f64
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}
