//! Local keyword extraction over a fixed domain vocabulary.
//!
//! Used when the external tag generator is disabled or unreachable, and
//! for all text contributions (those never call out).

/// Maximum tags returned per text.
const MAX_TAGS: usize = 5;

/// Curriculum terms recognized as tags directly.
const VOCABULARY: &[&str] = &[
    // Mathematics
    "algebra",
    "calculus",
    "geometry",
    "trigonometry",
    "equation",
    "derivative",
    "integral",
    "matrix",
    "vector",
    "probability",
    "statistics",
    "theorem",
    // Physics
    "force",
    "energy",
    "momentum",
    "velocity",
    "acceleration",
    "gravity",
    "friction",
    "circuit",
    "voltage",
    "current",
    "resistance",
    "magnetism",
    "optics",
    "thermodynamics",
    // Chemistry
    "molecule",
    "atom",
    "electron",
    "reaction",
    "acid",
    "base",
    "compound",
    "element",
    "oxidation",
    // Biology
    "cell",
    "enzyme",
    "protein",
    "photosynthesis",
    "respiration",
    "evolution",
    "genetics",
    "chromosome",
    "ecosystem",
    // Computing
    "algorithm",
    "recursion",
    "database",
    "network",
    "compiler",
    "encryption",
    "pointer",
];

/// Words too common to ever count as a "non-trivial" fallback tag.
const STOPWORDS: &[&str] = &[
    "about", "after", "being", "between", "could", "every", "should", "their", "there", "these",
    "this", "what", "when", "where", "which", "while", "with", "would", "your",
];

/// Stateless keyword extractor.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Derive tags from free text.
    ///
    /// Matches against the fixed vocabulary first; when nothing matches,
    /// falls back to the three longest non-trivial words.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let words: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        let mut tags: Vec<String> = Vec::new();
        for word in &words {
            if VOCABULARY.contains(&word.as_str()) && !tags.contains(word) {
                tags.push(word.clone());
                if tags.len() == MAX_TAGS {
                    return tags;
                }
            }
        }
        if !tags.is_empty() {
            return tags;
        }

        // Fallback: the three longest non-trivial words.
        let mut candidates: Vec<String> = words
            .into_iter()
            .filter(|w| w.len() > 3 && !STOPWORDS.contains(&w.as_str()))
            .collect();
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        candidates.dedup();
        candidates.truncate(3);
        candidates
    }
}
