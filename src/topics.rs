//! Topic detection over a fixed, ordered vocabulary.

/// Maximum number of topics reported per document.
pub const MAX_TOPICS: usize = 5;

/// Phrase rewrites applied to matched terms that carry no explicit alias.
const REWRITES: [(&str, &str); 2] = [
    ("artificial intelligence", "AI"),
    ("machine learning", "ML"),
];

/// Default vocabulary, in priority order, with optional display aliases.
const DEFAULT_TERMS: &[(&str, Option<&str>)] = &[
    ("artificial intelligence", None),
    ("ai", Some("AI")),
    ("machine learning", None),
    ("ml", Some("ML")),
    ("deep learning", None),
    ("web development", None),
    ("frontend", None),
    ("backend", None),
    ("javascript", None),
    ("python", None),
    ("react", None),
    ("data science", None),
    ("statistics", None),
    ("database", None),
    ("sql", None),
    ("computer vision", None),
    ("natural language processing", None),
    ("nlp", None),
    ("cybersecurity", None),
    ("blockchain", None),
    ("mobile development", None),
    ("android", None),
    ("ios", None),
    ("cloud computing", None),
    ("aws", None),
    ("azure", None),
    ("devops", None),
    ("docker", None),
    ("kubernetes", None),
    ("algorithms", None),
    ("data structures", None),
    ("software engineering", None),
    ("programming", None),
    ("coding", None),
    ("mathematics", None),
    ("calculus", None),
    ("linear algebra", None),
    ("physics", None),
    ("chemistry", None),
    ("biology", None),
    ("business", None),
    ("marketing", None),
    ("finance", None),
    ("economics", None),
    ("design", None),
    ("ui", None),
    ("ux", None),
    ("graphics", None),
    ("networking", None),
];

/// A single vocabulary term and the label reported when it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    term: String,
    label: String,
}

impl TopicEntry {
    /// Build an entry. Without an alias the label is the term as written, with phrase rewrites
    /// applied; only the search key is lower-cased.
    pub fn new(term: &str, alias: Option<&str>) -> Self {
        let label = match alias {
            Some(alias) => alias.to_string(),
            None => normalize(term),
        };
        Self {
            term: term.to_lowercase(),
            label,
        }
    }

    /// Lower-cased search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Label reported for a match.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Immutable, ordered topic vocabulary shared for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicVocabulary {
    entries: Vec<TopicEntry>,
}

impl TopicVocabulary {
    /// Build a vocabulary from `(term, alias)` pairs, preserving order.
    pub fn from_terms(terms: &[(&str, Option<&str>)]) -> Self {
        Self {
            entries: terms
                .iter()
                .map(|(term, alias)| TopicEntry::new(term, *alias))
                .collect(),
        }
    }

    /// Entries in priority order.
    pub fn entries(&self) -> &[TopicEntry] {
        &self.entries
    }

    /// Number of terms in the vocabulary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary has no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TopicVocabulary {
    fn default() -> Self {
        Self::from_terms(DEFAULT_TERMS)
    }
}

fn normalize(term: &str) -> String {
    REWRITES
        .iter()
        .fold(term.to_string(), |label, (phrase, short)| {
            label.replace(phrase, short)
        })
}

/// Detect up to [`MAX_TOPICS`] vocabulary topics mentioned in `text`.
///
/// Matching is case-insensitive substring containment. Labels are reported once each, in
/// vocabulary order.
pub fn detect_topics(text: &str, vocabulary: &TopicVocabulary) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut detected: Vec<String> = Vec::new();

    for entry in vocabulary.entries() {
        if detected.len() >= MAX_TOPICS {
            break;
        }
        if haystack.contains(entry.term()) && !detected.iter().any(|label| label == entry.label())
        {
            detected.push(entry.label().to_string());
        }
    }

    detected
}
