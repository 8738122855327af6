//! Moderation filter applied to frames before broadcast.

/// Substring filter matched against the lowercase form of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    words: Vec<String>,
}

impl ContentFilter {
    /// Build a filter from a word list. Words are lowercased and empty
    /// entries are dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        ContentFilter { words }
    }

    /// Parse a comma-separated list such as `"badword, worse"`.
    pub fn from_csv(list: &str) -> Self {
        ContentFilter::new(list.split(','))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// True if the lowercase form of `frame` contains any filtered word.
    pub fn is_blocked(&self, frame: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        let lowered = frame.to_lowercase();
        self.words.iter().any(|w| lowered.contains(w.as_str()))
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        ContentFilter::new(["badword"])
    }
}
