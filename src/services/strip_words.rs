//! Cosmetic filename normalization for resolved resources.
//!
//! Each configured word is removed together with an optional preceding
//! hyphen, anywhere in the filename. Matching is literal. A word that also
//! occurs inside a legitimate name is stripped there too.

use regex::Regex;

/// Word removed when no explicit list is configured.
pub const DEFAULT_STRIP_WORD: &str = "scaled";

/// Ordered, deduplicated list of words stripped from resolved filenames.
#[derive(Debug, Clone)]
pub struct StripWordFilter {
    words: Vec<String>,
    patterns: Vec<Regex>,
}

impl StripWordFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self {
            words: Vec::new(),
            patterns: Vec::new(),
        };
        filter.extend(words);
        filter
    }

    /// Append words not already present, preserving order.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            let word = word.into();
            if word.is_empty() || self.words.contains(&word) {
                continue;
            }
            let pattern = Regex::new(&format!("-?{}", regex::escape(&word)))
                .expect("escaped literal is a valid pattern");
            self.words.push(word);
            self.patterns.push(pattern);
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Strip configured words from `filename` until nothing more matches.
    pub fn apply(&self, filename: &str) -> String {
        let mut current = filename.to_string();
        loop {
            let next = self.apply_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Strip configured words from the last segment of `path` only.
    pub fn apply_to_path(&self, path: &str) -> String {
        if self.is_empty() {
            return path.to_string();
        }
        match path.rsplit_once('/') {
            Some((dir, filename)) => format!("{dir}/{}", self.apply(filename)),
            None => self.apply(path),
        }
    }

    fn apply_once(&self, input: &str) -> String {
        self.patterns
            .iter()
            .fold(input.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
    }
}

impl Default for StripWordFilter {
    fn default() -> Self {
        Self::new([DEFAULT_STRIP_WORD])
    }
}
