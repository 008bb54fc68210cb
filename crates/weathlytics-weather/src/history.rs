//! Recent-search list: most recent first, no duplicates, bounded length.

pub use weathlytics_core::config::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryList {
    entries: Vec<String>,
    limit: usize,
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryList {
    /// Create an empty list. A limit of 0 is treated as 1.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Move `city` to the front, dropping any earlier occurrence and
    /// trimming the oldest entries past the limit.
    ///
    /// Matching is exact and case-sensitive: "paris" and "Paris" are distinct.
    pub fn push(&mut self, city: &str) {
        self.entries.retain(|c| c != city);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
