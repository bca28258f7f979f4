//! Back-navigation history.

/// Previously visited URLs, most recent last.
///
/// Holds at most `cap` entries; pushing onto a full history drops the
/// oldest.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cap: usize,
}

impl History {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Record `url` as the page being left.
    pub fn push(&mut self, url: &str) {
        if self.entries.len() == self.cap {
            self.entries.remove(0);
        }
        self.entries.push(url.to_string());
    }

    /// Take the most recent entry.
    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_lifo() {
        let mut h = History::new(8);
        h.push("a");
        h.push("b");
        assert_eq!(h.len(), 2);
        assert_eq!(h.pop().as_deref(), Some("b"));
        assert_eq!(h.pop().as_deref(), Some("a"));
        assert_eq!(h.pop(), None);
        assert!(h.is_empty());
    }

    #[test]
    fn oldest_dropped_at_capacity() {
        let mut h = History::new(3);
        for url in ["1", "2", "3", "4", "5"] {
            h.push(url);
        }
        assert_eq!(h.entries(), ["3", "4", "5"]);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut h = History::new(0);
        h.push("a");
        h.push("b");
        assert_eq!(h.entries(), ["b"]);
    }
}
