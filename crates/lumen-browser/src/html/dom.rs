//! Owned element tree produced by the parser.
//!
//! Each element owns its children outright; there are no parent links. The
//! tree is rebuilt on every navigation and handed to layout by reference.

use std::collections::BTreeMap;

/// One element of the parsed document.
///
/// The synthetic root has an empty `tag`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Lowercased attribute names to values. Later duplicates win.
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
    /// Direct text content, entity-decoded and whitespace-collapsed.
    pub text: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First element named `tag` in document order, starting with `self`.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(tag))
    }

    /// Direct text followed by the recursive text of every child, joined
    /// with single spaces. Empty pieces are skipped.
    pub fn all_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if !self.text.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&self.text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Level 1..=6 for `h1`..`h6`, `None` for any other tag.
    pub fn heading_level(&self) -> Option<usize> {
        let level = self.tag.strip_prefix('h')?;
        match level.parse::<usize>() {
            Ok(n @ 1..=6) => Some(n),
            _ => None,
        }
    }
}
