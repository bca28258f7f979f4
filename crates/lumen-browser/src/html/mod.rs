//! HTML tokenizer, tree builder, and element tree.

pub mod dom;
pub mod entities;
pub mod tokenizer;
pub mod tree_builder;

pub use dom::Element;

use tokenizer::Tokenizer;
use tree_builder::TreeBuilder;

/// Parse `input` into an element tree rooted at an untagged root element.
///
/// Never fails. Malformed markup only affects nesting.
pub fn parse(input: &str) -> Element {
    TreeBuilder::build(Tokenizer::new(input).tokenize())
}

/// Text of the first `<title>`, if it has any.
pub fn title(root: &Element) -> Option<String> {
    let title = root.find("title")?.all_text();
    if title.is_empty() { None } else { Some(title) }
}
