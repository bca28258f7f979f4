//! HTML tree builder.
//!
//! Consumes a token stream and builds an owned [`Element`] tree. Elements
//! under construction live on a stack of open elements; a popped element is
//! attached to whatever is then on top. The synthetic root sits below the
//! stack and is never popped.

use super::dom::Element;
use super::entities::decode_entities;
use super::tokenizer::{StartTagToken, Token};

/// Deepest nesting of open elements. Start tags beyond it become
/// childless siblings so the tree stays shallow enough to walk recursively.
pub const MAX_DEPTH: usize = 256;

/// Elements that never take children.
fn is_void(name: &str) -> bool {
    matches!(name, "br" | "hr" | "img" | "input" | "meta" | "link")
}

// ------------------------------------------------------------------
// TreeBuilder
// ------------------------------------------------------------------

/// Builds an element tree from a token stream.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Element,
    /// Open elements, innermost last.
    open: Vec<Element>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an element tree from a token stream.
    pub fn build(tokens: Vec<Token>) -> Element {
        let mut builder = TreeBuilder::new();
        for token in tokens {
            builder.process_token(token);
        }
        builder.finish()
    }

    pub fn process_token(&mut self, token: Token) {
        match token {
            Token::StartTag(tag) => self.insert_element(tag),
            Token::EndTag(name) => self.close_element(&name),
            Token::Text(text) => self.insert_text(&text),
        }
    }

    /// Close everything still open and return the root.
    pub fn finish(mut self) -> Element {
        while !self.open.is_empty() {
            self.pop();
        }
        self.root
    }

    fn current(&mut self) -> &mut Element {
        match self.open.last_mut() {
            Some(el) => el,
            None => &mut self.root,
        }
    }

    fn pop(&mut self) {
        if let Some(el) = self.open.pop() {
            self.current().children.push(el);
        }
    }

    fn insert_element(&mut self, tag: StartTagToken) {
        let void = tag.self_closing || is_void(&tag.name);
        let el = Element {
            tag: tag.name,
            attributes: tag.attributes,
            ..Element::default()
        };
        if void || self.open.len() >= MAX_DEPTH {
            self.current().children.push(el);
        } else {
            self.open.push(el);
        }
    }

    /// Pop up to and including the nearest open `name`. With no match the
    /// stack is left alone.
    fn close_element(&mut self, name: &str) {
        let Some(idx) = self.open.iter().rposition(|el| el.tag == name) else {
            log::trace!("ignoring unmatched </{name}>");
            return;
        };
        while self.open.len() > idx {
            self.pop();
        }
    }

    fn in_pre(&self) -> bool {
        self.open.iter().any(|el| el.tag == "pre")
    }

    fn insert_text(&mut self, raw: &str) {
        if self.in_pre() {
            self.insert_preformatted(raw);
            return;
        }

        let decoded = decode_entities(raw);
        let mut words = decoded.split_whitespace().peekable();
        if words.peek().is_none() {
            return;
        }
        let current = self.current();
        for word in words {
            if !current.text.is_empty() {
                current.text.push(' ');
            }
            current.text.push_str(word);
        }
    }

    /// Text inside `pre` keeps its line breaks. One newline directly after
    /// the opening tag is dropped.
    fn insert_preformatted(&mut self, raw: &str) {
        let mut text = decode_entities(raw).replace("\r\n", "\n");
        let current = self.current();
        if current.tag == "pre"
            && current.text.is_empty()
            && current.children.is_empty()
            && text.starts_with('\n')
        {
            text.remove(0);
        }
        current.text.push_str(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::tokenizer::Tokenizer;

    fn parse(html: &str) -> Element {
        TreeBuilder::build(Tokenizer::new(html).tokenize())
    }

    fn tags(el: &Element) -> Vec<&str> {
        el.children.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn simple_document() {
        let root = parse("<html><body><p>Hello</p></body></html>");
        assert_eq!(root.tag, "");
        assert_eq!(tags(&root), ["html"]);
        let p = root.find("p").unwrap();
        assert_eq!(p.text, "Hello");
    }

    #[test]
    fn text_after_inline_child_joins_parent() {
        let root = parse("<p>A<b>B</b>C");
        assert_eq!(root.text, "");
        assert_eq!(tags(&root), ["p"]);
        let p = &root.children[0];
        assert_eq!(p.text, "A C");
        assert_eq!(tags(p), ["b"]);
        assert_eq!(p.children[0].text, "B");
    }

    #[test]
    fn void_elements_are_never_parents() {
        let root = parse("<p>Hello<br>World<img src=x.png>!</p>");
        let p = &root.children[0];
        assert_eq!(tags(p), ["br", "img"]);
        assert!(p.children.iter().all(|c| c.children.is_empty()));
        assert_eq!(p.text, "Hello World !");
    }

    #[test]
    fn self_closing_tag_not_pushed() {
        let root = parse("<div><widget/>text</div>");
        let div = &root.children[0];
        assert_eq!(tags(div), ["widget"]);
        assert_eq!(div.text, "text");
    }

    #[test]
    fn close_tag_pops_intervening_elements() {
        let root = parse("<div><p><b>x</div>after");
        let div = &root.children[0];
        assert_eq!(tags(div), ["p"]);
        assert_eq!(tags(&div.children[0]), ["b"]);
        assert_eq!(root.text, "after");
    }

    #[test]
    fn unmatched_close_tag_is_ignored() {
        let root = parse("<div>a</span>b</div>");
        let div = &root.children[0];
        assert_eq!(div.text, "a b");
        assert!(div.children.is_empty());
    }

    #[test]
    fn close_matches_nearest_open() {
        let root = parse("<div><div>inner</div>outer</div>");
        let outer = &root.children[0];
        assert_eq!(outer.text, "outer");
        assert_eq!(outer.children[0].text, "inner");
    }

    #[test]
    fn unclosed_elements_attached_at_end() {
        let root = parse("<ul><li>one<li>two");
        let ul = &root.children[0];
        assert_eq!(tags(ul), ["li"]);
        assert_eq!(ul.children[0].text, "one");
        assert_eq!(ul.children[0].children[0].text, "two");
    }

    #[test]
    fn whitespace_collapsed_and_trimmed() {
        let root = parse("<p>  lots   of\n\t space  </p>");
        assert_eq!(root.children[0].text, "lots of space");
    }

    #[test]
    fn whitespace_only_text_ignored() {
        let root = parse("<ul>\n  <li>x</li>\n</ul>");
        assert_eq!(root.children[0].text, "");
    }

    #[test]
    fn entities_decoded_in_text() {
        let root = parse("<p>A &amp; B &#65; &#x42;</p>");
        assert_eq!(root.children[0].text, "A & B A B");
    }

    #[test]
    fn attributes_preserved() {
        let root = parse(r#"<a HREF="/next" class=nav>go</a>"#);
        let a = &root.children[0];
        assert_eq!(a.attr("href"), Some("/next"));
        assert_eq!(a.attr("class"), Some("nav"));
    }

    #[test]
    fn pre_keeps_line_breaks() {
        let root = parse("<pre>\nline 1\n  line 2\n\nline &lt;4&gt;</pre><p>a\nb</p>");
        assert_eq!(root.children[0].text, "line 1\n  line 2\n\nline <4>");
        assert_eq!(root.children[1].text, "a b");
    }

    #[test]
    fn script_text_never_becomes_content() {
        let root = parse("<body><script>document.write('x')</script><p>y</p></body>");
        let body = root.find("body").unwrap();
        assert_eq!(body.text, "");
        assert_eq!(body.find("script").unwrap().text, "");
        assert_eq!(body.find("p").unwrap().text, "y");
    }

    #[test]
    fn nesting_is_capped() {
        let root = parse(&"<div>".repeat(100_000));
        let mut depth = 0;
        let mut el = &root;
        while let Some(child) = el.children.first() {
            depth += 1;
            el = child;
        }
        // Capped chain plus one level of flat overflow.
        assert_eq!(depth, MAX_DEPTH + 1);

        let mut deepest = &root;
        for _ in 0..MAX_DEPTH {
            deepest = &deepest.children[0];
        }
        assert_eq!(deepest.children.len(), 100_000 - MAX_DEPTH);
        assert!(deepest.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn text_past_the_cap_lands_in_deepest_element() {
        let html = format!("{}<p>deep</p>", "<b>".repeat(MAX_DEPTH));
        let root = parse(&html);
        let mut el = &root;
        for _ in 0..MAX_DEPTH {
            el = &el.children[0];
        }
        assert_eq!(el.tag, "b");
        assert_eq!(el.text, "deep");
        assert_eq!(el.children[0].tag, "p");
    }

    #[test]
    fn empty_input() {
        let root = parse("");
        assert_eq!(root, Element::default());
    }
}
