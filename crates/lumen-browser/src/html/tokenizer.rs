//! Tolerant HTML tokenizer.
//!
//! A single forward scan over the input that emits start tags, end tags and
//! raw text. Doctypes, comments and processing instructions are dropped.
//! The contents of `<script>` and `<style>` are skipped up to their closing
//! tag. Character references are left in place; the tree builder decodes
//! text and the attribute parser decodes values.
//!
//! Malformed input never fails: an unterminated tag drops the rest of the
//! document, and a `<` that cannot start a tag is plain text.

use std::collections::BTreeMap;

use super::entities::decode_entities;

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

/// A single token emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag(StartTagToken),
    EndTag(String),
    /// Undecoded text between tags.
    Text(String),
}

/// An opening tag with its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTagToken {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// The tag ended in `/>`.
    pub self_closing: bool,
}

/// Elements whose contents are never tokenized.
fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Consume the input and return the token stream.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.pos < self.input.len() {
            let Some(token) = self.next_token() else {
                continue;
            };
            Self::push_coalesced(&mut tokens, token);
        }
        tokens
    }

    /// Coalesce consecutive `Text` tokens.
    fn push_coalesced(tokens: &mut Vec<Token>, token: Token) {
        if let Token::Text(ref new_text) = token
            && let Some(Token::Text(prev)) = tokens.last_mut()
        {
            prev.push_str(new_text);
            return;
        }
        tokens.push(token);
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Jump to the end of input, dropping whatever is left.
    fn abandon(&mut self) {
        self.pos = self.input.len();
    }

    /// Advance past the first occurrence of `needle`, or to the end.
    fn skip_past(&mut self, needle: &str) {
        match self.rest().find(needle) {
            Some(i) => self.pos += i + needle.len(),
            None => self.abandon(),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        let rest = self.rest();
        if !rest.starts_with('<') {
            let end = rest.find('<').unwrap_or(rest.len());
            self.pos += end;
            return Some(Token::Text(rest[..end].to_string()));
        }

        match rest[1..].chars().next() {
            Some('!') if rest.starts_with("<!--") => {
                self.pos += 4;
                self.skip_past("-->");
                None
            },
            Some('!' | '?') => {
                self.skip_past(">");
                None
            },
            Some('/') => self.end_tag(),
            Some(c) if c.is_ascii_alphabetic() => self.start_tag(),
            _ => {
                // A stray `<`: text up to the next `<`.
                let end = rest[1..].find('<').map_or(rest.len(), |i| i + 1);
                self.pos += end;
                Some(Token::Text(rest[..end].to_string()))
            },
        }
    }

    fn end_tag(&mut self) -> Option<Token> {
        let rest = self.rest();
        let Some(gt) = rest.find('>') else {
            self.abandon();
            return None;
        };
        self.pos += gt + 1;
        let name = rest[2..gt]
            .split(|c: char| c.is_whitespace())
            .find(|s| !s.is_empty())?
            .to_ascii_lowercase();
        Some(Token::EndTag(name))
    }

    fn start_tag(&mut self) -> Option<Token> {
        let rest = self.rest();
        let Some(gt) = find_tag_end(rest) else {
            self.abandon();
            return None;
        };
        self.pos += gt + 1;

        let mut content = rest[1..gt].trim_end();
        let self_closing = content.ends_with('/');
        if self_closing {
            content = &content[..content.len() - 1];
        }

        let name_end = content
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(content.len());
        let name = content[..name_end].to_ascii_lowercase();
        let attributes = parse_attributes(&content[name_end..]);

        if is_raw_text_element(&name) && !self_closing {
            self.skip_raw_text(&name);
        }

        Some(Token::StartTag(StartTagToken {
            name,
            attributes,
            self_closing,
        }))
    }

    /// Move to the `</name` that closes a raw-text element, leaving it for
    /// the next token.
    fn skip_raw_text(&mut self, name: &str) {
        let needle = format!("</{name}");
        match find_ignore_ascii_case(self.rest(), &needle) {
            Some(i) => self.pos += i,
            None => self.abandon(),
        }
    }
}

/// Index of the `>` closing the tag at the start of `s`, ignoring any `>`
/// inside quoted attribute values. Falls back to the first `>` when quotes
/// are unbalanced.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate() {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if q == b => quote = None,
            (None, b'>') => return Some(i),
            _ => {},
        }
    }
    s.find('>')
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrState {
    BeforeName,
    Name,
    AfterName,
    BeforeValue,
    Quoted(char),
    Unquoted,
}

/// Parse the attribute list of a start tag (everything after its name).
///
/// Names are lowercased, values are entity-decoded, and a name without a
/// value maps to the empty string. A repeated name keeps the last value.
pub fn parse_attributes(src: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    let mut name = String::new();
    let mut value = String::new();
    let mut state = AttrState::BeforeName;

    let mut commit = |name: &mut String, value: &mut String| {
        if !name.is_empty() {
            attrs.insert(std::mem::take(name), decode_entities(value));
        }
        name.clear();
        value.clear();
    };

    for ch in src.chars() {
        state = match state {
            AttrState::BeforeName if ch.is_whitespace() || ch == '/' || ch == '=' => {
                AttrState::BeforeName
            },
            AttrState::BeforeName => {
                name.push(ch.to_ascii_lowercase());
                AttrState::Name
            },
            AttrState::Name if ch == '=' => AttrState::BeforeValue,
            AttrState::Name if ch.is_whitespace() => AttrState::AfterName,
            AttrState::Name if ch == '/' => {
                commit(&mut name, &mut value);
                AttrState::BeforeName
            },
            AttrState::Name => {
                name.push(ch.to_ascii_lowercase());
                AttrState::Name
            },
            AttrState::AfterName if ch.is_whitespace() => AttrState::AfterName,
            AttrState::AfterName if ch == '=' => AttrState::BeforeValue,
            AttrState::AfterName => {
                commit(&mut name, &mut value);
                if ch == '/' {
                    AttrState::BeforeName
                } else {
                    name.push(ch.to_ascii_lowercase());
                    AttrState::Name
                }
            },
            AttrState::BeforeValue if ch.is_whitespace() => AttrState::BeforeValue,
            AttrState::BeforeValue if ch == '"' || ch == '\'' => AttrState::Quoted(ch),
            AttrState::BeforeValue => {
                value.push(ch);
                AttrState::Unquoted
            },
            AttrState::Quoted(q) if ch == q => {
                commit(&mut name, &mut value);
                AttrState::BeforeName
            },
            AttrState::Quoted(q) => {
                value.push(ch);
                AttrState::Quoted(q)
            },
            AttrState::Unquoted if ch.is_whitespace() => {
                commit(&mut name, &mut value);
                AttrState::BeforeName
            },
            AttrState::Unquoted => {
                value.push(ch);
                AttrState::Unquoted
            },
        };
    }
    commit(&mut name, &mut value);
    attrs
}
