//! Structured declaration values.
//!
//! Declaration values are parsed into a small tree of literals, function calls
//! and `var()` references so that token lookups never depend on substring
//! matching. Every node keeps the exact source text it was parsed from.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};
use std::fmt;

use crate::{Error, Result};

/// A single node of a parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// A token kept as written (`4px`, `#2680EB`, `solid`, `,`).
    Literal(String),
    /// A `var(--name)` or `var(--name, fallback)` reference.
    Reference {
        /// Referenced custom property name, including the leading `--`.
        name: String,
        /// Fallback value after the first comma, if any.
        fallback: Option<Value>,
        /// Source text of the whole reference.
        raw: String,
    },
    /// Any other function call or parenthesized group (`calc(...)`, `rgb(...)`).
    Function {
        /// Function name, empty for a bare parenthesized group.
        name: String,
        /// Parsed arguments.
        args: Value,
        /// Source text of the whole call.
        raw: String,
    },
    /// Several nodes written without whitespace between them (`2px/var(--x)`).
    Group {
        /// The adjacent nodes.
        nodes: Vec<ValueNode>,
        /// Source text of the group.
        raw: String,
    },
}

impl ValueNode {
    /// Source text of this node.
    pub fn raw(&self) -> &str {
        match self {
            ValueNode::Literal(raw) => raw,
            ValueNode::Reference { raw, .. }
            | ValueNode::Function { raw, .. }
            | ValueNode::Group { raw, .. } => raw,
        }
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ValueNode::Literal(_) => {}
            ValueNode::Reference { name, fallback, .. } => {
                out.push(name);
                if let Some(fallback) = fallback {
                    fallback.collect_references(out);
                }
            }
            ValueNode::Function { args, .. } => args.collect_references(out),
            ValueNode::Group { nodes, .. } => {
                for node in nodes {
                    node.collect_references(out);
                }
            }
        }
    }
}

/// A parsed declaration value: whitespace-separated top-level components.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Value {
    components: Vec<ValueNode>,
    raw: String,
}

impl Value {
    /// Parse a declaration value.
    ///
    /// Parsing never fails: text the tokenizer cannot structure is kept as a
    /// single literal.
    pub fn parse(text: &str) -> Self {
        let raw = text.trim().to_string();
        let components = Self::parse_nodes(&raw);
        Self { components, raw }
    }

    /// Parse trimmed value text into nodes.
    fn parse_nodes(raw: &str) -> Vec<ValueNode> {
        let mut input = ParserInput::new(raw);
        let mut parser = Parser::new(&mut input);

        match parse_components(&mut parser) {
            Ok(components) => components,
            Err(e) => {
                tracing::debug!("Keeping value '{}' as a literal: {:?}", raw, e);
                vec![ValueNode::Literal(raw.to_string())]
            }
        }
    }

    /// Source text, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Top-level components.
    pub fn components(&self) -> &[ValueNode] {
        &self.components
    }

    /// Check if the value has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// If the whole value is exactly one `var()` reference, return its name
    /// and fallback.
    pub fn single_reference(&self) -> Option<(&str, Option<&Value>)> {
        match self.components.as_slice() {
            [ValueNode::Reference { name, fallback, .. }] => Some((name, fallback.as_ref())),
            _ => None,
        }
    }

    /// Every referenced custom property name, depth-first in source order.
    pub fn references(&self) -> Vec<&str> {
        let mut out = vec![];
        self.collect_references(&mut out);
        out
    }

    /// Check whether `name` is referenced anywhere in the value.
    ///
    /// Names compare as whole identifiers: `--a-b` does not reference `--a-bc`.
    pub fn references_token(&self, name: &str) -> bool {
        self.references().iter().any(|r| *r == name)
    }

    /// Components usable as box-edge values.
    ///
    /// Literals contribute their text and references contribute the referenced
    /// name. Dynamic expressions (functions, groups) and commas cannot be
    /// assigned to an edge and produce an error.
    pub fn edge_components(&self) -> Result<Vec<&str>> {
        self.components
            .iter()
            .map(|node| match node {
                ValueNode::Literal(raw) if raw != "," => Ok(raw.as_str()),
                ValueNode::Reference { name, .. } => Ok(name.as_str()),
                other => Err(Error::shorthand(
                    self.raw.clone(),
                    format!("'{}' is not a single edge value", other.raw()),
                )),
            })
            .collect()
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        for node in &self.components {
            node.collect_references(out);
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Strip a single `var()` wrapper from a value, returning the referenced name.
///
/// Values that are not exactly one reference are returned trimmed and unchanged.
pub fn strip_var(text: &str) -> String {
    let value = Value::parse(text);
    match value.single_reference() {
        Some((name, _)) => name.to_string(),
        None => value.raw,
    }
}

fn parse_components<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Vec<ValueNode>, CssParseError<'i, ()>> {
    let mut components = vec![];
    let mut segment: Vec<ValueNode> = vec![];
    let mut segment_start = parser.position();

    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) => {
                let raw = parser.slice(segment_start..start);
                flush_segment(&mut components, &mut segment, raw);
                segment_start = parser.position();
            }
            Token::Comma => {
                let raw = parser.slice(segment_start..start);
                flush_segment(&mut components, &mut segment, raw);
                components.push(ValueNode::Literal(",".to_string()));
                segment_start = parser.position();
            }
            Token::Function(name) if name.eq_ignore_ascii_case("var") => {
                let (name, fallback) = parser.parse_nested_block(parse_reference)?;
                segment.push(ValueNode::Reference {
                    name,
                    fallback,
                    raw: parser.slice_from(start).to_string(),
                });
            }
            Token::Function(name) => {
                let name = name.to_string();
                let args = parse_nested_value(parser)?;
                segment.push(ValueNode::Function {
                    name,
                    args,
                    raw: parser.slice_from(start).to_string(),
                });
            }
            Token::ParenthesisBlock => {
                let args = parse_nested_value(parser)?;
                segment.push(ValueNode::Function {
                    name: String::new(),
                    args,
                    raw: parser.slice_from(start).to_string(),
                });
            }
            Token::SquareBracketBlock | Token::CurlyBracketBlock => {
                parser.parse_nested_block(|p| {
                    while p.next().is_ok() {}
                    Ok::<_, CssParseError<'_, ()>>(())
                })?;
                segment.push(ValueNode::Literal(parser.slice_from(start).to_string()));
            }
            _ => {
                segment.push(ValueNode::Literal(parser.slice_from(start).to_string()));
            }
        }
    }

    let raw = parser.slice_from(segment_start);
    flush_segment(&mut components, &mut segment, raw);

    Ok(components)
}

fn parse_nested_value<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Value, CssParseError<'i, ()>> {
    parser.parse_nested_block(|p| {
        let start = p.position();
        let components = parse_components(p)?;
        Ok(Value {
            components,
            raw: p.slice_from(start).trim().to_string(),
        })
    })
}

/// Parse the inside of `var(...)`.
fn parse_reference<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<(String, Option<Value>), CssParseError<'i, ()>> {
    parser.skip_whitespace();
    let name = parser.expect_ident()?.to_string();
    if !name.starts_with("--") {
        return Err(parser.new_custom_error(()));
    }

    parser.skip_whitespace();
    let fallback = if parser.try_parse(|p| p.expect_comma()).is_ok() {
        let start = parser.position();
        let components = parse_components(parser)?;
        Some(Value {
            components,
            raw: parser.slice_from(start).trim().to_string(),
        })
    } else {
        None
    };

    Ok((name, fallback))
}

fn flush_segment(components: &mut Vec<ValueNode>, segment: &mut Vec<ValueNode>, raw: &str) {
    match segment.len() {
        0 => {}
        1 => components.extend(segment.drain(..)),
        _ => components.push(ValueNode::Group {
            nodes: std::mem::take(segment),
            raw: raw.trim().to_string(),
        }),
    }
}
