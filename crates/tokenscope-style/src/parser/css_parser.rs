//! CSS syntax parser using the `cssparser` crate.
//!
//! This module turns stylesheet text into a flat list of [`Rule`]s. Declaration
//! values are kept as written and parsed into a [`Value`](super::Value) tree;
//! nothing is interpreted beyond what token inspection needs.

use crate::rules::{Declaration, Rule};
use crate::selector::{
    AttributeOp, AttributeSelector, Combinator, NthExpr, PseudoClass, Selector, SelectorPart,
    TypeSelector,
};
use crate::{Error, Result};
use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

/// At-rules whose blocks contain style rules that still apply under a
/// condition.
const CONDITIONAL_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "document"];

/// Parse a CSS stylesheet string into a flat list of rules.
///
/// Rules inside conditional at-rules (`@media`, `@supports`, ...) are
/// flattened into the list in source order and carry the enclosing
/// condition. Other at-rules (`@keyframes`, `@font-face`, `@import`) are
/// skipped.
///
/// # Error Recovery
///
/// Parse errors in individual rules do not cause the entire parse to fail.
/// Instead, the parser:
/// 1. Logs the error via `tracing::warn!`
/// 2. Skips to the next rule (after the closing `}`)
/// 3. Continues parsing subsequent rules
///
/// # Example
///
/// ```
/// use tokenscope_style::parser::parse_css;
///
/// let rules = parse_css(":root { --a: 4px; } .b { padding: var(--a); }").unwrap();
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[1].declarations[0].value.references(), vec!["--a"]);
/// ```
pub fn parse_css(css: &str) -> Result<Vec<Rule>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = vec![];
    let mut order = 0u32;

    parse_rule_list(&mut parser, None, &mut order, &mut rules);

    Ok(rules)
}

fn parse_rule_list(
    parser: &mut Parser<'_, '_>,
    condition: Option<&str>,
    order: &mut u32,
    rules: &mut Vec<Rule>,
) {
    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let state = parser.state();
        if let Ok(Token::AtKeyword(name)) = parser.next() {
            let name = name.to_ascii_lowercase();
            parse_at_rule(parser, &name, condition, order, rules);
            continue;
        }
        parser.reset(&state);

        match parse_rule(parser, *order) {
            Ok(mut rule) => {
                rule.condition = condition.map(str::to_string);
                rules.push(rule);
                *order += 1;
            }
            Err(e) => {
                tracing::warn!("CSS parse error: {}", e);
                skip_to_next_rule(parser);
            }
        }
    }
}

/// Handle an at-rule whose keyword has already been consumed.
fn parse_at_rule(
    parser: &mut Parser<'_, '_>,
    name: &str,
    condition: Option<&str>,
    order: &mut u32,
    rules: &mut Vec<Rule>,
) {
    let start = parser.position();
    let _ = parser.parse_until_before(
        Delimiter::CurlyBracketBlock | Delimiter::Semicolon,
        consume_all,
    );
    let prelude = parser.slice_from(start).trim().to_string();

    match parser.next() {
        Ok(Token::CurlyBracketBlock) if CONDITIONAL_AT_RULES.contains(&name) => {
            let own = if prelude.is_empty() {
                format!("@{}", name)
            } else {
                format!("@{} {}", name, prelude)
            };
            let nested = match condition {
                Some(outer) => format!("{} {}", outer, own),
                None => own,
            };
            let _ = parser.parse_nested_block(|block| {
                parse_rule_list(block, Some(&nested), order, rules);
                Ok::<_, CssParseError<'_, ()>>(())
            });
        }
        Ok(Token::CurlyBracketBlock) => {
            tracing::debug!("Skipping @{} block", name);
            let _ = parser.parse_nested_block(consume_all);
        }
        _ => {
            tracing::debug!("Skipping @{} statement", name);
        }
    }
}

/// Parse a single CSS rule: selector list { declarations }
fn parse_rule(parser: &mut Parser<'_, '_>, order: u32) -> Result<Rule> {
    let location = parser.current_source_location();
    let start = parser.position();
    parser
        .parse_until_before(Delimiter::CurlyBracketBlock, consume_all)
        .map_err(|e: CssParseError<'_, ()>| {
            Error::parse(
                format!("Failed to read selector: {:?}", e.kind),
                location.line + 1,
                location.column,
            )
        })?;
    let selector_text = parser.slice_from(start).trim().to_string();

    if selector_text.is_empty() {
        return Err(Error::parse(
            "Missing selector before '{'",
            location.line + 1,
            location.column,
        ));
    }

    let declarations = match parser.next() {
        Ok(Token::CurlyBracketBlock) => parser
            .parse_nested_block(|block_parser| parse_declarations(block_parser))
            .map_err(|e: CssParseError<'_, ()>| {
                Error::parse(
                    format!("Failed to parse declaration block: {:?}", e.kind),
                    location.line + 1,
                    location.column,
                )
            })?,
        _ => {
            return Err(Error::parse(
                "Expected '{' after selector",
                location.line + 1,
                location.column,
            ));
        }
    };

    Ok(Rule::new(selector_text, declarations, order))
}

/// Parse CSS declarations, keeping each value's source text.
fn parse_declarations<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Vec<Declaration>, CssParseError<'i, ()>> {
    let mut declarations = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let property = match parser.expect_ident() {
            Ok(name) if name.starts_with("--") => name.to_string(),
            Ok(name) => name.to_ascii_lowercase(),
            Err(_) => {
                skip_declaration(parser);
                continue;
            }
        };

        if parser.expect_colon().is_err() {
            skip_declaration(parser);
            continue;
        }

        let start = parser.position();
        parser.parse_until_before(Delimiter::Semicolon, consume_all)?;
        let (value, important) = split_important(parser.slice_from(start));

        declarations.push(Declaration::new(property, value, important));

        let _ = parser.try_parse(|p| p.expect_semicolon());
    }

    Ok(declarations)
}

/// Split a trailing `!important` off a raw value.
fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim();
    if let Some(bang) = trimmed.rfind('!')
        && trimmed[bang + 1..].trim().eq_ignore_ascii_case("important")
    {
        return (trimmed[..bang].trim_end(), true);
    }
    (trimmed, false)
}

fn consume_all<'i>(parser: &mut Parser<'i, '_>) -> std::result::Result<(), CssParseError<'i, ()>> {
    while parser.next().is_ok() {}
    Ok(())
}

/// Parse a comma-separated selector list.
///
/// Entries that fail to parse are dropped with a debug log; the rest are kept.
pub fn parse_selector_list(text: &str) -> Vec<Selector> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut selectors = vec![];

    loop {
        let start = parser.position();
        let result: std::result::Result<Selector, CssParseError<'_, Error>> = parser
            .parse_until_before(Delimiter::Comma, |p| {
                parse_selector(p).map_err(|e| p.new_custom_error(e))
            });
        match result {
            Ok(selector) => selectors.push(selector),
            Err(e) => tracing::debug!(
                "Skipping selector '{}': {:?}",
                parser.slice_from(start).trim(),
                e.kind
            ),
        }

        match parser.next() {
            Ok(Token::Comma) => continue,
            _ => break,
        }
    }

    selectors
}

/// Parse exactly one complex selector.
pub fn parse_selector_text(text: &str) -> Result<Selector> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let selector = parse_selector(&mut parser)?;
    parser.skip_whitespace();
    if !parser.is_exhausted() {
        return Err(Error::invalid_selector(text, "Unexpected trailing input"));
    }
    Ok(selector)
}

/// Parse a complex selector, reading whitespace so descendant combinators are
/// seen.
fn parse_selector(parser: &mut Parser<'_, '_>) -> Result<Selector> {
    let mut parts = vec![];
    let mut combinators = vec![];
    let mut current = SelectorPart::default();
    let mut pending: Option<Combinator> = None;

    parser.skip_whitespace();

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        let combinator = match &token {
            Token::WhiteSpace(_) => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }
            Token::Delim('>') => Some(Combinator::Child),
            Token::Delim('+') => Some(Combinator::AdjacentSibling),
            Token::Delim('~') => Some(Combinator::GeneralSibling),
            _ => None,
        };

        if let Some(combinator) = combinator {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            if parts.is_empty() {
                return Err(Error::invalid_selector(
                    format!("{:?}", token),
                    "Selector starts with a combinator",
                ));
            }
            pending = Some(combinator);
            continue;
        }

        // Any other token starts or extends a compound part.
        if current.is_empty()
            && let Some(combinator) = pending.take()
        {
            combinators.push(combinator);
        }

        match token {
            Token::Ident(name) => {
                if current.type_selector.is_some() {
                    return Err(Error::invalid_selector(
                        name.to_string(),
                        "Unexpected identifier",
                    ));
                }
                current.type_selector = Some(TypeSelector::Tag(name.to_ascii_lowercase()));
            }

            Token::Delim('*') => {
                current.type_selector = Some(TypeSelector::Universal);
            }

            Token::Delim('.') => {
                let class = parser
                    .expect_ident()
                    .map_err(|_| Error::invalid_selector(".", "Expected class name after '.'"))?;
                current.classes.push(class.to_string());
            }

            Token::IDHash(id) => {
                if current.id.is_some() {
                    return Err(Error::invalid_selector(
                        format!("#{}", id),
                        "Multiple ids in one compound selector",
                    ));
                }
                current.id = Some(id.to_string());
            }

            Token::SquareBracketBlock => {
                let attribute = parser
                    .parse_nested_block(|p| parse_attribute(p))
                    .map_err(|_: CssParseError<'_, ()>| {
                        Error::invalid_selector("[", "Invalid attribute selector")
                    })?;
                current.attributes.push(attribute);
            }

            Token::Colon => parse_pseudo(parser, &mut current)?,

            other => {
                return Err(Error::invalid_selector(
                    format!("{:?}", other),
                    "Unexpected token in selector",
                ));
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    } else if matches!(
        pending,
        Some(Combinator::Child | Combinator::AdjacentSibling | Combinator::GeneralSibling)
    ) {
        return Err(Error::invalid_selector("", "Selector ends with a combinator"));
    }

    if parts.is_empty() {
        return Err(Error::invalid_selector("", "Empty selector"));
    }

    Ok(Selector { parts, combinators })
}

/// Parse what follows a ':' in a compound selector.
fn parse_pseudo(parser: &mut Parser<'_, '_>, current: &mut SelectorPart) -> Result<()> {
    let token = parser
        .next_including_whitespace()
        .map_err(|_| Error::invalid_selector(":", "Expected pseudo-class name after ':'"))?
        .clone();

    match token {
        Token::Colon => {
            let name = match parser.next_including_whitespace() {
                Ok(Token::Ident(name)) => name.to_string(),
                Ok(Token::Function(name)) => {
                    let name = name.to_string();
                    let _ = parser.parse_nested_block(consume_all);
                    name
                }
                _ => {
                    return Err(Error::invalid_selector(
                        "::",
                        "Expected pseudo-element name after '::'",
                    ));
                }
            };
            current.pseudo_element = Some(name.to_ascii_lowercase());
        }

        Token::Ident(name) => {
            let lower = name.to_ascii_lowercase();
            match lower.as_str() {
                // Legacy single-colon pseudo-elements
                "before" | "after" | "first-line" | "first-letter" => {
                    current.pseudo_element = Some(lower);
                }
                _ => current.pseudo_classes.push(PseudoClass::from_css(&lower)),
            }
        }

        Token::Function(name) => {
            let lower = name.to_ascii_lowercase();
            let pseudo = match lower.as_str() {
                "nth-child" => {
                    let expr = parser.parse_nested_block(|p| parse_nth_expr(p)).map_err(
                        |_: CssParseError<'_, ()>| {
                            Error::invalid_selector(":nth-child", "Invalid nth-child expression")
                        },
                    )?;
                    PseudoClass::NthChild(expr)
                }
                "not" => {
                    let inner = parser
                        .parse_nested_block(|p| parse_simple_selector(p))
                        .map_err(|_: CssParseError<'_, ()>| {
                            Error::invalid_selector(":not", "Invalid :not() argument")
                        })?;
                    PseudoClass::Not(Box::new(inner))
                }
                _ => {
                    let _ = parser.parse_nested_block(consume_all);
                    PseudoClass::Unsupported(format!("{}()", lower))
                }
            };
            current.pseudo_classes.push(pseudo);
        }

        other => {
            return Err(Error::invalid_selector(
                format!(":{:?}", other),
                "Expected pseudo-class name after ':'",
            ));
        }
    }

    Ok(())
}

/// Parse a compound selector (for :not() argument).
fn parse_simple_selector<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<SelectorPart, CssParseError<'i, ()>> {
    let mut part = SelectorPart::default();

    parser.skip_whitespace();

    while let Ok(token) = parser.next_including_whitespace() {
        match token.clone() {
            Token::Ident(name) => {
                part.type_selector = Some(TypeSelector::Tag(name.to_ascii_lowercase()));
            }
            Token::Delim('*') => {
                part.type_selector = Some(TypeSelector::Universal);
            }
            Token::Delim('.') => {
                let class = parser.expect_ident()?;
                part.classes.push(class.to_string());
            }
            Token::IDHash(id) => {
                part.id = Some(id.to_string());
            }
            Token::SquareBracketBlock => {
                let attribute = parser.parse_nested_block(|p| parse_attribute(p))?;
                part.attributes.push(attribute);
            }
            Token::Colon => {
                let name = parser.expect_ident()?.to_ascii_lowercase();
                part.pseudo_classes.push(PseudoClass::from_css(&name));
            }
            Token::WhiteSpace(_) => break,
            _ => return Err(parser.new_custom_error(())),
        }
    }

    if part.is_empty() {
        return Err(parser.new_custom_error(()));
    }

    Ok(part)
}

/// Parse the inside of `[...]`.
fn parse_attribute<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<AttributeSelector, CssParseError<'i, ()>> {
    parser.skip_whitespace();
    let name = parser.expect_ident()?.to_ascii_lowercase();
    parser.skip_whitespace();

    if parser.is_exhausted() {
        return Ok(AttributeSelector::exists(name));
    }

    let op = match parser.next()?.clone() {
        Token::Delim('=') => AttributeOp::Equals,
        Token::IncludeMatch => AttributeOp::Includes,
        Token::DashMatch => AttributeOp::DashMatch,
        Token::PrefixMatch => AttributeOp::Prefix,
        Token::SuffixMatch => AttributeOp::Suffix,
        Token::SubstringMatch => AttributeOp::Substring,
        _ => return Err(parser.new_custom_error(())),
    };

    let value = parser.expect_ident_or_string()?.to_string();

    // Optional case-sensitivity flag (`i` / `s`) is accepted and ignored.
    parser.skip_whitespace();
    let _ = parser.try_parse(|p| p.expect_ident().map(|_| ()));

    Ok(AttributeSelector::with_op(name, op, value))
}

/// Parse nth-child expression (e.g., "odd", "even", "3", "2n+1").
fn parse_nth_expr<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<NthExpr, CssParseError<'i, ()>> {
    parser.skip_whitespace();
    let (a, b) = cssparser::parse_nth(parser)?;
    Ok(NthExpr::new(a, b))
}

/// Skip to the next rule after an error.
fn skip_to_next_rule(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) => {
                let _ = parser.parse_nested_block(consume_all);
                return;
            }
            Ok(Token::Semicolon) | Err(_) => return,
            _ => {}
        }
    }
}

/// Skip past the current declaration.
fn skip_declaration(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::Semicolon) | Err(_) => return,
            _ => {}
        }
    }
}
