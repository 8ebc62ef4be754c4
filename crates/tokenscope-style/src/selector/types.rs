//! Selector type definitions.

use std::fmt;

/// A complex selector (e.g., ".spectrum-Button:hover > .spectrum-Icon").
///
/// A selector consists of one or more compound parts connected by combinators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Compound parts from left to right.
    pub parts: Vec<SelectorPart>,
    /// Combinators between parts (length = parts.len() - 1).
    pub combinators: Vec<Combinator>,
}

impl Selector {
    /// Parse a single complex selector.
    pub fn parse(text: &str) -> crate::Result<Self> {
        crate::parser::parse_selector_text(text)
    }

    /// Create a class selector.
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            parts: vec![SelectorPart::class_only(class_name)],
            combinators: vec![],
        }
    }

    /// Create a type selector.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            parts: vec![SelectorPart::tag_only(tag)],
            combinators: vec![],
        }
    }

    /// Add a descendant selector part.
    pub fn descendant(mut self, part: SelectorPart) -> Self {
        if !self.parts.is_empty() {
            self.combinators.push(Combinator::Descendant);
        }
        self.parts.push(part);
        self
    }

    /// Add a child selector part.
    pub fn child(mut self, part: SelectorPart) -> Self {
        if !self.parts.is_empty() {
            self.combinators.push(Combinator::Child);
        }
        self.parts.push(part);
        self
    }

    /// Prefix this selector with `scope` joined by a descendant combinator.
    ///
    /// `.a .b` scoped by `.example` becomes `.example .a .b`.
    pub fn scoped(&self, scope: &Selector) -> Selector {
        let mut parts = scope.parts.clone();
        let mut combinators = scope.combinators.clone();
        combinators.push(Combinator::Descendant);
        parts.extend(self.parts.iter().cloned());
        combinators.extend(self.combinators.iter().copied());
        Selector { parts, combinators }
    }

    /// Get the rightmost (subject) selector part.
    pub fn subject(&self) -> Option<&SelectorPart> {
        self.parts.last()
    }

    /// Check whether any compound part carries the given class.
    pub fn mentions_class(&self, class: &str) -> bool {
        self.parts
            .iter()
            .any(|part| part.classes.iter().any(|c| c == class))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                match &self.combinators[i - 1] {
                    Combinator::Descendant => write!(f, " ")?,
                    Combinator::Child => write!(f, " > ")?,
                    Combinator::AdjacentSibling => write!(f, " + ")?,
                    Combinator::GeneralSibling => write!(f, " ~ ")?,
                }
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// A compound selector (e.g., "button.spectrum-Button[disabled]:hover").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorPart {
    /// Type selector (tag name or universal).
    pub type_selector: Option<TypeSelector>,
    /// ID selector (#id).
    pub id: Option<String>,
    /// Class selectors (.class).
    pub classes: Vec<String>,
    /// Attribute selectors ([attr], [attr=value], ...).
    pub attributes: Vec<AttributeSelector>,
    /// Pseudo-class selectors (:hover, :first-child, ...).
    pub pseudo_classes: Vec<PseudoClass>,
    /// Pseudo-element (::before). Parts with a pseudo-element never match an
    /// element.
    pub pseudo_element: Option<String>,
}

impl SelectorPart {
    /// Create a new empty selector part.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a type-only selector.
    pub fn tag_only(tag: impl Into<String>) -> Self {
        Self {
            type_selector: Some(TypeSelector::Tag(tag.into())),
            ..Default::default()
        }
    }

    /// Create a class-only selector.
    pub fn class_only(class_name: impl Into<String>) -> Self {
        Self {
            classes: vec![class_name.into()],
            ..Default::default()
        }
    }

    /// Add a class selector.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute selector.
    pub fn with_attribute(mut self, attribute: AttributeSelector) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a pseudo-class selector.
    pub fn with_pseudo(mut self, pseudo: PseudoClass) -> Self {
        self.pseudo_classes.push(pseudo);
        self
    }

    /// Check if this part has no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.type_selector.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
            && self.pseudo_element.is_none()
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_selector {
            Some(TypeSelector::Universal) => write!(f, "*")?,
            Some(TypeSelector::Tag(t)) => write!(f, "{}", t)?,
            None => {}
        }

        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }

        for class in &self.classes {
            write!(f, ".{}", class)?;
        }

        for attribute in &self.attributes {
            write!(f, "{}", attribute)?;
        }

        for pseudo in &self.pseudo_classes {
            write!(f, ":{}", pseudo)?;
        }

        if let Some(element) = &self.pseudo_element {
            write!(f, "::{}", element)?;
        }

        Ok(())
    }
}

/// Type selector - matches the element's tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSelector {
    /// Universal selector (*) - matches any element.
    Universal,
    /// Tag name, stored lowercase.
    Tag(String),
}

/// Combinator between selector parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (space): matches any descendant.
    Descendant,
    /// Child combinator (>): matches direct child only.
    Child,
    /// Adjacent sibling (+): matches immediately following sibling.
    AdjacentSibling,
    /// General sibling (~): matches any following sibling.
    GeneralSibling,
}

/// Attribute selector operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOp {
    /// `[attr=value]`
    Equals,
    /// `[attr~=value]` - whitespace-separated list contains value.
    Includes,
    /// `[attr|=value]` - equals value or starts with `value-`.
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
}

impl AttributeOp {
    fn as_str(self) -> &'static str {
        match self {
            AttributeOp::Equals => "=",
            AttributeOp::Includes => "~=",
            AttributeOp::DashMatch => "|=",
            AttributeOp::Prefix => "^=",
            AttributeOp::Suffix => "$=",
            AttributeOp::Substring => "*=",
        }
    }
}

/// An attribute selector such as `[dir="rtl"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Attribute name, lowercase.
    pub name: String,
    /// Operator and operand; `None` tests for presence only.
    pub operation: Option<(AttributeOp, String)>,
}

impl AttributeSelector {
    /// `[name]`
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: None,
        }
    }

    /// `[name op value]`
    pub fn with_op(name: impl Into<String>, op: AttributeOp, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: Some((op, value.into())),
        }
    }

    /// Test an attribute value against this selector.
    pub fn matches_value(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        let Some((op, expected)) = &self.operation else {
            return true;
        };
        match op {
            AttributeOp::Equals => actual == expected,
            AttributeOp::Includes => actual.split_whitespace().any(|word| word == expected),
            AttributeOp::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeOp::Prefix => !expected.is_empty() && actual.starts_with(expected.as_str()),
            AttributeOp::Suffix => !expected.is_empty() && actual.ends_with(expected.as_str()),
            AttributeOp::Substring => !expected.is_empty() && actual.contains(expected.as_str()),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operation {
            None => write!(f, "[{}]", self.name),
            Some((op, value)) => write!(f, "[{}{}\"{}\"]", self.name, op.as_str(), value),
        }
    }
}

/// Pseudo-class selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// :hover
    Hover,
    /// :active
    Active,
    /// :focus
    Focus,
    /// :focus-visible
    FocusVisible,
    /// :focus-within
    FocusWithin,
    /// :disabled
    Disabled,
    /// :enabled
    Enabled,
    /// :checked
    Checked,
    /// :root - element without a parent.
    Root,
    /// :first-child
    FirstChild,
    /// :last-child
    LastChild,
    /// :only-child
    OnlyChild,
    /// :nth-child(An+B)
    NthChild(NthExpr),
    /// :empty
    Empty,
    /// :not(compound)
    Not(Box<SelectorPart>),
    /// Any pseudo-class this matcher does not model. Never matches.
    Unsupported(String),
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoClass::Hover => write!(f, "hover"),
            PseudoClass::Active => write!(f, "active"),
            PseudoClass::Focus => write!(f, "focus"),
            PseudoClass::FocusVisible => write!(f, "focus-visible"),
            PseudoClass::FocusWithin => write!(f, "focus-within"),
            PseudoClass::Disabled => write!(f, "disabled"),
            PseudoClass::Enabled => write!(f, "enabled"),
            PseudoClass::Checked => write!(f, "checked"),
            PseudoClass::Root => write!(f, "root"),
            PseudoClass::FirstChild => write!(f, "first-child"),
            PseudoClass::LastChild => write!(f, "last-child"),
            PseudoClass::OnlyChild => write!(f, "only-child"),
            PseudoClass::NthChild(expr) => write!(f, "nth-child({})", expr),
            PseudoClass::Empty => write!(f, "empty"),
            PseudoClass::Not(inner) => write!(f, "not({})", inner),
            PseudoClass::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

impl PseudoClass {
    /// Map a non-functional pseudo-class name.
    pub fn from_css(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "hover" => Self::Hover,
            "active" => Self::Active,
            "focus" => Self::Focus,
            "focus-visible" => Self::FocusVisible,
            "focus-within" => Self::FocusWithin,
            "disabled" => Self::Disabled,
            "enabled" => Self::Enabled,
            "checked" => Self::Checked,
            "root" => Self::Root,
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,
            "empty" => Self::Empty,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// Expression for :nth-child (An+B).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NthExpr {
    /// Coefficient (A in An+B).
    pub a: i32,
    /// Offset (B in An+B).
    pub b: i32,
}

impl NthExpr {
    /// Create a new nth expression.
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Check if a 0-indexed position matches this expression.
    pub fn matches(&self, index: usize) -> bool {
        let n = index as i32 + 1;
        if self.a == 0 {
            n == self.b
        } else {
            let diff = n - self.b;
            if self.a > 0 {
                diff >= 0 && diff % self.a == 0
            } else {
                diff <= 0 && diff % self.a == 0
            }
        }
    }

    /// :nth-child(odd) = 2n+1.
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// :nth-child(even) = 2n.
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }
}

impl fmt::Display for NthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (2, 1) => write!(f, "odd"),
            (2, 0) => write!(f, "even"),
            (0, b) => write!(f, "{}", b),
            (a, 0) => write!(f, "{}n", a),
            (a, b) if b > 0 => write!(f, "{}n+{}", a, b),
            (a, b) => write!(f, "{}n{}", a, b),
        }
    }
}
