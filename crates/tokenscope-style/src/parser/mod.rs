//! CSS parsing module.

mod css_parser;
mod value;

pub use css_parser::{parse_css, parse_selector_list, parse_selector_text};
pub use value::{Value, ValueNode, strip_var};
