//! Property-to-highlight dispatch.

use tokenscope_style::rules::Rule;
use tokenscope_style::types::{Edges, Side};

use super::{Anchor, Borders, HighlightSpec, Rect};
use crate::document::ComputedStyle;
use crate::logging::targets;

/// Width of the strip drawn for size properties.
const SIZE_STRIP: f64 = 4.0;

/// Border drawn for border properties when the element reports none.
const DEFAULT_BORDER_WIDTH: &str = "2px";

/// The rule, property and token a highlight explains.
#[derive(Debug, Clone, Copy)]
pub struct InspectTarget<'a> {
    /// Rule declaring the property.
    pub rule: &'a Rule,
    /// Property the token drives.
    pub property: &'a str,
    /// Token name.
    pub token: &'a str,
}

/// Turns a property's effect on an element into a highlight.
#[derive(Debug, Clone)]
pub struct GeometryMapper {
    token_prefix: String,
}

impl GeometryMapper {
    /// Create a mapper; `token_prefix` is dropped from labels.
    pub fn new(token_prefix: impl Into<String>) -> Self {
        Self {
            token_prefix: token_prefix.into(),
        }
    }

    /// Tooltip label: the property and the token without the common prefix.
    pub fn label(&self, property: &str, token: &str) -> String {
        format!("{}: {}", property, token.replacen(self.token_prefix.as_str(), "", 1))
    }

    /// Compute the highlight showing `target`'s effect.
    ///
    /// Returns `None` for properties without a visual mapping.
    pub fn rect_for(
        &self,
        target: &InspectTarget<'_>,
        style: &ComputedStyle,
        bounds: Rect,
    ) -> Option<HighlightSpec> {
        let property = target.property;
        let mut spec = HighlightSpec::redline(bounds, self.label(property, target.token));

        match property {
            "width" | "min-width" => {
                spec.rect.height = SIZE_STRIP;
                spec.from = Some(Anchor::Top);
                spec.borders = Borders::Uniform("0px".to_string());
            }
            "height" | "min-height" => {
                spec.rect.width = SIZE_STRIP;
                spec.from = Some(Anchor::Side);
                spec.borders = Borders::Uniform("0px".to_string());
            }
            _ if property.starts_with("padding") => {
                self.padding(target, style, &mut spec);
                spec.background = Some("transparent".to_string());
            }
            _ if property.starts_with("margin") => {
                Self::margin(property, style, &mut spec);
            }
            "border-width" | "border-radius" | "border-color" => {
                spec.from = Some(Anchor::Top);
                let width = style.get("border-width").unwrap_or(DEFAULT_BORDER_WIDTH);
                spec.borders = Borders::Uniform(width.to_string());
                spec.border_radius = style.get("border-radius").map(str::to_string);
                spec.background = Some("transparent".to_string());
                spec.fade_quickly = property == "border-color";
            }
            "background-color" | "color" => {
                spec.fade_quickly = true;
            }
            _ => {
                tracing::debug!(
                    target: targets::GEOMETRY,
                    "Not implemented: {} = {}",
                    property,
                    style.get(property).unwrap_or_default()
                );
                return None;
            }
        }

        Some(spec)
    }

    fn padding(&self, target: &InspectTarget<'_>, style: &ComputedStyle, spec: &mut HighlightSpec) {
        spec.from = Some(Anchor::Top);

        if target.property != "padding" {
            // Single side; other padding longhands draw the box only
            if let Some(side) = target.property.strip_prefix("padding-").and_then(Side::from_css) {
                spec.from = Some(side.into());
                if let Some(width) = style.get(&side.longhand("padding")) {
                    spec.borders.set_edge(side, width);
                }
            }
            return;
        }

        let expanded = match target.rule.get("padding") {
            Some(declaration) => Edges::<String>::expand(&declaration.value),
            None => Err(tokenscope_style::Error::shorthand("", "no padding declared")),
        };

        match expanded {
            Ok(sides) => {
                for (side, value) in sides.iter() {
                    if value == target.token {
                        spec.from = Some(side.into());
                        if let Some(width) = style.get(&side.longhand("padding")) {
                            spec.borders.set_edge(side, width);
                        }
                    }
                }
            }
            Err(err) => {
                tracing::debug!(target: targets::GEOMETRY, "Could not expand padding value: {}", err);
                spec.borders = Borders::PerEdge(style.edges("padding"));
            }
        }
    }

    fn margin(property: &str, style: &ComputedStyle, spec: &mut HighlightSpec) {
        spec.from = Some(match property {
            "margin-left" => Anchor::Left,
            "margin-right" => Anchor::Right,
            "margin-bottom" => Anchor::Bottom,
            _ => Anchor::Top,
        });
        spec.rect = spec.rect.grow(&style.edge_px("margin"));
        spec.borders = Borders::PerEdge(style.edges("margin"));
        spec.background = Some("transparent".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenscope_style::rules::Declaration;

    const TOKEN: &str = "--spectrum-button-padding";

    fn rule(property: &str, value: &str) -> Rule {
        Rule::new(".spectrum-Button", vec![Declaration::new(property, value, false)], 0)
    }

    fn map(rule: &Rule, property: &str, style: &ComputedStyle) -> Option<HighlightSpec> {
        let target = InspectTarget {
            rule,
            property,
            token: TOKEN,
        };
        GeometryMapper::new("--spectrum-").rect_for(&target, style, Rect::new(10.0, 100.0, 80.0, 32.0))
    }

    #[test]
    fn label_drops_prefix_once() {
        let mapper = GeometryMapper::new("--spectrum-");
        assert_eq!(
            mapper.label("padding-left", "--spectrum-button-padding"),
            "padding-left: button-padding"
        );
    }

    #[test]
    fn padding_matches_every_side_using_the_token() {
        let rule = rule("padding", &format!("0 var({})", TOKEN));
        let style = ComputedStyle::new()
            .with("padding-left", "16px")
            .with("padding-right", "14px");

        let spec = map(&rule, "padding", &style).unwrap();
        assert_eq!(spec.borders.edge(Side::Right), Some("14px"));
        assert_eq!(spec.borders.edge(Side::Left), Some("16px"));
        assert_eq!(spec.borders.edge(Side::Top), None);
        // Last matching side wins
        assert_eq!(spec.from, Some(Anchor::Left));
        assert_eq!(spec.background.as_deref(), Some("transparent"));
    }

    #[test]
    fn padding_fallback_reads_all_sides() {
        let rule = rule("padding", &format!("calc(var({}) - 1px)", TOKEN));
        let style = ComputedStyle::new()
            .with("padding-top", "1px")
            .with("padding-right", "2px")
            .with("padding-bottom", "3px")
            .with("padding-left", "4px");

        let spec = map(&rule, "padding", &style).unwrap();
        assert_eq!(spec.from, Some(Anchor::Top));
        assert_eq!(spec.borders.edge(Side::Top), Some("1px"));
        assert_eq!(spec.borders.edge(Side::Left), Some("4px"));
    }

    #[test]
    fn unsupported_property_has_no_highlight() {
        let rule = rule("transition-duration", &format!("var({})", TOKEN));
        assert!(map(&rule, "transition-duration", &ComputedStyle::new()).is_none());
    }
}
