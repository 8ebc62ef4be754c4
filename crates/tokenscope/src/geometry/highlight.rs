//! Highlight view models.

use std::fmt;

use tokenscope_style::types::{Edges, Side};

use super::Rect;

/// Which side of the highlight the effect comes from.
///
/// Used to place the highlight's tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    /// Either horizontal side, whichever has room.
    Side,
}

impl From<Side> for Anchor {
    fn from(side: Side) -> Self {
        match side {
            Side::Top => Anchor::Top,
            Side::Right => Anchor::Right,
            Side::Bottom => Anchor::Bottom,
            Side::Left => Anchor::Left,
        }
    }
}

/// Border widths drawn around the highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Borders {
    /// One width on every edge.
    Uniform(String),
    /// Independent widths; `None` leaves an edge at its default.
    PerEdge(Edges<Option<String>>),
}

impl Default for Borders {
    fn default() -> Self {
        Borders::PerEdge(Edges::default())
    }
}

impl Borders {
    /// Width of one edge, if set.
    pub fn edge(&self, side: Side) -> Option<&str> {
        match self {
            Borders::Uniform(width) => Some(width),
            Borders::PerEdge(edges) => edges.get(side).as_deref(),
        }
    }

    /// Set one edge, turning a uniform border into per-edge widths.
    pub fn set_edge(&mut self, side: Side, width: impl Into<String>) {
        if let Borders::Uniform(width) = self {
            *self = Borders::PerEdge(Edges::uniform(Some(width.clone())));
        }
        if let Borders::PerEdge(edges) = self {
            *edges.get_mut(side) = Some(width.into());
        }
    }
}

/// Everything needed to draw one highlight rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpec {
    /// Box to draw.
    pub rect: Rect,
    /// Border widths.
    pub borders: Borders,
    /// Fill color; `None` keeps the default fill.
    pub background: Option<String>,
    /// Corner radius.
    pub border_radius: Option<String>,
    /// Where the effect comes from; `None` means no preference.
    pub from: Option<Anchor>,
    /// Start fading shortly after being shown.
    pub fade_quickly: bool,
    /// Tooltip text.
    pub label: String,
    /// Drawn as a measurement ("redline") rather than a selection box.
    pub redline: bool,
}

impl HighlightSpec {
    /// Plain selection box around a component.
    pub fn component(rect: Rect, label: impl Into<String>) -> Self {
        Self {
            rect,
            borders: Borders::default(),
            background: None,
            border_radius: None,
            from: None,
            fade_quickly: false,
            label: label.into(),
            redline: false,
        }
    }

    /// Measurement box for a token's effect.
    pub fn redline(rect: Rect, label: impl Into<String>) -> Self {
        Self {
            redline: true,
            ..Self::component(rect, label)
        }
    }
}

/// Final tooltip side for a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TooltipPlacement {
    Top,
    Bottom,
    Left,
    Right,
}

impl TooltipPlacement {
    /// Pick the tooltip side for a highlight.
    ///
    /// `Side` prefers the left unless fewer than `margin` pixels remain
    /// there. Vertical and unanchored highlights put the tooltip on top
    /// unless the highlight comes from the bottom, or the top lacks `margin`
    /// pixels while the bottom is still inside the viewport.
    pub fn resolve(spec: &HighlightSpec, viewport_height: f64, margin: f64) -> Self {
        let rect = &spec.rect;
        match spec.from {
            Some(Anchor::Side) if rect.left - margin < 0.0 => TooltipPlacement::Right,
            Some(Anchor::Side) | Some(Anchor::Left) => TooltipPlacement::Left,
            Some(Anchor::Right) => TooltipPlacement::Right,
            Some(Anchor::Bottom) => TooltipPlacement::Bottom,
            Some(Anchor::Top) | None => {
                if rect.top - margin < 0.0 && rect.bottom() < viewport_height {
                    TooltipPlacement::Bottom
                } else {
                    TooltipPlacement::Top
                }
            }
        }
    }
}

impl fmt::Display for TooltipPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TooltipPlacement::Top => "top",
            TooltipPlacement::Bottom => "bottom",
            TooltipPlacement::Left => "left",
            TooltipPlacement::Right => "right",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(from: Option<Anchor>, rect: Rect) -> HighlightSpec {
        HighlightSpec {
            from,
            ..HighlightSpec::redline(rect, "")
        }
    }

    #[test]
    fn side_flips_right_near_the_left_edge() {
        let near = spec(Some(Anchor::Side), Rect::new(50.0, 300.0, 4.0, 40.0));
        let far = spec(Some(Anchor::Side), Rect::new(200.0, 300.0, 4.0, 40.0));

        assert_eq!(TooltipPlacement::resolve(&near, 800.0, 80.0), TooltipPlacement::Right);
        assert_eq!(TooltipPlacement::resolve(&far, 800.0, 80.0), TooltipPlacement::Left);
    }

    #[test]
    fn top_flips_bottom_near_the_top_edge() {
        let near = spec(Some(Anchor::Top), Rect::new(0.0, 10.0, 100.0, 20.0));
        let clipped = spec(None, Rect::new(0.0, 10.0, 100.0, 900.0));
        let roomy = spec(None, Rect::new(0.0, 200.0, 100.0, 20.0));
        let bottom = spec(Some(Anchor::Bottom), Rect::new(0.0, 200.0, 100.0, 20.0));

        assert_eq!(TooltipPlacement::resolve(&near, 800.0, 80.0), TooltipPlacement::Bottom);
        assert_eq!(TooltipPlacement::resolve(&clipped, 800.0, 80.0), TooltipPlacement::Top);
        assert_eq!(TooltipPlacement::resolve(&roomy, 800.0, 80.0), TooltipPlacement::Top);
        assert_eq!(TooltipPlacement::resolve(&bottom, 800.0, 80.0), TooltipPlacement::Bottom);
    }

    #[test]
    fn borders_switch_to_per_edge() {
        let mut borders = Borders::Uniform("2px".to_string());
        borders.set_edge(Side::Left, "8px");

        assert_eq!(borders.edge(Side::Left), Some("8px"));
        assert_eq!(borders.edge(Side::Top), Some("2px"));

        let mut borders = Borders::default();
        borders.set_edge(Side::Bottom, "4px");
        assert_eq!(borders.edge(Side::Top), None);
        assert_eq!(borders.edge(Side::Bottom), Some("4px"));
    }
}
