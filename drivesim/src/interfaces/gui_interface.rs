//! Draw commands produced by the renderer. Frontends (the egui GUI, the PNG export) translate a
//! `Scene` into their own primitives; nothing in here depends on a drawing backend.

use crate::core::geometry::Point;
use anyhow::Context;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
    pub const RED: RgbColor = RgbColor::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> RgbColor {
        RgbColor { r, g, b }
    }

    /// Parses any CSS colour notation, e.g. `#ff0000` or `red`.
    pub fn parse_css(color: &str) -> anyhow::Result<RgbColor> {
        let tmp_color = color
            .parse::<css_color_parser::Color>()
            .context(format!("Could not parse colour {}!", color))?;
        Ok(RgbColor {
            r: tmp_color.r,
            g: tmp_color.g,
            b: tmp_color.b,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    CenterTop,
    CenterCenter,
    RightCenter,
    LeftBottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Open polyline stroked with `width` pixels.
    Polyline {
        points: Vec<Point>,
        width: f32,
        color: RgbColor,
    },
    /// Filled convex polygon.
    Polygon { points: Vec<Point>, fill: RgbColor },
    Text {
        pos: Point,
        text: String,
        anchor: TextAnchor,
        color: RgbColor,
    },
}

/// Scene is an ordered list of primitives, drawn back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend<I: IntoIterator<Item = Primitive>>(&mut self, primitives: I) {
        self.primitives.extend(primitives);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_colours_are_parsed() {
        assert_eq!(RgbColor::parse_css("#ff0000").unwrap(), RgbColor::RED);
        assert_eq!(
            RgbColor::parse_css("#1e90ff").unwrap(),
            RgbColor::new(30, 144, 255)
        );
        assert!(RgbColor::parse_css("not-a-colour").is_err());
    }
}
