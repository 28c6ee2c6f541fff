//! Rendering module
//!
//! Drawing is split in two stages. `shapes` turns the world into a list of
//! world-space primitives on a `Canvas`; `terminal` rasterises that list
//! into character cells and emits crossterm commands.

pub mod shapes;
pub mod terminal;

use glam::Vec2;

use crate::sim::Rect;

pub use shapes::{Scenery, draw_world};
pub use terminal::TerminalRaster;

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }

    /// Linear blend, `t` = 0 gives `self`, 1 gives `other`
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Darken towards black (overlays)
    pub fn dim(self, factor: f32) -> Color {
        Color::rgb(0, 0, 0).lerp(self, factor)
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(c: Color) -> Self {
        crossterm::style::Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SKY_BLUE: Color = Color::rgb(135, 206, 250);
    pub const DARK_BLUE: Color = Color::rgb(25, 25, 112);
    pub const CLOUD_WHITE: Color = Color::rgb(240, 244, 250);
    pub const GROUND_GREEN: Color = Color::rgb(34, 139, 34);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);

    pub const HELICOPTER_BODY: Color = Color::rgb(60, 60, 60);
    pub const HELICOPTER_ACCENT: Color = Color::rgb(255, 69, 0);
    pub const COCKPIT: Color = Color::rgb(100, 150, 200);
    pub const ROTOR: Color = Color::rgb(80, 80, 80);

    pub const BULLET: Color = Color::rgb(255, 215, 0);
    pub const ENEMY_RED: Color = Color::rgb(220, 20, 60);
    pub const TURRET_BARREL: Color = Color::rgb(150, 150, 150);
    pub const TURRET_PIP: Color = Color::rgb(0, 255, 0);

    pub const STONE_GRAY: Color = Color::rgb(100, 100, 100);
    pub const STONE_DARK: Color = Color::rgb(60, 60, 60);
    pub const STONE_LIGHT: Color = Color::rgb(150, 150, 150);
    pub const STONE_CAP: Color = Color::rgb(180, 180, 180);

    pub const COIN_GOLD: Color = Color::rgb(255, 215, 0);
    pub const COIN_SHINE: Color = Color::rgb(255, 235, 100);
    pub const COIN_EDGE: Color = Color::rgb(200, 170, 0);

    pub const MEDIKIT_RED: Color = Color::rgb(255, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const HINT_GRAY: Color = Color::rgb(180, 180, 180);

    pub const HEALTH_BG: Color = Color::rgb(100, 100, 100);
    pub const HEALTH_GOOD: Color = Color::rgb(0, 255, 0);
    pub const HEALTH_WARN: Color = Color::rgb(255, 255, 0);
    pub const HEALTH_LOW: Color = Color::rgb(255, 0, 0);

    pub const MENU_BG: Color = Color::rgb(8, 14, 30);
    pub const NAME_BG: Color = Color::rgb(18, 24, 40);
    pub const RECORDS_BG: Color = Color::rgb(12, 18, 30);
    pub const TITLE: Color = Color::rgb(120, 200, 255);
    pub const PROMPT: Color = Color::rgb(180, 220, 255);
    pub const RECORDS_TITLE: Color = Color::rgb(255, 215, 120);
    pub const SELECTED: Color = Color::rgb(255, 215, 0);
}

/// A world-space drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { rect: Rect, color: Color, filled: bool },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
    /// Text anchored at its left edge, or at its middle when `centered`
    Text {
        pos: Vec2,
        text: String,
        color: Color,
        centered: bool,
    },
}

/// Render target collecting shapes in draw order
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    background: Color,
    shapes: Vec<Shape>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all shapes and set the fill colour
    pub fn clear(&mut self, background: Color) {
        self.background = background;
        self.shapes.clear();
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.shapes.push(Shape::Rect {
            rect,
            color,
            filled: true,
        });
    }

    pub fn outline_rect(&mut self, rect: Rect, color: Color) {
        self.shapes.push(Shape::Rect {
            rect,
            color,
            filled: false,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.shapes.push(Shape::Line { from, to, color });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        self.shapes.push(Shape::Text {
            pos,
            text: text.into(),
            color,
            centered: false,
        });
    }

    /// Text centred horizontally on `pos.x`
    pub fn text_centered(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        self.shapes.push(Shape::Text {
            pos,
            text: text.into(),
            color,
            centered: true,
        });
    }

    /// Darken everything drawn so far (backdrop for overlays)
    pub fn shade(&mut self, factor: f32) {
        for shape in &mut self.shapes {
            match shape {
                Shape::Rect { color, .. }
                | Shape::Circle { color, .. }
                | Shape::Line { color, .. }
                | Shape::Text { color, .. } => *color = color.dim(factor),
            }
        }
        self.background = self.background.dim(factor);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
