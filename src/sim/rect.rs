//! Axis-aligned rectangle geometry
//!
//! Every entity in the playfield (paddle, balls, bricks, power-ups, laser
//! shots) is an axis-aligned rectangle in screen space: x grows right, y grows
//! down, (0, 0) is the top-left corner of the field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Side of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// How far one rectangle reaches into another, per side of the other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Mover's right edge past the obstacle's left edge
    pub left: f32,
    /// Obstacle's right edge past the mover's left edge
    pub right: f32,
    /// Mover's bottom edge past the obstacle's top edge
    pub top: f32,
    /// Obstacle's bottom edge past the mover's top edge
    pub bottom: f32,
}

impl Penetration {
    /// Side of the obstacle with the shallowest penetration (the separating axis).
    ///
    /// Ties resolve in the order left, right, top, bottom.
    pub fn min_side(&self) -> Side {
        let mut side = Side::Left;
        let mut depth = self.left;
        for (candidate, d) in [
            (Side::Right, self.right),
            (Side::Top, self.top),
            (Side::Bottom, self.bottom),
        ] {
            if d < depth {
                side = candidate;
                depth = d;
            }
        }
        side
    }
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.y + self.h / 2.0)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Penetration depths of `self` into `other` on each of `other`'s sides
    pub fn penetration(&self, other: &Rect) -> Penetration {
        Penetration {
            left: self.right() - other.left(),
            right: other.right() - self.left(),
            top: self.bottom() - other.top(),
            bottom: other.bottom() - self.top(),
        }
    }
}
