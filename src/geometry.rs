//! Axis-aligned rectangles, the only collision shape the simulation uses.

use glam::Vec2;

/// An axis-aligned rectangle with its origin at the top-left corner.
///
/// Y grows downward, matching screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Builds a rect from its center point instead of its top-left corner.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// True when the rectangles overlap. Edge contact does not count,
    /// so a body resting exactly on a tile is not colliding with it.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// The same rect moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.pos + offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use speculoos::prelude::*;

    use super::Rect;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn edges_and_center() {
        let r = rect(10.0, 20.0, 30.0, 40.0);
        assert_that(&r.left()).is_equal_to(10.0);
        assert_that(&r.right()).is_equal_to(40.0);
        assert_that(&r.top()).is_equal_to(20.0);
        assert_that(&r.bottom()).is_equal_to(60.0);
        assert_that(&r.center()).is_equal_to(Vec2::new(25.0, 40.0));
    }

    #[test]
    fn from_center_round_trips() {
        let r = Rect::from_center(Vec2::new(25.0, 40.0), Vec2::new(30.0, 40.0));
        assert_that(&r).is_equal_to(rect(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn overlap_requires_area() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert_that(&a.intersects(&rect(5.0, 5.0, 10.0, 10.0))).is_true();
        // Touching edges are not overlap.
        assert_that(&a.intersects(&rect(10.0, 0.0, 10.0, 10.0))).is_false();
        assert_that(&a.intersects(&rect(0.0, 10.0, 10.0, 10.0))).is_false();
        assert_that(&a.intersects(&rect(11.0, 0.0, 10.0, 10.0))).is_false();
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert_that(&r.contains(Vec2::new(0.0, 0.0))).is_true();
        assert_that(&r.contains(Vec2::new(9.9, 9.9))).is_true();
        assert_that(&r.contains(Vec2::new(10.0, 5.0))).is_false();
        assert_that(&r.contains(Vec2::new(5.0, 10.0))).is_false();
    }

    #[test]
    fn translated_moves_origin_only() {
        let r = rect(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(10.0, -2.0));
        assert_that(&r).is_equal_to(rect(11.0, 0.0, 3.0, 4.0));
    }
}
