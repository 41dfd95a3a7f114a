// =============================================================================
// COLLISION.RS — Axis-aligned rectangles and grid distances
//
// Every spatial check in the game goes through here: body hitboxes,
// reach rectangles, item pickup, barriers, teleporter pads.
// =============================================================================

/// Axis-aligned rectangle in integer world pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from two opposite corners, in any order.
    /// Corners are normalised so width and height come out non-negative,
    /// the same way the reference geometry canonicalised min/max.
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (xa, xb) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (ya, yb) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self { x: xa, y: ya, w: xb - xa, h: yb - ya }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// True iff the two rectangles overlap with positive area.
///
/// Convention: strict overlap. Rectangles that merely touch along an
/// edge or at a corner do NOT collide. Applied uniformly everywhere.
#[inline]
pub fn collides(a: Rect, b: Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Manhattan distance between two grid cells.
///
/// Use for: the A* heuristic over 4-directional movement.
#[inline]
pub fn distance_manhattan(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

/// Chebyshev distance between two grid cells.
///
/// Use for: square-radius checks like enemy aggro range.
#[inline]
pub fn distance_chebyshev(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs().max((y1 - y2).abs())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── collides() ───────────────────────────────────────────────────────

    #[test]
    fn overlapping_rects_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(collides(a, b));
    }

    #[test]
    fn disjoint_rects_do_not_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(100, 100, 10, 10);
        assert!(!collides(a, b));
    }

    #[test]
    fn collision_is_symmetric() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 4, 4);
        assert_eq!(collides(a, b), collides(b, a));
        let c = Rect::new(50, 0, 3, 3);
        assert_eq!(collides(a, c), collides(c, a));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        // b starts exactly where a ends.
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!collides(a, b));
        let below = Rect::new(0, 10, 10, 10);
        assert!(!collides(a, below));
    }

    #[test]
    fn touching_corners_do_not_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 10, 10, 10);
        assert!(!collides(a, b));
    }

    #[test]
    fn one_pixel_overlap_collides() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 10, 10);
        assert!(collides(a, b));
    }

    #[test]
    fn contained_rect_collides() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 10, 10);
        assert!(collides(outer, inner));
        assert!(collides(inner, outer));
    }

    // ── Rect::from_corners ───────────────────────────────────────────────

    #[test]
    fn from_corners_already_ordered() {
        let r = Rect::from_corners(1, 2, 5, 9);
        assert_eq!(r, Rect::new(1, 2, 4, 7));
    }

    #[test]
    fn from_corners_swaps_inverted_x() {
        let r = Rect::from_corners(5, 2, 1, 9);
        assert_eq!(r, Rect::new(1, 2, 4, 7));
    }

    #[test]
    fn from_corners_swaps_inverted_y() {
        // This is the reach-rectangle case: the Up formula produces the
        // second y corner above the first.
        let r = Rect::from_corners(100, 200, 132, 152);
        assert_eq!(r, Rect::new(100, 152, 32, 48));
    }

    // ── Distances ────────────────────────────────────────────────────────

    #[test]
    fn manhattan_distance() {
        assert_eq!(distance_manhattan(0, 0, 3, 4), 7);
        assert_eq!(distance_manhattan(3, 4, 0, 0), 7);
        assert_eq!(distance_manhattan(-2, 0, 2, 0), 4);
    }

    #[test]
    fn chebyshev_distance() {
        assert_eq!(distance_chebyshev(0, 0, 3, 4), 4);
        assert_eq!(distance_chebyshev(0, 0, 5, 2), 5);
        assert_eq!(distance_chebyshev(1, 1, 1, 1), 0);
    }
}
