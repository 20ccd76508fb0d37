/// Axis-aligned box in logical screen units. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict overlap; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10, 20, 5, 15);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 35);
    }

    #[test]
    fn test_rect_intersects_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_rect_translate() {
        let mut rect = Rect::new(-80, 45, 75, 35);
        rect.translate(2, -5);
        assert_eq!(rect, Rect::new(-78, 40, 75, 35));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_intersects_is_symmetric(
                ax in -100i32..900, ay in -100i32..700, aw in 1i32..80, ah in 1i32..80,
                bx in -100i32..900, by in -100i32..700, bw in 1i32..80, bh in 1i32..80,
            ) {
                let a = Rect::new(ax, ay, aw, ah);
                let b = Rect::new(bx, by, bw, bh);
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            }
        }
    }
}
