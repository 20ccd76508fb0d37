use super::rect::Rect;
use crate::config::{ENEMY_HEIGHT, ENEMY_WIDTH, ROW_POINTS};

/// Grid address of a formation member. Row 0 is the back (top) row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub column: usize,
}

impl Slot {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub slot: Slot,
    pub rect: Rect,
    /// Which of the two animation frames is showing
    pub frame: u8,
}

impl Enemy {
    pub fn new(slot: Slot, x: i32, y: i32) -> Self {
        Self {
            slot,
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            frame: 0,
        }
    }

    pub fn toggle_frame(&mut self) {
        self.frame ^= 1;
    }

    pub fn points(&self) -> u32 {
        row_points(self.slot.row)
    }
}

/// Rows past the scoring table are worth the same as the last listed row
pub fn row_points(row: usize) -> u32 {
    ROW_POINTS
        .get(row)
        .or_else(|| ROW_POINTS.last())
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_points_by_row() {
        let points: Vec<u32> = (0..5)
            .map(|row| Enemy::new(Slot::new(row, 0), 0, 0).points())
            .collect();
        assert_eq!(points, vec![30, 20, 20, 10, 10]);
    }

    #[test]
    fn test_enemy_frame_toggles() {
        let mut enemy = Enemy::new(Slot::new(0, 0), 157, 65);
        assert_eq!(enemy.frame, 0);
        enemy.toggle_frame();
        assert_eq!(enemy.frame, 1);
        enemy.toggle_frame();
        assert_eq!(enemy.frame, 0);
    }

    #[test]
    fn test_enemy_size() {
        let enemy = Enemy::new(Slot::new(2, 3), 307, 155);
        assert_eq!(enemy.rect, Rect::new(307, 155, 40, 35));
    }
}
