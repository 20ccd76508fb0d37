use super::bullet::Bullet;
use super::rect::Rect;
use crate::config::{
    SHIP_HEIGHT, SHIP_MAX_X, SHIP_MIN_X, SHIP_SPEED, SHIP_START_X, SHIP_START_Y, SHIP_WIDTH,
    SPLIT_FIRE_SCORE,
};

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub rect: Rect,
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

impl Ship {
    /// A fresh ship at the spawn point
    pub fn new() -> Self {
        Self::at(SHIP_START_X, SHIP_START_Y)
    }

    pub fn at(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, SHIP_WIDTH, SHIP_HEIGHT),
        }
    }

    pub fn move_left(&mut self) {
        if self.rect.x > SHIP_MIN_X {
            self.rect.x = (self.rect.x - SHIP_SPEED).max(SHIP_MIN_X);
        }
    }

    pub fn move_right(&mut self) {
        if self.rect.x < SHIP_MAX_X {
            self.rect.x = (self.rect.x + SHIP_SPEED).min(SHIP_MAX_X);
        }
    }

    /// Bullets for one trigger pull. Past the score threshold the ship
    /// fires a two-bullet volley from its wing tips.
    pub fn volley(&self, score: u32) -> Vec<Bullet> {
        let Rect { x, y, .. } = self.rect;
        if score < SPLIT_FIRE_SCORE {
            vec![Bullet::player(x + 23, y + 5)]
        } else {
            vec![Bullet::player(x + 8, y + 5), Bullet::player(x + 38, y + 5)]
        }
    }
}
