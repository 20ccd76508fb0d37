use super::rect::Rect;
use crate::config::{MYSTERY_HEIGHT, MYSTERY_PARK_X, MYSTERY_SPEED, MYSTERY_WAIT, MYSTERY_WIDTH, MYSTERY_Y};

/// Far edges of the mystery ship's track
const TRACK_RIGHT: i32 = 840;
const TRACK_LEFT: i32 = -100;
const TURN_RIGHT_EDGE: i32 = 830;
const TURN_LEFT_EDGE: i32 = -90;

/// The bonus target that periodically crosses the top of the screen
#[derive(Debug, Clone, PartialEq)]
pub struct Mystery {
    pub rect: Rect,
    pub direction: i32,
    /// When the current wait started
    timer: u64,
}

impl Mystery {
    /// Parks a new mystery ship off the left edge; it sets off after the wait
    pub fn new(now: u64) -> Self {
        Self {
            rect: Rect::new(MYSTERY_PARK_X, MYSTERY_Y, MYSTERY_WIDTH, MYSTERY_HEIGHT),
            direction: 1,
            timer: now,
        }
    }

    pub fn update(&mut self, now: u64) {
        let moving = now.saturating_sub(self.timer) > MYSTERY_WAIT;
        if moving {
            if self.direction == 1 && self.rect.x < TRACK_RIGHT {
                self.rect.x += MYSTERY_SPEED;
            } else if self.direction == -1 && self.rect.x > TRACK_LEFT {
                self.rect.x -= MYSTERY_SPEED;
            }
        }

        let mut turned = false;
        if self.rect.x > TURN_RIGHT_EDGE {
            self.direction = -1;
            turned = true;
        }
        if self.rect.x < TURN_LEFT_EDGE {
            self.direction = 1;
            turned = true;
        }
        if moving && turned {
            self.timer = now;
        }
    }

    /// True while any part of the ship is over the playfield
    pub fn is_on_screen(&self, screen_width: i32) -> bool {
        self.rect.right() > 0 && self.rect.x < screen_width
    }
}
