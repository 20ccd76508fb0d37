use super::rect::Rect;
use crate::config::{
    BULLET_BOTTOM_LIMIT, BULLET_HEIGHT, BULLET_TOP_LIMIT, BULLET_WIDTH, ENEMY_BULLET_SPEED,
    PLAYER_BULLET_SPEED,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    pub side: Side,
    pub speed: i32,
}

impl Bullet {
    pub fn player(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
            side: Side::Player,
            speed: PLAYER_BULLET_SPEED,
        }
    }

    pub fn enemy(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
            side: Side::Enemy,
            speed: ENEMY_BULLET_SPEED,
        }
    }

    /// -1 travels up the screen, +1 travels down
    pub fn direction(&self) -> i32 {
        match self.side {
            Side::Player => -1,
            Side::Enemy => 1,
        }
    }

    pub fn update(&mut self) {
        self.rect.y += self.speed * self.direction();
    }

    pub fn is_out_of_play(&self) -> bool {
        self.rect.y < BULLET_TOP_LIMIT || self.rect.y > BULLET_BOTTOM_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_bullet_moves_up() {
        let mut bullet = Bullet::player(100, 500);
        bullet.update();
        assert_eq!(bullet.rect.y, 485);
        assert_eq!(bullet.direction(), -1);
    }

    #[test]
    fn test_enemy_bullet_moves_down() {
        let mut bullet = Bullet::enemy(100, 300);
        bullet.update();
        assert_eq!(bullet.rect.y, 305);
    }

    #[test]
    fn test_bullet_leaves_play() {
        let mut bullet = Bullet::player(100, 20);
        assert!(!bullet.is_out_of_play());
        bullet.update();
        assert!(bullet.is_out_of_play());

        let bullet = Bullet::enemy(100, 601);
        assert!(bullet.is_out_of_play());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bullets_eventually_leave_play(
                x in 0i32..800,
                y in 15i32..=600,
                side in prop::sample::select(vec![Side::Player, Side::Enemy])
            ) {
                let mut bullet = match side {
                    Side::Player => Bullet::player(x, y),
                    Side::Enemy => Bullet::enemy(x, y),
                };
                let mut frames = 0;
                while !bullet.is_out_of_play() {
                    bullet.update();
                    frames += 1;
                    prop_assert!(frames <= 200);
                }
            }
        }
    }
}
