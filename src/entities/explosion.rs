use super::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionKind {
    Enemy { row: usize },
    /// Shows the points the mystery ship was worth
    Mystery { points: u32 },
    Ship,
}

/// What an explosion looks like at a given moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionFrame {
    Small,
    Large,
    Label,
    Wreck,
}

/// A short-lived visual effect; it never takes part in collisions
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub kind: ExplosionKind,
    pub rect: Rect,
    pub born: u64,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, rect: Rect, now: u64) -> Self {
        Self {
            kind,
            rect,
            born: now,
        }
    }

    pub fn lifetime(&self) -> u64 {
        match self.kind {
            ExplosionKind::Enemy { .. } => 400,
            ExplosionKind::Mystery { .. } => 600,
            ExplosionKind::Ship => 900,
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.born) > self.lifetime()
    }

    /// The frame to draw, or `None` during the invisible part of the effect
    pub fn frame(&self, now: u64) -> Option<ExplosionFrame> {
        let passed = now.saturating_sub(self.born);
        match self.kind {
            ExplosionKind::Enemy { .. } => match passed {
                0..=100 => Some(ExplosionFrame::Small),
                101..=200 => Some(ExplosionFrame::Large),
                _ => None,
            },
            ExplosionKind::Mystery { .. } => match passed {
                0..=200 | 401..=600 => Some(ExplosionFrame::Label),
                _ => None,
            },
            ExplosionKind::Ship => match passed {
                301..=600 => Some(ExplosionFrame::Wreck),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(kind: ExplosionKind) -> Explosion {
        Explosion::new(kind, Rect::new(0, 0, 40, 35), 1000)
    }

    #[test]
    fn test_enemy_explosion_two_phases() {
        let explosion = at(ExplosionKind::Enemy { row: 0 });
        assert_eq!(explosion.frame(1050), Some(ExplosionFrame::Small));
        assert_eq!(explosion.frame(1150), Some(ExplosionFrame::Large));
        assert_eq!(explosion.frame(1300), None);
        assert!(!explosion.is_expired(1400));
        assert!(explosion.is_expired(1401));
    }

    #[test]
    fn test_mystery_label_blinks() {
        let explosion = at(ExplosionKind::Mystery { points: 150 });
        assert_eq!(explosion.frame(1100), Some(ExplosionFrame::Label));
        assert_eq!(explosion.frame(1300), None);
        assert_eq!(explosion.frame(1500), Some(ExplosionFrame::Label));
        assert!(explosion.is_expired(1601));
    }

    #[test]
    fn test_ship_wreck_visible_window() {
        let explosion = at(ExplosionKind::Ship);
        assert_eq!(explosion.frame(1200), None);
        assert_eq!(explosion.frame(1400), Some(ExplosionFrame::Wreck));
        assert_eq!(explosion.frame(1700), None);
        assert!(!explosion.is_expired(1900));
        assert!(explosion.is_expired(1901));
    }
}
