use std::collections::HashSet;

use rand::Rng;

use crate::config::{DEEP_BREACH_LINE, MYSTERY_POINTS, OBSTACLE_TOP_Y, SHIP_BREACH_LINE};
use crate::entities::{
    Bullet, ExplosionKind, Formation, Mystery, Obstacle, Rect, Ship, Slot,
};

/// Handle to anything that can be hit this frame. Bullet and obstacle
/// handles are indices into the slices of the [`Scene`] they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Ship,
    Mystery,
    PlayerBullet(usize),
    EnemyBullet(usize),
    Enemy(Slot),
    Obstacle(usize),
}

/// Outcome of a hit, applied by the round after resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Destroy(EntityId),
    Score(u32),
    SpawnExplosion(ExplosionKind, Rect),
    LoseLife,
    /// Bring a new ship in after the respawn delay
    ScheduleRespawn,
    /// Park a fresh mystery ship off screen
    RespawnMystery,
    RoundLost,
}

/// Everything that takes part in collisions for one frame
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub ship: Option<&'a Ship>,
    pub lives: u8,
    pub player_bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub formation: &'a Formation,
    pub mystery: Option<&'a Mystery>,
    pub obstacles: &'a [Obstacle],
}

/// Runs every collision pass in order and returns the resulting effects.
///
/// Passes see the scene as thinned by earlier passes: an entity destroyed
/// once is never a participant again in the same frame.
pub fn resolve<R: Rng>(scene: &Scene<'_>, rng: &mut R) -> Vec<Effect> {
    let mut resolver = Resolver::new(scene);
    resolver.bullets_vs_bullets();
    resolver.formation_vs_player_bullets();
    resolver.mystery_vs_player_bullets(rng);
    resolver.ship_vs_enemy_bullets();
    resolver.formation_breach();
    resolver.obstacles();
    resolver.effects
}

struct Resolver<'s, 'a> {
    scene: &'s Scene<'a>,
    destroyed: HashSet<EntityId>,
    effects: Vec<Effect>,
    round_lost: bool,
}

impl<'s, 'a> Resolver<'s, 'a> {
    fn new(scene: &'s Scene<'a>) -> Self {
        Self {
            scene,
            destroyed: HashSet::new(),
            effects: Vec::new(),
            round_lost: false,
        }
    }

    fn alive(&self, id: EntityId) -> bool {
        !self.destroyed.contains(&id)
    }

    fn destroy(&mut self, id: EntityId) {
        if self.destroyed.insert(id) {
            self.effects.push(Effect::Destroy(id));
        }
    }

    fn lose_round(&mut self) {
        if !self.round_lost {
            self.round_lost = true;
            self.effects.push(Effect::RoundLost);
        }
    }

    fn live_player_bullets(&self) -> Vec<(EntityId, Rect)> {
        self.scene
            .player_bullets
            .iter()
            .enumerate()
            .map(|(i, b)| (EntityId::PlayerBullet(i), b.rect))
            .filter(|(id, _)| self.alive(*id))
            .collect()
    }

    fn live_enemy_bullets(&self) -> Vec<(EntityId, Rect)> {
        self.scene
            .enemy_bullets
            .iter()
            .enumerate()
            .map(|(i, b)| (EntityId::EnemyBullet(i), b.rect))
            .filter(|(id, _)| self.alive(*id))
            .collect()
    }

    fn live_enemies(&self) -> Vec<(EntityId, Slot, Rect)> {
        self.scene
            .formation
            .iter()
            .map(|e| (EntityId::Enemy(e.slot), e.slot, e.rect))
            .filter(|(id, _, _)| self.alive(*id))
            .collect()
    }

    fn live_ship(&self) -> Option<Rect> {
        self.scene
            .ship
            .filter(|_| self.alive(EntityId::Ship))
            .map(|ship| ship.rect)
    }

    /// Ids from `candidates` that overlap `rect` and are still alive
    fn overlapping(&self, rect: &Rect, candidates: &[(EntityId, Rect)]) -> Vec<EntityId> {
        candidates
            .iter()
            .filter(|(id, other)| self.alive(*id) && rect.intersects(other))
            .map(|(id, _)| *id)
            .collect()
    }

    fn bullets_vs_bullets(&mut self) {
        let enemy_bullets = self.live_enemy_bullets();
        for (bullet, rect) in self.live_player_bullets() {
            let hits = self.overlapping(&rect, &enemy_bullets);
            if !hits.is_empty() {
                self.destroy(bullet);
                hits.into_iter().for_each(|id| self.destroy(id));
            }
        }
    }

    fn formation_vs_player_bullets(&mut self) {
        let bullets = self.live_player_bullets();
        for (enemy, slot, rect) in self.live_enemies() {
            let hits = self.overlapping(&rect, &bullets);
            if hits.is_empty() {
                continue;
            }
            self.destroy(enemy);
            hits.into_iter().for_each(|id| self.destroy(id));
            self.effects
                .push(Effect::Score(crate::entities::row_points(slot.row)));
            self.effects.push(Effect::SpawnExplosion(
                ExplosionKind::Enemy { row: slot.row },
                rect,
            ));
        }
    }

    fn mystery_vs_player_bullets<R: Rng>(&mut self, rng: &mut R) {
        let Some(mystery) = self.scene.mystery else {
            return;
        };
        if !self.alive(EntityId::Mystery) {
            return;
        }
        let hits = self.overlapping(&mystery.rect, &self.live_player_bullets());
        if hits.is_empty() {
            return;
        }

        self.destroy(EntityId::Mystery);
        hits.into_iter().for_each(|id| self.destroy(id));
        let points = MYSTERY_POINTS[rng.random_range(0..MYSTERY_POINTS.len())];
        self.effects.push(Effect::Score(points));
        self.effects.push(Effect::SpawnExplosion(
            ExplosionKind::Mystery { points },
            mystery.rect,
        ));
        self.effects.push(Effect::RespawnMystery);
    }

    fn ship_vs_enemy_bullets(&mut self) {
        let Some(ship) = self.live_ship() else {
            return;
        };
        let hits = self.overlapping(&ship, &self.live_enemy_bullets());
        if hits.is_empty() {
            return;
        }

        hits.into_iter().for_each(|id| self.destroy(id));
        self.destroy(EntityId::Ship);
        self.effects.push(Effect::LoseLife);
        if self.scene.lives <= 1 {
            self.lose_round();
        } else {
            self.effects
                .push(Effect::SpawnExplosion(ExplosionKind::Ship, ship));
            self.effects.push(Effect::ScheduleRespawn);
        }
    }

    fn formation_breach(&mut self) {
        let bottom = self.scene.formation.bottom();
        if bottom < SHIP_BREACH_LINE {
            return;
        }

        if let Some(ship) = self.live_ship() {
            let rammed: Vec<EntityId> = self
                .live_enemies()
                .into_iter()
                .filter(|(_, _, rect)| rect.intersects(&ship))
                .map(|(id, _, _)| id)
                .collect();
            if !rammed.is_empty() {
                rammed.into_iter().for_each(|id| self.destroy(id));
                self.destroy(EntityId::Ship);
            }
        }

        if self.live_ship().is_none() || bottom >= DEEP_BREACH_LINE {
            self.lose_round();
        }
    }

    fn obstacles(&mut self) {
        let cells: Vec<(EntityId, Rect)> = self
            .scene
            .obstacles
            .iter()
            .enumerate()
            .map(|(i, o)| (EntityId::Obstacle(i), o.rect))
            .collect();

        let mut bullets = self.live_player_bullets();
        bullets.extend(self.live_enemy_bullets());
        for (bullet, rect) in bullets {
            let hits = self.overlapping(&rect, &cells);
            if !hits.is_empty() {
                self.destroy(bullet);
                hits.into_iter().for_each(|id| self.destroy(id));
            }
        }

        // Once the swarm reaches shield altitude it grinds through them
        if self.scene.formation.bottom() >= OBSTACLE_TOP_Y {
            for (_, _, rect) in self.live_enemies() {
                self.overlapping(&rect, &cells)
                    .into_iter()
                    .for_each(|id| self.destroy(id));
            }
        }
    }
}
