use rand::Rng;
use tracing::{debug, info};

use crate::collision::{self, Effect, EntityId, Scene};
use crate::config::{
    CLEARING_DELAY, ENEMY_FIRE_COOLDOWN, ENEMY_MOVE_DOWN, RESPAWN_DELAY,
};
use crate::entities::{
    Bullet, Explosion, Formation, Mystery, Obstacle, Ship, Step, build_obstacles,
};
use crate::input::{InputFrame, Intent};

/// Fire-and-forget notifications for the audio side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    PlayerShot,
    EnemyKilled,
    MysteryKilled,
    ShipDestroyed,
    FormationStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Spawning,
    Active,
    /// Formation wiped out; the "next round" banner is up
    Clearing { since: u64 },
    Lost,
}

/// What the session should do after a round update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Active,
    Clearing,
    NextRound,
    Lost,
}

/// One formation-clear cycle: the formation, the player's ship, bullets,
/// the mystery ship and the shields, plus the score and lives carried in.
#[derive(Debug, Clone)]
pub struct Round {
    number: u32,
    phase: RoundPhase,
    start_y: i32,
    score: u32,
    lives: u8,
    formation: Formation,
    ship: Option<Ship>,
    respawn_at: Option<u64>,
    player_bullets: Vec<Bullet>,
    enemy_bullets: Vec<Bullet>,
    mystery: Option<Mystery>,
    obstacles: Vec<Obstacle>,
    explosions: Vec<Explosion>,
    last_enemy_shot: u64,
    cues: Vec<Cue>,
}

impl Round {
    /// A round waiting to spawn; the formation, shields and mystery ship are
    /// built by its first update.
    pub fn new(number: u32, start_y: i32, score: u32, lives: u8, now: u64) -> Self {
        Self {
            number,
            phase: RoundPhase::Spawning,
            start_y,
            score,
            lives,
            formation: Formation::new(0, 0, start_y, now),
            ship: None,
            respawn_at: None,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            mystery: None,
            obstacles: Vec::new(),
            explosions: Vec::new(),
            last_enemy_shot: now,
            cues: Vec::new(),
        }
    }

    /// The round that follows a cleared one: the formation starts one step
    /// lower and score and lives carry over.
    pub fn next_round(&self, now: u64) -> Self {
        Self::new(
            self.number + 1,
            self.start_y + ENEMY_MOVE_DOWN,
            self.score,
            self.lives,
            now,
        )
    }

    pub fn update<R: Rng>(&mut self, now: u64, input: &InputFrame, rng: &mut R) -> RoundStatus {
        match self.phase {
            RoundPhase::Spawning => {
                self.spawn(now);
                self.update_active(now, input, rng)
            }
            RoundPhase::Active => self.update_active(now, input, rng),
            RoundPhase::Clearing { since } => {
                self.steer(input);
                self.expire_explosions(now);
                if now.saturating_sub(since) >= CLEARING_DELAY {
                    RoundStatus::NextRound
                } else {
                    RoundStatus::Clearing
                }
            }
            RoundPhase::Lost => RoundStatus::Lost,
        }
    }

    /// Fresh formation, shields and mystery ship; nothing left in flight
    fn spawn(&mut self, now: u64) {
        self.formation = Formation::standard(self.start_y, now);
        self.obstacles = build_obstacles();
        self.mystery = Some(Mystery::new(now));
        self.ship = Some(Ship::new());
        self.respawn_at = None;
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.explosions.clear();
        self.last_enemy_shot = now;
        self.phase = RoundPhase::Active;
        debug!(round = self.number, start_y = self.start_y, "round spawned");
    }

    fn update_active<R: Rng>(&mut self, now: u64, input: &InputFrame, rng: &mut R) -> RoundStatus {
        self.steer(input);
        if input.contains(Intent::Fire) {
            self.fire();
        }

        if self.formation.advance(now) != Step::Idle {
            self.cues.push(Cue::FormationStep);
        }

        for bullet in self.player_bullets.iter_mut().chain(self.enemy_bullets.iter_mut()) {
            bullet.update();
        }
        self.player_bullets.retain(|b| !b.is_out_of_play());
        self.enemy_bullets.retain(|b| !b.is_out_of_play());

        if let Some(mystery) = &mut self.mystery {
            mystery.update(now);
        }
        self.enemy_fire(now, rng);
        self.expire_explosions(now);

        let effects = collision::resolve(
            &Scene {
                ship: self.ship.as_ref(),
                lives: self.lives,
                player_bullets: &self.player_bullets,
                enemy_bullets: &self.enemy_bullets,
                formation: &self.formation,
                mystery: self.mystery.as_ref(),
                obstacles: &self.obstacles,
            },
            rng,
        );
        self.apply(effects, now);

        if self.ship.is_none() {
            if let Some(at) = self.respawn_at.filter(|&at| now > at) {
                debug!(at, "ship respawned");
                self.ship = Some(Ship::new());
                self.respawn_at = None;
            }
        }

        if self.phase == RoundPhase::Lost {
            info!(round = self.number, score = self.score, "round lost");
            return RoundStatus::Lost;
        }
        if self.formation.is_empty() {
            info!(round = self.number, score = self.score, "formation cleared");
            self.phase = RoundPhase::Clearing { since: now };
            self.player_bullets.clear();
            self.enemy_bullets.clear();
            return RoundStatus::Clearing;
        }
        RoundStatus::Active
    }

    fn steer(&mut self, input: &InputFrame) {
        if let Some(ship) = &mut self.ship {
            if input.left {
                ship.move_left();
            }
            if input.right {
                ship.move_right();
            }
        }
    }

    /// One volley at a time: the trigger does nothing until every player
    /// bullet has left play.
    fn fire(&mut self) {
        let Some(ship) = &self.ship else {
            return;
        };
        if !self.player_bullets.is_empty() {
            return;
        }
        self.player_bullets.extend(ship.volley(self.score));
        self.cues.push(Cue::PlayerShot);
    }

    fn enemy_fire<R: Rng>(&mut self, now: u64, rng: &mut R) {
        if now.saturating_sub(self.last_enemy_shot) <= ENEMY_FIRE_COOLDOWN {
            return;
        }
        if let Some(shooter) = self.formation.pick_shooter(rng) {
            let rect = shooter.rect;
            self.enemy_bullets.push(Bullet::enemy(rect.x + 14, rect.y + 20));
            self.last_enemy_shot = now;
        }
    }

    fn expire_explosions(&mut self, now: u64) {
        self.explosions.retain(|e| !e.is_expired(now));
    }

    fn apply(&mut self, effects: Vec<Effect>, now: u64) {
        let mut dead_player_bullets = vec![false; self.player_bullets.len()];
        let mut dead_enemy_bullets = vec![false; self.enemy_bullets.len()];
        let mut dead_obstacles = vec![false; self.obstacles.len()];

        for effect in effects {
            match effect {
                Effect::Destroy(id) => match id {
                    EntityId::Ship => {
                        self.ship = None;
                        self.cues.push(Cue::ShipDestroyed);
                    }
                    EntityId::Mystery => self.mystery = None,
                    EntityId::PlayerBullet(i) => dead_player_bullets[i] = true,
                    EntityId::EnemyBullet(i) => dead_enemy_bullets[i] = true,
                    EntityId::Obstacle(i) => dead_obstacles[i] = true,
                    EntityId::Enemy(slot) => {
                        if self.formation.remove(slot).is_some() {
                            self.cues.push(Cue::EnemyKilled);
                        }
                    }
                },
                Effect::Score(points) => self.score += points,
                Effect::SpawnExplosion(kind, rect) => {
                    self.explosions.push(Explosion::new(kind, rect, now));
                }
                Effect::LoseLife => {
                    self.lives = self.lives.saturating_sub(1);
                    debug!(lives = self.lives, "life lost");
                }
                Effect::ScheduleRespawn => self.respawn_at = Some(now + RESPAWN_DELAY),
                Effect::RespawnMystery => {
                    self.mystery = Some(Mystery::new(now));
                    self.cues.push(Cue::MysteryKilled);
                }
                Effect::RoundLost => self.phase = RoundPhase::Lost,
            }
        }

        retain_alive(&mut self.player_bullets, &dead_player_bullets);
        retain_alive(&mut self.enemy_bullets, &dead_enemy_bullets);
        retain_alive(&mut self.obstacles, &dead_obstacles);
    }

    /// Cues raised since the last drain, oldest first
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn start_y(&self) -> i32 {
        self.start_y
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn player_bullets(&self) -> &[Bullet] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    pub fn mystery(&self) -> Option<&Mystery> {
        self.mystery.as_ref()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }
}

fn retain_alive<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !dead[index];
        index += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENEMY_DEFAULT_POSITION, MAX_PLAYER_BULLETS, STARTING_LIVES};
    use crate::entities::Slot;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fire() -> InputFrame {
        InputFrame {
            pressed: vec![Intent::Fire],
            ..InputFrame::default()
        }
    }

    fn started(now: u64) -> Round {
        let mut round = Round::new(1, ENEMY_DEFAULT_POSITION, 0, STARTING_LIVES, now);
        round.update(now, &InputFrame::idle(), &mut StdRng::seed_from_u64(0));
        round
    }

    /// Plants a player bullet inside the given enemy
    fn plant_shot(round: &mut Round, slot: Slot) {
        let rect = round.formation.get(slot).unwrap().rect;
        // update() moves it 15 up before collisions run
        round
            .player_bullets
            .push(Bullet::player(rect.x + 10, rect.y + 20));
    }

    #[test]
    fn test_spawning_goes_active() {
        let mut round = Round::new(1, 65, 0, 3, 0);
        assert_eq!(round.phase(), RoundPhase::Spawning);
        let status = round.update(10, &InputFrame::idle(), &mut StdRng::seed_from_u64(0));
        assert_eq!(status, RoundStatus::Active);
        assert_eq!(round.phase(), RoundPhase::Active);
        assert_eq!(round.formation().len(), 50);
        assert_eq!(round.obstacles().len(), 144);
    }

    #[test]
    fn test_world_is_built_on_spawn() {
        let mut round = Round::new(1, 65, 0, 3, 0);
        assert!(round.formation().is_empty());
        assert!(round.obstacles().is_empty());
        assert!(round.mystery().is_none());
        assert!(round.ship().is_none());

        round.update(10, &InputFrame::idle(), &mut StdRng::seed_from_u64(0));
        assert_eq!(round.formation().len(), 50);
        assert!(round.mystery().is_some());
        assert_eq!(round.ship(), Some(&Ship::new()));
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut round = started(0);
        round.update(16, &fire(), &mut rng);
        assert_eq!(round.player_bullets().len(), 1);
        round.update(32, &fire(), &mut rng);
        assert_eq!(round.player_bullets().len(), 1);
        assert_eq!(round.drain_cues(), vec![Cue::PlayerShot]);
    }

    #[test]
    fn test_split_volley_past_threshold() {
        let mut round = Round::new(1, 65, 1200, 3, 0);
        round.update(0, &fire(), &mut StdRng::seed_from_u64(0));
        assert_eq!(round.player_bullets().len(), MAX_PLAYER_BULLETS);
    }

    #[test]
    fn test_enemy_fires_after_cooldown() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut round = started(0);
        round.update(ENEMY_FIRE_COOLDOWN, &InputFrame::idle(), &mut rng);
        assert!(round.enemy_bullets().is_empty());
        round.update(ENEMY_FIRE_COOLDOWN + 1, &InputFrame::idle(), &mut rng);
        assert_eq!(round.enemy_bullets().len(), 1);
        // Comes from the bottom row
        let bullet = round.enemy_bullets()[0].rect;
        assert_eq!(bullet.y, 65 + 4 * 45 + 20);
    }

    #[test]
    fn test_new_enemy_bullet_meets_collisions_same_frame() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut round = started(1000);
        // Only column 0 can shoot; its bottom member fires from (171, 265)
        for row in 0..5 {
            for column in 1..10 {
                round.formation.remove(Slot::new(row, column));
            }
        }
        round.last_enemy_shot = 0;
        // Lands on the new enemy bullet after moving 15 up
        round.player_bullets.push(Bullet::player(171, 275));

        round.update(1016, &InputFrame::idle(), &mut rng);
        assert!(round.enemy_bullets().is_empty());
        assert!(round.player_bullets().is_empty());
        assert_eq!(round.formation().len(), 5);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn test_clearing_removes_bullets_in_flight() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut round = started(0);
        let last = Slot::new(4, 9);
        let slots: Vec<Slot> = round.formation().iter().map(|e| e.slot).collect();
        for slot in slots.into_iter().filter(|&s| s != last) {
            round.formation.remove(slot);
        }
        round.enemy_bullets.push(Bullet::enemy(600, 300));
        plant_shot(&mut round, last);

        let status = round.update(16, &InputFrame::idle(), &mut rng);
        assert_eq!(status, RoundStatus::Clearing);
        assert!(round.player_bullets().is_empty());
        assert!(round.enemy_bullets().is_empty());

        round.update(32, &InputFrame::idle(), &mut rng);
        assert!(round.enemy_bullets().is_empty());
    }

    #[test]
    fn test_enemy_kill_scores_and_explodes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut round = started(0);
        plant_shot(&mut round, Slot::new(1, 4));
        round.update(16, &InputFrame::idle(), &mut rng);
        assert_eq!(round.score(), 20);
        assert_eq!(round.formation().len(), 49);
        assert_eq!(round.explosions().len(), 1);
        assert!(round.player_bullets().is_empty());
        assert!(round.drain_cues().contains(&Cue::EnemyKilled));
    }

    #[test]
    fn test_full_clear_scores_900_and_clears() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = started(0);
        let mut now = 0;
        for row in (0..5).rev() {
            for column in 0..10 {
                now += 1;
                plant_shot(&mut round, Slot::new(row, column));
                let status = round.update(now, &InputFrame::idle(), &mut rng);
                if round.formation().is_empty() {
                    assert_eq!(status, RoundStatus::Clearing);
                }
            }
        }
        assert_eq!(round.score(), 900);
        assert_eq!(round.phase(), RoundPhase::Clearing { since: now });

        assert_eq!(
            round.update(now + CLEARING_DELAY - 1, &InputFrame::idle(), &mut rng),
            RoundStatus::Clearing
        );
        assert_eq!(
            round.update(now + CLEARING_DELAY, &InputFrame::idle(), &mut rng),
            RoundStatus::NextRound
        );
    }

    #[test]
    fn test_next_round_moves_formation_down() {
        let round = Round::new(2, 65, 400, 2, 0);
        let next = round.next_round(5000);
        assert_eq!(next.number(), 3);
        assert_eq!(next.start_y(), 100);
        assert_eq!(next.score(), 400);
        assert_eq!(next.lives(), 2);
        assert_eq!(next.phase(), RoundPhase::Spawning);
    }

    #[test]
    fn test_three_hits_lose_round() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut round = started(0);
        let mut now = 0;
        for hit in 1..=3u8 {
            // Wait out any respawn
            now += RESPAWN_DELAY + 1;
            round.update(now, &InputFrame::idle(), &mut rng);
            round.enemy_bullets.clear();
            let ship = round.ship().unwrap().rect;
            round
                .enemy_bullets
                .push(Bullet::enemy(ship.x + 10, ship.y - 5));
            now += 1;
            let status = round.update(now, &InputFrame::idle(), &mut rng);
            assert_eq!(round.lives(), 3 - hit);
            if hit < 3 {
                assert_eq!(status, RoundStatus::Active);
                assert!(round.ship().is_none());
            } else {
                assert_eq!(status, RoundStatus::Lost);
                assert_eq!(round.phase(), RoundPhase::Lost);
            }
        }
        // Frozen once lost
        assert_eq!(
            round.update(now + 1, &InputFrame::idle(), &mut rng),
            RoundStatus::Lost
        );
        assert_eq!(round.lives(), 0);
    }

    #[test]
    fn test_ship_respawns_after_delay() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut round = started(0);
        let ship = round.ship().unwrap().rect;
        round
            .enemy_bullets
            .push(Bullet::enemy(ship.x + 10, ship.y - 5));
        round.update(100, &InputFrame::idle(), &mut rng);
        assert!(round.ship().is_none());
        round.update(100 + RESPAWN_DELAY, &InputFrame::idle(), &mut rng);
        assert!(round.ship().is_none());
        round.update(101 + RESPAWN_DELAY, &InputFrame::idle(), &mut rng);
        assert_eq!(round.ship(), Some(&Ship::new()));
    }

    #[test]
    fn test_cannot_fire_while_respawning() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut round = started(0);
        round.ship = None;
        round.respawn_at = Some(10_000);
        round.update(16, &fire(), &mut rng);
        assert!(round.player_bullets().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_player_bullets_never_exceed_cap(
                frames in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..200),
                score in 0u32..2000,
                seed in any::<u64>()
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut round = Round::new(1, 65, score, 3, 0);
                for (i, (left, right, shoot)) in frames.into_iter().enumerate() {
                    let input = InputFrame {
                        left,
                        right,
                        pressed: if shoot { vec![Intent::Fire] } else { Vec::new() },
                    };
                    round.update(i as u64 * 16, &input, &mut rng);
                    prop_assert!(round.player_bullets().len() <= MAX_PLAYER_BULLETS);
                }
            }
        }
    }
}
