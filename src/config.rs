use std::{env, path::PathBuf, time::Duration};

// Runtime settings, read from the environment with sensible defaults.

pub fn scores_path() -> PathBuf {
    env::var("INVADERS_SCORES_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("scores.json"))
}

pub fn log_path() -> PathBuf {
    env::var("INVADERS_LOG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("invaders.log"))
}

pub fn assets_dir() -> PathBuf {
    env::var("INVADERS_ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("assets"))
}

pub fn frame_rate() -> u32 {
    parse_frame_rate(env::var("INVADERS_FPS").ok().as_deref())
}

fn parse_frame_rate(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(60)
        .clamp(30, 120)
}

pub fn frame_interval() -> Duration {
    Duration::from_micros(1_000_000 / u64::from(frame_rate()))
}

// Gameplay tuning. Everything lives in an 800x600 logical space and
// all durations are milliseconds on the simulation clock.

pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 600;

/// Formation grid
pub const ENEMY_COLUMNS: usize = 10;
pub const ENEMY_ROWS: usize = 5;
pub const ENEMY_WIDTH: i32 = 40;
pub const ENEMY_HEIGHT: i32 = 35;
pub const ENEMY_COLUMN_PITCH: i32 = 50;
pub const ENEMY_ROW_PITCH: i32 = 45;
pub const ENEMY_LEFT_X: i32 = 157;
/// Start y of the top row for a brand-new game
pub const ENEMY_DEFAULT_POSITION: i32 = 65;
/// Used both for the per-step drop and the per-round start offset
pub const ENEMY_MOVE_DOWN: i32 = 35;
pub const FORMATION_VELOCITY: i32 = 10;
pub const FORMATION_BASE_MOVES: u32 = 30;
pub const FORMATION_FIRST_RUN_OFFSET: u32 = 15;
pub const FORMATION_BIAS_STEP: u32 = 5;
pub const STEP_INTERVAL_FULL: u64 = 600;
pub const STEP_INTERVAL_FEW: u64 = 400;
pub const STEP_INTERVAL_LAST: u64 = 200;
pub const FEW_ENEMIES: usize = 10;

/// Points per formation row, top (row 0) to bottom
pub const ROW_POINTS: [u32; ENEMY_ROWS] = [30, 20, 20, 10, 10];
pub const MYSTERY_POINTS: [u32; 4] = [50, 100, 150, 300];

/// Player ship
pub const SHIP_WIDTH: i32 = 50;
pub const SHIP_HEIGHT: i32 = 48;
pub const SHIP_START_X: i32 = 375;
pub const SHIP_START_Y: i32 = 540;
pub const SHIP_SPEED: i32 = 5;
pub const SHIP_MIN_X: i32 = 10;
pub const SHIP_MAX_X: i32 = 740;
pub const STARTING_LIVES: u8 = 3;

/// Bullets
pub const BULLET_WIDTH: i32 = 5;
pub const BULLET_HEIGHT: i32 = 15;
pub const PLAYER_BULLET_SPEED: i32 = 15;
pub const ENEMY_BULLET_SPEED: i32 = 5;
pub const BULLET_TOP_LIMIT: i32 = 15;
pub const BULLET_BOTTOM_LIMIT: i32 = 600;
pub const MAX_PLAYER_BULLETS: usize = 2;
pub const SPLIT_FIRE_SCORE: u32 = 1000;
pub const ENEMY_FIRE_COOLDOWN: u64 = 700;

/// Mystery ship
pub const MYSTERY_WIDTH: i32 = 75;
pub const MYSTERY_HEIGHT: i32 = 35;
pub const MYSTERY_PARK_X: i32 = -80;
pub const MYSTERY_Y: i32 = 45;
pub const MYSTERY_SPEED: i32 = 2;
pub const MYSTERY_WAIT: u64 = 25_000;

/// Obstacles
pub const OBSTACLE_CLUSTERS: usize = 4;
pub const OBSTACLE_ROWS: usize = 4;
pub const OBSTACLE_COLUMNS: usize = 9;
pub const OBSTACLE_CELL: i32 = 10;
pub const OBSTACLE_LEFT_X: i32 = 50;
pub const OBSTACLE_CLUSTER_PITCH: i32 = 200;
pub const OBSTACLE_TOP_Y: i32 = 450;

/// Formation breach lines
pub const SHIP_BREACH_LINE: i32 = 540;
pub const DEEP_BREACH_LINE: i32 = 600;

/// Timers
pub const RESPAWN_DELAY: u64 = 900;
pub const CLEARING_DELAY: u64 = 3000;
pub const GAME_OVER_DURATION: u64 = 3000;
pub const GAME_OVER_BLINK: u64 = 750;

/// Screens
pub const NAME_MAX_LEN: usize = 12;
pub const LEADERBOARD_ROWS: usize = 20;
