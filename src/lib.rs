// Library exports for testing
pub use collision::{Effect, EntityId, Scene, resolve};
pub use entities::{
    Bullet, Enemy, Explosion, ExplosionFrame, ExplosionKind, Formation, Mystery, Obstacle, Rect,
    Ship, Side, Slot, Step,
};
pub use input::{InputFrame, Intent};
pub use round::{Cue, Round, RoundPhase, RoundStatus};
pub use scores::{JsonScoreStore, MemoryScoreStore, RankedScore, Scope, ScoreStore, StoreError};
pub use session::{Flow, Mode, Session};

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod round;
pub mod scores;
pub mod screens;
pub mod session;
