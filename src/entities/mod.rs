mod bullet;
mod enemy;
mod explosion;
mod formation;
mod mystery;
mod obstacle;
mod rect;
mod ship;

// Re-export all public types
pub use bullet::{Bullet, Side};
pub use enemy::{Enemy, Slot, row_points};
pub use explosion::{Explosion, ExplosionFrame, ExplosionKind};
pub use formation::{Formation, Step};
pub use mystery::Mystery;
pub use obstacle::{Obstacle, build_obstacles};
pub use rect::Rect;
pub use ship::Ship;
