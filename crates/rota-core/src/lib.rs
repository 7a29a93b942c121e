pub mod config;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;
pub mod week;

pub use engine::{Rotation, Rotator};
pub use error::{Result, RotaError};
pub use store::Store;
pub use week::WeekClock;
