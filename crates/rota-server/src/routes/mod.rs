pub mod roster;
pub mod schedule;
