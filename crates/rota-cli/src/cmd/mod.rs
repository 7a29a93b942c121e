pub mod rotate;
pub mod serve;
pub mod show;
