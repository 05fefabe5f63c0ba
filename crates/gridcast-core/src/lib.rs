pub mod blend;
pub mod candidate;
pub mod config;
pub mod grade;
pub mod period;
pub mod pool;
pub mod position;
pub mod roster;
