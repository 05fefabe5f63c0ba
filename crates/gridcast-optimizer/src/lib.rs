pub mod engine;
pub mod error;
pub mod lineup;
pub mod model;
pub mod normalize;
pub mod preprocess;
pub mod prune;
pub mod request;
pub mod session;
pub mod solver;
pub mod warning;

pub use engine::{Optimizer, SolvedRoster};
pub use error::OptimizeError;
pub use request::SelectionRequest;
pub use warning::Warning;
