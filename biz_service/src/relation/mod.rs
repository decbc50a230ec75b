pub mod engine;
pub mod model;

pub use engine::{apply_intent, derive_state};
pub use model::*;
