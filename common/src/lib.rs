pub mod config;
pub mod errors;
pub mod repository;
pub mod util;

pub use repository::*;

pub type UserId = String;
pub type PostId = String;
