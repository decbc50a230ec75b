pub mod post_service;
pub mod relation_service;
pub mod user_service;
