pub mod post_entity;
pub mod user_entity;
