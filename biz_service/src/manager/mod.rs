pub mod auth_manager;
