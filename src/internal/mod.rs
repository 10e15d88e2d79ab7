pub mod comments;
pub mod models;
pub mod repository;
pub mod store;
