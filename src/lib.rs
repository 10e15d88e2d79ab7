pub mod api;
pub mod config;
pub mod internal;
pub mod utils;

pub use api::{ApiClient, ResponseState, UrlBuilder};
pub use internal::comments::CommentProcessor;
pub use internal::repository::Repository;
pub use internal::store::PrefStore;
