//! Data-access core for the movie shelf API.
//! Repositories here are the single source of truth for uniqueness,
//! referential integrity and search semantics.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::movie::{Movie, MovieId, MovieSummary, UserMovie};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::movie_repo::{MovieRepository, SqliteMovieRepository, DEFAULT_SEARCH_LIMIT};
pub use repo::user_movie_repo::{SqliteUserMovieRepository, UserMovieRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::library_service::{LibraryService, SearchParams};
pub use store::Store;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
