//! ReadMore: book search, work details and content-based recommendations backed
//! by the Open Library catalog.
//!
//! - **models**: books, taste profiles, request and response bodies
//! - **services**: catalog client with its TTL response cache, and the
//!   recommendation engine (aggregate, score, rank)
//! - **routes**: axum handlers and the service router
//! - **config**: environment-driven settings

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

pub use config::Config;
pub use models::book::{Author, Book, BookSource, RecommendedBook, WorkDetail};
pub use models::profile::{SeenSet, TasteProfile};
pub use routes::{router, Catalog};
pub use services::catalog::{CatalogClient, OpenLibraryClient, RemoteFetchError};
