pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod storage;

pub use routes::{build_router, AppState};
