//! SalonFlow - salon discovery and appointment booking backend
//!
//! A JSON API over injected entity stores (in-memory or SQLite), with a
//! field-level validation layer, a durable user-profile store, and an
//! AI-backed service recommendation gateway.

pub mod actions;
pub mod error;
pub mod models;
pub mod recommend;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod state;
pub mod store;

pub use error::ActionError;
pub use state::AppState;
pub use store::Stores;
