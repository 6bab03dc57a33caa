//! FlightNode Server Library
//!
//! HTTP API for coastal bird monitoring volunteers: work types, waterbird
//! foraging surveys and user accounts.
//!
//! # Architecture
//!
//! Requests flow through four layers:
//!
//! - **Routes** (`features::*::routes`): deserialize wire models, check the
//!   caller, map to entities
//! - **Domain managers** (`features::*::manager`): validation and lifecycle
//!   rules (e.g. a survey moves from pending to completed at step 4)
//! - **Persistence** (`db`): traits with PostgreSQL and in-memory
//!   implementations
//! - **Entities** (`models`): plain records with declarative constraints
//!
//! Errors from every layer converge on [`AppError`], whose `IntoResponse`
//! impl renders the JSON error envelope.
//!
//! # Example
//!
//! ```no_run
//! use flightnode_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     db::run_migrations(&pool).await?;
//!     api::serve(api::AppState::postgres(pool), &config, std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;

pub use error::{AppError, AppResult};
