#[macro_use]
extern crate tracing;

mod config;

pub mod controllers;
pub mod middleware;
pub mod routes;
pub mod schemas;
pub mod session;

pub use common::{DbConn, DbPool, Error};
pub use config::Config;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

/// Global application state shared by every request handler
#[derive(Clone)]
pub struct AppState {
	pub config:         Config,
	pub database_pool:  DbPool,
	pub cookie_jar_key: Key,
}

impl FromRef<AppState> for Config {
	fn from_ref(state: &AppState) -> Self { state.config.clone() }
}

impl FromRef<AppState> for DbPool {
	fn from_ref(state: &AppState) -> Self { state.database_pool.clone() }
}

impl FromRef<AppState> for Key {
	fn from_ref(state: &AppState) -> Self { state.cookie_jar_key.clone() }
}
