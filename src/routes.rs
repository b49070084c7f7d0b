//! Route definitions for the application

use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::auth::{
	change_password,
	get_current_profile,
	login_profile,
	logout_profile,
	register_profile,
};
use crate::controllers::booking::{
	create_booking,
	delete_booking,
	get_all_bookings,
	get_availability,
	get_booking,
	update_booking_state,
};
use crate::controllers::facility::{
	create_facility,
	delete_facility,
	get_all_facilities,
	get_facility,
	update_facility,
};
use crate::controllers::healthcheck;
use crate::controllers::stats::get_stats;
use crate::middleware::AuthLayer;

/// Build the application router
pub fn get_app_router(state: AppState) -> Router {
	let public_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest(
			"/auth",
			Router::new()
				.route("/register", post(register_profile))
				.route("/login", post(login_profile)),
		)
		.route("/bookings/availability", get(get_availability))
		.route("/facilities", get(get_all_facilities))
		.route("/facilities/{id}", get(get_facility));

	let protected_routes = Router::new()
		.nest(
			"/auth",
			Router::new()
				.route("/logout", post(logout_profile))
				.route("/me", get(get_current_profile))
				.route("/password", put(change_password)),
		)
		.route("/facilities", post(create_facility))
		.route("/facilities/{id}", put(update_facility))
		.route("/facilities/{id}", delete(delete_facility))
		.nest(
			"/bookings",
			Router::new()
				.route("/", get(get_all_bookings))
				.route("/", post(create_booking))
				.route("/{id}", get(get_booking))
				.route("/{id}", put(update_booking_state))
				.route("/{id}", delete(delete_booking)),
		)
		.route("/stats", get(get_stats))
		.layer(AuthLayer::new(state.clone()));

	Router::new()
		.merge(public_routes)
		.merge(protected_routes)
		.layer(TraceLayer::new_for_http())
		.layer(TimeoutLayer::new(Duration::from_secs(5)))
		.with_state(state)
}
