//! End-to-end coverage for the booking lifecycle: slot availability,
//! conflict-checked admission, the state machine, and the expiry sweeper.
//!
//! These tests need a running postgres instance; point DATABASE_URL at one
//! and run with `cargo test -- --ignored`.

use axum::http::StatusCode;
use booking::{Booking, BookingFilter, NewBooking};
use chrono::{Days, Local};
use courtbook::Error;
use db::{BookingState, FacilityStatus, ProfileRole};
use profile::{NewProfileDirect, hash_password};

mod common;

use common::{TEST_PASSWORD, TestEnv, at};

fn tomorrow() -> String {
	(Local::now().date_naive() + Days::new(1)).to_string()
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn booking_scenario_conflicts_and_adjacent_slots() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env.create_facility("Badminton Court 1").await;
	let date = tomorrow();

	// 09:00-10:00 is free and gets admitted
	let first = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "09:00",
			"endTime": "10:00",
		}))
		.await;

	assert_eq!(first.status_code(), StatusCode::CREATED);
	assert_eq!(first.json::<serde_json::Value>()["status"], "Confirmed");

	// 09:30-10:30 overlaps the first booking
	let overlapping = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "09:30",
			"endTime": "10:30",
		}))
		.await;

	assert_eq!(overlapping.status_code(), StatusCode::CONFLICT);

	// 10:00-11:00 only touches the first booking, half-open intervals do
	// not conflict on a shared endpoint
	let adjacent = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "10:00",
			"endTime": "11:00",
		}))
		.await;

	assert_eq!(adjacent.status_code(), StatusCode::CREATED);

	// Exactly the two admitted slots disappear from availability
	let availability = env
		.app
		.get("/bookings/availability")
		.add_query_param("facilityId", facility_id)
		.add_query_param("date", &date)
		.await;

	assert_eq!(availability.status_code(), StatusCode::OK);

	let body = availability.json::<serde_json::Value>();
	assert_eq!(body["allSlots"].as_array().unwrap().len(), 14);

	let free: Vec<&str> = body["slots"]
		.as_array()
		.unwrap()
		.iter()
		.map(|slot| slot["startTime"].as_str().unwrap())
		.collect();

	assert_eq!(free.len(), 12);
	assert!(!free.contains(&"09:00"));
	assert!(!free.contains(&"10:00"));
	assert!(free.contains(&"08:00"));
	assert!(free.contains(&"11:00"));
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn concurrent_overlapping_admissions_admit_exactly_one() {
	let env = TestEnv::new().await;
	let facility_id = env.create_facility("Race Court").await;

	let conn = env.conn().await;
	let profile = NewProfileDirect {
		name:           "Racer".to_string(),
		student_number: "6700001".to_string(),
		email:          "racer@au.edu".to_string(),
		password_hash:  hash_password(TEST_PASSWORD).unwrap(),
		role:           ProfileRole::Student,
	}
	.insert(&conn)
	.await
	.unwrap();

	let day = Local::now().date_naive() + Days::new(1);

	let attempts: Vec<_> = (0..8)
		.map(|_| {
			let pool = env.pool.clone();
			let new_booking = NewBooking {
				profile_id:  profile.id,
				facility_id,
				day,
				start_time:  at(9, 0),
				end_time:    at(10, 0),
			};

			tokio::spawn(async move {
				let conn = pool.get().await.unwrap();

				new_booking.admit(&conn).await
			})
		})
		.collect();

	let results = futures::future::join_all(attempts).await;

	let mut admitted = 0;
	for result in results {
		match result.unwrap() {
			Ok(_) => admitted += 1,
			// Losers must observably fail, either as a genuine conflict or
			// as a retryable transient error, never silently
			Err(Error::CreateBookingError(_)) | Err(Error::Transient(_)) => {},
			Err(other) => panic!("unexpected admission failure: {other:?}"),
		}
	}

	assert_eq!(admitted, 1);

	let bookings = Booking::find(
		BookingFilter { facility_id: Some(facility_id), ..Default::default() },
		&conn,
	)
	.await
	.unwrap();

	let confirmed = bookings
		.iter()
		.filter(|b| b.booking.state == BookingState::Confirmed)
		.count();

	assert_eq!(confirmed, 1);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn admission_rejects_bad_requests_before_storage() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env.create_facility("Court").await;
	let date = tomorrow();

	// Out of operating hours
	let early = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "07:00",
			"endTime": "08:00",
		}))
		.await;
	assert_eq!(early.status_code(), StatusCode::BAD_REQUEST);

	let late = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "21:00",
			"endTime": "23:00",
		}))
		.await;
	assert_eq!(late.status_code(), StatusCode::BAD_REQUEST);

	// Start not before end
	let inverted = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "10:00",
			"endTime": "10:00",
		}))
		.await;
	assert_eq!(inverted.status_code(), StatusCode::BAD_REQUEST);

	// Unknown facility
	let missing = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id + 999,
			"date": date,
			"startTime": "10:00",
			"endTime": "11:00",
		}))
		.await;
	assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

	// Nothing was written along the way
	let conn = env.conn().await;
	let bookings = Booking::find(BookingFilter::default(), &conn).await.unwrap();
	assert!(bookings.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn maintenance_facility_rejects_admission() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env
		.create_facility_with_status("Closed Court", FacilityStatus::Maintenance)
		.await;

	let response = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": tomorrow(),
			"startTime": "10:00",
			"endTime": "11:00",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn cancelling_frees_the_slot() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env.create_facility("Court").await;
	let date = tomorrow();

	let created = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "14:00",
			"endTime": "15:00",
		}))
		.await;
	assert_eq!(created.status_code(), StatusCode::CREATED);
	let booking_id = created.json::<serde_json::Value>()["id"].as_i64().unwrap();

	let cancelled = env
		.app
		.put(&format!("/bookings/{booking_id}"))
		.json(&serde_json::json!({ "status": "Cancelled" }))
		.await;
	assert_eq!(cancelled.status_code(), StatusCode::OK);
	assert_eq!(cancelled.json::<serde_json::Value>()["status"], "Cancelled");

	// A cancelled booking no longer blocks availability
	let availability = env
		.app
		.get("/bookings/availability")
		.add_query_param("facilityId", facility_id)
		.add_query_param("date", &date)
		.await;

	let body = availability.json::<serde_json::Value>();
	let free: Vec<&str> = body["slots"]
		.as_array()
		.unwrap()
		.iter()
		.map(|slot| slot["startTime"].as_str().unwrap())
		.collect();
	assert!(free.contains(&"14:00"));

	// And the slot can be booked again
	let rebooked = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": date,
			"startTime": "14:00",
			"endTime": "15:00",
		}))
		.await;
	assert_eq!(rebooked.status_code(), StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn terminal_states_reject_further_transitions() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env.create_facility("Court").await;

	let created = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": tomorrow(),
			"startTime": "09:00",
			"endTime": "10:00",
		}))
		.await;
	let booking_id = created.json::<serde_json::Value>()["id"].as_i64().unwrap();

	// Confirmed -> Confirmed is illegal
	let refreshed = env
		.app
		.put(&format!("/bookings/{booking_id}"))
		.json(&serde_json::json!({ "status": "Confirmed" }))
		.await;
	assert_eq!(refreshed.status_code(), StatusCode::BAD_REQUEST);

	// Confirmed -> Cancelled is fine
	let cancelled = env
		.app
		.put(&format!("/bookings/{booking_id}"))
		.json(&serde_json::json!({ "status": "Cancelled" }))
		.await;
	assert_eq!(cancelled.status_code(), StatusCode::OK);

	// Cancelled -> Completed is illegal, the error names the transition
	let completed = env
		.app
		.put(&format!("/bookings/{booking_id}"))
		.json(&serde_json::json!({ "status": "Completed" }))
		.await;
	assert_eq!(completed.status_code(), StatusCode::BAD_REQUEST);

	let body = completed.json::<serde_json::Value>();
	assert!(body["message"].as_str().unwrap().contains("Cancelled"));
	assert!(body["message"].as_str().unwrap().contains("Completed"));
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn only_the_owner_or_an_admin_may_transition() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env.create_facility("Court").await;

	let created = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": tomorrow(),
			"startTime": "09:00",
			"endTime": "10:00",
		}))
		.await;
	let booking_id = created.json::<serde_json::Value>()["id"].as_i64().unwrap();

	// A different student may not touch the booking
	let env = env.login_student("u6722052@au.edu").await;

	let forbidden = env
		.app
		.put(&format!("/bookings/{booking_id}"))
		.json(&serde_json::json!({ "status": "Cancelled" }))
		.await;
	assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

	// An admin may
	let env = env.login_admin("admin@au.edu").await;

	let cancelled = env
		.app
		.put(&format!("/bookings/{booking_id}"))
		.json(&serde_json::json!({ "status": "Cancelled" }))
		.await;
	assert_eq!(cancelled.status_code(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn sweeper_completes_expired_bookings_idempotently() {
	let env = TestEnv::new().await;
	let facility_id = env.create_facility("Court").await;

	let conn = env.conn().await;
	let profile = NewProfileDirect {
		name:           "Sleeper".to_string(),
		student_number: "6700002".to_string(),
		email:          "sleeper@au.edu".to_string(),
		password_hash:  hash_password(TEST_PASSWORD).unwrap(),
		role:           ProfileRole::Student,
	}
	.insert(&conn)
	.await
	.unwrap();

	let today = Local::now().date_naive();

	let admitted = NewBooking {
		profile_id:  profile.id,
		facility_id,
		day:         today,
		start_time:  at(9, 0),
		end_time:    at(10, 0),
	}
	.admit(&conn)
	.await
	.unwrap();

	// Before the end time nothing is expired
	let swept =
		Booking::complete_expired_at(today, at(9, 59), &conn).await.unwrap();
	assert_eq!(swept, 0);

	// At exactly the end time the booking completes
	let swept =
		Booking::complete_expired_at(today, at(10, 0), &conn).await.unwrap();
	assert_eq!(swept, 1);

	let completed = Booking::get_by_id(admitted.booking.id, &conn).await.unwrap();
	assert_eq!(completed.booking.state, BookingState::Completed);

	// Re-running with no new time elapsed mutates nothing
	let swept =
		Booking::complete_expired_at(today, at(10, 0), &conn).await.unwrap();
	assert_eq!(swept, 0);

	// A confirmed booking dated yesterday expires regardless of the time
	let yesterday = today - Days::new(1);
	let stale = NewBooking {
		profile_id:  profile.id,
		facility_id,
		day:         yesterday,
		start_time:  at(9, 0),
		end_time:    at(10, 0),
	}
	.admit(&conn)
	.await
	.unwrap();

	let swept =
		Booking::complete_expired_at(today, at(8, 0), &conn).await.unwrap();
	assert_eq!(swept, 1);

	let completed = Booking::get_by_id(stale.booking.id, &conn).await.unwrap();
	assert_eq!(completed.booking.state, BookingState::Completed);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn owner_deletes_their_booking() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;
	let facility_id = env.create_facility("Court").await;

	let created = env
		.app
		.post("/bookings")
		.json(&serde_json::json!({
			"facilityId": facility_id,
			"date": tomorrow(),
			"startTime": "09:00",
			"endTime": "10:00",
		}))
		.await;
	let booking_id = created.json::<serde_json::Value>()["id"].as_i64().unwrap();

	let deleted = env.app.delete(&format!("/bookings/{booking_id}")).await;
	assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

	let gone = env.app.get(&format!("/bookings/{booking_id}")).await;
	assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}
