use std::collections::HashSet;
use std::env;

use booking::NewBooking;
use chrono::{Days, Local, NaiveTime};
use clap::Parser;
use common::{DbConn, Error};
use db::{FacilityKind, FacilityStatus, ProfileRole};
use deadpool_diesel::postgres::{Manager, Pool};
use facility::{Facility, FacilityFilter, NewFacility};
use profile::{NewProfileDirect, Profile, hash_password};
use rand::seq::IndexedRandom;
use rand::{Rng, rng};

#[derive(Parser, Debug)]
struct Opt {
	/// Number of random demo bookings to attempt on top of the fixtures
	#[arg(long, short = 'b', default_value_t = 0)]
	bookings: usize,
}

const SEED_PASSWORD: &str = "12345678";

#[tokio::main]
async fn main() -> Result<(), Error> {
	let cli = Opt::parse();
	let conn = get_conn().await;

	let profile_ids = seed_profiles(&conn).await?;
	println!("Seeded {} profiles", profile_ids.len());

	let facility_ids = seed_facilities(&conn).await?;
	println!("Seeded {} facilities", facility_ids.len());

	if cli.bookings > 0 {
		println!("Seeding up to {} demo bookings…", cli.bookings);
		let admitted =
			seed_bookings(&profile_ids, &facility_ids, cli.bookings, &conn)
				.await?;
		println!("Admitted {admitted} bookings (conflicting slots skipped)");
	}

	Ok(())
}

/// Get a database connection from the pool
async fn get_conn() -> DbConn {
	let database_url = env::var("DATABASE_URL").expect("DATABASE_URL missing");

	let manager = Manager::new(database_url, deadpool_diesel::Runtime::Tokio1);
	let pool = Pool::builder(manager).build().expect("Failed to create pool");

	pool.get().await.expect("Failed to get a database connection")
}

/// Seed the admin and a couple of student accounts, skipping emails that
/// are already registered
async fn seed_profiles(conn: &DbConn) -> Result<Vec<i32>, Error> {
	let accounts = [
		("Admin", "ADMIN001", "admin@au.edu", ProfileRole::Admin),
		("Thant Zin Oo", "6722060", "u6722060@au.edu", ProfileRole::Student),
		("Shoon Moe Aung", "6722052", "u6722052@au.edu", ProfileRole::Student),
	];

	let mut ids = Vec::with_capacity(accounts.len());

	for (name, student_number, email, role) in accounts {
		if let Some(existing) =
			Profile::get_by_email(email.to_string(), conn).await?
		{
			ids.push(existing.id);
			continue;
		}

		let inserted = NewProfileDirect {
			name:           name.to_string(),
			student_number: student_number.to_string(),
			email:          email.to_string(),
			password_hash:  hash_password(SEED_PASSWORD)?,
			role,
		}
		.insert(conn)
		.await?;

		ids.push(inserted.id);
	}

	Ok(ids)
}

/// Seed the fixed facility catalogue, skipping names that already exist
async fn seed_facilities(conn: &DbConn) -> Result<Vec<i32>, Error> {
	let catalogue = [
		("Snooker Table 1", FacilityKind::Snooker, "Sports Complex – Room A", 2),
		("Snooker Table 2", FacilityKind::Snooker, "Sports Complex – Room A", 2),
		("Football Field 1", FacilityKind::Football, "Outdoor Field – North", 22),
		("Football Field 2", FacilityKind::Football, "Outdoor Field – South", 22),
		("Badminton Court 1", FacilityKind::Badminton, "Indoor Hall – Court 1", 4),
		("Badminton Court 2", FacilityKind::Badminton, "Indoor Hall – Court 2", 4),
		("Badminton Court 3", FacilityKind::Badminton, "Indoor Hall – Court 3", 4),
	];

	let existing = Facility::get_all(FacilityFilter::default(), conn).await?;
	let existing_names: HashSet<String> =
		existing.iter().map(|f| f.name.clone()).collect();

	let mut ids: Vec<i32> = existing.iter().map(|f| f.id).collect();

	for (name, kind, location, capacity) in catalogue {
		if existing_names.contains(name) {
			continue;
		}

		let inserted = NewFacility {
			name: name.to_string(),
			kind,
			location: location.to_string(),
			capacity,
			status: FacilityStatus::Active,
			created_by: None,
		}
		.insert(conn)
		.await?;

		ids.push(inserted.id);
	}

	Ok(ids)
}

/// Attempt `count` random bookings over the coming two weeks
///
/// Overlapping attempts are rejected by the admission check exactly as in
/// production; those are skipped, never retried.
async fn seed_bookings(
	profile_ids: &[i32],
	facility_ids: &[i32],
	count: usize,
	conn: &DbConn,
) -> Result<usize, Error> {
	if profile_ids.is_empty() || facility_ids.is_empty() {
		return Ok(0);
	}

	let today = Local::now().date_naive();
	let mut admitted = 0;

	for _ in 0..count {
		let new_booking = {
			let mut rng = rng();

			let start_hour = rng.random_range(8..21);
			let duration = rng.random_range(1..=2).min(22 - start_hour);

			NewBooking {
				profile_id:  *profile_ids.choose(&mut rng).unwrap(),
				facility_id: *facility_ids.choose(&mut rng).unwrap(),
				day:         today + Days::new(rng.random_range(0..14)),
				start_time:  NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
				end_time:    NaiveTime::from_hms_opt(start_hour + duration, 0, 0)
					.unwrap(),
			}
		};

		match new_booking.admit(conn).await {
			Ok(_) => admitted += 1,
			Err(Error::CreateBookingError(_)) => continue,
			Err(e) => return Err(e),
		}
	}

	Ok(admitted)
}
