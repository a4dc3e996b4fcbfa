//! Demo account seeding for first launch.

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::repository::{count_users_with_role, insert_user};
use super::DatabaseError;
use crate::auth::password::{hash_password_with_iterations, PBKDF2_ITERATIONS};
use crate::models::{Role, User};

/// (username, password, role, full name, email)
const DEMO_ACCOUNTS: [(&str, &str, Role, &str, &str); 4] = [
    ("patient1", "patient123", Role::Patient, "John Doe", "john.doe@example.com"),
    ("patient2", "patient123", Role::Patient, "Jane Smith", "jane.smith@example.com"),
    ("doctor1", "doctor123", Role::Doctor, "Dr. Sarah Johnson", "sarah.johnson@hospital.com"),
    ("doctor2", "doctor123", Role::Doctor, "Dr. Michael Chen", "michael.chen@hospital.com"),
];

/// Create the demo accounts on a fresh database.
///
/// Skipped whenever any patient account already exists, so a database
/// that has seen real use is never touched. Returns `true` if accounts
/// were created.
pub fn seed_demo_users(conn: &Connection) -> Result<bool, DatabaseError> {
    seed_with_iterations(conn, PBKDF2_ITERATIONS)
}

fn seed_with_iterations(conn: &Connection, iterations: u32) -> Result<bool, DatabaseError> {
    if count_users_with_role(conn, Role::Patient)? > 0 {
        tracing::debug!("Demo seed skipped: patient accounts already present");
        return Ok(false);
    }

    for (username, password, role, full_name, email) in DEMO_ACCOUNTS {
        insert_user(conn, &User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password_with_iterations(password, iterations),
            role,
            full_name: full_name.to_string(),
            email: Some(email.to_string()),
            created_at: Utc::now(),
        })?;
    }

    tracing::info!(
        accounts = DEMO_ACCOUNTS.len(),
        "Seeded demo accounts (patient1/patient2, doctor1/doctor2)"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::db::repository::find_user_by_username_role;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn seeds_fresh_database() {
        let conn = open_memory_database().unwrap();
        assert!(seed_with_iterations(&conn, 1_000).unwrap());

        assert_eq!(count_users_with_role(&conn, Role::Patient).unwrap(), 2);
        assert_eq!(count_users_with_role(&conn, Role::Doctor).unwrap(), 2);

        let patient = find_user_by_username_role(&conn, "patient1", Role::Patient)
            .unwrap()
            .unwrap();
        assert_eq!(patient.full_name, "John Doe");
        assert!(verify_password("patient123", &patient.password_hash));
        assert!(!verify_password("doctor123", &patient.password_hash));

        let doctor = find_user_by_username_role(&conn, "doctor2", Role::Doctor)
            .unwrap()
            .unwrap();
        assert_eq!(doctor.full_name, "Dr. Michael Chen");
    }

    #[test]
    fn skipped_when_patients_exist() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, &User {
            id: Uuid::new_v4(),
            username: "existing".into(),
            password_hash: "x".into(),
            role: Role::Patient,
            full_name: "Existing Patient".into(),
            email: None,
            created_at: Utc::now(),
        }).unwrap();

        assert!(!seed_with_iterations(&conn, 1_000).unwrap());
        assert_eq!(count_users_with_role(&conn, Role::Patient).unwrap(), 1);
        // Doctors are not seeded either once the guard trips.
        assert_eq!(count_users_with_role(&conn, Role::Doctor).unwrap(), 0);
    }

    #[test]
    fn reseed_is_a_noop() {
        let conn = open_memory_database().unwrap();
        assert!(seed_with_iterations(&conn, 1_000).unwrap());
        assert!(!seed_with_iterations(&conn, 1_000).unwrap());
        assert_eq!(count_users_with_role(&conn, Role::Patient).unwrap(), 2);
    }
}
