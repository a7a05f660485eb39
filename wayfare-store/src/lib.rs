pub mod accommodation_repo;
pub mod app_config;
pub mod database;
pub mod memory;
pub mod notification_repo;
pub mod request_repo;
pub mod seed;
pub mod user_repo;

pub use accommodation_repo::StoreAccommodationRepository;
pub use database::DbClient;
pub use notification_repo::StoreNotificationRepository;
pub use request_repo::StoreTripRequestRepository;
pub use user_repo::StoreUserRepository;

use wayfare_core::repository::RepoError;

/// Maps driver errors onto the repository error, surfacing unique-key
/// violations so callers can answer 409 instead of 500.
pub(crate) fn db_err(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepoError::UniqueViolation(db.message().to_string());
        }
    }
    RepoError::Backend(Box::new(err))
}
