use async_trait::async_trait;
use uuid::Uuid;

use crate::{Accommodation, Notification, RequestStatus, TripRequest, User};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("Stored row is corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `RepoError::UniqueViolation` when the e-mail is taken.
    async fn create_user(&self, user: &User) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

/// Repository trait for accommodation lookups
#[async_trait]
pub trait AccommodationRepository: Send + Sync {
    async fn create_accommodation(&self, accommodation: &Accommodation) -> RepoResult<()>;

    async fn get_accommodation(&self, id: Uuid) -> RepoResult<Option<Accommodation>>;

    async fn list_accommodations(&self) -> RepoResult<Vec<Accommodation>>;
}

/// Repository trait for trip requests. Requests are never deleted.
#[async_trait]
pub trait TripRequestRepository: Send + Sync {
    async fn create_request(&self, request: &TripRequest) -> RepoResult<()>;

    async fn get_request(&self, id: Uuid) -> RepoResult<Option<TripRequest>>;

    /// Overwrites the mutable columns of an existing row, but only while its
    /// stored status is still `expected`. Returns `false` when the row is gone
    /// or its status moved on since it was read.
    async fn update_request(
        &self,
        request: &TripRequest,
        expected: RequestStatus,
    ) -> RepoResult<bool>;

    /// Newest first
    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<TripRequest>>;
}

/// Repository trait for notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_notification(&self, notification: &Notification) -> RepoResult<()>;

    /// Newest first
    async fn list_for_recipient(&self, recipient_id: Uuid) -> RepoResult<Vec<Notification>>;

    /// Returns `false` when no notification with that id is addressed to `recipient_id`.
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> RepoResult<bool>;
}
