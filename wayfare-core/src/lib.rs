pub mod accommodation;
pub mod notification;
pub mod password;
pub mod repository;
pub mod trip;
pub mod user;
pub mod validation;

pub use accommodation::Accommodation;
pub use notification::{Notification, NotificationKind};
pub use trip::{Reason, RequestStatus, TripDetails, TripRequest, TripUpdate};
pub use user::{Role, User};

use repository::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Request has already been {}", .from.as_past_tense())]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("Repository failure: {0}")]
    Repository(#[from] RepoError),
}

pub type CoreResult<T> = Result<T, CoreError>;
