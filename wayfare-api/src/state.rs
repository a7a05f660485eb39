use std::sync::Arc;
use uuid::Uuid;
use wayfare_core::repository::{
    AccommodationRepository, NotificationRepository, TripRequestRepository, UserRepository,
};
use wayfare_core::User;
use wayfare_store::memory::InMemoryStore;
use wayfare_store::{
    DbClient, StoreAccommodationRepository, StoreNotificationRepository,
    StoreTripRequestRepository, StoreUserRepository,
};

use crate::error::AppError;
use crate::middleware::auth::INVALID_TOKEN;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub accommodations: Arc<dyn AccommodationRepository>,
    pub requests: Arc<dyn TripRequestRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn postgres(db: &DbClient, auth: AuthConfig) -> Self {
        Self {
            users: Arc::new(StoreUserRepository::new(db.pool.clone())),
            accommodations: Arc::new(StoreAccommodationRepository::new(db.pool.clone())),
            requests: Arc::new(StoreTripRequestRepository::new(db.pool.clone())),
            notifications: Arc::new(StoreNotificationRepository::new(db.pool.clone())),
            auth,
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>, auth: AuthConfig) -> Self {
        Self {
            users: store.clone(),
            accommodations: store.clone(),
            requests: store.clone(),
            notifications: store,
            auth,
        }
    }

    /// Loads the account behind a verified token. A token for an account
    /// that no longer exists is treated as invalid.
    pub async fn current_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_TOKEN.to_string()))
    }
}
