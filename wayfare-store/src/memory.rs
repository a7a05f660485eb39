//! Process-local repositories backed by `tokio::sync::RwLock`. Used by the
//! API tests and for running the server without Postgres.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use wayfare_core::repository::{
    AccommodationRepository, NotificationRepository, RepoError, RepoResult, TripRequestRepository,
    UserRepository,
};
use wayfare_core::{Accommodation, Notification, RequestStatus, TripRequest, User};

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    accommodations: RwLock<HashMap<Uuid, Accommodation>>,
    // Vecs keep insertion order so "newest first" is stable.
    requests: RwLock<Vec<TripRequest>>,
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::UniqueViolation("users_email_key".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl AccommodationRepository for InMemoryStore {
    async fn create_accommodation(&self, accommodation: &Accommodation) -> RepoResult<()> {
        self.accommodations
            .write()
            .await
            .entry(accommodation.id)
            .or_insert_with(|| accommodation.clone());
        Ok(())
    }

    async fn get_accommodation(&self, id: Uuid) -> RepoResult<Option<Accommodation>> {
        Ok(self.accommodations.read().await.get(&id).cloned())
    }

    async fn list_accommodations(&self) -> RepoResult<Vec<Accommodation>> {
        let mut all: Vec<Accommodation> = self.accommodations.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[async_trait]
impl TripRequestRepository for InMemoryStore {
    async fn create_request(&self, request: &TripRequest) -> RepoResult<()> {
        self.requests.write().await.push(request.clone());
        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> RepoResult<Option<TripRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update_request(
        &self,
        request: &TripRequest,
        expected: RequestStatus,
    ) -> RepoResult<bool> {
        let mut requests = self.requests.write().await;
        match requests
            .iter_mut()
            .find(|r| r.id == request.id && r.status == expected)
        {
            Some(existing) => {
                *existing = request.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<TripRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create_notification(&self, notification: &Notification) -> RepoResult<()> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_for_recipient(&self, recipient_id: Uuid) -> RepoResult<Vec<Notification>> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> RepoResult<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
