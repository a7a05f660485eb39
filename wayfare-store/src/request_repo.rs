use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_core::repository::{RepoError, RepoResult, TripRequestRepository};
use wayfare_core::{RequestStatus, TripRequest};

use crate::db_err;

pub struct StoreTripRequestRepository {
    pool: PgPool,
}

impl StoreTripRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    user_id: Uuid,
    accommodation_id: Uuid,
    origin: String,
    destination: String,
    flight_date: NaiveDate,
    return_date: Option<NaiveDate>,
    reason: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for TripRequest {
    type Error = RepoError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let reason = row
            .reason
            .parse()
            .map_err(|_| RepoError::Corrupt(format!("request {} has reason {:?}", row.id, row.reason)))?;
        let status = row
            .status
            .parse()
            .map_err(|_| RepoError::Corrupt(format!("request {} has status {:?}", row.id, row.status)))?;

        Ok(TripRequest {
            id: row.id,
            user_id: row.user_id,
            accommodation_id: row.accommodation_id,
            origin: row.origin,
            destination: row.destination,
            flight_date: row.flight_date,
            return_date: row.return_date,
            reason,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_REQUEST: &str = "SELECT id, user_id, accommodation_id, origin, destination, flight_date, return_date, reason, status, created_at, updated_at FROM requests";

#[async_trait]
impl TripRequestRepository for StoreTripRequestRepository {
    async fn create_request(&self, request: &TripRequest) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO requests (id, user_id, accommodation_id, origin, destination, flight_date, return_date, reason, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(request.id)
        .bind(request.user_id)
        .bind(request.accommodation_id)
        .bind(&request.origin)
        .bind(&request.destination)
        .bind(request.flight_date)
        .bind(request.return_date)
        .bind(request.reason.as_str())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> RepoResult<Option<TripRequest>> {
        let row = sqlx::query_as::<_, RequestRow>(&format!("{} WHERE id = $1", SELECT_REQUEST))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(TripRequest::try_from).transpose()
    }

    async fn update_request(
        &self,
        request: &TripRequest,
        expected: RequestStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE requests
            SET accommodation_id = $1, origin = $2, destination = $3, flight_date = $4,
                return_date = $5, reason = $6, status = $7, updated_at = $8
            WHERE id = $9 AND status = $10
            "#,
        )
        .bind(request.accommodation_id)
        .bind(&request.origin)
        .bind(&request.destination)
        .bind(request.flight_date)
        .bind(request.return_date)
        .bind(request.reason.as_str())
        .bind(request.status.as_str())
        .bind(request.updated_at)
        .bind(request.id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<TripRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_REQUEST
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(TripRequest::try_from).collect()
    }
}
