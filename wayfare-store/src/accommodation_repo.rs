use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_core::repository::{AccommodationRepository, RepoResult};
use wayfare_core::Accommodation;

use crate::db_err;

pub struct StoreAccommodationRepository {
    pool: PgPool,
}

impl StoreAccommodationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccommodationRow {
    id: Uuid,
    name: String,
    location: String,
    created_at: DateTime<Utc>,
}

impl From<AccommodationRow> for Accommodation {
    fn from(row: AccommodationRow) -> Self {
        Accommodation {
            id: row.id,
            name: row.name,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AccommodationRepository for StoreAccommodationRepository {
    async fn create_accommodation(&self, accommodation: &Accommodation) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accommodations (id, name, location, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(accommodation.id)
        .bind(&accommodation.name)
        .bind(&accommodation.location)
        .bind(accommodation.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_accommodation(&self, id: Uuid) -> RepoResult<Option<Accommodation>> {
        let row = sqlx::query_as::<_, AccommodationRow>(
            "SELECT id, name, location, created_at FROM accommodations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Accommodation::from))
    }

    async fn list_accommodations(&self) -> RepoResult<Vec<Accommodation>> {
        let rows = sqlx::query_as::<_, AccommodationRow>(
            "SELECT id, name, location, created_at FROM accommodations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Accommodation::from).collect())
    }
}
