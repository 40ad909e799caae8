//! Postgres-backed inventory store.
//!
//! DESIGN
//! ======
//! Components and projects are stored as whole JSONB documents keyed by id,
//! mirroring the in-memory collections one row per entity. The two singleton
//! documents (`analytics`, `custom_image_library`) live in `documents`.
//!
//! `batch_replace` runs inside one transaction: each listed collection is
//! truncated and rewritten, and a failure anywhere rolls the whole batch back.

use labstock::store::Replacement;
use labstock::{Component, Project, Store, StoreError};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const ANALYTICS_KEY: &str = "analytics";
const IMAGE_LIBRARY_KEY: &str = "custom_image_library";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

async fn insert_component(tx: &mut Transaction<'_, Postgres>, component: &Component) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO components (id, created_at, doc) VALUES ($1, $2, $3)")
        .bind(component.id)
        .bind(component.created_at)
        .bind(Json(component))
        .execute(tx.as_mut())
        .await?;
    Ok(())
}

async fn insert_project(tx: &mut Transaction<'_, Postgres>, project: &Project) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO projects (id, name, doc) VALUES ($1, $2, $3)")
        .bind(project.id)
        .bind(&project.name)
        .bind(Json(project))
        .execute(tx.as_mut())
        .await?;
    Ok(())
}

async fn upsert_document(
    tx: &mut Transaction<'_, Postgres>,
    key: &str,
    doc: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO documents (key, doc) VALUES ($1, $2)
         ON CONFLICT (key) DO UPDATE SET doc = EXCLUDED.doc",
    )
    .bind(key)
    .bind(Json(doc))
    .execute(tx.as_mut())
    .await?;
    Ok(())
}

async fn apply_batch(pool: &PgPool, batch: Vec<Replacement>) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for replacement in batch {
        match replacement {
            Replacement::Components(components) => {
                sqlx::query("DELETE FROM components").execute(tx.as_mut()).await?;
                for component in &components {
                    insert_component(&mut tx, component).await?;
                }
            }
            Replacement::Projects(projects) => {
                sqlx::query("DELETE FROM projects").execute(tx.as_mut()).await?;
                for project in &projects {
                    insert_project(&mut tx, project).await?;
                }
            }
            Replacement::Analytics(doc) => upsert_document(&mut tx, ANALYTICS_KEY, &doc).await?,
            Replacement::ImageLibrary(items) => {
                upsert_document(&mut tx, IMAGE_LIBRARY_KEY, &serde_json::Value::Array(items)).await?;
            }
        }
    }
    tx.commit().await?;
    Ok(())
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn get_all(&self) -> Result<Vec<Component>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Component>>("SELECT doc FROM components ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(|Json(component)| component).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Component>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Component>>("SELECT doc FROM components WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(|Json(component)| component))
    }

    async fn put(&self, component: &Component) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO components (id, created_at, doc) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET created_at = EXCLUDED.created_at, doc = EXCLUDED.doc",
        )
        .bind(component.id)
        .bind(component.created_at)
        .bind(Json(component))
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM components WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Project>>("SELECT doc FROM projects ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(|Json(project)| project).collect())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Project>>("SELECT doc FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(|Json(project)| project))
    }

    async fn put_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO projects (id, name, doc) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, doc = EXCLUDED.doc",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(Json(project))
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn remove_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn analytics(&self) -> Result<Option<serde_json::Value>, StoreError> {
        sqlx::query_scalar::<_, serde_json::Value>("SELECT doc FROM documents WHERE key = $1")
            .bind(ANALYTICS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn image_library(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Vec<serde_json::Value>>>("SELECT doc FROM documents WHERE key = $1")
            .bind(IMAGE_LIBRARY_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(|Json(items)| items).unwrap_or_default())
    }

    async fn batch_replace(&self, batch: Vec<Replacement>) -> Result<(), StoreError> {
        apply_batch(&self.pool, batch).await.map_err(backend)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
