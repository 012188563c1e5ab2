//! Classification repository for database operations.

use sqlx::SqlitePool;

use cse_motors_core::ClassificationId;

use super::RepositoryError;
use crate::models::Classification;

#[derive(sqlx::FromRow)]
struct ClassificationRow {
    classification_id: ClassificationId,
    classification_name: String,
}

impl From<ClassificationRow> for Classification {
    fn from(row: ClassificationRow) -> Self {
        Self {
            id: row.classification_id,
            name: row.classification_name,
        }
    }
}

/// Repository for classification database operations.
pub struct ClassificationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ClassificationRepository<'a> {
    /// Create a new classification repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all classifications ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Classification>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClassificationRow>(
            r"
            SELECT classification_id, classification_name
            FROM classification
            ORDER BY classification_name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Classification::from).collect())
    }

    /// Insert a new classification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    pub async fn create(&self, name: &str) -> Result<Classification, RepositoryError> {
        let row = sqlx::query_as::<_, ClassificationRow>(
            r"
            INSERT INTO classification (classification_name)
            VALUES (?)
            RETURNING classification_id, classification_name
            ",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "classification already exists"))?;

        Ok(row.into())
    }

    /// Find a classification by exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Classification>, RepositoryError> {
        let row = sqlx::query_as::<_, ClassificationRow>(
            r"
            SELECT classification_id, classification_name
            FROM classification
            WHERE classification_name = ?
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Classification::from))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let pool = connect_in_memory().await.unwrap();
        let repo = ClassificationRepository::new(&pool);

        repo.create("Truck").await.unwrap();
        repo.create("Sedan").await.unwrap();
        repo.create("SUV").await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["SUV", "Sedan", "Truck"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let pool = connect_in_memory().await.unwrap();
        let repo = ClassificationRepository::new(&pool);

        repo.create("Truck").await.unwrap();
        let err = repo.create("Truck").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let pool = connect_in_memory().await.unwrap();
        let repo = ClassificationRepository::new(&pool);

        let created = repo.create("Custom").await.unwrap();
        assert_eq!(repo.get_by_name("Custom").await.unwrap(), Some(created));
        assert_eq!(repo.get_by_name("Missing").await.unwrap(), None);
    }
}
