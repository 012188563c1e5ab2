//! Inventory repository for database operations.

use sqlx::SqlitePool;

use cse_motors_core::{ClassificationId, InventoryId, Mileage, ModelYear, Price};

use super::RepositoryError;
use crate::models::{ClassifiedVehicle, Vehicle, VehicleInput};

/// Database row for the `inventory` table.
#[derive(sqlx::FromRow)]
struct VehicleRow {
    inv_id: InventoryId,
    inv_make: String,
    inv_model: String,
    inv_year: i32,
    inv_description: String,
    inv_image: String,
    inv_thumbnail: String,
    inv_price: i64,
    inv_miles: i64,
    inv_color: String,
    classification_id: ClassificationId,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.inv_id,
            make: row.inv_make,
            model: row.inv_model,
            year: ModelYear::new(row.inv_year),
            description: row.inv_description,
            image: row.inv_image,
            thumbnail: row.inv_thumbnail,
            price: Price::new(row.inv_price),
            miles: Mileage::new(row.inv_miles),
            color: row.inv_color,
            classification_id: row.classification_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClassifiedVehicleRow {
    #[sqlx(flatten)]
    vehicle: VehicleRow,
    classification_name: String,
}

const VEHICLE_COLUMNS: &str = "inv_id, inv_make, inv_model, inv_year, inv_description, \
     inv_image, inv_thumbnail, inv_price, inv_miles, inv_color, classification_id";

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the vehicles of a classification, joined with its name.
    ///
    /// An unknown classification yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_classification(
        &self,
        classification_id: ClassificationId,
    ) -> Result<Vec<ClassifiedVehicle>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClassifiedVehicleRow>(
            r"
            SELECT i.inv_id, i.inv_make, i.inv_model, i.inv_year, i.inv_description,
                   i.inv_image, i.inv_thumbnail, i.inv_price, i.inv_miles, i.inv_color,
                   i.classification_id, c.classification_name
            FROM inventory AS i
            JOIN classification AS c ON i.classification_id = c.classification_id
            WHERE i.classification_id = ?
            ORDER BY i.inv_make, i.inv_model, i.inv_id
            ",
        )
        .bind(classification_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ClassifiedVehicle {
                vehicle: r.vehicle.into(),
                classification_name: r.classification_name,
            })
            .collect())
    }

    /// Get a vehicle by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: InventoryId) -> Result<Option<Vehicle>, RepositoryError> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM inventory WHERE inv_id = ?");
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Vehicle::from))
    }

    /// Insert a vehicle and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the classification does not exist.
    pub async fn create(&self, input: &VehicleInput) -> Result<InventoryId, RepositoryError> {
        let id = sqlx::query_scalar::<_, InventoryId>(
            r"
            INSERT INTO inventory
                (inv_make, inv_model, inv_year, inv_description, inv_image, inv_thumbnail,
                 inv_price, inv_miles, inv_color, classification_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING inv_id
            ",
        )
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year.value())
        .bind(&input.description)
        .bind(&input.image)
        .bind(&input.thumbnail)
        .bind(input.price.dollars())
        .bind(input.miles.miles())
        .bind(&input.color)
        .bind(input.classification_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "vehicle already exists"))?;

        Ok(id)
    }

    /// Replace every column of an existing vehicle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this ID.
    /// Returns `RepositoryError::InvalidReference` if the classification does not exist.
    pub async fn update(
        &self,
        id: InventoryId,
        input: &VehicleInput,
    ) -> Result<Vehicle, RepositoryError> {
        let sql = format!(
            "UPDATE inventory SET \
                inv_make = ?, inv_model = ?, inv_year = ?, inv_description = ?, \
                inv_image = ?, inv_thumbnail = ?, inv_price = ?, inv_miles = ?, \
                inv_color = ?, classification_id = ? \
             WHERE inv_id = ? \
             RETURNING {VEHICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(&input.make)
            .bind(&input.model)
            .bind(input.year.value())
            .bind(&input.description)
            .bind(&input.image)
            .bind(&input.thumbnail)
            .bind(input.price.dollars())
            .bind(input.miles.miles())
            .bind(&input.color)
            .bind(input.classification_id)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "vehicle already exists"))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a vehicle, returning the number of rows removed (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, id: InventoryId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM inventory WHERE inv_id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{ClassificationRepository, connect_in_memory};

    fn input(classification_id: ClassificationId) -> VehicleInput {
        VehicleInput {
            make: "Ford".to_owned(),
            model: "F-150".to_owned(),
            year: ModelYear::new(2021),
            description: "Half-ton pickup".to_owned(),
            image: "/images/vehicles/f150.jpg".to_owned(),
            thumbnail: "/images/vehicles/f150-tn.jpg".to_owned(),
            price: Price::new(38_500),
            miles: Mileage::new(12_345),
            color: "Blue".to_owned(),
            classification_id,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let pool = connect_in_memory().await.unwrap();
        let truck = ClassificationRepository::new(&pool).create("Truck").await.unwrap();
        let repo = InventoryRepository::new(&pool);

        let id = repo.create(&input(truck.id)).await.unwrap();
        let vehicle = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(vehicle.make, "Ford");
        assert_eq!(vehicle.year.value(), 2021);
        assert_eq!(vehicle.price.dollars(), 38_500);
        assert_eq!(vehicle.miles.miles(), 12_345);
        assert_eq!(vehicle.classification_id, truck.id);
    }

    #[tokio::test]
    async fn test_list_by_classification_joins_name() {
        let pool = connect_in_memory().await.unwrap();
        let classes = ClassificationRepository::new(&pool);
        let truck = classes.create("Truck").await.unwrap();
        let sedan = classes.create("Sedan").await.unwrap();
        let repo = InventoryRepository::new(&pool);
        repo.create(&input(truck.id)).await.unwrap();

        let trucks = repo.list_by_classification(truck.id).await.unwrap();
        assert_eq!(trucks.len(), 1);
        assert_eq!(trucks.first().unwrap().classification_name, "Truck");

        assert!(repo.list_by_classification(sedan.id).await.unwrap().is_empty());
        assert!(
            repo.list_by_classification(ClassificationId::new(999))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_unknown_classification_is_invalid_reference() {
        let pool = connect_in_memory().await.unwrap();
        let repo = InventoryRepository::new(&pool);

        let err = repo.create(&input(ClassificationId::new(77))).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_update_and_missing_row() {
        let pool = connect_in_memory().await.unwrap();
        let truck = ClassificationRepository::new(&pool).create("Truck").await.unwrap();
        let repo = InventoryRepository::new(&pool);
        let id = repo.create(&input(truck.id)).await.unwrap();

        let mut changed = input(truck.id);
        changed.color = "Red".to_owned();
        changed.price = Price::new(36_000);
        let updated = repo.update(id, &changed).await.unwrap();
        assert_eq!(updated.color, "Red");
        assert_eq!(updated.price.dollars(), 36_000);

        let err = repo.update(InventoryId::new(999), &changed).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_reports_row_count() {
        let pool = connect_in_memory().await.unwrap();
        let truck = ClassificationRepository::new(&pool).create("Truck").await.unwrap();
        let repo = InventoryRepository::new(&pool);
        let id = repo.create(&input(truck.id)).await.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), 1);
        assert_eq!(repo.delete(id).await.unwrap(), 0);
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }
}
