//! Seed the database with demo classifications and vehicles.
//!
//! Seeding is idempotent: classifications are matched by name and vehicles
//! by make and model within their classification, so running it twice adds
//! nothing the second time.

use std::collections::HashMap;

use cse_motors_core::{Mileage, ModelYear, Price};
use cse_motors_web::db::{ClassificationRepository, InventoryRepository};
use cse_motors_web::models::{Classification, VehicleInput};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{CliError, connect};

const IMAGE: &str = "/static/images/vehicles/no-image.svg";
const THUMBNAIL: &str = "/static/images/vehicles/no-image-tn.svg";

const CLASSIFICATIONS: &[&str] = &["Custom", "Sport", "SUV", "Truck", "Sedan"];

struct SeedVehicle {
    classification: &'static str,
    make: &'static str,
    model: &'static str,
    year: i32,
    description: &'static str,
    price: i64,
    miles: i64,
    color: &'static str,
}

const VEHICLES: &[SeedVehicle] = &[
    SeedVehicle {
        classification: "Custom",
        make: "DMC",
        model: "Delorean",
        year: 1982,
        description: "Stainless steel body, gull-wing doors and a flux capacitor that may or may not work.",
        price: 65_000,
        miles: 15_432,
        color: "Silver",
    },
    SeedVehicle {
        classification: "Custom",
        make: "Batmobile",
        model: "Custom",
        year: 2007,
        description: "Armored, jet powered and only available in one color.",
        price: 65_000,
        miles: 29_887,
        color: "Black",
    },
    SeedVehicle {
        classification: "Sport",
        make: "Chevy",
        model: "Camaro",
        year: 2018,
        description: "A muscle car with modern handling and a very loud exhaust.",
        price: 25_000,
        miles: 101_222,
        color: "Yellow",
    },
    SeedVehicle {
        classification: "Sport",
        make: "Lamborghini",
        model: "Adventador",
        year: 2016,
        description: "V12 engine, scissor doors and a price tag to match.",
        price: 417_650,
        miles: 71_632,
        color: "Blue",
    },
    SeedVehicle {
        classification: "SUV",
        make: "Jeep",
        model: "Wrangler",
        year: 2019,
        description: "Removable top and doors, built for trails and beaches alike.",
        price: 28_045,
        miles: 41_205,
        color: "Yellow",
    },
    SeedVehicle {
        classification: "SUV",
        make: "Cadillac",
        model: "Escalade",
        year: 2019,
        description: "Full size luxury with seating for eight.",
        price: 75_195,
        miles: 41_958,
        color: "Black",
    },
    SeedVehicle {
        classification: "Truck",
        make: "Ford",
        model: "F-150",
        year: 2017,
        description: "The best selling pickup, ready for work or the weekend.",
        price: 30_000,
        miles: 47_658,
        color: "White",
    },
    SeedVehicle {
        classification: "Truck",
        make: "Monster",
        model: "Truck",
        year: 1995,
        description: "Huge tires and a suspension that laughs at parking lots.",
        price: 150_000,
        miles: 3_998,
        color: "Purple",
    },
    SeedVehicle {
        classification: "Sedan",
        make: "Ford",
        model: "Crown Victoria",
        year: 2013,
        description: "Roomy, rear wheel drive and nearly indestructible.",
        price: 10_000,
        miles: 108_247,
        color: "White",
    },
    SeedVehicle {
        classification: "Sedan",
        make: "Mechanic",
        model: "Special",
        year: 1964,
        description: "Runs great once you replace the engine, transmission and brakes.",
        price: 100,
        miles: 200_125,
        color: "Rust",
    },
];

/// Counts of rows inserted by a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub classifications: usize,
    pub vehicles: usize,
}

/// Seed the configured database.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or an insert fails.
pub async fn run() -> Result<SeedReport, CliError> {
    let pool = connect().await?;
    let report = seed(&pool).await?;

    info!(
        classifications = report.classifications,
        vehicles = report.vehicles,
        "Seeding complete"
    );
    Ok(report)
}

/// Insert any missing demo classifications and vehicles.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn seed(pool: &SqlitePool) -> Result<SeedReport, CliError> {
    let mut report = SeedReport::default();
    let classifications = ClassificationRepository::new(pool);
    let inventory = InventoryRepository::new(pool);

    let mut by_name: HashMap<&str, Classification> = HashMap::new();
    for &name in CLASSIFICATIONS {
        let classification = if let Some(existing) = classifications.get_by_name(name).await? {
            debug!(name, "Classification already present");
            existing
        } else {
            report.classifications += 1;
            classifications.create(name).await?
        };
        by_name.insert(name, classification);
    }

    for seed in VEHICLES {
        let classification = by_name
            .get(seed.classification)
            .ok_or_else(|| CliError::Seed(format!("unknown classification {}", seed.classification)))?;

        let existing = inventory.list_by_classification(classification.id).await?;
        if existing
            .iter()
            .any(|row| row.vehicle.make == seed.make && row.vehicle.model == seed.model)
        {
            debug!(make = seed.make, model = seed.model, "Vehicle already present");
            continue;
        }

        let input = VehicleInput {
            make: seed.make.to_owned(),
            model: seed.model.to_owned(),
            year: ModelYear::new(seed.year),
            description: seed.description.to_owned(),
            image: IMAGE.to_owned(),
            thumbnail: THUMBNAIL.to_owned(),
            price: Price::new(seed.price),
            miles: Mileage::new(seed.miles),
            color: seed.color.to_owned(),
            classification_id: classification.id,
        };
        let id = inventory.create(&input).await?;
        debug!(inv_id = %id, make = seed.make, model = seed.model, "Vehicle seeded");
        report.vehicles += 1;
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cse_motors_web::db;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = db::connect_in_memory().await.unwrap();

        let first = seed(&pool).await.unwrap();
        assert_eq!(first.classifications, CLASSIFICATIONS.len());
        assert_eq!(first.vehicles, VEHICLES.len());

        let second = seed(&pool).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let names: Vec<String> = ClassificationRepository::new(&pool)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names.len(), CLASSIFICATIONS.len());
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_classification() {
        let pool = db::connect_in_memory().await.unwrap();
        let sport = ClassificationRepository::new(&pool)
            .create("Sport")
            .await
            .unwrap();

        let report = seed(&pool).await.unwrap();
        assert_eq!(report.classifications, CLASSIFICATIONS.len() - 1);

        let sport_rows = InventoryRepository::new(&pool)
            .list_by_classification(sport.id)
            .await
            .unwrap();
        assert_eq!(sport_rows.len(), 2);
    }
}
