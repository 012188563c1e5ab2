//! Inventory and classification domain types.
//!
//! `Vehicle` serializes with the database column names (`inv_id`,
//! `inv_make`, ...) because the management page script reads them from
//! `/inv/getInventory/{classification_id}`.

use serde::Serialize;

use cse_motors_core::{ClassificationId, InventoryId, Mileage, ModelYear, Price};

/// A vehicle category such as "SUV" or "Truck".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    #[serde(rename = "classification_id")]
    pub id: ClassificationId,
    #[serde(rename = "classification_name")]
    pub name: String,
}

/// A vehicle in inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    #[serde(rename = "inv_id")]
    pub id: InventoryId,
    #[serde(rename = "inv_make")]
    pub make: String,
    #[serde(rename = "inv_model")]
    pub model: String,
    #[serde(rename = "inv_year")]
    pub year: ModelYear,
    #[serde(rename = "inv_description")]
    pub description: String,
    #[serde(rename = "inv_image")]
    pub image: String,
    #[serde(rename = "inv_thumbnail")]
    pub thumbnail: String,
    #[serde(rename = "inv_price")]
    pub price: Price,
    #[serde(rename = "inv_miles")]
    pub miles: Mileage,
    #[serde(rename = "inv_color")]
    pub color: String,
    pub classification_id: ClassificationId,
}

impl Vehicle {
    /// "Make Model", used for page titles and alt text.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// A vehicle joined with its classification name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub classification_name: String,
}

/// Validated values for inserting or updating a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: ModelYear,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    pub price: Price,
    pub miles: Mileage,
    pub color: String,
    pub classification_id: ClassificationId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_vehicle_uses_column_names() {
        let row = ClassifiedVehicle {
            vehicle: Vehicle {
                id: InventoryId::new(3),
                make: "Jeep".to_owned(),
                model: "Wrangler".to_owned(),
                year: ModelYear::new(2019),
                description: "Rugged".to_owned(),
                image: "/images/vehicles/wrangler.jpg".to_owned(),
                thumbnail: "/images/vehicles/wrangler-tn.jpg".to_owned(),
                price: Price::new(28_045),
                miles: Mileage::new(41_205),
                color: "Yellow".to_owned(),
                classification_id: ClassificationId::new(1),
            },
            classification_name: "SUV".to_owned(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["inv_id"], 3);
        assert_eq!(json["inv_make"], "Jeep");
        assert_eq!(json["inv_price"], 28_045);
        assert_eq!(json["inv_miles"], 41_205);
        assert_eq!(json["classification_id"], 1);
        assert_eq!(json["classification_name"], "SUV");
    }
}
