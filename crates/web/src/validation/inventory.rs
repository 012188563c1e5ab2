//! Inventory and classification form bodies.
//!
//! Numeric fields arrive as text. They are checked by the rule set and only
//! converted by [`InventoryForm::to_vehicle`] after validation passed, so a
//! re-rendered form always echoes exactly what was submitted.

use std::sync::LazyLock;

use axum::{http::StatusCode, response::Response};
use serde::Deserialize;

use cse_motors_core::{ClassificationId, InventoryId, Mileage, ModelYear, Price};

use super::account::trim_in_place;
use super::{FieldErrors, FieldRules, FormFields, Rule, RuleSet, ValidatedForm};
use crate::middleware::RequestContext;
use crate::models::{Vehicle, VehicleInput};
use crate::routes::inventory as views;
use crate::state::AppState;

const YEAR_MESSAGE: &str = "Please provide a valid year.";
const PRICE_MESSAGE: &str = "Please provide a valid price.";
const MILES_MESSAGE: &str = "Please provide the mileage.";
const CLASSIFICATION_MESSAGE: &str = "Please select a classification.";
const INVALID_VEHICLE_MESSAGE: &str = "Invalid vehicle id.";

// =============================================================================
// Classification
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassificationForm {
    pub classification_name: String,
}

impl FormFields for ClassificationForm {
    fn field(&self, name: &str) -> Option<&str> {
        (name == "classification_name").then_some(self.classification_name.as_str())
    }
}

impl ValidatedForm for ClassificationForm {
    fn rules() -> &'static RuleSet {
        static RULES: &RuleSet = &[FieldRules {
            field: "classification_name",
            rules: &[
                Rule::Required("Please provide a classification name."),
                Rule::Alphanumeric(
                    "Classification name must be alphanumeric with no spaces or special characters.",
                ),
            ],
        }];
        RULES
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.classification_name);
    }

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        views::add_classification_view(ctx, &self.classification_name, errors, StatusCode::OK)
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// Vehicle fields as submitted by the add and edit forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryForm {
    pub inv_id: String,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: String,
    pub inv_miles: String,
    pub inv_color: String,
    pub classification_id: String,
}

static VEHICLE_RULES: &[FieldRules] = &[
    FieldRules {
        field: "inv_make",
        rules: &[Rule::Required("Please provide a make.")],
    },
    FieldRules {
        field: "inv_model",
        rules: &[Rule::Required("Please provide a model.")],
    },
    FieldRules {
        field: "inv_year",
        rules: &[
            Rule::Required(YEAR_MESSAGE),
            Rule::Numeric(YEAR_MESSAGE),
            Rule::Length {
                min: 4,
                max: 4,
                message: YEAR_MESSAGE,
            },
        ],
    },
    FieldRules {
        field: "inv_description",
        rules: &[Rule::Required("Please provide a description.")],
    },
    FieldRules {
        field: "inv_image",
        rules: &[Rule::Required("Please provide an image path.")],
    },
    FieldRules {
        field: "inv_thumbnail",
        rules: &[Rule::Required("Please provide a thumbnail path.")],
    },
    FieldRules {
        field: "inv_price",
        rules: &[Rule::Required(PRICE_MESSAGE), Rule::Numeric(PRICE_MESSAGE)],
    },
    FieldRules {
        field: "inv_miles",
        rules: &[Rule::Required(MILES_MESSAGE), Rule::Numeric(MILES_MESSAGE)],
    },
    FieldRules {
        field: "inv_color",
        rules: &[Rule::Required("Please provide a color.")],
    },
    FieldRules {
        field: "classification_id",
        rules: &[
            Rule::Required(CLASSIFICATION_MESSAGE),
            Rule::Numeric(CLASSIFICATION_MESSAGE),
        ],
    },
];

impl InventoryForm {
    /// Convert validated text fields into typed vehicle values.
    ///
    /// # Errors
    ///
    /// Returns field errors for values the rule set accepts but the types
    /// reject (a year outside `i32` range, a zero classification ID).
    pub fn to_vehicle(&self) -> Result<VehicleInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let year = ModelYear::parse(&self.inv_year)
            .inspect_err(|_| errors.insert("inv_year", YEAR_MESSAGE))
            .ok();
        let price = Price::parse(&self.inv_price)
            .inspect_err(|_| errors.insert("inv_price", PRICE_MESSAGE))
            .ok();
        let miles = Mileage::parse(&self.inv_miles)
            .inspect_err(|_| errors.insert("inv_miles", MILES_MESSAGE))
            .ok();
        let classification_id = ClassificationId::parse(&self.classification_id)
            .inspect_err(|_| errors.insert("classification_id", CLASSIFICATION_MESSAGE))
            .ok();

        match (year, price, miles, classification_id) {
            (Some(year), Some(price), Some(miles), Some(classification_id)) => Ok(VehicleInput {
                make: self.inv_make.clone(),
                model: self.inv_model.clone(),
                year,
                description: self.inv_description.clone(),
                image: self.inv_image.clone(),
                thumbnail: self.inv_thumbnail.clone(),
                price,
                miles,
                color: self.inv_color.clone(),
                classification_id,
            }),
            _ => Err(errors),
        }
    }

    fn trim(&mut self) {
        for value in [
            &mut self.inv_id,
            &mut self.inv_make,
            &mut self.inv_model,
            &mut self.inv_year,
            &mut self.inv_description,
            &mut self.inv_image,
            &mut self.inv_thumbnail,
            &mut self.inv_price,
            &mut self.inv_miles,
            &mut self.inv_color,
            &mut self.classification_id,
        ] {
            trim_in_place(value);
        }
    }
}

impl From<&Vehicle> for InventoryForm {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            inv_id: vehicle.id.to_string(),
            inv_make: vehicle.make.clone(),
            inv_model: vehicle.model.clone(),
            inv_year: vehicle.year.to_string(),
            inv_description: vehicle.description.clone(),
            inv_image: vehicle.image.clone(),
            inv_thumbnail: vehicle.thumbnail.clone(),
            inv_price: vehicle.price.dollars().to_string(),
            inv_miles: vehicle.miles.miles().to_string(),
            inv_color: vehicle.color.clone(),
            classification_id: vehicle.classification_id.to_string(),
        }
    }
}

impl FormFields for InventoryForm {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "inv_id" => &self.inv_id,
            "inv_make" => &self.inv_make,
            "inv_model" => &self.inv_model,
            "inv_year" => &self.inv_year,
            "inv_description" => &self.inv_description,
            "inv_image" => &self.inv_image,
            "inv_thumbnail" => &self.inv_thumbnail,
            "inv_price" => &self.inv_price,
            "inv_miles" => &self.inv_miles,
            "inv_color" => &self.inv_color,
            "classification_id" => &self.classification_id,
            _ => return None,
        };
        Some(value)
    }
}

impl ValidatedForm for InventoryForm {
    fn rules() -> &'static RuleSet {
        VEHICLE_RULES
    }

    fn normalize(&mut self) {
        self.trim();
    }

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        views::add_inventory_view(ctx, &self, errors, StatusCode::OK)
    }
}

/// The edit form: vehicle fields plus the hidden `inv_id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct UpdateInventoryForm(pub InventoryForm);

impl UpdateInventoryForm {
    /// The vehicle being edited.
    ///
    /// # Errors
    ///
    /// Returns the `inv_id` field error if the hidden field is not a valid ID.
    pub fn inventory_id(&self) -> Result<InventoryId, FieldErrors> {
        InventoryId::parse(&self.0.inv_id)
            .map_err(|_| FieldErrors::single("inv_id", INVALID_VEHICLE_MESSAGE))
    }
}

impl FormFields for UpdateInventoryForm {
    fn field(&self, name: &str) -> Option<&str> {
        self.0.field(name)
    }
}

impl ValidatedForm for UpdateInventoryForm {
    fn rules() -> &'static RuleSet {
        static RULES: LazyLock<Vec<FieldRules>> = LazyLock::new(|| {
            let mut rules = vec![FieldRules {
                field: "inv_id",
                rules: &[
                    Rule::Required(INVALID_VEHICLE_MESSAGE),
                    Rule::Numeric(INVALID_VEHICLE_MESSAGE),
                ],
            }];
            rules.extend_from_slice(VEHICLE_RULES);
            rules
        });
        &RULES
    }

    fn normalize(&mut self) {
        self.0.trim();
    }

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        views::edit_inventory_view(ctx, &self.0, errors, StatusCode::OK)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::validate;

    fn camaro() -> InventoryForm {
        InventoryForm {
            inv_id: String::new(),
            inv_make: "Chevy".to_owned(),
            inv_model: "Camaro".to_owned(),
            inv_year: "2018".to_owned(),
            inv_description: "Fast".to_owned(),
            inv_image: "/images/vehicles/camaro.jpg".to_owned(),
            inv_thumbnail: "/images/vehicles/camaro-tn.jpg".to_owned(),
            inv_price: "25000".to_owned(),
            inv_miles: "12345".to_owned(),
            inv_color: "Black".to_owned(),
            classification_id: "2".to_owned(),
        }
    }

    #[test]
    fn test_valid_vehicle_converts() {
        let form = camaro();
        assert!(validate(&form, InventoryForm::rules()).is_empty());

        let input = form.to_vehicle().unwrap();
        assert_eq!(input.year, ModelYear::new(2018));
        assert_eq!(input.price, Price::new(25_000));
        assert_eq!(input.miles, Mileage::new(12_345));
        assert_eq!(input.classification_id, ClassificationId::new(2));
    }

    #[test]
    fn test_year_must_be_four_digits() {
        for bad in ["", "18", "20188", "20x8"] {
            let mut form = camaro();
            form.inv_year = bad.to_owned();
            let errors = validate(&form, InventoryForm::rules());
            assert_eq!(errors.get("inv_year"), Some(YEAR_MESSAGE), "year {bad:?}");
        }
    }

    #[test]
    fn test_each_missing_field_has_its_message() {
        let errors = validate(&InventoryForm::default(), InventoryForm::rules());
        assert_eq!(errors.get("inv_make"), Some("Please provide a make."));
        assert_eq!(errors.get("inv_price"), Some(PRICE_MESSAGE));
        assert_eq!(errors.get("inv_miles"), Some(MILES_MESSAGE));
        assert_eq!(errors.get("classification_id"), Some(CLASSIFICATION_MESSAGE));
        assert_eq!(errors.len(), 10);
    }

    #[test]
    fn test_update_requires_inventory_id() {
        let form = UpdateInventoryForm(camaro());
        let errors = validate(&form, UpdateInventoryForm::rules());
        assert_eq!(errors.get("inv_id"), Some(INVALID_VEHICLE_MESSAGE));
        assert_eq!(errors.len(), 1);

        let mut form = UpdateInventoryForm(camaro());
        form.0.inv_id = "12".to_owned();
        assert!(validate(&form, UpdateInventoryForm::rules()).is_empty());
        assert_eq!(form.inventory_id().unwrap(), InventoryId::new(12));
    }

    #[test]
    fn test_zero_classification_fails_conversion() {
        let mut form = camaro();
        form.classification_id = "0".to_owned();
        let errors = form.to_vehicle().unwrap_err();
        assert_eq!(errors.get("classification_id"), Some(CLASSIFICATION_MESSAGE));
    }

    #[test]
    fn test_classification_name_rules() {
        let form = ClassificationForm {
            classification_name: "Big Rig".to_owned(),
        };
        let errors = validate(&form, ClassificationForm::rules());
        assert!(errors.get("classification_name").is_some());

        let form = ClassificationForm {
            classification_name: "Truck".to_owned(),
        };
        assert!(validate(&form, ClassificationForm::rules()).is_empty());
    }
}
