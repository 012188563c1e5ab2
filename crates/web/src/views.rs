//! Page layout and reusable HTML fragments.
//!
//! Fragments are askama component templates rendered to `String` and
//! embedded into pages with `|safe`. All interpolated values are escaped by
//! askama, so make, model, description and classification names can never
//! inject markup.

use askama::Template;
use askama_web::WebTemplate;

use crate::filters;
use crate::models::{Classification, ClassifiedVehicle, FlashMessage, Vehicle};
use crate::services::auth::AuthClaims;

// =============================================================================
// Layout
// =============================================================================

/// Signed-in account summary shown in the header.
#[derive(Debug, Clone)]
pub struct AccountBadge {
    pub first_name: String,
    pub can_manage_inventory: bool,
}

impl From<&AuthClaims> for AccountBadge {
    fn from(claims: &AuthClaims) -> Self {
        Self {
            first_name: claims.first_name.clone(),
            can_manage_inventory: claims.can_manage_inventory(),
        }
    }
}

/// Data every full page needs: title, navigation, flash and header account.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    /// Pre-rendered navigation list (trusted markup).
    pub nav: String,
    pub flash: Vec<FlashMessage>,
    pub account: Option<AccountBadge>,
}

impl Layout {
    /// A layout that needs no database access, used for server error pages.
    #[must_use]
    pub fn bare(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nav: navigation(&[]).unwrap_or_default(),
            flash: Vec::new(),
            account: None,
        }
    }
}

/// Generic error page (404, 403, 500).
#[derive(Template, WebTemplate)]
#[template(path = "errors/error.html")]
pub struct ErrorPage {
    pub layout: Layout,
    pub message: String,
}

// =============================================================================
// Fragments
// =============================================================================

#[derive(Template)]
#[template(path = "partials/nav.html")]
struct NavFragment<'a> {
    classifications: &'a [Classification],
}

#[derive(Template)]
#[template(path = "partials/grid.html")]
struct GridFragment<'a> {
    vehicles: &'a [ClassifiedVehicle],
}

#[derive(Template)]
#[template(path = "partials/detail.html")]
struct DetailFragment<'a> {
    vehicle: &'a Vehicle,
}

struct SelectOption<'a> {
    value: String,
    label: &'a str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "partials/classification_select.html")]
struct ClassificationSelectFragment<'a> {
    options: Vec<SelectOption<'a>>,
}

/// Navigation list: Home followed by one link per classification.
///
/// # Errors
///
/// Returns an askama error if rendering fails.
pub fn navigation(classifications: &[Classification]) -> askama::Result<String> {
    NavFragment { classifications }.render()
}

/// Grid of vehicle cards, or a notice when there are none.
///
/// # Errors
///
/// Returns an askama error if rendering fails.
pub fn vehicle_grid(vehicles: &[ClassifiedVehicle]) -> askama::Result<String> {
    GridFragment { vehicles }.render()
}

/// Full detail block for one vehicle.
///
/// # Errors
///
/// Returns an askama error if rendering fails.
pub fn vehicle_detail(vehicle: &Vehicle) -> askama::Result<String> {
    DetailFragment { vehicle }.render()
}

/// `<select name="classification_id">` with the submitted value preselected.
///
/// `selected` is the raw form value so a re-rendered form keeps the choice.
///
/// # Errors
///
/// Returns an askama error if rendering fails.
pub fn classification_select(
    classifications: &[Classification],
    selected: &str,
) -> askama::Result<String> {
    let options = classifications
        .iter()
        .map(|c| {
            let value = c.id.to_string();
            SelectOption {
                selected: value == selected.trim(),
                value,
                label: &c.name,
            }
        })
        .collect();
    ClassificationSelectFragment { options }.render()
}
