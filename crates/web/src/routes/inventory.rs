//! Inventory route handlers.
//!
//! Public browsing by classification and vehicle detail, the JSON listing
//! used by the management page, and the employee-only management views and
//! mutations.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use cse_motors_core::{ClassificationId, InventoryId};

use crate::db::{ClassificationRepository, InventoryRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequestContext, RequireEmployee};
use crate::models::{ClassifiedVehicle, FlashMessage, Vehicle};
use crate::state::AppState;
use crate::validation::inventory::{ClassificationForm, InventoryForm, UpdateInventoryForm};
use crate::validation::{FieldErrors, Validated};
use crate::views::{self, Layout};

/// Landing page after every management mutation.
const MANAGEMENT_PATH: &str = "/inv/management";

const NO_VEHICLES: &str = "Sorry, no matching vehicles could be found.";
const NO_DETAILS: &str = "Sorry, the requested vehicle details could not be found.";
const UNKNOWN_CLASSIFICATION: &str = "Please select a classification.";

// =============================================================================
// Templates
// =============================================================================

/// Vehicles of one classification.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/classification.html")]
pub struct ClassificationPage {
    pub layout: Layout,
    pub grid: String,
}

/// A single vehicle.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/detail.html")]
pub struct DetailPage {
    pub layout: Layout,
    pub detail: String,
}

/// Inventory management landing page.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/management.html")]
pub struct ManagementPage {
    pub layout: Layout,
    pub classification_select: String,
    /// Server-rendered listing when `?classification_id=` is given.
    pub listing: Option<Vec<ClassifiedVehicle>>,
}

/// New classification form.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/add-classification.html")]
pub struct AddClassificationPage {
    pub layout: Layout,
    pub classification_name: String,
    pub errors: FieldErrors,
}

/// New vehicle form.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/add-inventory.html")]
pub struct AddInventoryPage {
    pub layout: Layout,
    pub form: InventoryForm,
    pub classification_select: String,
    pub errors: FieldErrors,
}

/// Edit vehicle form.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/edit.html")]
pub struct EditInventoryPage {
    pub layout: Layout,
    pub form: InventoryForm,
    pub classification_select: String,
    pub errors: FieldErrors,
}

/// Delete confirmation.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/delete.html")]
pub struct DeletePage {
    pub layout: Layout,
    pub inv_id: String,
    pub summary: DeleteSummary,
}

/// Read-only vehicle fields shown on the delete confirmation and posted back
/// with it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteSummary {
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_price: String,
}

impl From<&Vehicle> for DeleteSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            inv_make: vehicle.make.clone(),
            inv_model: vehicle.model.clone(),
            inv_year: vehicle.year.to_string(),
            inv_price: vehicle.price.to_string(),
        }
    }
}

/// Query for the management page's server-rendered listing.
#[derive(Debug, Deserialize)]
pub struct ManagementQuery {
    pub classification_id: Option<String>,
}

fn render_or_500(page: askama::Result<String>, status: StatusCode) -> Response {
    match page {
        Ok(html) => (status, axum::response::Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

fn vehicle_title(prefix: &str, form: &InventoryForm) -> String {
    let name = format!("{} {}", form.inv_make, form.inv_model);
    let name = name.trim();
    if name.is_empty() {
        format!("{prefix} Inventory")
    } else {
        format!("{prefix} {name}")
    }
}

pub(crate) fn add_classification_view(
    mut ctx: RequestContext,
    classification_name: &str,
    errors: FieldErrors,
    status: StatusCode,
) -> Response {
    let page = AddClassificationPage {
        layout: ctx.layout("Add New Classification"),
        classification_name: classification_name.to_owned(),
        errors,
    };
    (status, page).into_response()
}

pub(crate) fn add_inventory_view(
    mut ctx: RequestContext,
    form: &InventoryForm,
    errors: FieldErrors,
    status: StatusCode,
) -> Response {
    let select = views::classification_select(ctx.classifications(), &form.classification_id);
    let page = select.and_then(|classification_select| {
        AddInventoryPage {
            layout: ctx.layout("Add New Vehicle"),
            form: form.clone(),
            classification_select,
            errors,
        }
        .render()
    });
    render_or_500(page, status)
}

pub(crate) fn edit_inventory_view(
    mut ctx: RequestContext,
    form: &InventoryForm,
    errors: FieldErrors,
    status: StatusCode,
) -> Response {
    let select = views::classification_select(ctx.classifications(), &form.classification_id);
    let page = select.and_then(|classification_select| {
        EditInventoryPage {
            layout: ctx.layout(vehicle_title("Edit", form)),
            form: form.clone(),
            classification_select,
            errors,
        }
        .render()
    });
    render_or_500(page, status)
}

fn delete_view(
    mut ctx: RequestContext,
    inv_id: &str,
    summary: DeleteSummary,
    status: StatusCode,
) -> Response {
    let title = format!("Delete {} {}", summary.inv_make, summary.inv_model);
    let page = DeletePage {
        layout: ctx.layout(title.trim()),
        inv_id: inv_id.to_owned(),
        summary,
    };
    (status, page).into_response()
}

/// Log and report a storage failure that is shown to the user as a
/// re-rendered form rather than the error page.
fn report(error: RepositoryError, what: &'static str) {
    let error = AppError::from(error);
    let event_id = sentry::capture_error(&error);
    tracing::error!(error = %error, sentry_event_id = %event_id, "{what} failed");
}

// =============================================================================
// Public Views
// =============================================================================

/// Grid of vehicles in a classification.
#[instrument(skip(state, ctx))]
pub async fn by_classification(
    State(state): State<AppState>,
    Path(classification_id): Path<String>,
    mut ctx: RequestContext,
) -> Result<Response> {
    let Ok(id) = ClassificationId::parse(&classification_id) else {
        return Ok(ctx.not_found(NO_VEHICLES));
    };

    let vehicles = InventoryRepository::new(state.pool())
        .list_by_classification(id)
        .await?;

    let Some(first) = vehicles.first() else {
        return Ok(ctx.not_found(NO_VEHICLES));
    };

    let title = format!("{} vehicles", first.classification_name);
    let grid = views::vehicle_grid(&vehicles)?;
    Ok(ClassificationPage {
        layout: ctx.layout(title),
        grid,
    }
    .into_response())
}

/// Detail page for one vehicle.
#[instrument(skip(state, ctx))]
pub async fn detail(
    State(state): State<AppState>,
    Path(inv_id): Path<String>,
    mut ctx: RequestContext,
) -> Result<Response> {
    let Ok(id) = InventoryId::parse(&inv_id) else {
        return Ok(ctx.not_found(NO_DETAILS));
    };

    let Some(vehicle) = InventoryRepository::new(state.pool()).get_by_id(id).await? else {
        return Ok(ctx.not_found(NO_DETAILS));
    };

    let detail = views::vehicle_detail(&vehicle)?;
    Ok(DetailPage {
        layout: ctx.layout(vehicle.display_name()),
        detail,
    }
    .into_response())
}

/// JSON listing of a classification for the management page script.
///
/// An unknown or empty classification is `[]`.
#[instrument(skip(state))]
pub async fn inventory_json(
    State(state): State<AppState>,
    Path(classification_id): Path<String>,
) -> Result<Json<Vec<ClassifiedVehicle>>> {
    let id = ClassificationId::parse(&classification_id)
        .map_err(|_| AppError::BadRequest("Invalid classification id.".to_string()))?;

    let vehicles = InventoryRepository::new(state.pool())
        .list_by_classification(id)
        .await?;

    Ok(Json(vehicles))
}

// =============================================================================
// Management
// =============================================================================

/// Management landing page.
#[instrument(skip_all)]
pub async fn management(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Query(query): Query<ManagementQuery>,
    mut ctx: RequestContext,
) -> Result<Response> {
    let selected = query.classification_id.unwrap_or_default();

    let listing = match ClassificationId::parse(&selected) {
        Ok(id) => Some(
            InventoryRepository::new(state.pool())
                .list_by_classification(id)
                .await?,
        ),
        Err(_) => None,
    };

    let classification_select = views::classification_select(ctx.classifications(), &selected)?;
    Ok(ManagementPage {
        layout: ctx.layout("Vehicle Management"),
        classification_select,
        listing,
    }
    .into_response())
}

/// New classification form.
pub async fn add_classification_page(
    RequireEmployee(_claims): RequireEmployee,
    ctx: RequestContext,
) -> Response {
    add_classification_view(ctx, "", FieldErrors::new(), StatusCode::OK)
}

/// Insert a classification.
#[instrument(skip_all)]
pub async fn add_classification(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Validated(ctx, form): Validated<ClassificationForm>,
) -> Result<Response> {
    match ClassificationRepository::new(state.pool())
        .create(&form.classification_name)
        .await
    {
        Ok(classification) => {
            tracing::info!(
                classification_id = %classification.id,
                name = %classification.name,
                "Classification added"
            );
            ctx.redirect_with(
                MANAGEMENT_PATH,
                FlashMessage::notice(format!(
                    "The {} classification was successfully added.",
                    classification.name
                )),
            )
            .await
        }
        Err(RepositoryError::Conflict(_)) => Ok(add_classification_view(
            ctx,
            &form.classification_name,
            FieldErrors::single("classification_name", "That classification already exists."),
            StatusCode::OK,
        )),
        Err(e) => Err(e.into()),
    }
}

/// New vehicle form.
pub async fn add_inventory_page(
    RequireEmployee(_claims): RequireEmployee,
    ctx: RequestContext,
) -> Response {
    add_inventory_view(ctx, &InventoryForm::default(), FieldErrors::new(), StatusCode::OK)
}

/// Insert a vehicle.
#[instrument(skip_all)]
pub async fn add_inventory(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Validated(mut ctx, form): Validated<InventoryForm>,
) -> Result<Response> {
    let input = match form.to_vehicle() {
        Ok(input) => input,
        Err(errors) => return Ok(add_inventory_view(ctx, &form, errors, StatusCode::OK)),
    };

    match InventoryRepository::new(state.pool()).create(&input).await {
        Ok(id) => {
            tracing::info!(inv_id = %id, "Vehicle added");
            ctx.redirect_with(
                MANAGEMENT_PATH,
                FlashMessage::notice(format!(
                    "The {} {} was successfully added.",
                    input.make, input.model
                )),
            )
            .await
        }
        Err(RepositoryError::InvalidReference(_)) => Ok(add_inventory_view(
            ctx,
            &form,
            FieldErrors::single("classification_id", UNKNOWN_CLASSIFICATION),
            StatusCode::OK,
        )),
        Err(e) => {
            report(e, "Adding vehicle");
            ctx.notice(FlashMessage::error("Sorry, adding the vehicle failed."));
            Ok(add_inventory_view(
                ctx,
                &form,
                FieldErrors::new(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Edit form prefilled from the database.
#[instrument(skip(state, ctx))]
pub async fn edit_page(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Path(inv_id): Path<String>,
    ctx: RequestContext,
) -> Result<Response> {
    let Ok(id) = InventoryId::parse(&inv_id) else {
        return Ok(ctx.not_found(NO_DETAILS));
    };

    let Some(vehicle) = InventoryRepository::new(state.pool()).get_by_id(id).await? else {
        return Ok(ctx.not_found(NO_DETAILS));
    };

    Ok(edit_inventory_view(
        ctx,
        &InventoryForm::from(&vehicle),
        FieldErrors::new(),
        StatusCode::OK,
    ))
}

/// Replace a vehicle's fields.
#[instrument(skip_all)]
pub async fn update(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Validated(mut ctx, update): Validated<UpdateInventoryForm>,
) -> Result<Response> {
    let parsed = update
        .inventory_id()
        .and_then(|id| update.0.to_vehicle().map(|input| (id, input)));
    let form = update.0;
    let (id, input) = match parsed {
        Ok(parsed) => parsed,
        Err(errors) => return Ok(edit_inventory_view(ctx, &form, errors, StatusCode::OK)),
    };

    match InventoryRepository::new(state.pool()).update(id, &input).await {
        Ok(vehicle) => {
            tracing::info!(inv_id = %vehicle.id, "Vehicle updated");
            ctx.redirect_with(
                MANAGEMENT_PATH,
                FlashMessage::notice(format!(
                    "The {} was successfully updated.",
                    vehicle.display_name()
                )),
            )
            .await
        }
        Err(RepositoryError::NotFound) => {
            ctx.notice(FlashMessage::error(
                "Sorry, the update failed. That vehicle no longer exists.",
            ));
            Ok(edit_inventory_view(
                ctx,
                &form,
                FieldErrors::new(),
                StatusCode::NOT_FOUND,
            ))
        }
        Err(RepositoryError::InvalidReference(_)) => Ok(edit_inventory_view(
            ctx,
            &form,
            FieldErrors::single("classification_id", UNKNOWN_CLASSIFICATION),
            StatusCode::OK,
        )),
        Err(e) => {
            report(e, "Updating vehicle");
            ctx.notice(FlashMessage::error("Sorry, the update failed."));
            Ok(edit_inventory_view(
                ctx,
                &form,
                FieldErrors::new(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Delete confirmation page.
#[instrument(skip(state, ctx))]
pub async fn delete_page(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Path(inv_id): Path<String>,
    ctx: RequestContext,
) -> Result<Response> {
    let Ok(id) = InventoryId::parse(&inv_id) else {
        return Ok(ctx.not_found(NO_DETAILS));
    };

    let Some(vehicle) = InventoryRepository::new(state.pool()).get_by_id(id).await? else {
        return Ok(ctx.not_found(NO_DETAILS));
    };

    Ok(delete_view(
        ctx,
        &inv_id,
        DeleteSummary::from(&vehicle),
        StatusCode::OK,
    ))
}

/// Delete a vehicle.
///
/// The ID is parsed before anything touches the inventory table. The posted
/// summary is only echoed back, so a missing or malformed body is tolerated.
#[instrument(skip(state, ctx, summary))]
pub async fn delete(
    RequireEmployee(_claims): RequireEmployee,
    State(state): State<AppState>,
    Path(inv_id): Path<String>,
    mut ctx: RequestContext,
    summary: std::result::Result<Form<DeleteSummary>, FormRejection>,
) -> Result<Response> {
    let Ok(id) = InventoryId::parse(&inv_id) else {
        tracing::debug!("Rejected delete with invalid id");
        return ctx
            .redirect_with(
                MANAGEMENT_PATH,
                FlashMessage::error("Sorry, the delete failed. That vehicle id is not valid."),
            )
            .await;
    };

    let deleted = InventoryRepository::new(state.pool()).delete(id).await?;
    if deleted == 0 {
        let summary = summary.map(|Form(summary)| summary).unwrap_or_default();
        ctx.notice(FlashMessage::error("Sorry, the delete failed."));
        return Ok(delete_view(ctx, &inv_id, summary, StatusCode::NOT_FOUND));
    }

    tracing::info!(inv_id = %id, "Vehicle deleted");
    ctx.redirect_with(
        MANAGEMENT_PATH,
        FlashMessage::notice("The deletion was successful."),
    )
    .await
}
