//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Database readiness check
//! GET  /static/*                    - Static files
//!
//! # Account
//! GET  /account/login               - Login page
//! POST /account/login               - Login action (sets auth cookie)
//! GET  /account/register            - Registration page
//! POST /account/register            - Registration action
//! GET  /account/logout              - Logout (flush session, clear cookie)
//! GET  /account/                    - Account landing (auth)
//! GET  /account/update              - Profile and password forms (auth)
//! POST /account/update              - Update profile (auth)
//! POST /account/change-password     - Change password (auth)
//!
//! # Inventory
//! GET  /inv/type/{classification_id}        - Vehicle grid
//! GET  /inv/detail/{inv_id}                 - Vehicle detail
//! GET  /inv/getInventory/{classification_id} - JSON listing
//! GET  /inv/intentional-error               - Always 500
//!
//! # Inventory management (employee)
//! GET  /inv/management              - Management landing
//! GET  /inv/add-classification      - New classification form
//! POST /inv/add-classification      - Insert classification
//! GET  /inv/add-inventory           - New vehicle form
//! POST /inv/add-inventory           - Insert vehicle
//! GET  /inv/edit/{inv_id}           - Edit form
//! POST /inv/update                  - Update vehicle
//! GET  /inv/delete/{inv_id}         - Delete confirmation
//! POST /inv/delete/{inv_id}         - Delete vehicle
//! ```

pub mod account;
pub mod home;
pub mod inventory;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use crate::middleware::RequestContext;
use crate::state::AppState;

/// Create the account routes router.
///
/// Paths are absolute so both `/account` and `/account/` reach the landing
/// page.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(account::index))
        .route("/account/", get(account::index))
        .route(
            "/account/login",
            get(account::login_page).post(account::login),
        )
        .route(
            "/account/register",
            get(account::register_page).post(account::register),
        )
        .route("/account/logout", get(account::logout))
        .route(
            "/account/update",
            get(account::update_page).post(account::update_account),
        )
        .route("/account/change-password", post(account::change_password))
}

/// Create the inventory routes router.
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/type/{classification_id}", get(inventory::by_classification))
        .route("/detail/{inv_id}", get(inventory::detail))
        .route(
            "/getInventory/{classification_id}",
            get(inventory::inventory_json),
        )
        .route("/intentional-error", get(home::intentional_error))
        .route("/management", get(inventory::management))
        .route(
            "/add-classification",
            get(inventory::add_classification_page).post(inventory::add_classification),
        )
        .route(
            "/add-inventory",
            get(inventory::add_inventory_page).post(inventory::add_inventory),
        )
        .route("/edit/{inv_id}", get(inventory::edit_page))
        .route("/update", post(inventory::update))
        .route(
            "/delete/{inv_id}",
            get(inventory::delete_page).post(inventory::delete),
        )
}

/// Create all page routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(account_routes())
        .nest("/inv", inventory_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Fallback for unknown paths.
pub async fn not_found(ctx: RequestContext) -> Response {
    ctx.not_found("Sorry, we appear to have lost that page.")
}
