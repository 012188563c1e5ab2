//! Home page and the deliberate failure route.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequestContext;
use crate::views::Layout;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomePage {
    pub layout: Layout,
}

/// Display the home page.
pub async fn home(mut ctx: RequestContext) -> Response {
    HomePage {
        layout: ctx.layout("Home"),
    }
    .into_response()
}

/// Always fails, exercising the 500 page and error reporting.
pub async fn intentional_error() -> Result<Response> {
    Err(AppError::Internal(
        "This is an intentional 500 error.".to_string(),
    ))
}
