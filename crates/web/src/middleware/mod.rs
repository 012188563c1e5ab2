//! HTTP middleware and request extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction naming)
//! 2. `TraceLayer` (request span with `request_id` and `account_id` fields)
//! 3. Request ID (add unique ID to each request)
//! 4. Panic catcher (panics become the 500 page)
//! 5. Session layer (tower-sessions with `SQLite` store, flash queue only)
//! 6. Security headers (CSP, frame and referrer policy)
//!
//! Identity is not middleware: the auth token is verified lazily by the
//! extractors in [`auth`] and cached in request extensions.

pub mod auth;
pub mod context;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AuthRejection, RequireAuth, RequireEmployee, resolve_identity};
pub use context::RequestContext;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, push_flash, store_flash, take_flash};
