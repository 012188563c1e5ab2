//! Declarative form validation.
//!
//! Each form declares a static [`RuleSet`]: for every field, an ordered list
//! of [`Rule`]s. Only the first failing rule per field is reported. Handlers
//! receive forms through the [`Validated`] extractor, which re-renders the
//! originating page (HTTP 200) when any rule fails, so the handler body and
//! the database are never reached with invalid input.

pub mod account;
pub mod inventory;

use std::future::Future;

use axum::{
    Form,
    extract::{FromRequest, FromRequestParts, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use cse_motors_core::Email;

use crate::middleware::RequestContext;
use crate::state::AppState;

// =============================================================================
// Rules
// =============================================================================

/// A single field check with the message shown when it fails.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Non-empty after trimming.
    Required(&'static str),
    /// ASCII digits only (a whole number that fits in `i64`).
    Numeric(&'static str),
    /// Character count within `min..=max`.
    Length {
        min: usize,
        max: usize,
        message: &'static str,
    },
    /// Parses as an [`Email`].
    Email(&'static str),
    /// At least 12 characters with a lowercase, uppercase, digit and symbol.
    StrongPassword(&'static str),
    /// ASCII letters and digits only, no spaces.
    Alphanumeric(&'static str),
    /// Equal to another field of the same form.
    Matches {
        other: &'static str,
        message: &'static str,
    },
}

/// Minimum password length for [`Rule::StrongPassword`].
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Rules for one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Rules for a whole form.
pub type RuleSet = [FieldRules];

/// Whether a password satisfies the strength policy.
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<i64>().is_ok()
}

impl Rule {
    /// Returns the failure message, or `None` when the value passes.
    fn check<F: FormFields + ?Sized>(&self, value: &str, form: &F) -> Option<&'static str> {
        let failed = match *self {
            Self::Required(_) => value.trim().is_empty(),
            Self::Numeric(_) => !is_numeric(value.trim()),
            Self::Length { min, max, .. } => {
                let len = value.trim().chars().count();
                len < min || len > max
            }
            Self::Email(_) => Email::parse(value).is_err(),
            Self::StrongPassword(_) => !is_strong_password(value),
            Self::Alphanumeric(_) => {
                value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            Self::Matches { other, .. } => form.field(other) != Some(value),
        };
        failed.then_some(self.message())
    }

    const fn message(&self) -> &'static str {
        match *self {
            Self::Required(m)
            | Self::Numeric(m)
            | Self::Email(m)
            | Self::StrongPassword(m)
            | Self::Alphanumeric(m)
            | Self::Length { message: m, .. }
            | Self::Matches { message: m, .. } => m,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Per-field error messages, at most one per field, in rule-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, &'static str)>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message.
    #[must_use]
    pub fn single(field: &'static str, message: &'static str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record a message unless the field already has one.
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        if self.get(field).is_none() {
            self.entries.push((field, message));
        }
    }

    /// The message for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| *message)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All messages in order, for the summary list above a form.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, message)| *message)
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Field lookup by name, used by the rule engine.
pub trait FormFields {
    fn field(&self, name: &str) -> Option<&str>;
}

/// Run a rule set against a form.
#[must_use]
pub fn validate<F: FormFields + ?Sized>(form: &F, rules: &RuleSet) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field_rules in rules {
        let value = form.field(field_rules.field).unwrap_or_default();
        if let Some(message) = field_rules
            .rules
            .iter()
            .find_map(|rule| rule.check(value, form))
        {
            errors.insert(field_rules.field, message);
        }
    }
    errors
}

/// A form body with declarative rules and a page to re-render on failure.
pub trait ValidatedForm: DeserializeOwned + FormFields + Send + Sized + 'static {
    /// Rules checked before the handler runs.
    fn rules() -> &'static RuleSet;

    /// Sanitize input before validation (trim text fields).
    fn normalize(&mut self);

    /// Re-render the originating form with messages and the submitted values.
    fn reject(
        self,
        ctx: RequestContext,
        errors: FieldErrors,
        state: &AppState,
    ) -> impl Future<Output = Response> + Send;
}

/// Extractor yielding the request context and a form that passed validation.
///
/// Must be the last handler argument since it consumes the body.
pub struct Validated<F>(pub RequestContext, pub F);

impl<F: ValidatedForm> FromRequest<AppState> for Validated<F> {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let ctx = RequestContext::from_request_parts(&mut parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let req = Request::from_parts(parts, body);
        let mut form = match Form::<F>::from_request(req, state).await {
            Ok(Form(form)) => form,
            Err(rejection) => {
                // The context already took the flash queue out of the session.
                if let Err(e) = ctx.keep_flash().await {
                    tracing::warn!(error = %e, "Failed to restore flash after form rejection");
                }
                return Err(rejection.into_response());
            }
        };

        form.normalize();
        let errors = validate(&form, F::rules());
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Form failed validation");
            return Err(form.reject(ctx, errors, state).await);
        }

        Ok(Self(ctx, form))
    }
}
