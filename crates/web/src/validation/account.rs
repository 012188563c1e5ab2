//! Account form bodies and their rule sets.

use axum::{http::StatusCode, response::Response};
use serde::Deserialize;

use cse_motors_core::Email;

use super::{FieldErrors, FieldRules, FormFields, Rule, RuleSet, ValidatedForm};
use crate::middleware::RequestContext;
use crate::routes::account as views;
use crate::state::AppState;

const EMAIL_MESSAGE: &str = "A valid email is required.";

const FIRST_NAME_RULES: FieldRules = FieldRules {
    field: "account_firstname",
    rules: &[Rule::Required("Please provide a first name.")],
};

const LAST_NAME_RULES: FieldRules = FieldRules {
    field: "account_lastname",
    rules: &[Rule::Required("Please provide a last name.")],
};

const EMAIL_RULES: FieldRules = FieldRules {
    field: "account_email",
    rules: &[Rule::Required(EMAIL_MESSAGE), Rule::Email(EMAIL_MESSAGE)],
};

fn parse_email(raw: &str) -> Result<Email, FieldErrors> {
    Email::parse(raw).map_err(|_| FieldErrors::single("account_email", EMAIL_MESSAGE))
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_password: String,
}

impl RegisterForm {
    /// The validated email.
    ///
    /// # Errors
    ///
    /// Returns the email field error if the address does not parse.
    pub fn email(&self) -> Result<Email, FieldErrors> {
        parse_email(&self.account_email)
    }
}

impl FormFields for RegisterForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "account_firstname" => Some(&self.account_firstname),
            "account_lastname" => Some(&self.account_lastname),
            "account_email" => Some(&self.account_email),
            "account_password" => Some(&self.account_password),
            _ => None,
        }
    }
}

impl ValidatedForm for RegisterForm {
    fn rules() -> &'static RuleSet {
        static RULES: &RuleSet = &[
            FIRST_NAME_RULES,
            LAST_NAME_RULES,
            EMAIL_RULES,
            FieldRules {
                field: "account_password",
                rules: &[
                    Rule::Required("Password is required."),
                    Rule::StrongPassword("Password does not meet requirements."),
                ],
            },
        ];
        RULES
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.account_firstname);
        trim_in_place(&mut self.account_lastname);
        trim_in_place(&mut self.account_email);
    }

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        views::register_view(ctx, &self, errors, StatusCode::OK)
    }
}

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub account_email: String,
    pub account_password: String,
}

impl LoginForm {
    /// The validated email.
    ///
    /// # Errors
    ///
    /// Returns the email field error if the address does not parse.
    pub fn email(&self) -> Result<Email, FieldErrors> {
        parse_email(&self.account_email)
    }
}

impl FormFields for LoginForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "account_email" => Some(&self.account_email),
            "account_password" => Some(&self.account_password),
            _ => None,
        }
    }
}

impl ValidatedForm for LoginForm {
    fn rules() -> &'static RuleSet {
        static RULES: &RuleSet = &[
            EMAIL_RULES,
            FieldRules {
                field: "account_password",
                rules: &[Rule::Required("Password is required.")],
            },
        ];
        RULES
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.account_email);
    }

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        views::login_view(ctx, &self.account_email, errors, StatusCode::OK)
    }
}

// =============================================================================
// Account Maintenance
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAccountForm {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
}

impl UpdateAccountForm {
    /// The validated email.
    ///
    /// # Errors
    ///
    /// Returns the email field error if the address does not parse.
    pub fn email(&self) -> Result<Email, FieldErrors> {
        parse_email(&self.account_email)
    }
}

impl FormFields for UpdateAccountForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "account_firstname" => Some(&self.account_firstname),
            "account_lastname" => Some(&self.account_lastname),
            "account_email" => Some(&self.account_email),
            _ => None,
        }
    }
}

impl ValidatedForm for UpdateAccountForm {
    fn rules() -> &'static RuleSet {
        static RULES: &RuleSet = &[FIRST_NAME_RULES, LAST_NAME_RULES, EMAIL_RULES];
        RULES
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.account_firstname);
        trim_in_place(&mut self.account_lastname);
        trim_in_place(&mut self.account_email);
    }

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        let profile = views::ProfileValues::from(&self);
        views::update_view(ctx, profile, errors, FieldErrors::new(), StatusCode::OK)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl FormFields for ChangePasswordForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "old_password" => Some(&self.old_password),
            "new_password" => Some(&self.new_password),
            "confirm_password" => Some(&self.confirm_password),
            _ => None,
        }
    }
}

impl ValidatedForm for ChangePasswordForm {
    fn rules() -> &'static RuleSet {
        static RULES: &RuleSet = &[
            FieldRules {
                field: "old_password",
                rules: &[Rule::Required("Old password is required.")],
            },
            FieldRules {
                field: "new_password",
                rules: &[
                    Rule::Required("New password is required."),
                    Rule::StrongPassword("New password does not meet requirements."),
                ],
            },
            FieldRules {
                field: "confirm_password",
                rules: &[Rule::Matches {
                    other: "new_password",
                    message: "Passwords do not match.",
                }],
            },
        ];
        RULES
    }

    // Passwords are compared byte for byte.
    fn normalize(&mut self) {}

    async fn reject(self, ctx: RequestContext, errors: FieldErrors, _state: &AppState) -> Response {
        let profile = ctx
            .claims()
            .map(views::ProfileValues::from)
            .unwrap_or_default();
        views::update_view(ctx, profile, FieldErrors::new(), errors, StatusCode::OK)
    }
}

pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
}
