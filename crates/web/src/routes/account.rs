//! Account route handlers.
//!
//! Registration, login/logout, the account landing page and profile and
//! password maintenance. The signed auth cookie is the only identity; it is
//! issued on login and re-issued when the profile changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{RequestContext, RequireAuth};
use crate::models::{Account, FlashMessage};
use crate::services::auth::token::{auth_cookie, clear_auth_cookie};
use crate::services::auth::{AuthClaims, AuthError, AuthService};
use crate::state::AppState;
use crate::validation::account::{
    ChangePasswordForm, LoginForm, RegisterForm, UpdateAccountForm,
};
use crate::validation::{FieldErrors, Validated};
use crate::views::Layout;

/// Where a successful login or account change lands.
const ACCOUNT_HOME: &str = "/account/";

const EMAIL_TAKEN: &str = "Email already exists. Please log in or use a different email.";
const BAD_CREDENTIALS: &str = "Please check your credentials and try again.";

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/login.html")]
pub struct LoginPage {
    pub layout: Layout,
    pub account_email: String,
    pub errors: FieldErrors,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/register.html")]
pub struct RegisterPage {
    pub layout: Layout,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub errors: FieldErrors,
}

/// Account landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/management.html")]
pub struct AccountHomePage {
    pub layout: Layout,
    pub account: Account,
}

/// Values shown in the profile form.
#[derive(Debug, Clone, Default)]
pub struct ProfileValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&Account> for ProfileValues {
    fn from(account: &Account) -> Self {
        Self {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.as_str().to_owned(),
        }
    }
}

impl From<&AuthClaims> for ProfileValues {
    fn from(claims: &AuthClaims) -> Self {
        Self {
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            email: claims.email.clone(),
        }
    }
}

impl From<&UpdateAccountForm> for ProfileValues {
    fn from(form: &UpdateAccountForm) -> Self {
        Self {
            first_name: form.account_firstname.clone(),
            last_name: form.account_lastname.clone(),
            email: form.account_email.clone(),
        }
    }
}

/// Profile and change-password forms.
#[derive(Template, WebTemplate)]
#[template(path = "account/update.html")]
pub struct UpdatePage {
    pub layout: Layout,
    pub profile: ProfileValues,
    pub profile_errors: FieldErrors,
    pub password_errors: FieldErrors,
}

pub(crate) fn login_view(
    mut ctx: RequestContext,
    account_email: &str,
    errors: FieldErrors,
    status: StatusCode,
) -> Response {
    let page = LoginPage {
        layout: ctx.layout("Login"),
        account_email: account_email.to_owned(),
        errors,
    };
    (status, page).into_response()
}

pub(crate) fn register_view(
    mut ctx: RequestContext,
    form: &RegisterForm,
    errors: FieldErrors,
    status: StatusCode,
) -> Response {
    let page = RegisterPage {
        layout: ctx.layout("Register"),
        account_firstname: form.account_firstname.clone(),
        account_lastname: form.account_lastname.clone(),
        account_email: form.account_email.clone(),
        errors,
    };
    (status, page).into_response()
}

pub(crate) fn update_view(
    mut ctx: RequestContext,
    profile: ProfileValues,
    profile_errors: FieldErrors,
    password_errors: FieldErrors,
    status: StatusCode,
) -> Response {
    let page = UpdatePage {
        layout: ctx.layout("Update Account Information"),
        profile,
        profile_errors,
        password_errors,
    };
    (status, page).into_response()
}

/// Attach a freshly signed auth cookie to a response.
fn with_auth_cookie(state: &AppState, account: &Account, response: Response) -> Result<Response> {
    let token = state.tokens().issue(account)?;
    let cookie = auth_cookie(token, state.config().secure_cookies());
    Ok((AppendHeaders([(SET_COOKIE, cookie.to_string())]), response).into_response())
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(ctx: RequestContext) -> Response {
    login_view(ctx, "", FieldErrors::new(), StatusCode::OK)
}

/// Authenticate and set the auth cookie.
///
/// Unknown email and wrong password produce the same 401 page.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Validated(mut ctx, form): Validated<LoginForm>,
) -> Result<Response> {
    let email = match form.email() {
        Ok(email) => email,
        Err(errors) => return Ok(login_view(ctx, &form.account_email, errors, StatusCode::OK)),
    };

    match AuthService::new(state.pool())
        .login(&email, &form.account_password)
        .await
    {
        Ok(account) => {
            set_sentry_user(&account.id, Some(account.email.as_str()));
            tracing::info!(account_id = %account.id, "Account logged in");
            let redirect = ctx.redirect(ACCOUNT_HOME).await?;
            with_auth_cookie(&state, &account, redirect)
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected");
            ctx.notice(FlashMessage::error(BAD_CREDENTIALS));
            Ok(login_view(
                ctx,
                &form.account_email,
                FieldErrors::new(),
                StatusCode::UNAUTHORIZED,
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Destroy the session and clear the auth cookie.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Response> {
    session.flush().await?;
    clear_sentry_user();

    let cookie = clear_auth_cookie(state.config().secure_cookies());
    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Redirect::to("/"),
    )
        .into_response())
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(ctx: RequestContext) -> Response {
    register_view(ctx, &RegisterForm::default(), FieldErrors::new(), StatusCode::OK)
}

/// Create a `Client` account and show the login form.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Validated(mut ctx, form): Validated<RegisterForm>,
) -> Result<Response> {
    let email = match form.email() {
        Ok(email) => email,
        Err(errors) => return Ok(register_view(ctx, &form, errors, StatusCode::OK)),
    };

    let result = AuthService::new(state.pool())
        .register(
            &form.account_firstname,
            &form.account_lastname,
            &email,
            &form.account_password,
        )
        .await;

    match result {
        Ok(account) => {
            tracing::info!(account_id = %account.id, "Account registered");
            ctx.notice(FlashMessage::notice(format!(
                "Congratulations, you're registered {}. Please log in.",
                account.first_name
            )));
            Ok(login_view(
                ctx,
                account.email.as_str(),
                FieldErrors::new(),
                StatusCode::CREATED,
            ))
        }
        Err(AuthError::EmailTaken) => Ok(register_view(
            ctx,
            &form,
            FieldErrors::single("account_email", EMAIL_TAKEN),
            StatusCode::OK,
        )),
        Err(AuthError::Repository(e)) => {
            let error = AppError::from(e);
            let event_id = sentry::capture_error(&error);
            tracing::error!(error = %error, sentry_event_id = %event_id, "Registration failed");
            ctx.notice(FlashMessage::error(
                "Sorry, there was an error processing the registration.",
            ));
            Ok(register_view(
                ctx,
                &form,
                FieldErrors::new(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Account Maintenance
// =============================================================================

/// Account landing page.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    mut ctx: RequestContext,
) -> Result<Response> {
    let account = AuthService::new(state.pool())
        .get_account(claims.account_id())
        .await?;

    Ok(AccountHomePage {
        layout: ctx.layout("Account Management"),
        account,
    }
    .into_response())
}

/// Profile and password forms, prefilled from the database.
#[instrument(skip_all)]
pub async fn update_page(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response> {
    let account = AuthService::new(state.pool())
        .get_account(claims.account_id())
        .await?;

    Ok(update_view(
        ctx,
        ProfileValues::from(&account),
        FieldErrors::new(),
        FieldErrors::new(),
        StatusCode::OK,
    ))
}

/// Update names and email, then re-issue the auth token.
#[instrument(skip_all)]
pub async fn update_account(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Validated(mut ctx, form): Validated<UpdateAccountForm>,
) -> Result<Response> {
    let email = match form.email() {
        Ok(email) => email,
        Err(errors) => {
            return Ok(update_view(
                ctx,
                ProfileValues::from(&form),
                errors,
                FieldErrors::new(),
                StatusCode::OK,
            ));
        }
    };

    let result = AuthService::new(state.pool())
        .update_profile(
            claims.account_id(),
            &form.account_firstname,
            &form.account_lastname,
            &email,
        )
        .await;

    match result {
        Ok(account) => {
            tracing::info!("Account profile updated");
            ctx.notice(FlashMessage::notice(
                "Account information updated successfully.",
            ));
            let redirect = ctx.redirect(ACCOUNT_HOME).await?;
            with_auth_cookie(&state, &account, redirect)
        }
        Err(AuthError::EmailTaken) => Ok(update_view(
            ctx,
            ProfileValues::from(&form),
            FieldErrors::single("account_email", EMAIL_TAKEN),
            FieldErrors::new(),
            StatusCode::OK,
        )),
        Err(e) => Err(e.into()),
    }
}

/// Replace the password after verifying the current one.
#[instrument(skip_all)]
pub async fn change_password(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Validated(ctx, form): Validated<ChangePasswordForm>,
) -> Result<Response> {
    let result = AuthService::new(state.pool())
        .change_password(claims.account_id(), &form.old_password, &form.new_password)
        .await;

    match result {
        Ok(()) => {
            tracing::info!("Account password changed");
            ctx.redirect_with(
                ACCOUNT_HOME,
                FlashMessage::notice("Password changed successfully."),
            )
            .await
        }
        Err(AuthError::InvalidCredentials) => Ok(update_view(
            ctx,
            ProfileValues::from(&claims),
            FieldErrors::new(),
            FieldErrors::single("old_password", "Old password is incorrect."),
            StatusCode::OK,
        )),
        Err(e) => Err(e.into()),
    }
}
