//! Registration, login, logout and account maintenance over HTTP.

#![allow(clippy::unwrap_used)]

use cse_motors_integration_tests::{STRONG_PASSWORD, TestApp, location, sets_auth_cookie};
use reqwest::StatusCode;

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_creates_client_and_shows_login() {
    let app = TestApp::spawn().await;

    let response = app
        .register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.text().await.unwrap();
    assert!(body.contains("Congratulations"));
    assert!(body.contains("Please log in."));
    assert!(body.contains(r#"action="/account/login""#));
    assert!(body.contains(r#"value="ada@example.com""#));
    assert_eq!(app.account_count().await, 1);
}

#[tokio::test]
async fn test_register_weak_password_rerenders_without_storage() {
    let app = TestApp::spawn().await;

    let response = app
        .register("Ada", "Lovelace", "ada@example.com", "abc")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Password does not meet requirements."));
    assert!(body.contains(r#"value="Ada""#));
    assert!(body.contains(r#"value="ada@example.com""#));
    assert!(!body.contains("abc\""));
    assert_eq!(app.account_count().await, 0);
}

#[tokio::test]
async fn test_register_duplicate_email_is_field_error() {
    let app = TestApp::spawn().await;
    let first = app
        .register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let response = app
        .register("Other", "Person", "ada@example.com", STRONG_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Email already exists. Please log in or use a different email."));
    assert_eq!(app.account_count().await, 1);
}

#[tokio::test]
async fn test_register_missing_names_lists_each_error() {
    let app = TestApp::spawn().await;

    let response = app
        .register("  ", "", "not-an-email", STRONG_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Please provide a first name."));
    assert!(body.contains("Please provide a last name."));
    assert_eq!(app.account_count().await, 0);
}

// =============================================================================
// Login / Logout
// =============================================================================

#[tokio::test]
async fn test_login_success_sets_cookie_and_redirects() {
    let app = TestApp::spawn().await;
    app.register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;

    let response = app.login("ada@example.com", STRONG_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/");
    assert!(sets_auth_cookie(&response));

    let cookie = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("cse_auth="))
        .unwrap()
        .to_owned();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let home = app.get("/account/").await;
    assert_eq!(home.status(), StatusCode::OK);
    let body = home.text().await.unwrap();
    assert!(body.contains("Welcome Ada"));
    assert!(!body.contains("Inventory Management"));
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_identical() {
    let app = TestApp::spawn().await;
    app.register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;

    let wrong_password = app.login("ada@example.com", "Wr0ng!Password").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(!sets_auth_cookie(&wrong_password));
    let wrong_password_body = wrong_password.text().await.unwrap();

    let unknown = app.login("nobody@example.com", STRONG_PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(!sets_auth_cookie(&unknown));
    let unknown_body = unknown.text().await.unwrap();

    let notice = "Please check your credentials and try again.";
    assert!(wrong_password_body.contains(notice));
    assert!(unknown_body.contains(notice));
    assert!(wrong_password_body.contains(r#"value="ada@example.com""#));

    // Still anonymous afterwards.
    let home = app.get("/account/").await;
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&home), "/account/login");
}

#[tokio::test]
async fn test_protected_page_redirects_with_notice() {
    let app = TestApp::spawn().await;

    let response = app.get("/account/update").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");

    let login = app.get("/account/login").await;
    let body = login.text().await.unwrap();
    assert!(body.contains("Please log in."));

    // Flash is shown once.
    let again = app.get("/account/login").await.text().await.unwrap();
    assert!(!again.contains("Please log in."));
}

#[tokio::test]
async fn test_malformed_form_body_keeps_queued_flash() {
    let app = TestApp::spawn().await;

    let protected = app.get("/account/").await;
    assert_eq!(protected.status(), StatusCode::SEE_OTHER);

    let rejected = app
        .client
        .post(app.url("/account/login"))
        .header("content-type", "text/plain")
        .body("account_email=ada@example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let login = app.get("/account/login").await.text().await.unwrap();
    assert!(login.contains("Please log in."));
}

#[tokio::test]
async fn test_logout_clears_identity() {
    let app = TestApp::spawn().await;
    app.register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;
    app.login("ada@example.com", STRONG_PASSWORD).await;

    let response = app.get("/account/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(!sets_auth_cookie(&response));

    let home = app.get("/account/").await;
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
}

// =============================================================================
// Account Maintenance
// =============================================================================

#[tokio::test]
async fn test_update_account_changes_header_name() {
    let app = TestApp::spawn().await;
    app.register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;
    app.login("ada@example.com", STRONG_PASSWORD).await;

    let page = app.get("/account/update").await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains(r#"value="Lovelace""#));

    let response = app
        .post_form(
            "/account/update",
            &[
                ("account_firstname", "Augusta"),
                ("account_lastname", "King"),
                ("account_email", "augusta@example.com"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/");
    assert!(sets_auth_cookie(&response));

    let body = app.get("/account/").await.text().await.unwrap();
    assert!(body.contains("Account information updated successfully."));
    assert!(body.contains("Welcome Augusta"));
    assert!(body.contains("augusta@example.com"));
}

#[tokio::test]
async fn test_update_account_to_taken_email_is_field_error() {
    let app = TestApp::spawn().await;
    app.register("Other", "Person", "taken@example.com", STRONG_PASSWORD)
        .await;
    app.register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;
    app.login("ada@example.com", STRONG_PASSWORD).await;

    let response = app
        .post_form(
            "/account/update",
            &[
                ("account_firstname", "Ada"),
                ("account_lastname", "Lovelace"),
                ("account_email", "taken@example.com"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Email already exists."));
}

#[tokio::test]
async fn test_change_password_round_trip() {
    let app = TestApp::spawn().await;
    app.register("Ada", "Lovelace", "ada@example.com", STRONG_PASSWORD)
        .await;
    app.login("ada@example.com", STRONG_PASSWORD).await;

    let wrong_old = app
        .post_form(
            "/account/change-password",
            &[
                ("old_password", "Wr0ng!Password"),
                ("new_password", "N3w!Password99"),
                ("confirm_password", "N3w!Password99"),
            ],
        )
        .await;
    assert_eq!(wrong_old.status(), StatusCode::OK);
    assert!(wrong_old.text().await.unwrap().contains("Old password is incorrect."));

    let mismatch = app
        .post_form(
            "/account/change-password",
            &[
                ("old_password", STRONG_PASSWORD),
                ("new_password", "N3w!Password99"),
                ("confirm_password", "N3w!Password98"),
            ],
        )
        .await;
    assert_eq!(mismatch.status(), StatusCode::OK);
    assert!(mismatch.text().await.unwrap().contains("Passwords do not match."));

    let changed = app
        .post_form(
            "/account/change-password",
            &[
                ("old_password", STRONG_PASSWORD),
                ("new_password", "N3w!Password99"),
                ("confirm_password", "N3w!Password99"),
            ],
        )
        .await;
    assert_eq!(changed.status(), StatusCode::SEE_OTHER);

    app.get("/account/logout").await;
    let old = app.login("ada@example.com", STRONG_PASSWORD).await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    let new = app.login("ada@example.com", "N3w!Password99").await;
    assert_eq!(new.status(), StatusCode::SEE_OTHER);
}
