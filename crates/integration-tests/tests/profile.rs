//! End-to-end tests for the profile edit flow.
//!
//! The profile form carries both the profile fields and an optional
//! password-change block. The contract under test: submitting profile
//! fields alone never runs the current-password check, and a requested
//! password change only goes through when the current password verifies.

use greenlane_integration_tests::{TEST_PASSWORD, TestApp, unique_email};

const PROFILE_UPDATED: &str = "Profile updated successfully.";
const OLD_PASSWORD_MISMATCH: &str = "The old password does not match.";

/// Submit a profile update with the password fields left empty.
async fn update_gender(app: &TestApp, gender: &str) -> String {
    let resp = app
        .post_form(
            "/account/profile",
            &[
                ("first_name", "John"),
                ("last_name", "Doe"),
                ("gender", gender),
                ("phone", ""),
                ("current_password", ""),
                ("new_password", ""),
                ("new_password_confirm", ""),
            ],
        )
        .await;
    assert!(resp.status().is_success());
    resp.text().await.expect("Failed to read response body")
}

#[tokio::test]
async fn test_gender_update_succeeds_without_password() {
    let app = TestApp::spawn().await;
    let email = unique_email("john");
    app.register_customer(&email, "John", "Doe").await;

    let body = update_gender(&app, "Other").await;

    assert!(
        body.contains(PROFILE_UPDATED),
        "Expected success confirmation, got: {body}"
    );
    assert!(
        !body.contains(OLD_PASSWORD_MISMATCH),
        "Gender update must not trip the password check"
    );

    let gender: Option<String> =
        sqlx::query_scalar("SELECT gender FROM customers WHERE email = ?1")
            .bind(&email)
            .fetch_one(&app.pool)
            .await
            .expect("Customer row missing");
    assert_eq!(gender.as_deref(), Some("Other"));
}

#[tokio::test]
async fn test_gender_update_leaves_password_untouched() {
    let app = TestApp::spawn().await;
    let email = unique_email("john");
    app.register_customer(&email, "John", "Doe").await;

    update_gender(&app, "Male").await;

    // The original password must still log in.
    let resp = app.post("/auth/logout").await;
    assert!(resp.status().is_success());

    let resp = app
        .post_form(
            "/auth/login",
            &[("email", email.as_str()), ("password", TEST_PASSWORD)],
        )
        .await;
    assert_eq!(
        resp.url().path(),
        "/account",
        "Original password stopped working after a profile-only update"
    );
}

#[tokio::test]
async fn test_password_change_rejected_when_current_password_is_wrong() {
    let app = TestApp::spawn().await;
    let email = unique_email("john");
    app.register_customer(&email, "John", "Doe").await;

    let resp = app
        .post_form(
            "/account/profile",
            &[
                ("first_name", "Johnny"),
                ("last_name", "Doe"),
                ("gender", "Male"),
                ("phone", ""),
                ("current_password", "not-the-password"),
                ("new_password", "another-password-9"),
                ("new_password_confirm", "another-password-9"),
            ],
        )
        .await;
    let body = resp.text().await.expect("Failed to read response body");

    assert!(
        body.contains(OLD_PASSWORD_MISMATCH),
        "Expected the mismatch message, got: {body}"
    );
    assert!(!body.contains(PROFILE_UPDATED));

    // The rejected submission must not have persisted the profile fields.
    let first_name: String =
        sqlx::query_scalar("SELECT first_name FROM customers WHERE email = ?1")
            .bind(&email)
            .fetch_one(&app.pool)
            .await
            .expect("Customer row missing");
    assert_eq!(first_name, "John");
}

#[tokio::test]
async fn test_password_change_succeeds_with_correct_current_password() {
    let app = TestApp::spawn().await;
    let email = unique_email("john");
    app.register_customer(&email, "John", "Doe").await;

    let resp = app
        .post_form(
            "/account/profile",
            &[
                ("first_name", "John"),
                ("last_name", "Doe"),
                ("gender", ""),
                ("phone", ""),
                ("current_password", TEST_PASSWORD),
                ("new_password", "another-password-9"),
                ("new_password_confirm", "another-password-9"),
            ],
        )
        .await;
    let body = resp.text().await.expect("Failed to read response body");
    assert!(body.contains(PROFILE_UPDATED));

    let resp = app.post("/auth/logout").await;
    assert!(resp.status().is_success());

    let resp = app
        .post_form(
            "/auth/login",
            &[("email", email.as_str()), ("password", "another-password-9")],
        )
        .await;
    assert_eq!(resp.url().path(), "/account", "New password should log in");
}

#[tokio::test]
async fn test_login_trims_submitted_email() {
    let app = TestApp::spawn().await;
    let email = unique_email("john");
    app.register_customer(&email, "John", "Doe").await;

    let resp = app.post("/auth/logout").await;
    assert!(resp.status().is_success());

    // Browsers happily submit a copy-pasted address with stray spaces.
    let padded = format!(" {email} ");
    let resp = app
        .post_form(
            "/auth/login",
            &[("email", padded.as_str()), ("password", TEST_PASSWORD)],
        )
        .await;
    assert_eq!(
        resp.url().path(),
        "/account",
        "Login should accept the registered email with surrounding whitespace"
    );
}

#[tokio::test]
async fn test_account_routes_require_login() {
    let app = TestApp::spawn().await;

    // Fresh client, no session cookie. Every account route redirects to
    // the login page rather than answering with a bare status code.
    for path in ["/account", "/account/profile", "/account/addresses"] {
        let resp = app.get(path).await;
        assert_eq!(
            resp.url().path(),
            "/auth/login",
            "Anonymous visit to {path} should land on the login page"
        );
    }
}
