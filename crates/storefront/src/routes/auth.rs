//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the local customer
//! database.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::{clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::routes::MessageQuery;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Map a login error code from the query string to display text.
fn login_error_text(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_owned(),
        "session" => "Could not start a session, please try again.".to_owned(),
        other => other.to_owned(),
    }
}

/// Map a registration error code from the query string to display text.
fn register_error_text(code: &str) -> String {
    match code {
        "password_mismatch" => "Passwords do not match.".to_owned(),
        "password_too_short" => "Password must be at least 8 characters.".to_owned(),
        "email_taken" => "An account with this email already exists.".to_owned(),
        "invalid_email" => "Please enter a valid email address.".to_owned(),
        "failed" => "Registration failed, please try again.".to_owned(),
        other => other.to_owned(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(login_error_text),
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(form.email.trim(), &form.password).await {
        Ok(customer) => {
            let current = CurrentCustomer::from(&customer);
            if let Err(e) = set_current_customer(&session, &current).await {
                tracing::error!(error = %e, "Failed to set session");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            tracing::info!(customer_id = %customer.id, "Customer logged in");
            Redirect::to("/account").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(register_error_text),
    }
}

/// Handle registration form submission.
///
/// On success the new customer is logged in and sent to their account page.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.pool());

    match auth
        .register(
            form.email.trim(),
            &form.password,
            form.first_name.trim(),
            form.last_name.trim(),
        )
        .await
    {
        Ok(customer) => {
            let current = CurrentCustomer::from(&customer);
            if let Err(e) = set_current_customer(&session, &current).await {
                tracing::error!(error = %e, "Failed to set session");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            tracing::info!(customer_id = %customer.id, "Customer registered");
            Redirect::to("/account").into_response()
        }
        Err(AuthError::CustomerAlreadyExists) => {
            Redirect::to("/auth/register?error=email_taken").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/register?error=invalid_email").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/auth/register?error=password_too_short").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            Redirect::to("/auth/register?error=failed").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_customer(&session).await {
        tracing::warn!(error = %e, "Failed to clear session on logout");
    }
    Redirect::to("/").into_response()
}
