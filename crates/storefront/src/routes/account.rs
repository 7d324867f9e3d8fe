//! Account profile route handlers.
//!
//! These routes require authentication. The profile update accepts partial
//! field changes; the customer's credentials are only touched when a
//! password change is explicitly requested on the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use greenlane_core::Gender;

use crate::db::customers::CustomerRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::middleware::set_current_customer;
use crate::models::{Customer, CurrentCustomer, ProfileUpdate};
use crate::routes::MessageQuery;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Success message shown after a profile update.
const PROFILE_UPDATED: &str = "Profile updated successfully.";

/// Error message shown when the current password check fails.
const OLD_PASSWORD_MISMATCH: &str = "The old password does not match.";

// =============================================================================
// Form Types
// =============================================================================

/// Profile edit form data.
///
/// The password fields are optional; empty values mean "no password change
/// requested" and must never trigger a current-password check.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub new_password_confirm: String,
}

// =============================================================================
// View Types & Templates
// =============================================================================

/// Customer display data for templates.
#[derive(Clone)]
pub struct CustomerView {
    pub email: String,
    pub name: String,
    pub gender: String,
    pub phone: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            email: customer.email.to_string(),
            name: customer.display_name(),
            gender: customer
                .gender
                .map(|g| g.as_str().to_owned())
                .unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
        }
    }
}

/// Profile form values for re-rendering.
#[derive(Clone)]
pub struct ProfileFormView {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub phone: String,
}

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub customer: CustomerView,
    pub success: Option<String>,
}

/// Profile edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileEditTemplate {
    pub form: ProfileFormView,
    pub error: Option<String>,
}

/// Map a profile success code from the query string to display text.
fn success_text(code: &str) -> Option<String> {
    match code {
        "profile" => Some(PROFILE_UPDATED.to_owned()),
        _ => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the account overview page.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let customer = load_customer(&state, &current).await?;

    Ok(AccountIndexTemplate {
        customer: CustomerView::from(&customer),
        success: query.success.as_deref().and_then(success_text),
    }
    .into_response())
}

/// Display the profile edit form.
pub async fn edit_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Response> {
    let customer = load_customer(&state, &current).await?;

    Ok(ProfileEditTemplate {
        form: ProfileFormView {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            gender: customer
                .gender
                .map(|g| g.as_str().to_owned())
                .unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
        },
        error: None,
    }
    .into_response())
}

/// Handle profile form submission.
///
/// Persists the submitted profile fields. A password change is only
/// attempted when a new password was entered; in that case the current
/// password must verify, otherwise the form is re-rendered with
/// "The old password does not match." and nothing is persisted.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    axum::Form(form): axum::Form<ProfileForm>,
) -> Result<Response> {
    let form_view = ProfileFormView {
        first_name: form.first_name.trim().to_owned(),
        last_name: form.last_name.trim().to_owned(),
        gender: form.gender.trim().to_owned(),
        phone: form.phone.trim().to_owned(),
    };

    let render_error = |message: &str| {
        ProfileEditTemplate {
            form: form_view.clone(),
            error: Some(message.to_owned()),
        }
        .into_response()
    };

    // Gender is optional; when submitted it must be a known value.
    let gender = match form.gender.trim() {
        "" => None,
        value => match value.parse::<Gender>() {
            Ok(g) => Some(g),
            Err(_) => return Ok(render_error("Please select a valid gender.")),
        },
    };

    // Only touch credentials when a password change was requested.
    let wants_password_change = !form.new_password.is_empty();
    if wants_password_change {
        if form.new_password != form.new_password_confirm {
            return Ok(render_error("Passwords do not match."));
        }

        let auth = AuthService::new(state.pool());
        match auth
            .change_password(current.id, &form.current_password, &form.new_password)
            .await
        {
            Ok(()) => {}
            Err(AuthError::OldPasswordMismatch) => {
                return Ok(render_error(OLD_PASSWORD_MISMATCH));
            }
            Err(AuthError::WeakPassword(msg)) => return Ok(render_error(&msg)),
            Err(e) => return Err(e.into()),
        }
    }

    let update = ProfileUpdate {
        first_name: form_view.first_name.clone(),
        last_name: form_view.last_name.clone(),
        gender,
        phone: Some(form_view.phone.clone()).filter(|p| !p.is_empty()),
    };

    let customers = CustomerRepository::new(state.pool());
    customers.update_profile(current.id, &update).await?;

    // Keep the session identity in sync with the new names.
    let refreshed = CurrentCustomer {
        id: current.id,
        email: current.email,
        first_name: update.first_name.clone(),
        last_name: update.last_name.clone(),
    };
    if let Err(e) = set_current_customer(&session, &refreshed).await {
        tracing::warn!(error = %e, "Failed to refresh session after profile update");
    }

    tracing::info!(customer_id = %current.id, "Profile updated");
    Ok(Redirect::to("/account?success=profile").into_response())
}

/// Load the full customer row behind a session identity.
async fn load_customer(state: &AppState, current: &CurrentCustomer) -> Result<Customer> {
    CustomerRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))
}
