//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile overview
//! GET  /account/profile        - Profile edit form
//! POST /account/profile        - Profile update
//! GET  /account/addresses      - Address list
//! GET  /account/addresses/new  - Blank address form
//! POST /account/addresses      - Create address
//! GET  /account/addresses/{id}/edit    - Prefilled address form
//! POST /account/addresses/{id}         - Update address
//! POST /account/addresses/{id}/delete  - Delete address
//! POST /account/addresses/{id}/default - Set default address
//! ```

pub mod account;
pub mod addresses;
pub mod auth;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for success/error display after a redirect.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route(
            "/profile",
            get(account::edit_profile).post(account::update_profile),
        )
        .route(
            "/addresses",
            get(addresses::index).post(addresses::create),
        )
        .route("/addresses/new", get(addresses::new))
        .route("/addresses/{id}/edit", get(addresses::edit))
        .route("/addresses/{id}", post(addresses::update))
        .route("/addresses/{id}/delete", post(addresses::delete))
        .route("/addresses/{id}/default", post(addresses::set_default))
}

/// Create the full application router (without state or layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
}
