//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::auth::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub customer_name: Option<String>,
}

/// Display the home page.
pub async fn index(OptionalAuth(customer): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        customer_name: customer.map(|c| c.first_name),
    }
}
