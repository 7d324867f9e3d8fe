//! Customer address route handlers.
//!
//! Address submissions pass through a validate-then-commit gate: the VAT
//! id is checked against the format rule for the submitted country, and a
//! failing submission persists nothing — the form is re-rendered with every
//! submitted field preserved for resubmission.
//!
//! Uses `axum_extra::extract::Form` because the street address is submitted
//! as one or more `address1[]` inputs, which the plain axum form extractor
//! cannot collect into a `Vec`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;

use greenlane_core::{AddressId, CountryCode};

use crate::db::addresses::AddressRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::{CustomerAddress, NewAddress};
use crate::routes::MessageQuery;
use crate::state::AppState;

/// Error message shown when the VAT id fails the format gate.
const VAT_WRONG_FORMAT: &str = "The given vat id has a wrong format";

/// Success message shown after creating an address.
const ADDRESS_ADDED: &str = "Address have been successfully added.";

/// Success message shown after updating an address.
const ADDRESS_UPDATED: &str = "Address updated successfully.";

/// Success message shown after deleting an address.
const ADDRESS_DELETED: &str = "Address has been deleted successfully.";

/// Success message shown after changing the default address.
const DEFAULT_UPDATED: &str = "Default address updated successfully.";

// =============================================================================
// Form Types
// =============================================================================

/// Address form data.
///
/// Field names match the rendered form inputs; the street address comes in
/// as repeated `address1[]` inputs.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub vat_id: String,
    #[serde(default, rename = "address1[]")]
    pub address1: Vec<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub phone: String,
}

impl AddressForm {
    /// Run the validate half of the gate.
    ///
    /// Returns the validated values ready to commit, or the message to
    /// re-render the form with. Nothing is persisted on the error path.
    fn validate(&self, state: &AppState) -> std::result::Result<NewAddress, String> {
        let Ok(country) = CountryCode::parse(&self.country) else {
            return Err("Please provide a valid two-letter country code.".to_owned());
        };

        let lines: Vec<String> = self
            .address1
            .iter()
            .map(|line| line.trim().to_owned())
            .filter(|line| !line.is_empty())
            .collect();

        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || lines.is_empty()
            || self.city.trim().is_empty()
            || self.postcode.trim().is_empty()
        {
            return Err("Please fill in all required fields.".to_owned());
        }

        // The VAT gate: an empty field is allowed, anything else must match
        // the format rule for the address country.
        let vat_id = match self.vat_id.trim() {
            "" => None,
            vat => {
                if state.vat().validate(&country, vat).is_err() {
                    return Err(VAT_WRONG_FORMAT.to_owned());
                }
                Some(vat.to_owned())
            }
        };

        Ok(NewAddress {
            company_name: self.company_name.trim().to_owned(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            vat_id,
            address1: lines.join("\n"),
            country,
            state: self.state.trim().to_owned(),
            city: self.city.trim().to_owned(),
            postcode: self.postcode.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
        })
    }
}

// =============================================================================
// View Types & Templates
// =============================================================================

/// Address display data for the list page.
#[derive(Clone)]
pub struct AddressView {
    pub id: i64,
    pub name: String,
    pub company_name: String,
    pub lines: Vec<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub vat_id: String,
    pub is_default: bool,
}

impl From<&CustomerAddress> for AddressView {
    fn from(address: &CustomerAddress) -> Self {
        Self {
            id: address.id.as_i64(),
            name: format!("{} {}", address.first_name, address.last_name),
            company_name: address.company_name.clone(),
            lines: address.address1_lines(),
            city: address.city.clone(),
            postcode: address.postcode.clone(),
            country: address.country.as_str().to_owned(),
            vat_id: address.vat_id.clone().unwrap_or_default(),
            is_default: address.is_default,
        }
    }
}

/// Address form values for rendering.
#[derive(Clone)]
pub struct AddressFormView {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub vat_id: String,
    pub address1_lines: Vec<String>,
    pub country: String,
    pub state: String,
    pub city: String,
    pub postcode: String,
    pub phone: String,
}

impl AddressFormView {
    /// An empty form for the "Add Address" page.
    fn blank() -> Self {
        Self {
            company_name: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            vat_id: String::new(),
            address1_lines: vec![String::new()],
            country: String::new(),
            state: String::new(),
            city: String::new(),
            postcode: String::new(),
            phone: String::new(),
        }
    }
}

impl From<&AddressForm> for AddressFormView {
    fn from(form: &AddressForm) -> Self {
        let mut lines = form.address1.clone();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            company_name: form.company_name.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            vat_id: form.vat_id.clone(),
            address1_lines: lines,
            country: form.country.clone(),
            state: form.state.clone(),
            city: form.city.clone(),
            postcode: form.postcode.clone(),
            phone: form.phone.clone(),
        }
    }
}

impl From<&CustomerAddress> for AddressFormView {
    fn from(address: &CustomerAddress) -> Self {
        Self {
            company_name: address.company_name.clone(),
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            vat_id: address.vat_id.clone().unwrap_or_default(),
            address1_lines: address.address1_lines(),
            country: address.country.as_str().to_owned(),
            state: address.state.clone(),
            city: address.city.clone(),
            postcode: address.postcode.clone(),
            phone: address.phone.clone(),
        }
    }
}

/// Address list page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses.html")]
pub struct AddressListTemplate {
    pub addresses: Vec<AddressView>,
    pub success: Option<String>,
}

/// Address form page template, used for both create and edit.
#[derive(Template, WebTemplate)]
#[template(path = "account/address_form.html")]
pub struct AddressFormTemplate {
    pub action: String,
    pub form: AddressFormView,
    pub error: Option<String>,
}

/// Map an address success code from the query string to display text.
fn success_text(code: &str) -> Option<String> {
    match code {
        "added" => Some(ADDRESS_ADDED.to_owned()),
        "updated" => Some(ADDRESS_UPDATED.to_owned()),
        "deleted" => Some(ADDRESS_DELETED.to_owned()),
        "default" => Some(DEFAULT_UPDATED.to_owned()),
        _ => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the address list.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_customer(current.id)
        .await?;

    Ok(AddressListTemplate {
        addresses: addresses.iter().map(AddressView::from).collect(),
        success: query.success.as_deref().and_then(success_text),
    }
    .into_response())
}

/// Display a blank address form.
pub async fn new(RequireAuth(_current): RequireAuth) -> impl IntoResponse {
    AddressFormTemplate {
        action: "/account/addresses".to_owned(),
        form: AddressFormView::blank(),
        error: None,
    }
}

/// Handle address creation.
///
/// A failed validation re-renders the form with the submitted values and
/// creates no row.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let validated = match form.validate(&state) {
        Ok(v) => v,
        Err(message) => {
            tracing::debug!(customer_id = %current.id, %message, "Address rejected");
            return Ok(AddressFormTemplate {
                action: "/account/addresses".to_owned(),
                form: AddressFormView::from(&form),
                error: Some(message),
            }
            .into_response());
        }
    };

    let address = AddressRepository::new(state.pool())
        .create(current.id, &validated)
        .await?;

    tracing::info!(customer_id = %current.id, address_id = %address.id, "Address created");
    Ok(Redirect::to("/account/addresses?success=added").into_response())
}

/// Display the edit form for an existing address.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response> {
    let address_id = AddressId::new(id);
    let address = AddressRepository::new(state.pool())
        .get(current.id, address_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("address {id}")))?;

    Ok(AddressFormTemplate {
        action: format!("/account/addresses/{id}"),
        form: AddressFormView::from(&address),
        error: None,
    }
    .into_response())
}

/// Handle address update.
///
/// The row is overwritten in place: superseded values are gone after the
/// commit.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let address_id = AddressId::new(id);

    let validated = match form.validate(&state) {
        Ok(v) => v,
        Err(message) => {
            tracing::debug!(customer_id = %current.id, %message, "Address update rejected");
            return Ok(AddressFormTemplate {
                action: format!("/account/addresses/{id}"),
                form: AddressFormView::from(&form),
                error: Some(message),
            }
            .into_response());
        }
    };

    let repository = AddressRepository::new(state.pool());
    match repository.update(current.id, address_id, &validated).await {
        Ok(()) => {
            tracing::info!(customer_id = %current.id, address_id = %address_id, "Address updated");
            Ok(Redirect::to("/account/addresses?success=updated").into_response())
        }
        Err(crate::db::RepositoryError::NotFound) => {
            Err(AppError::NotFound(format!("address {id}")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle address deletion.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response> {
    let deleted = AddressRepository::new(state.pool())
        .delete(current.id, AddressId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!("address {id}")));
    }

    tracing::info!(customer_id = %current.id, address_id = id, "Address deleted");
    Ok(Redirect::to("/account/addresses?success=deleted").into_response())
}

/// Mark an address as the customer's default.
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response> {
    let repository = AddressRepository::new(state.pool());
    match repository.set_default(current.id, AddressId::new(id)).await {
        Ok(()) => Ok(Redirect::to("/account/addresses?success=default").into_response()),
        Err(crate::db::RepositoryError::NotFound) => {
            Err(AppError::NotFound(format!("address {id}")))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_text_maps_codes() {
        assert_eq!(success_text("added").as_deref(), Some(ADDRESS_ADDED));
        assert_eq!(success_text("updated").as_deref(), Some(ADDRESS_UPDATED));
        assert_eq!(success_text("deleted").as_deref(), Some(ADDRESS_DELETED));
        assert_eq!(success_text("nope"), None);
    }
}
