//! End-to-end tests for the address book.
//!
//! Address submissions go through a validate-then-commit gate keyed on the
//! address country: a VAT id that fails the country's format rule rejects
//! the whole submission, persists nothing, and re-renders the form with
//! every submitted value preserved. Updates overwrite the row in place, so
//! superseded values never linger as duplicates.

use greenlane_integration_tests::{TestApp, unique_email};

const VAT_WRONG_FORMAT: &str = "The given vat id has a wrong format";
const ADDRESS_ADDED: &str = "Address have been successfully added.";
const ADDRESS_UPDATED: &str = "Address updated successfully.";
const ADDRESS_DELETED: &str = "Address has been deleted successfully.";

/// A complete Austrian address form with the given company name and VAT id.
fn address_form<'a>(company_name: &'a str, vat_id: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("company_name", company_name),
        ("first_name", "John"),
        ("last_name", "Doe"),
        ("vat_id", vat_id),
        ("address1[]", "Mariahilfer Strasse 123"),
        ("country", "AT"),
        ("state", "Vienna"),
        ("city", "Vienna"),
        ("postcode", "1060"),
        ("phone", "438120912"),
    ]
}

async fn address_count(app: &TestApp) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Count query failed")
}

async fn spawn_with_customer() -> TestApp {
    let app = TestApp::spawn().await;
    let email = unique_email("john");
    app.register_customer(&email, "John", "Doe").await;
    app
}

#[tokio::test]
async fn test_invalid_vat_rejects_submission_and_stores_nothing() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", "INVALIDVAT"))
        .await;
    let body = resp.text().await.expect("Failed to read response body");

    assert!(
        body.contains(VAT_WRONG_FORMAT),
        "Expected the VAT format message, got: {body}"
    );
    assert!(!body.contains(ADDRESS_ADDED));
    assert_eq!(address_count(&app).await, 0, "Rejected address was stored");

    // Submitted values come back on the re-rendered form.
    assert!(body.contains("INVALIDVAT"));
    assert!(body.contains("Acme Trading"));
    assert!(body.contains("Mariahilfer Strasse 123"));
}

#[tokio::test]
async fn test_valid_vat_address_is_created() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", "ATU12345678"))
        .await;
    let body = resp.text().await.expect("Failed to read response body");

    assert!(
        body.contains(ADDRESS_ADDED),
        "Expected the added confirmation, got: {body}"
    );
    assert_eq!(address_count(&app).await, 1);

    // The stored row matches every submitted field.
    #[derive(sqlx::FromRow)]
    struct StoredAddress {
        company_name: String,
        first_name: String,
        last_name: String,
        vat_id: String,
        address1: String,
        country: String,
        state: String,
        city: String,
        postcode: String,
        phone: String,
        is_default: bool,
    }

    let row: StoredAddress = sqlx::query_as(
        "SELECT company_name, first_name, last_name, vat_id, address1, country,
                state, city, postcode, phone, is_default
         FROM customer_addresses",
    )
    .fetch_one(&app.pool)
    .await
    .expect("Address row missing");
    assert_eq!(row.company_name, "Acme Trading");
    assert_eq!(row.first_name, "John");
    assert_eq!(row.last_name, "Doe");
    assert_eq!(row.vat_id, "ATU12345678");
    assert_eq!(row.address1, "Mariahilfer Strasse 123");
    assert_eq!(row.country, "AT");
    assert_eq!(row.state, "Vienna");
    assert_eq!(row.city, "Vienna");
    assert_eq!(row.postcode, "1060");
    assert_eq!(row.phone, "438120912");
    assert!(row.is_default, "First address should become the default");
}

#[tokio::test]
async fn test_empty_vat_is_allowed() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", ""))
        .await;
    let body = resp.text().await.expect("Failed to read response body");

    assert!(body.contains(ADDRESS_ADDED));

    let vat: Option<String> = sqlx::query_scalar("SELECT vat_id FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");
    assert_eq!(vat, None, "Empty VAT input should be stored as NULL");
}

#[tokio::test]
async fn test_multiline_street_address_is_joined() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form(
            "/account/addresses",
            &[
                ("company_name", "Acme Trading"),
                ("first_name", "John"),
                ("last_name", "Doe"),
                ("vat_id", ""),
                ("address1[]", "Mariahilfer Strasse 123"),
                ("address1[]", "Staircase 2, Door 14"),
                ("country", "AT"),
                ("state", "Vienna"),
                ("city", "Vienna"),
                ("postcode", "1060"),
                ("phone", "438120912"),
            ],
        )
        .await;
    assert!(resp.status().is_success());

    let address1: String = sqlx::query_scalar("SELECT address1 FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");
    assert_eq!(address1, "Mariahilfer Strasse 123\nStaircase 2, Door 14");
}

#[tokio::test]
async fn test_update_overwrites_address_in_place() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", "ATU12345678"))
        .await;
    assert!(resp.status().is_success());

    let id: i64 = sqlx::query_scalar("SELECT id FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");

    let resp = app
        .post_form(
            &format!("/account/addresses/{id}"),
            &address_form("Acme Trading GmbH", "ATU12345678"),
        )
        .await;
    let body = resp.text().await.expect("Failed to read response body");
    assert!(
        body.contains(ADDRESS_UPDATED),
        "Expected the updated confirmation, got: {body}"
    );

    // The old value is gone, not kept as a second row.
    assert_eq!(address_count(&app).await, 1);
    let stale: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM customer_addresses WHERE company_name = ?1",
    )
    .bind("Acme Trading")
    .fetch_one(&app.pool)
    .await
    .expect("Count query failed");
    assert_eq!(stale, 0, "Superseded company name still present");

    let company: String = sqlx::query_scalar("SELECT company_name FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");
    assert_eq!(company, "Acme Trading GmbH");
}

#[tokio::test]
async fn test_update_with_invalid_vat_changes_nothing() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", "ATU12345678"))
        .await;
    assert!(resp.status().is_success());

    let id: i64 = sqlx::query_scalar("SELECT id FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");

    let resp = app
        .post_form(
            &format!("/account/addresses/{id}"),
            &address_form("Acme Trading GmbH", "INVALIDVAT"),
        )
        .await;
    let body = resp.text().await.expect("Failed to read response body");
    assert!(body.contains(VAT_WRONG_FORMAT));

    let (company, vat): (String, String) =
        sqlx::query_as("SELECT company_name, vat_id FROM customer_addresses WHERE id = ?1")
            .bind(id)
            .fetch_one(&app.pool)
            .await
            .expect("Address row missing");
    assert_eq!(company, "Acme Trading", "Rejected update must not commit");
    assert_eq!(vat, "ATU12345678");
}

#[tokio::test]
async fn test_delete_address() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", ""))
        .await;
    assert!(resp.status().is_success());

    let id: i64 = sqlx::query_scalar("SELECT id FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");

    let resp = app.post(&format!("/account/addresses/{id}/delete")).await;
    let body = resp.text().await.expect("Failed to read response body");

    assert!(body.contains(ADDRESS_DELETED));
    assert_eq!(address_count(&app).await, 0);
}

#[tokio::test]
async fn test_addresses_are_scoped_to_their_owner() {
    let app = spawn_with_customer().await;

    let resp = app
        .post_form("/account/addresses", &address_form("Acme Trading", ""))
        .await;
    assert!(resp.status().is_success());

    let id: i64 = sqlx::query_scalar("SELECT id FROM customer_addresses")
        .fetch_one(&app.pool)
        .await
        .expect("Address row missing");

    // A different customer, with their own cookie jar.
    let intruder = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");
    let intruder_email = unique_email("mallory");
    let resp = intruder
        .post(format!("{}/auth/register", app.base_url))
        .form(&[
            ("email", intruder_email.as_str()),
            ("password", greenlane_integration_tests::TEST_PASSWORD),
            ("password_confirm", greenlane_integration_tests::TEST_PASSWORD),
            ("first_name", "Mallory"),
            ("last_name", "Marsh"),
        ])
        .send()
        .await
        .expect("Request failed");
    assert!(resp.status().is_success());

    let resp = intruder
        .get(format!("{}/account/addresses/{id}/edit", app.base_url))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    let resp = intruder
        .post(format!("{}/account/addresses/{id}/delete", app.base_url))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(address_count(&app).await, 1, "Foreign delete went through");
}
