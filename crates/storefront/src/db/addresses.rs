//! Address repository for database operations.
//!
//! Every query is scoped by customer ID so one customer can never read or
//! write another customer's addresses.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use greenlane_core::{AddressId, CountryCode, CustomerId};

use super::RepositoryError;
use crate::models::{CustomerAddress, NewAddress};

/// Raw `customer_addresses` row.
#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i64,
    customer_id: i64,
    company_name: String,
    first_name: String,
    last_name: String,
    vat_id: Option<String>,
    address1: String,
    country: String,
    state: String,
    city: String,
    postcode: String,
    phone: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AddressRow {
    /// Convert a row into a domain address, validating stored values.
    fn into_domain(self) -> Result<CustomerAddress, RepositoryError> {
        let country = CountryCode::parse(&self.country).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid country in database: {e}"))
        })?;

        Ok(CustomerAddress {
            id: AddressId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            company_name: self.company_name,
            first_name: self.first_name,
            last_name: self.last_name,
            vat_id: self.vat_id,
            address1: self.address1,
            country,
            state: self.state,
            city: self.city,
            postcode: self.postcode,
            phone: self.phone,
            is_default: self.is_default,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_ADDRESS: &str = r"
    SELECT id, customer_id, company_name, first_name, last_name, vat_id,
           address1, country, state, city, postcode, phone, is_default,
           created_at, updated_at
    FROM customer_addresses
";

/// Repository for customer address database operations.
pub struct AddressRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all addresses for a customer, default address first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerAddress>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "{SELECT_ADDRESS} WHERE customer_id = ?1 ORDER BY is_default DESC, id ASC"
        ))
        .bind(customer_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AddressRow::into_domain).collect()
    }

    /// Get one of a customer's addresses by ID.
    ///
    /// Returns `None` if the address doesn't exist or belongs to another
    /// customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<Option<CustomerAddress>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "{SELECT_ADDRESS} WHERE id = ?1 AND customer_id = ?2"
        ))
        .bind(address_id.as_i64())
        .bind(customer_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(AddressRow::into_domain).transpose()
    }

    /// Create a new address for a customer.
    ///
    /// The first address a customer creates becomes their default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        address: &NewAddress,
    ) -> Result<CustomerAddress, RepositoryError> {
        let now = Utc::now();

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customer_addresses WHERE customer_id = ?1")
                .bind(customer_id.as_i64())
                .fetch_one(self.pool)
                .await?;

        let row = sqlx::query_as::<_, AddressRow>(
            r"
            INSERT INTO customer_addresses
                (customer_id, company_name, first_name, last_name, vat_id, address1,
                 country, state, city, postcode, phone, is_default, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
            RETURNING id, customer_id, company_name, first_name, last_name, vat_id,
                      address1, country, state, city, postcode, phone, is_default,
                      created_at, updated_at
            ",
        )
        .bind(customer_id.as_i64())
        .bind(&address.company_name)
        .bind(&address.first_name)
        .bind(&address.last_name)
        .bind(address.vat_id.as_deref())
        .bind(&address.address1)
        .bind(address.country.as_str())
        .bind(&address.state)
        .bind(&address.city)
        .bind(&address.postcode)
        .bind(&address.phone)
        .bind(existing == 0)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Overwrite an existing address in place.
    ///
    /// Every field is replaced; superseded values do not survive anywhere.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to another customer.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
        address: &NewAddress,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer_addresses
            SET company_name = ?1, first_name = ?2, last_name = ?3, vat_id = ?4,
                address1 = ?5, country = ?6, state = ?7, city = ?8, postcode = ?9,
                phone = ?10, updated_at = ?11
            WHERE id = ?12 AND customer_id = ?13
            ",
        )
        .bind(&address.company_name)
        .bind(&address.first_name)
        .bind(&address.last_name)
        .bind(address.vat_id.as_deref())
        .bind(&address.address1)
        .bind(address.country.as_str())
        .bind(&address.state)
        .bind(&address.city)
        .bind(&address.postcode)
        .bind(&address.phone)
        .bind(Utc::now())
        .bind(address_id.as_i64())
        .bind(customer_id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete one of a customer's addresses.
    ///
    /// # Returns
    ///
    /// Returns `true` if the address was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM customer_addresses WHERE id = ?1 AND customer_id = ?2")
                .bind(address_id.as_i64())
                .bind(customer_id.as_i64())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark one of a customer's addresses as the default.
    ///
    /// Clears the flag on every other address in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to another customer.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_default(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE customer_addresses SET is_default = 0 WHERE customer_id = ?1")
            .bind(customer_id.as_i64())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE customer_addresses SET is_default = 1 WHERE id = ?1 AND customer_id = ?2",
        )
        .bind(address_id.as_i64())
        .bind(customer_id.as_i64())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
