//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use greenlane_core::{VatError, VatRegistry};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, configuration, and the VAT
/// format registry.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: SqlitePool,
    vat: VatRegistry,
}

impl AppState {
    /// Create a new application state with the default VAT rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the default VAT rule table fails to compile.
    pub fn new(config: StorefrontConfig, pool: SqlitePool) -> Result<Self, VatError> {
        let vat = VatRegistry::with_defaults()?;
        Ok(Self::with_vat_registry(config, pool, vat))
    }

    /// Create a new application state with a custom VAT registry.
    #[must_use]
    pub fn with_vat_registry(config: StorefrontConfig, pool: SqlitePool, vat: VatRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool, vat }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the VAT format registry.
    #[must_use]
    pub fn vat(&self) -> &VatRegistry {
        &self.inner.vat
    }
}
