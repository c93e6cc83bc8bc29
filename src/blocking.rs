//! Blocking facade over the async client.
//!
//! Owns a current-thread tokio runtime and drives the async core to
//! completion on each call, the same way `reqwest::blocking` wraps its
//! async client. One call is in flight per invocation; the caller's thread
//! blocks on network I/O.
//!
//! Must not be constructed inside an async runtime; use [`crate::SberQr`]
//! directly there.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::types::{CancelType, Positions, RegistryType, Scope};

/// Blocking counterpart of [`crate::SberQr`].
///
/// # Example
/// ```no_run
/// use sberqr::{blocking, Credentials, Position, SberQr};
///
/// # fn example() -> sberqr::Result<()> {
/// let creds = Credentials::new("00000105", "1000301234", "24601234", "id", "secret");
/// let client = blocking::SberQr::new(SberQr::builder(creds).build()?)?;
/// let order = client.create("Coffee", 150, None, Position::new("Coffee", 1, 150, "Coffee"))?;
/// let state = client.status(order["order_id"].as_str().unwrap_or_default(), "X1")?;
/// # Ok(())
/// # }
/// ```
pub struct SberQr {
    inner: crate::SberQr,
    runtime: tokio::runtime::Runtime,
}

impl SberQr {
    pub fn new(inner: crate::SberQr) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { inner, runtime })
    }

    /// See [`crate::SberQr::create`].
    pub fn create(
        &self,
        description: &str,
        order_sum: i64,
        order_number: Option<&str>,
        positions: impl Into<Positions>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.inner.create(description, order_sum, order_number, positions))
    }

    /// See [`crate::SberQr::status`].
    pub fn status(&self, order_id: &str, partner_order_number: &str) -> Result<Value> {
        self.runtime
            .block_on(self.inner.status(order_id, partner_order_number))
    }

    /// See [`crate::SberQr::revoke`].
    pub fn revoke(&self, order_id: &str) -> Result<Value> {
        self.runtime.block_on(self.inner.revoke(order_id))
    }

    /// See [`crate::SberQr::cancel`].
    pub fn cancel(
        &self,
        order_id: &str,
        operation_id: &str,
        cancel_operation_sum: i64,
        auth_code: &str,
        operation_type: Option<CancelType>,
        sbp_payer_id: Option<&str>,
    ) -> Result<Value> {
        self.runtime.block_on(self.inner.cancel(
            order_id,
            operation_id,
            cancel_operation_sum,
            auth_code,
            operation_type,
            sbp_payer_id,
        ))
    }

    /// See [`crate::SberQr::registry`].
    pub fn registry(
        &self,
        start_period: DateTime<Utc>,
        end_period: DateTime<Utc>,
        registry_type: Option<RegistryType>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.inner.registry(start_period, end_period, registry_type))
    }

    /// See [`crate::SberQr::token`].
    pub fn token(&self, scope: Scope) -> Result<String> {
        self.runtime.block_on(self.inner.token(scope))
    }
}
