//! SberQR — client SDK for the Sber QR-payment REST API.
//!
//! Builds signed requests for order creation, status polling, revocation,
//! cancellation/refund, and operation-registry retrieval, and maps HTTP
//! responses to typed results or errors. Access tokens are acquired per
//! scope through the OAuth client-credentials flow and optionally reused
//! via a TTL-aware [`auth::TokenCache`].
//!
//! Success bodies are returned as [`serde_json::Value`]: the SDK is a
//! transparent pass-through for business fields it does not interpret.
//!
//! # Quick start
//!
//! ```no_run
//! use sberqr::{Credentials, Position, SberQr};
//!
//! # async fn example() -> sberqr::Result<()> {
//! let client = SberQr::builder(Credentials::from_env()?).build()?;
//!
//! let order = client
//!     .create("Coffee", 150, None, Position::new("Coffee", 1, 150, "Coffee"))
//!     .await?;
//! let state = client
//!     .status(order["order_id"].as_str().unwrap_or_default(), "X1")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! A blocking facade lives in [`blocking`]; mutual-TLS material is wired
//! through [`TlsConfig`].

pub mod api;
pub mod auth;
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod types;

pub use client::{SberQr, SberQrBuilder};
pub use config::{Credentials, TlsConfig};
pub use error::{Result, SberQrError};
pub use types::{CancelType, Position, Positions, RegistryType, Scope};
