//! Wire-level vocabulary: scopes, cancel/registry kinds, order positions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth scope authorizing exactly one API operation.
///
/// Tokens are issued per (client, scope) pair and are not interchangeable
/// across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Create,
    Status,
    Revoke,
    Cancel,
    Registry,
}

impl Scope {
    /// Grant URI submitted as the `scope` form parameter of the OAuth call.
    pub fn grant(&self) -> &'static str {
        match self {
            Self::Create => "https://api.sberbank.ru/qr/order.create",
            Self::Status => "https://api.sberbank.ru/qr/order.status",
            Self::Revoke => "https://api.sberbank.ru/qr/order.revoke",
            Self::Cancel => "https://api.sberbank.ru/qr/order.cancel",
            // Registry alone is granted under an auth:// URI upstream.
            Self::Registry => "auth://qr/order.registry",
        }
    }

    /// Short name used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Status => "status",
            Self::Revoke => "revoke",
            Self::Cancel => "cancel",
            Self::Registry => "registry",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a paid order is cancelled.
///
/// `Reverse` undoes a payment before settlement (no separate transfer back
/// to the payer); `Refund` returns funds after settlement via a separate
/// transfer. Convention: pick `Reverse` within 24 hours of the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CancelType {
    Refund,
    Reverse,
}

/// What the registry endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistryType {
    /// Full operation list for the period.
    Registry,
    /// Operation count only.
    Quantity,
}

/// One order line item. `order_sum` of the enclosing order must equal the
/// sum of `position_sum` across items; the API rejects mismatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub position_name: String,
    pub position_count: i64,
    pub position_sum: i64,
    pub position_description: String,
}

impl Position {
    pub fn new(
        name: impl Into<String>,
        count: i64,
        sum: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            position_name: name.into(),
            position_count: count,
            position_sum: sum,
            position_description: description.into(),
        }
    }
}

/// One or many order line items.
///
/// The wire format is always a list; a single [`Position`] is wrapped into
/// a one-element `order_params_type` list.
#[derive(Debug, Clone)]
pub enum Positions {
    One(Position),
    Many(Vec<Position>),
}

impl Positions {
    pub(crate) fn into_list(self) -> Vec<Position> {
        match self {
            Self::One(position) => vec![position],
            Self::Many(positions) => positions,
        }
    }
}

impl From<Position> for Positions {
    fn from(position: Position) -> Self {
        Self::One(position)
    }
}

impl From<Vec<Position>> for Positions {
    fn from(positions: Vec<Position>) -> Self {
        Self::Many(positions)
    }
}

/// Serialize an instant the way the API expects: ISO-8601 at second
/// precision with a literal trailing `Z`, e.g. `2024-01-15T10:30:00Z`.
pub(crate) fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
