//! Async client for the five order operations.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{check_response, Method, DEFAULT_BASE_URL};
use crate::auth::{basic_auth, token_cache_key, TokenCache, TokenResponse};
use crate::config::{Credentials, TlsConfig};
use crate::error::{Result, SberQrError};
use crate::payload::Payload;
use crate::types::{format_timestamp, CancelType, Positions, RegistryType, Scope};

/// Participant id attached to orders when the terminal itself is the QR
/// sticker (an SBP-linked static QR).
const SBP_MEMBER_ID: &str = "100000000111";

/// ISO 4217 numeric code for the Russian ruble; the only currency the API
/// accepts today.
const CURRENCY_RUB: &str = "643";

/// Async client for the QR-payment API.
///
/// Each operation acquires a bearer token for its own scope (from the
/// configured [`TokenCache`] or a fresh client-credentials exchange),
/// builds the JSON body, POSTs it, and validates the response. The
/// underlying connection pool is created once at build time and torn down
/// when the client is dropped.
///
/// # Example
/// ```no_run
/// use sberqr::{Credentials, Position, SberQr};
///
/// # async fn example() -> sberqr::Result<()> {
/// let creds = Credentials::new("00000105", "1000301234", "24601234", "id", "secret");
/// let client = SberQr::builder(creds).build()?;
/// let order = client
///     .create("Coffee", 150, None, Position::new("Coffee", 1, 150, "Coffee"))
///     .await?;
/// println!("{}", order["order_form_url"]);
/// # Ok(())
/// # }
/// ```
pub struct SberQr {
    creds: Credentials,
    http: reqwest::Client,
    base_url: String,
    cache: Option<Arc<dyn TokenCache>>,
}

/// Builder for [`SberQr`].
pub struct SberQrBuilder {
    creds: Credentials,
    tls: Option<TlsConfig>,
    base_url: String,
    cache: Option<Arc<dyn TokenCache>>,
    timeout: Option<Duration>,
}

impl SberQrBuilder {
    /// Mutual-TLS client certificate and optional extra root CA.
    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Override the API host (primarily for tests against a mock server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Reuse tokens through a cache instead of exchanging per call.
    pub fn token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Bound each individual HTTP call (not a whole multi-call operation:
    /// `create` is two calls, token then order).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SberQr> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        if let Some(tls) = &self.tls {
            http = http.identity(tls.identity()?);
            if let Some(root_ca) = tls.root_ca()? {
                http = http.add_root_certificate(root_ca);
            }
        }
        Ok(SberQr {
            creds: self.creds,
            http: http.build()?,
            base_url: self.base_url,
            cache: self.cache,
        })
    }
}

impl SberQr {
    pub fn builder(creds: Credentials) -> SberQrBuilder {
        SberQrBuilder {
            creds,
            tls: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: None,
            timeout: None,
        }
    }

    /// Create a payment order.
    ///
    /// `order_sum` is in minor currency units and must equal the sum of
    /// `position_sum` across `positions`. When `order_number` is `None`, a
    /// timestamp-derived number (`%Y%m%d%H%M%S%3f`, UTC) is generated.
    /// Orders on an SBP-linked terminal (`tid == id_qr`) are tagged with
    /// the fixed participant id.
    pub async fn create(
        &self,
        description: &str,
        order_sum: i64,
        order_number: Option<&str>,
        positions: impl Into<Positions>,
    ) -> Result<Value> {
        let positions: Positions = positions.into();
        let rq_uid = new_rq_uid();
        let now = format_timestamp(Utc::now());
        let order_number = order_number
            .map(str::to_string)
            .unwrap_or_else(generate_order_number);
        let sbp_member_id = (self.creds.tid == self.creds.id_qr).then_some(SBP_MEMBER_ID);

        let body = Payload::new()
            .field("rq_uid", &rq_uid)?
            .field("rq_tm", &now)?
            .field("member_id", &self.creds.member_id)?
            .field("order_number", &order_number)?
            .field("order_create_date", &now)?
            .field("order_params_type", positions.into_list())?
            .field("id_qr", &self.creds.id_qr)?
            .field("order_sum", order_sum)?
            .field("currency", CURRENCY_RUB)?
            .field("description", description)?
            .opt("sbp_member_id", sbp_member_id)?
            .build();
        self.call(Method::Creation, Scope::Create, &rq_uid, body).await
    }

    /// Poll the state of an order.
    pub async fn status(&self, order_id: &str, partner_order_number: &str) -> Result<Value> {
        let rq_uid = new_rq_uid();
        let body = Payload::new()
            .field("rq_uid", &rq_uid)?
            .field("rq_tm", format_timestamp(Utc::now()))?
            .field("order_id", order_id)?
            .field("tid", &self.creds.tid)?
            .field("partner_order_number", partner_order_number)?
            .build();
        self.call(Method::Status, Scope::Status, &rq_uid, body).await
    }

    /// Revoke an order that has not been paid yet.
    pub async fn revoke(&self, order_id: &str) -> Result<Value> {
        let rq_uid = new_rq_uid();
        let body = Payload::new()
            .field("rq_uid", &rq_uid)?
            .field("rq_tm", format_timestamp(Utc::now()))?
            .field("order_id", order_id)?
            .build();
        self.call(Method::Revocation, Scope::Revoke, &rq_uid, body).await
    }

    /// Cancel or refund a paid order.
    ///
    /// `operation_type` defaults to [`CancelType::Reverse`]; use
    /// [`CancelType::Refund`] once settlement has finalized (convention:
    /// more than 24 hours after payment). `sbp_payer_id` is the payer's
    /// phone number for refunds routed over the instant-payment network.
    pub async fn cancel(
        &self,
        order_id: &str,
        operation_id: &str,
        cancel_operation_sum: i64,
        auth_code: &str,
        operation_type: Option<CancelType>,
        sbp_payer_id: Option<&str>,
    ) -> Result<Value> {
        let rq_uid = new_rq_uid();
        let body = Payload::new()
            .field("rq_uid", &rq_uid)?
            .field("rq_tm", format_timestamp(Utc::now()))?
            .field("operation_id", operation_id)?
            .field("order_id", order_id)?
            .field("id_qr", &self.creds.id_qr)?
            .field("cancel_operation_sum", cancel_operation_sum)?
            .field("operation_currency", CURRENCY_RUB)?
            .field("auth_code", auth_code)?
            .field("tid", &self.creds.tid)?
            .field("operation_type", operation_type.unwrap_or(CancelType::Reverse))?
            .opt("sbp_payer_id", sbp_payer_id)?
            .build();
        self.call(Method::Cancel, Scope::Cancel, &rq_uid, body).await
    }

    /// Fetch the operation registry for a period.
    ///
    /// `registry_type` defaults to [`RegistryType::Registry`] (the full
    /// operation list).
    pub async fn registry(
        &self,
        start_period: DateTime<Utc>,
        end_period: DateTime<Utc>,
        registry_type: Option<RegistryType>,
    ) -> Result<Value> {
        let rq_uid = new_rq_uid();
        // This endpoint alone speaks camelCase. An upstream inconsistency,
        // preserved for wire compatibility.
        let body = Payload::new()
            .field("rqUid", &rq_uid)?
            .field("rqTm", format_timestamp(Utc::now()))?
            .field("idQR", &self.creds.id_qr)?
            .field("startPeriod", format_timestamp(start_period))?
            .field("endPeriod", format_timestamp(end_period))?
            .field("registryType", registry_type.unwrap_or(RegistryType::Registry))?
            .build();
        self.call(Method::Registry, Scope::Registry, &rq_uid, body).await
    }

    /// Acquire an access token for `scope`: cache lookup first, then a
    /// client-credentials exchange. A freshly exchanged token is cached
    /// with the configured TTL margin; cache errors are not swallowed.
    pub async fn token(&self, scope: Scope) -> Result<String> {
        let key = token_cache_key(&self.creds.client_id, scope);
        if let Some(cache) = &self.cache {
            if let Some(token) = cache.get(&key).await? {
                if !token.is_empty() {
                    debug!(%scope, "token cache hit");
                    return Ok(token);
                }
            }
        }

        let token = match self.exchange(scope).await {
            Ok(token) => token,
            Err(err) => {
                return Err(SberQrError::auth(
                    format!("token exchange failed for scope {scope}"),
                    err,
                ))
            }
        };

        if let Some(cache) = &self.cache {
            match token.cache_ttl() {
                Some(ttl) => cache.set(&key, &token.access_token, ttl).await?,
                None => warn!(
                    %scope,
                    expires_in = token.expires_in,
                    "token lifetime within safety margin, not caching"
                ),
            }
        }
        Ok(token.access_token)
    }

    async fn exchange(&self, scope: Scope) -> Result<TokenResponse> {
        debug!(%scope, "client-credentials exchange");
        let response = self
            .http
            .post(self.url(Method::OAuth))
            .header(
                reqwest::header::AUTHORIZATION,
                basic_auth(&self.creds.client_id, &self.creds.client_secret),
            )
            // The token gateway expects the correlation-id header
            // lowercased, unlike the order endpoints.
            .header("rquid", new_rq_uid())
            .header(reqwest::header::ACCEPT, "application/json")
            .header("x-ibm-client-id", &self.creds.client_id)
            .form(&[("grant_type", "client_credentials"), ("scope", scope.grant())])
            .send()
            .await?;
        let body = read_checked(Method::OAuth, response).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn call(
        &self,
        method: Method,
        scope: Scope,
        rq_uid: &str,
        body: Value,
    ) -> Result<Value> {
        let token = self.token(scope).await?;
        debug!(%method, rq_uid, "request");
        let response = self
            .http
            .post(self.url(method))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .header("RqUID", rq_uid)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("x-ibm-client-id", &self.creds.client_id)
            .json(&body)
            .send()
            .await?;
        read_checked(method, response).await
    }

    fn url(&self, method: Method) -> String {
        format!("{}{}", self.base_url, method.path())
    }
}

async fn read_checked(method: Method, response: reqwest::Response) -> Result<Value> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let text = response.text().await?;
    check_response(method, &content_type, status, &text)
}

/// Fresh 32-character hex correlation id, regenerated per call.
fn new_rq_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Timestamp-derived order number for callers that do not track their own.
fn generate_order_number() -> String {
    Utc::now().format("%Y%m%d%H%M%S%3f").to_string()
}
