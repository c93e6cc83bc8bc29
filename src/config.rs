//! Client credentials, terminal identity, and TLS material.

use std::fs;
use std::path::PathBuf;

use crate::error::{Result, SberQrError};

/// Merchant and OAuth identity for one terminal.
///
/// `member_id`, `tid` and `id_qr` come from the merchant cabinet;
/// `client_id`/`client_secret` are issued on the bank's developer portal.
/// When `tid == id_qr` the terminal itself is the QR sticker and orders are
/// tagged for the instant-payment (SBP) network.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub member_id: String,
    pub id_qr: String,
    pub tid: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        member_id: impl Into<String>,
        id_qr: impl Into<String>,
        tid: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            id_qr: id_qr.into(),
            tid: tid.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load from `SBERQR_MEMBER_ID`, `SBERQR_ID_QR`, `SBERQR_TID`,
    /// `SBERQR_CLIENT_ID` and `SBERQR_CLIENT_SECRET`. A `.env` file in the
    /// working directory is honored.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Ok(Self {
            member_id: require_env("SBERQR_MEMBER_ID")?,
            id_qr: require_env("SBERQR_ID_QR")?,
            tid: require_env("SBERQR_TID")?,
            client_id: require_env("SBERQR_CLIENT_ID")?,
            client_secret: require_env("SBERQR_CLIENT_SECRET")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| SberQrError::Configuration(format!("missing environment variable {name}")))
}

/// Mutual-TLS material as PEM files.
///
/// The bank issues a PKCS#12 bundle; unpack it into a certificate and
/// private-key PEM pair first (`openssl pkcs12 -in key.p12 -out cert.pem
/// -clcerts -nokeys` / `-nocerts -nodes`). An extra root certificate can be
/// supplied for validating the server chain against the national trust
/// anchor.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    cert_pem_path: PathBuf,
    key_pem_path: PathBuf,
    root_ca_path: Option<PathBuf>,
}

impl TlsConfig {
    pub fn new(cert_pem_path: impl Into<PathBuf>, key_pem_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_pem_path: cert_pem_path.into(),
            key_pem_path: key_pem_path.into(),
            root_ca_path: None,
        }
    }

    /// Trust an additional root certificate (PEM) for the server chain.
    pub fn with_root_ca(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_ca_path = Some(path.into());
        self
    }

    pub(crate) fn identity(&self) -> Result<reqwest::Identity> {
        let mut pem = fs::read(&self.cert_pem_path)?;
        pem.extend(fs::read(&self.key_pem_path)?);
        reqwest::Identity::from_pem(&pem).map_err(|err| {
            SberQrError::Configuration(format!(
                "invalid client certificate {}: {err}",
                self.cert_pem_path.display()
            ))
        })
    }

    pub(crate) fn root_ca(&self) -> Result<Option<reqwest::Certificate>> {
        let Some(path) = &self.root_ca_path else {
            return Ok(None);
        };
        let pem = fs::read(path)?;
        reqwest::Certificate::from_pem(&pem).map(Some).map_err(|err| {
            SberQrError::Configuration(format!(
                "invalid root certificate {}: {err}",
                path.display()
            ))
        })
    }
}
