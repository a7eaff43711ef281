//! Typed view of a verifiable-credential token payload.
//!
//! Tokens come in two layouts: registered claims at the top level
//! (`id`, `jti`, `iss`, `credentialStatus`) and the same data nested under
//! `vc`. Both are modelled explicitly so the fallback order is checked by
//! the compiler rather than probed at runtime.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProofError, Result};

/// A credential identifier. JSON strings and integers are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CredentialId(pub String);

impl CredentialId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for CredentialId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

/// The `credentialStatus` entry: `{ "type": <method>, "id": <locator> }`.
///
/// Both members are optional on the wire so that an incomplete entry is
/// reported by [`super::resolve_status`] rather than failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStatus {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

/// An issuer given either as a bare string or as `{ "id": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssuerRef {
    Id(String),
    Object { id: String },
}

impl IssuerRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

/// The nested `vc` claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CredentialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<CredentialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<IssuerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
}

/// A decoded credential token payload. Its signature is validated upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CredentialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<CredentialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc: Option<VcPayload>,
}

impl CredentialToken {
    /// Parse a JSON payload.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ProofError::InvalidToken(e.to_string()))
    }

    /// Decode the payload segment of a compact JWS (`header.payload.signature`).
    ///
    /// The signature is not checked.
    pub fn from_jwt(compact: &str) -> Result<Self> {
        let segments: Vec<&str> = compact.trim().split('.').collect();
        let payload = match segments.as_slice() {
            [_header, payload, _signature] => *payload,
            _ => {
                return Err(ProofError::InvalidToken(
                    "expected header.payload.signature".into(),
                ))
            }
        };

        let bytes = base64::Engine::decode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            payload.trim_end_matches('='),
        )
        .map_err(|e| ProofError::InvalidToken(format!("invalid base64url payload: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| ProofError::InvalidToken(e.to_string()))
    }

    /// Parse either a compact JWT or a raw JSON payload.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim_start().starts_with('{') {
            Self::from_json(input)
        } else {
            Self::from_jwt(input)
        }
    }
}
