use kbase_core::ret_code;
use kbase_crypto::CryptoError;
use reqwest::StatusCode;

use crate::session::SessionError;
use crate::transport::TransportError;

/// Which of the two auth rejections ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    SessionExpired,
    AccessDenied,
}

impl AuthFailureKind {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            ret_code::UNAUTHORIZED => Some(Self::SessionExpired),
            ret_code::FORBIDDEN => Some(Self::AccessDenied),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_status(status: StatusCode) -> Option<Self> {
        Self::from_code(i64::from(status.as_u16()))
    }

    /// Text shown to the user before the redirect.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            Self::SessionExpired => "Session expired, please log in again",
            Self::AccessDenied => "Access denied, please log in with an authorized account",
        }
    }
}

impl std::fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionExpired => write!(f, "session expired"),
            Self::AccessDenied => write!(f, "access denied"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("password encryption unavailable: {0}")]
    CryptoUnavailable(CryptoError),
    #[error("password encryption failed: {0}")]
    Crypto(CryptoError),
    #[error("{kind} (code {code}): {message}")]
    AuthRejected {
        kind: AuthFailureKind,
        status: Option<StatusCode>,
        code: i64,
        message: String,
        payload: Option<serde_json::Value>,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{message} (code {code})")]
    Validation { code: i64, message: String },
    #[error("response carried no data")]
    MissingData,
    #[error("login response carried no authorization header")]
    MissingCredential,
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid header value for {0}")]
    InvalidHeader(String),
}

impl ClientError {
    #[must_use]
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected { .. })
    }
}

impl From<CryptoError> for ClientError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::EncodingUnavailable | CryptoError::InvalidPublicKey => {
                Self::CryptoUnavailable(err)
            }
            other => Self::Crypto(other),
        }
    }
}
