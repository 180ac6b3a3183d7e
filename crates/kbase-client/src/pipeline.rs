use std::sync::Arc;
use std::time::{Duration, Instant};

use kbase_core::{ApiEnvelope, JSON_CONTENT_TYPE};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{AuthFailureKind, ClientError};
use crate::navigation::NavigationCoordinator;
use crate::notifier::Notifier;
use crate::session::SessionStore;
use crate::transport::{PreparedRequest, Transport, TransportError};

/// Method, path, body and headers of one outgoing call.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl RequestEnvelope {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize>(self, payload: &T) -> Result<Self, ClientError> {
        Ok(self.with_body(serde_json::to_value(payload)?))
    }

    #[must_use]
    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }
}

/// Business payload and transport headers, kept side by side.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub payload: ApiEnvelope<T>,
    pub headers: HeaderMap,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.payload.is_success()
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Credential issued by the server, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION.as_str())
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// `data` of a successful response, or the server's message.
    pub fn into_result(self) -> Result<Option<T>, ClientError> {
        if !self.payload.is_success() {
            return Err(ClientError::Validation {
                code: self.payload.code,
                message: self.payload.message,
            });
        }
        Ok(self.payload.data)
    }

    pub fn into_data(self) -> Result<T, ClientError> {
        self.into_result()?.ok_or(ClientError::MissingData)
    }
}

/// Serialized request body: absent and null become `{}`, strings pass
/// through, everything else is JSON text.
#[must_use]
pub fn serialize_body(body: Option<&serde_json::Value>) -> String {
    match body {
        None | Some(serde_json::Value::Null) => "{}".to_string(),
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
    }
}

/// Attaches the session credential to every call and reacts to auth
/// rejections by ending the session and redirecting to the login view.
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<NavigationCoordinator>,
    notifier: Arc<dyn Notifier>,
    base_url: String,
    login_route: String,
    redirect_delay: Duration,
}

impl RequestPipeline {
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<NavigationCoordinator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            notifier,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_route: config.login_route.clone(),
            redirect_delay: config.redirect_delay,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<NavigationCoordinator> {
        &self.navigator
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Outbound phase: credential, content type and body serialization.
    pub fn prepare(&self, envelope: RequestEnvelope) -> Result<PreparedRequest, ClientError> {
        let mut headers = envelope.headers;
        headers.remove(AUTHORIZATION);
        match self.session.get() {
            Ok(Some(credential)) => {
                let value = HeaderValue::from_str(&credential)
                    .map_err(|_| ClientError::InvalidHeader(AUTHORIZATION.to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
            Ok(None) => {}
            Err(err) => warn!("session unreadable; sending anonymously: {err}"),
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        Ok(PreparedRequest {
            url: self.url_for(&envelope.path),
            body: serialize_body(envelope.body.as_ref()),
            method: envelope.method,
            query: envelope.query,
            headers,
        })
    }

    pub async fn send(
        &self,
        envelope: RequestEnvelope,
    ) -> Result<ApiResponse<serde_json::Value>, ClientError> {
        let method = envelope.method.clone();
        let path = envelope.path.clone();
        let request = self.prepare(envelope)?;

        debug!(method = %method, path = %path, "http request");
        let start = Instant::now();
        let result = self.transport.execute(request).await;
        let elapsed_ms = start.elapsed().as_millis();

        let response = match result {
            Ok(response) => response,
            Err(TransportError::Status { status, body, .. })
                if AuthFailureKind::from_status(status).is_some() =>
            {
                debug!(method = %method, path = %path, status = %status, elapsed_ms, "http response");
                return Err(self.reject_status(status, &body));
            }
            Err(err) => {
                debug!(method = %method, path = %path, elapsed_ms, "http request failed: {err}");
                return Err(ClientError::Transport(err));
            }
        };
        debug!(
            method = %method,
            path = %path,
            status = %response.status,
            elapsed_ms,
            "http response"
        );

        let raw: serde_json::Value = serde_json::from_slice(&response.body)?;
        let payload: ApiEnvelope<serde_json::Value> = serde_json::from_value(raw.clone())?;
        if let Some(kind) = AuthFailureKind::from_code(payload.code) {
            return Err(self.reject(
                kind,
                Some(response.status),
                payload.code,
                payload.message,
                Some(raw),
            ));
        }
        Ok(ApiResponse {
            payload,
            headers: response.headers,
        })
    }

    /// [`send`](Self::send) with `data` decoded into `T` on success.
    pub async fn send_as<T: DeserializeOwned>(
        &self,
        envelope: RequestEnvelope,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.send(envelope).await?;
        Ok(ApiResponse {
            payload: response.payload.decode_data()?,
            headers: response.headers,
        })
    }

    fn reject_status(&self, status: StatusCode, body: &str) -> ClientError {
        let code = i64::from(status.as_u16());
        let payload = serde_json::from_str::<serde_json::Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(|value| value.get("message").or_else(|| value.get("detail")))
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| body.to_string(), str::to_string);
        let kind = AuthFailureKind::from_code(code).unwrap_or(AuthFailureKind::SessionExpired);
        self.reject(kind, Some(status), code, message, payload)
    }

    fn reject(
        &self,
        kind: AuthFailureKind,
        status: Option<StatusCode>,
        code: i64,
        message: String,
        payload: Option<serde_json::Value>,
    ) -> ClientError {
        warn!(code, reason = %kind, "request rejected; ending session");
        self.notifier.warn(kind.user_message());
        match self.session.clear() {
            Ok(()) => info!("session cleared"),
            Err(err) => warn!("failed to clear session: {err}"),
        }
        if self.navigator.current_route() != self.login_route {
            self.navigator
                .schedule_redirect(&self.login_route, self.redirect_delay);
        } else {
            debug!("already on the login view; no redirect");
        }
        ClientError::AuthRejected {
            kind,
            status,
            code,
            message,
            payload,
        }
    }
}
