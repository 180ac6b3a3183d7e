#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kbase_client::{
    ClientConfig, KbClient, MemorySessionStore, NavigationCoordinator, Notifier,
    PreparedRequest, RequestPipeline, ReqwestTransport, Transport, TransportError,
    TransportResponse,
};
use kbase_crypto::CredentialEncoder;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::json;

pub const TEST_PRIVATE_KEY: &str = include_str!("../../../kbase-crypto/tests/fixtures/test_private.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../../../kbase-crypto/tests/fixtures/test_public.pem");

#[derive(Default)]
pub struct RecordingNotifier {
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings.lock().expect("lock").push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().expect("lock").push(message.to_string());
    }
}

pub struct Harness {
    pub client: KbClient,
    pub session: Arc<MemorySessionStore>,
    pub navigator: Arc<NavigationCoordinator>,
    pub notifier: Arc<RecordingNotifier>,
    pub routes: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        encoder: Arc<dyn CredentialEncoder>,
        session: MemorySessionStore,
    ) -> Self {
        let config = ClientConfig::default()
            .with_base_url(base_url)
            .with_redirect_delay(Duration::from_millis(10));
        let session = Arc::new(session);
        let navigator = Arc::new(NavigationCoordinator::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let routes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&routes);
        navigator.register(move |route: &str| {
            sink.lock().expect("lock").push(route.to_string());
        });
        navigator.set_current_route("/knowledge");
        let pipeline = RequestPipeline::new(
            &config,
            transport,
            session.clone(),
            navigator.clone(),
            notifier.clone(),
        );
        Self {
            client: KbClient::new(pipeline, encoder),
            session,
            navigator,
            notifier,
            routes,
        }
    }

    pub fn over_http(
        base_url: &str,
        encoder: Arc<dyn CredentialEncoder>,
        session: MemorySessionStore,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("http client");
        let transport = ReqwestTransport::from_client(http);
        Self::new(base_url, Arc::new(transport), encoder, session)
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("lock").clone()
    }

    pub fn credential(&self) -> Option<String> {
        use kbase_client::SessionStore;
        self.session.get().expect("session")
    }
}

pub fn json_response(body: serde_json::Value) -> TransportResponse {
    TransportResponse {
        status: StatusCode::OK,
        headers: HeaderMap::new(),
        body: body.to_string().into_bytes(),
    }
}

pub fn status_error(status: StatusCode, body: &str) -> TransportError {
    TransportError::Status {
        status,
        headers: HeaderMap::new(),
        body: body.to_string(),
    }
}

/// Replays canned answers in order and records what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub requests: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<TransportResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().expect("lock").push(request);
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Ok(json_response(json!({ "code": 0, "data": null, "message": "success" }))))
    }
}

/// Minimal in-memory knowledge-base backend.
pub struct FakeKbServer {
    token: String,
    kbs: Mutex<Vec<serde_json::Value>>,
    next_id: Mutex<u32>,
}

impl FakeKbServer {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            kbs: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    fn authorized(&self, request: &PreparedRequest) -> bool {
        request
            .headers
            .get(AUTHORIZATION)
            .map(HeaderValue::as_bytes)
            == Some(self.token.as_bytes())
    }
}

#[async_trait]
impl Transport for FakeKbServer {
    async fn execute(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError> {
        if !self.authorized(&request) {
            return Err(status_error(
                StatusCode::UNAUTHORIZED,
                r#"{"detail":"Invalid access token"}"#,
            ));
        }
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap_or(json!({}));
        let response = if request.url.ends_with("/v1/kb/create") {
            let mut next_id = self.next_id.lock().expect("lock");
            let record = json!({
                "id": format!("kb-{}", *next_id),
                "name": body["name"],
                "status": "1",
                "doc_num": 0
            });
            *next_id += 1;
            self.kbs.lock().expect("lock").push(record.clone());
            json!({ "code": 0, "data": record, "message": "success" })
        } else if request.url.ends_with("/v1/kb/list") {
            let kbs = self.kbs.lock().expect("lock").clone();
            let total = kbs.len();
            json!({ "code": 0, "data": { "kbs": kbs, "total": total }, "message": "success" })
        } else if request.url.ends_with("/v1/kb/rm") {
            let mut kbs = self.kbs.lock().expect("lock");
            let before = kbs.len();
            kbs.retain(|kb| kb["id"] != body["kb_id"]);
            if kbs.len() == before {
                json!({ "code": 102, "data": false, "message": "Can't find this knowledgebase!" })
            } else {
                json!({ "code": 0, "data": true, "message": "success" })
            }
        } else {
            json!({ "code": 404, "data": false, "message": "not found" })
        };
        Ok(json_response(response))
    }
}
