mod support;

use std::sync::Arc;

use kbase_client::{AuthFailureKind, ClientError, TransportError};
use kbase_client::MemorySessionStore;
use kbase_core::{ListKnowledgeBasesQuery, ListKnowledgeBasesRequest};
use kbase_crypto::{RsaCredentialEncoder, UnavailableEncoder};
use mockito::{Matcher, Server};
use serde_json::json;

use support::Harness;

fn empty_list() -> String {
    json!({ "code": 0, "data": { "kbs": [], "total": 0 }, "message": "success" }).to_string()
}

#[tokio::test]
async fn login_stores_issued_credential() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/v1/user/login")
        .match_header("content-type", "application/json;charset=UTF-8")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({ "email": "a@b.com" })))
        .with_status(200)
        .with_header("authorization", "tok-123")
        .with_body(
            json!({ "code": 0, "data": { "email": "a@b.com", "nickname": "a" }, "message": "Welcome back!" })
                .to_string(),
        )
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::new(),
    );
    let response = harness.client.login("a@b.com", "secret1").await.expect("login");

    login.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.authorization(), Some("tok-123"));
    assert_eq!(harness.credential().as_deref(), Some("tok-123"));
    assert!(harness.routes().is_empty());
}

#[tokio::test]
async fn list_carries_stored_credential() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("POST", "/v1/kb/list")
        .match_header("authorization", "tok-123")
        .match_header("content-type", "application/json;charset=UTF-8")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .match_body(Matcher::Json(json!({})))
        .with_status(200)
        .with_body(empty_list())
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let query = ListKnowledgeBasesQuery {
        page: Some(1),
        ..Default::default()
    };
    let list_response = harness
        .client
        .list_kbs(&query, &ListKnowledgeBasesRequest::default())
        .await
        .expect("list");

    list.assert_async().await;
    assert_eq!(list_response.into_data().expect("data").total, 0);
}

#[tokio::test]
async fn business_401_ends_session_and_redirects() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/kb/list")
        .with_status(200)
        .with_body(json!({ "code": 401, "message": "expired" }).to_string())
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let err = harness
        .client
        .list_kbs(&ListKnowledgeBasesQuery::default(), &ListKnowledgeBasesRequest::default())
        .await
        .expect_err("auth failure");

    match err {
        ClientError::AuthRejected {
            kind,
            code,
            message,
            payload,
            ..
        } => {
            assert_eq!(kind, AuthFailureKind::SessionExpired);
            assert_eq!(code, 401);
            assert_eq!(message, "expired");
            assert_eq!(payload, Some(json!({ "code": 401, "message": "expired" })));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(harness.credential(), None);
    assert_eq!(harness.navigator.pending_redirects(), 1);
    assert!(harness.routes().is_empty());

    harness.navigator.settle().await;
    assert_eq!(harness.routes(), vec!["/login".to_string()]);
    assert_eq!(
        harness.notifier.warnings(),
        vec![AuthFailureKind::SessionExpired.user_message().to_string()]
    );
}

#[tokio::test]
async fn transport_403_ends_session_with_access_denied() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/kb/detail")
        .match_query(Matcher::UrlEncoded("kb_id".into(), "kb-1".into()))
        .with_status(403)
        .with_body(json!({ "detail": "This account has been disabled" }).to_string())
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let err = harness.client.get_kb("kb-1").await.expect_err("auth failure");

    match err {
        ClientError::AuthRejected {
            kind,
            status,
            message,
            ..
        } => {
            assert_eq!(kind, AuthFailureKind::AccessDenied);
            assert_eq!(status.map(|status| status.as_u16()), Some(403));
            assert_eq!(message, "This account has been disabled");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(harness.credential(), None);
    harness.navigator.settle().await;
    assert_eq!(harness.routes(), vec!["/login".to_string()]);
    assert_eq!(
        harness.notifier.warnings(),
        vec![AuthFailureKind::AccessDenied.user_message().to_string()]
    );
}

#[tokio::test]
async fn failed_login_on_login_view_does_not_redirect() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/user/login")
        .with_status(401)
        .with_body(json!({ "detail": "Email and password do not match!" }).to_string())
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::new(),
    );
    harness.navigator.set_current_route("/login");
    let err = harness
        .client
        .login("a@b.com", "wrong")
        .await
        .expect_err("rejected");

    assert!(err.is_auth_rejected());
    assert_eq!(harness.navigator.pending_redirects(), 0);
    harness.navigator.settle().await;
    assert!(harness.routes().is_empty());
    assert_eq!(harness.credential(), None);
}

#[tokio::test]
async fn server_errors_pass_through_without_session_change() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/kb/rm")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let err = harness.client.delete_kb("kb-1").await.expect_err("server error");

    match err {
        ClientError::Transport(TransportError::Status { status, body, .. }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(harness.credential().as_deref(), Some("tok-123"));
    assert_eq!(harness.navigator.pending_redirects(), 0);
    assert!(harness.notifier.warnings().is_empty());
}

#[tokio::test]
async fn business_errors_are_returned_to_the_caller() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/kb/create")
        .with_status(200)
        .with_body(
            json!({ "code": 102, "data": false, "message": "Dataset name can't be empty." })
                .to_string(),
        )
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let response = harness
        .client
        .create_kb(&kbase_core::CreateKnowledgeBaseRequest::named(" "))
        .await
        .expect("transported");

    assert_eq!(response.payload.code, 102);
    assert!(matches!(
        response.into_data(),
        Err(ClientError::Validation { code: 102, .. })
    ));
    assert_eq!(harness.credential().as_deref(), Some("tok-123"));
    assert_eq!(harness.navigator.pending_redirects(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_failure_without_session_change() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/user/info")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let err = harness.client.user_info().await.expect_err("malformed");

    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(harness.credential().as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn login_aborts_before_network_without_crypto() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/v1/user/login")
        .expect(0)
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(UnavailableEncoder),
        MemorySessionStore::new(),
    );
    assert!(!harness.client.encryption_supported());
    let err = harness
        .client
        .login("a@b.com", "secret1")
        .await
        .expect_err("no crypto");

    assert!(matches!(err, ClientError::CryptoUnavailable(_)));
    login.assert_async().await;
    assert_eq!(harness.credential(), None);
}

#[tokio::test]
async fn logout_twice_is_idempotent() {
    let mut server = Server::new_async().await;
    let logout = server
        .mock("GET", "/v1/user/logout")
        .match_header("authorization", "tok-123")
        .with_status(200)
        .with_body(json!({ "code": 0, "data": true, "message": "success" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    harness.client.logout().await.expect("first logout");
    assert_eq!(harness.credential(), None);
    harness.client.logout().await.expect("second logout");
    assert_eq!(harness.credential(), None);

    logout.assert_async().await;
    assert!(harness.routes().is_empty());
}

#[tokio::test]
async fn logout_with_stale_session_still_succeeds() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/user/logout")
        .with_status(401)
        .with_body(json!({ "detail": "Invalid access token" }).to_string())
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("stale"),
    );
    harness.client.logout().await.expect("logout");
    assert_eq!(harness.credential(), None);
}

#[tokio::test]
async fn tag_endpoints_address_one_knowledge_base() {
    let mut server = Server::new_async().await;
    let tags = server
        .mock("GET", "/v1/kb/kb-1/tags")
        .with_status(200)
        .with_body(json!({ "code": 0, "data": [["law", 3]], "message": "success" }).to_string())
        .create_async()
        .await;
    let rename = server
        .mock("POST", "/v1/kb/kb-1/rename_tag")
        .match_body(Matcher::Json(json!({ "from_tag": "law", "to_tag": "legal" })))
        .with_status(200)
        .with_body(json!({ "code": 0, "data": true, "message": "success" }).to_string())
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let listed = harness.client.list_tags("kb-1").await.expect("tags");
    assert_eq!(listed.into_data().expect("data"), vec![json!(["law", 3])]);
    let renamed = harness
        .client
        .rename_tag("kb-1", "law", "legal")
        .await
        .expect("rename");
    assert!(renamed.into_data().expect("data"));

    tags.assert_async().await;
    rename.assert_async().await;
}

#[tokio::test]
async fn basic_info_queries_one_knowledge_base() {
    let mut server = Server::new_async().await;
    let info = server
        .mock("GET", "/v1/kb/basic_info")
        .match_header("authorization", "tok-123")
        .match_query(Matcher::UrlEncoded("kb_id".into(), "kb-1".into()))
        .with_status(200)
        .with_body(
            json!({ "code": 0, "data": { "doc_num": 4, "processing": 1 }, "message": "success" })
                .to_string(),
        )
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let data = harness
        .client
        .basic_info("kb-1")
        .await
        .expect("basic info")
        .into_data()
        .expect("data");

    info.assert_async().await;
    assert_eq!(data["doc_num"], 4);
}

#[tokio::test]
async fn get_meta_joins_ids() {
    let mut server = Server::new_async().await;
    let meta = server
        .mock("GET", "/v1/kb/get_meta")
        .match_query(Matcher::UrlEncoded("kb_ids".into(), "kb-1,kb-2".into()))
        .with_status(200)
        .with_body(
            json!({ "code": 0, "data": { "author": { "alice": ["doc-1"] } }, "message": "success" })
                .to_string(),
        )
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let ids = vec!["kb-1".to_string(), "kb-2".to_string()];
    let data = harness
        .client
        .get_meta(&ids)
        .await
        .expect("meta")
        .into_data()
        .expect("data");

    meta.assert_async().await;
    assert_eq!(data["author"]["alice"], json!(["doc-1"]));
}

#[tokio::test]
async fn knowledge_graph_decodes_graph_and_mind_map() {
    let mut server = Server::new_async().await;
    let graph = server
        .mock("GET", "/v1/kb/kb-1/knowledge_graph")
        .match_header("authorization", "tok-123")
        .with_status(200)
        .with_body(
            json!({
                "code": 0,
                "data": {
                    "graph": { "nodes": [{ "id": "contract" }], "edges": [] },
                    "mind_map": {}
                },
                "message": "success"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let data = harness
        .client
        .knowledge_graph("kb-1")
        .await
        .expect("graph")
        .into_data()
        .expect("data");

    graph.assert_async().await;
    assert_eq!(data.node_count(), 1);
    assert_eq!(data.mind_map, json!({}));
}

#[tokio::test]
async fn delete_knowledge_graph_uses_delete_verb() {
    let mut server = Server::new_async().await;
    let removed = server
        .mock("DELETE", "/v1/kb/kb-1/knowledge_graph")
        .match_header("authorization", "tok-123")
        .with_status(200)
        .with_body(json!({ "code": 0, "data": true, "message": "success" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let deleted = harness
        .client
        .delete_knowledge_graph("kb-1")
        .await
        .expect("delete graph");

    removed.assert_async().await;
    assert!(deleted.into_data().expect("data"));
}

#[tokio::test]
async fn knowledge_graph_without_access_is_a_validation_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/kb/kb-9/knowledge_graph")
        .with_status(200)
        .with_body(
            json!({ "code": 109, "data": false, "message": "No authorization." }).to_string(),
        )
        .create_async()
        .await;

    let harness = Harness::over_http(
        &server.url(),
        Arc::new(RsaCredentialEncoder::bundled()),
        MemorySessionStore::with_credential("tok-123"),
    );
    let response = harness.client.knowledge_graph("kb-9").await.expect("transported");

    assert!(matches!(
        response.into_data(),
        Err(ClientError::Validation { code: 109, .. })
    ));
    assert_eq!(harness.credential().as_deref(), Some("tok-123"));
    assert_eq!(harness.navigator.pending_redirects(), 0);
}
