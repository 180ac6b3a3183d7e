use kbase_core::{ApiEnvelope, KnowledgeBase, KnowledgeBaseList};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn list_response_decodes_backend_shape() {
    let body = json!({
        "code": 0,
        "message": "success",
        "data": {
            "kbs": [{
                "id": "kb-1",
                "name": "KB1",
                "avatar": null,
                "description": null,
                "status": "1",
                "doc_num": 3,
                "chunk_num": 42,
                "token_num": 1024,
                "create_time": 1718000000000i64,
                "update_time": 1718000000500i64,
                "tenant_id": "tenant-1",
                "parser_id": "naive",
                "permission": "me",
                "nickname": "owner"
            }],
            "total": 1
        }
    });
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_value(body).expect("decode");
    let typed = envelope.decode_data::<KnowledgeBaseList>().expect("typed");
    let list = typed.data.expect("data");
    assert_eq!(list.total, 1);
    let kb = &list.kbs[0];
    assert_eq!(kb.id, "kb-1");
    assert_eq!(kb.chunk_num, 42);
    assert!(kb.is_valid());
    assert_eq!(kb.extra.get("nickname"), Some(&json!("owner")));
}

proptest! {
    #[test]
    fn knowledge_base_keeps_unknown_fields(key in "[a-z]{3,10}_x", value in "[a-z0-9]{0,12}") {
        let mut body = json!({ "id": "kb", "name": "n" });
        body[key.as_str()] = json!(value.clone());
        let kb: KnowledgeBase = serde_json::from_value(body).expect("decode");
        prop_assert_eq!(kb.extra.get(&key), Some(&json!(value)));
    }
}
