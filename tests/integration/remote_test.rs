//! Remote-collection adapter over real HTTP

use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{remote_for, task, MockStore};
use taskboard_sync::remote::{LoadOptions, LOAD_FAILED_MESSAGE};
use taskboard_sync::shared::{Contact, RemoteError, Task};

fn ids(tasks: &[Task]) -> Vec<Option<u64>> {
    tasks.iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn test_load_array_with_holes() {
    let store = MockStore::start().await;
    store
        .respond("GET", "/tasks.json", 200, json!([null, {"id": 1, "title": "A"}, null, {"id": 2, "title": "B"}]))
        .await;

    let load = store
        .remote
        .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
        .await;

    assert!(!load.is_failed());
    assert_eq!(ids(load.data()), vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn test_load_keyed_object() {
    let store = MockStore::start().await;
    store
        .respond(
            "GET",
            "/users.json",
            200,
            json!({"20": {"name": "Zed"}, "3": {"name": "Amy"}, "7": null}),
        )
        .await;

    let load = store
        .remote
        .load_collection::<Contact>("users", &LoadOptions::new("load contacts"))
        .await;

    let ids: Vec<_> = load.data().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![Some(3), Some(20)]);
}

#[tokio::test]
async fn test_load_null_is_empty_success() {
    let store = MockStore::start().await;
    store.respond("GET", "/tasks.json", 200, json!(null)).await;

    let load = store
        .remote
        .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
        .await;

    assert!(load.data().is_empty());
    assert!(load.error().is_none());
    assert!(store.sink.messages().is_empty());
}

#[tokio::test]
async fn test_load_http_error_carries_detail() {
    let store = MockStore::start().await;
    store
        .respond("GET", "/tasks.json", 401, json!({"error": "Permission denied"}))
        .await;

    let load = store
        .remote
        .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
        .await;

    let error = load.error().cloned().unwrap();
    assert_eq!(error.status(), Some(401));
    crate::assert_contains!(error.to_string(), "Permission denied");
    assert!(load.data().is_empty());
    assert_eq!(store.sink.messages(), vec![LOAD_FAILED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_load_custom_and_silent_messages() {
    let store = MockStore::start().await;
    store.respond("GET", "/tasks.json", 503, json!(null)).await;

    let custom = LoadOptions::new("load tasks").error_message("Board is offline");
    store.remote.load_collection::<Task>("tasks", &custom).await;
    let silent = LoadOptions::new("load tasks").silent();
    let load = store.remote.load_collection::<Task>("tasks", &silent).await;

    assert!(load.is_failed());
    assert_eq!(store.sink.messages(), vec!["Board is offline".to_string()]);
}

#[tokio::test]
async fn test_load_network_failure_resolves_empty() {
    // nothing listens on port 1
    let (remote, sink) = remote_for("http://127.0.0.1:1");

    let load = remote
        .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
        .await;

    assert!(load.data().is_empty());
    assert!(load.error().map(RemoteError::is_network).unwrap_or(false));
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn test_set_entity_puts_under_id() {
    let store = MockStore::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/123.json"))
        .and(body_json(json!({
            "id": 123,
            "title": "Ship",
            "description": "",
            "dueDate": "",
            "priority": "medium",
            "category": "technical-task",
            "status": "todo",
            "assignedTo": [],
            "subtasks": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
        .expect(1)
        .mount(&store.server)
        .await;

    crate::assert_ok!(store.remote.set_entity(&task(123, "Ship"), "tasks").await);
}

#[tokio::test]
async fn test_set_entity_without_id_sends_nothing() {
    let store = MockStore::start().await;

    let result = store.remote.set_entity(&Task::new("no id"), "tasks").await;

    crate::assert_err!(result, RemoteError::Validation { .. });
    assert!(store.calls().await.is_empty());
}

#[tokio::test]
async fn test_patch_collection_body() {
    let store = MockStore::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tasks.json"))
        .and(body_json(json!({"1": {"title": "A"}, "2": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&store.server)
        .await;

    let mut patch = BTreeMap::new();
    patch.insert(1, Some(json!({"title": "A"})));
    patch.insert(2, None);

    crate::assert_ok!(store.remote.patch_collection(&patch, "tasks").await);
}

#[tokio::test]
async fn test_delete_entity_with_nested_path() {
    let store = MockStore::start().await;
    store.respond("DELETE", "/board/tasks/77.json", 200, json!(null)).await;

    crate::assert_ok!(store.remote.delete_entity(77, "/board/tasks/").await);
    assert_eq!(store.calls().await, vec![("DELETE".to_string(), "/board/tasks/77.json".to_string())]);
}

#[tokio::test]
async fn test_delete_failure_is_http_error() {
    let store = MockStore::start().await;
    store
        .respond("DELETE", "/tasks/5.json", 500, json!({"error": {"message": "boom"}}))
        .await;

    let error = store.remote.delete_entity(5, "tasks").await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert_eq!(error.context(), Some("delete tasks/5"));
    crate::assert_contains!(error.to_string(), "boom");
}

#[tokio::test]
async fn test_auth_token_is_sent() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks.json"))
        .and(query_param("auth", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&store.server)
        .await;

    let remote = store.remote.clone().with_auth_token("secret-token");
    let load = remote
        .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
        .await;

    assert!(!load.is_failed());
}

#[test]
fn test_blocking_load_through_tokio_test() {
    let load = tokio_test::block_on(async {
        let store = MockStore::start().await;
        store.respond("GET", "/tasks.json", 200, json!({"4": {"title": "D"}})).await;
        store
            .remote
            .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
            .await
    });
    assert_eq!(ids(load.data()), vec![Some(4)]);
}
