//! Board session end to end: load, act, save

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::RecordingSink;
use taskboard_sync::board::{ActionOutcome, Board, BoardAction};
use taskboard_sync::remote::ErrorPolicy;
use taskboard_sync::shared::{AppConfig, TaskStatus};
use taskboard_sync::store::FlushReport;

async fn seeded_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/join/tasks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "1": {"title": "Kick-off", "status": "todo", "assignedTo": [7]},
            "2": {"title": "Review", "status": "await-feedback", "assignedTo": [7, 9]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/join/users.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            null,
            {"id": 7, "name": "Sofia Müller", "mail": "sofia@example.com"},
            {"id": 9, "name": "anton Mayer", "mail": "anton@example.com"}
        ])))
        .mount(&server)
        .await;
    server
}

fn connect(server: &MockServer) -> (Board, Arc<RecordingSink>) {
    let config = AppConfig::builder()
        .base_url(server.uri())
        .tasks_path("join/tasks")
        .users_path("join/users")
        .build()
        .unwrap();
    let sink = Arc::new(RecordingSink::default());
    let policy = ErrorPolicy::new().with_page_renderer(sink.clone());
    (Board::connect(config, Arc::new(policy)).unwrap(), sink)
}

#[tokio::test]
async fn test_load_board() {
    let server = seeded_server().await;
    let (board, sink) = connect(&server);

    let report = board.reload().await;

    assert!(report.is_complete());
    assert_eq!(board.column(TaskStatus::AwaitFeedback).await.len(), 1);
    let names: Vec<_> = board.contact_list().await.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["anton Mayer", "Sofia Müller"]);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn test_delete_contact_then_save() {
    let server = seeded_server().await;
    Mock::given(method("PATCH"))
        .and(path("/join/tasks.json"))
        .and(body_json(json!({
            "2": {
                "id": 2,
                "title": "Review",
                "description": "",
                "dueDate": "",
                "priority": "medium",
                "category": "technical-task",
                "status": "await-feedback",
                "assignedTo": [7],
                "subtasks": []
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/join/users/9.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (board, sink) = connect(&server);
    board.reload().await;

    let outcome = board.dispatch(BoardAction::DeleteContact { id: 9 }).await.unwrap();
    let report = board.save().await.unwrap();

    assert_eq!(outcome, ActionOutcome::Deleted(9));
    assert_eq!(
        report.tasks,
        FlushReport::Synced {
            patched: 1,
            deleted: 0,
            orphaned: 0
        }
    );
    assert_eq!(
        report.contacts,
        FlushReport::Synced {
            patched: 0,
            deleted: 1,
            orphaned: 0
        }
    );
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn test_actions_from_args_then_save() {
    let server = seeded_server().await;
    Mock::given(method("PATCH"))
        .and(path("/join/tasks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (board, _) = connect(&server);
    board.reload().await;

    let args = vec!["1".to_string(), "status=done".to_string()];
    let action = BoardAction::from_args("move-task", &args).unwrap();
    board.dispatch(action).await.unwrap();

    let args = vec!["title=Retro".to_string(), "assign=7".to_string()];
    let created = board
        .dispatch(BoardAction::from_args("add-task", &args).unwrap())
        .await
        .unwrap();

    let report = board.save().await.unwrap();

    assert_eq!(
        report.tasks,
        FlushReport::Synced {
            patched: 2,
            deleted: 0,
            orphaned: 0
        }
    );
    assert_eq!(report.contacts, FlushReport::Clean);
    assert_eq!(board.column(TaskStatus::Done).await.len(), 1);
    assert!(board.tasks().get_by_id(created.id()).await.is_some());
}

#[tokio::test]
async fn test_unreachable_store_still_yields_a_board() {
    let config = AppConfig::builder().base_url("http://127.0.0.1:1").build().unwrap();
    let sink = Arc::new(RecordingSink::default());
    let board = Board::connect(config, Arc::new(ErrorPolicy::new().with_toast(sink.clone()))).unwrap();

    let report = board.reload().await;

    assert_eq!(report.failed(), vec!["tasks", "contacts"]);
    assert!(board.tasks().is_empty().await);
    assert_eq!(sink.messages().len(), 2);
}
