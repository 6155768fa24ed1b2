//! End-to-end CRUD tests against a live listener.

use reqwest::StatusCode;
use todo_sdk::{NewTodo, SdkError, TodoClient};

mod common;

#[tokio::test]
async fn test_todo_lifecycle() {
    let server = common::start_server().await;
    let client = TodoClient::with_client(common::client(), &server.url());

    assert!(client.list().await.unwrap().is_empty());

    let created = client
        .add(&NewTodo {
            title: "Pass the test".into(),
            description: "end to end".into(),
            priority: 0,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.priority, 1);
    assert!(!created.completed);
    assert!(created.created_at.is_some());

    client.set_status(created.id, true).await.unwrap();
    let fetched = client.get(created.id).await.unwrap();
    assert!(fetched.completed);
    assert_eq!(fetched.description, "end to end");

    client.set_status(created.id, false).await.unwrap();
    assert!(!client.get(created.id).await.unwrap().completed);

    client.delete(created.id).await.unwrap();
    match client.get(created.id).await {
        Err(SdkError::Status { status, body }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, "record not found");
        }
        other => panic!("expected 404, got {:?}", other),
    }

    server.stop().await;
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let server = common::start_server().await;
    let client = TodoClient::with_client(common::client(), &server.url());

    for title in ["first", "second", "third"] {
        client
            .add(&NewTodo {
                title: title.into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let titles: Vec<_> = client
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_requests() {
    let server = common::start_server().await;
    let http = common::client();

    let res = http
        .get(format!("{}/api/v1/todos/not-a-number", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), "Invalid ID\n");

    let res = http
        .post(format!("{}/api/v1/todos", server.url()))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = http
        .patch(format!("{}/api/v1/todos/1", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    server.stop().await;
}

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let server = common::start_server().await;
    let url = server.url();
    let http = common::client();

    assert_eq!(http.get(&url).send().await.unwrap().status(), StatusCode::OK);
    server.stop().await;

    assert!(http.get(&url).send().await.is_err());
}
