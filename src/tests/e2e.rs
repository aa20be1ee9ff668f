use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tokio::net::TcpListener;

use crate::{api, service::TaskService};

async fn spawn_app(pool: SqlitePool) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind address");

    listener
        .set_nonblocking(true)
        .expect("Failed to set non-blocking");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let app = api::router(TaskService::new(pool));

    tokio::spawn(async move {
        axum::serve(TcpListener::from_std(listener).unwrap(), app)
            .await
            .unwrap();
    });

    address
}

#[sqlx::test]
async fn test_e2e_task_lifecycle(pool: SqlitePool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info,task_api=debug,sqlx=error")
        .try_init();

    let address = spawn_app(pool.clone()).await;
    let client = Client::new();
    let tasks_url = format!("{}/api/tasks", address);

    let response = client
        .post(&tasks_url)
        .json(&json!({ "title": "e2e task", "description": "created over HTTP" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key("x-request-id"));
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let response = client
        .patch(format!("{}/{}/complete", tasks_url, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let stored: bool = sqlx::query_scalar("SELECT completed FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .expect("Failed to query DB");
    assert!(stored, "Completion should be persisted");

    let response = client
        .delete(format!("{}/completed", tasks_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/{}", tasks_url, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_e2e_validation_error_body(pool: SqlitePool) {
    let address = spawn_app(pool).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/tasks", address))
        .json(&json!({ "title": "ab" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["fields"]["title"][0],
        "title must be between 3 and 200 characters"
    );
}
