//! Wire-contract tests for the HTTP client against a mock backend.

use std::io::Write;

use datachat::api::{ApiClient, ApiError};
use mockito::Matcher;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn list_datasets_hits_get_datasets() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/datasets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"datasets": ["csgo", "twitch"]}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url()).unwrap();
    let datasets = client.list_datasets().await.unwrap();
    assert_eq!(datasets, vec!["csgo".to_string(), "twitch".to_string()]);
    mock.assert_async().await;
}

#[tokio::test]
async fn preview_returns_columns_summary() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/preview/csgo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"dataset_name": "csgo", "columns_summary": "cols: a, b", "columns": ["a", "b"]}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url()).unwrap();
    let summary = client.preview("csgo").await.unwrap();
    assert_eq!(summary, "cols: a, b");
    mock.assert_async().await;
}

#[tokio::test]
async fn query_posts_dataset_and_text_as_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .match_body(Matcher::Json(serde_json::json!({
            "dataset_name": "csgo",
            "user_query": "average kills?"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "query": "df['kills'].mean()",
                "result": {"value": 21.5},
                "humanized_response": "On average, 21.5 kills.",
                "visualization": {"chart_type": null, "data_points": null}
            }"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(server.url()).unwrap();
    let response = client.query("csgo", "average kills?").await.unwrap();
    assert_eq!(response.humanized_response, "On average, 21.5 kills.");
    assert!(response.visualization.unwrap().chart_type.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn query_surfaces_status_and_detail_on_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Dataset not found"}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url()).unwrap();
    let err = client.query("nope", "anything").await.unwrap_err();
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(detail.as_deref(), Some("Dataset not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload-dataset")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .match_body(Matcher::Regex("name=\"file\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Dataset 'ranks' uploaded successfully.", "dataset_name": "ranks"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranks.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "rank,count").unwrap();
    writeln!(file, "global,12").unwrap();
    drop(file);

    let client = ApiClient::new(server.url()).unwrap();
    let message = client.upload_dataset(&path).await.unwrap();
    assert_eq!(
        message.as_deref(),
        Some("Dataset 'ranks' uploaded successfully.")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_missing_file_is_an_io_error() {
    let server = mockito::Server::new_async().await;
    let client = ApiClient::new(server.url()).unwrap();
    let err = client
        .upload_dataset(std::path::Path::new("/definitely/not/here.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}
