//! End-to-end tests against a running server

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_root_redirects_to_catalog() {
    let response = client()
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/catalog");
}

#[tokio::test]
#[ignore]
async fn test_dashboard_lists_counts() {
    let response = client()
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Local Library Home"));
}

#[tokio::test]
#[ignore]
async fn test_create_author_then_view() {
    let client = client();

    let response = client
        .post(format!("{}/catalog/author/create", BASE_URL))
        .form(&[("first_name", "Octavia"), ("family_name", "Butler")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"]
        .to_str()
        .expect("Invalid location")
        .to_string();
    assert!(location.starts_with("/catalog/author/"));

    let page = client
        .get(format!("{}{}", BASE_URL, location))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(page.contains("Butler, Octavia"));
}

#[tokio::test]
#[ignore]
async fn test_invalid_author_is_rerendered() {
    let response = client()
        .post(format!("{}/catalog/author/create", BASE_URL))
        .form(&[("first_name", "John123"), ("family_name", "Smith!!")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Family name has non-alphanumeric characters."));
}

#[tokio::test]
#[ignore]
async fn test_unknown_book_is_not_found() {
    let response = client()
        .get(format!("{}/catalog/book/2147483647", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
