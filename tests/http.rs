//! End-to-end tests of the REST API.
//!
//! Each test starts the real server on a free port against a fresh SQLite
//! file and talks to it over HTTP.

use customer_workbench::config::Config;
use customer_workbench::seed::random_interaction_csv_row;
use customer_workbench::server::run_server;
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinHandle;

const SAMPLE_CSV: &str = "product_id,customer_id,interaction_type,customer_rating,feedback,timestamp,responses_from_customer_support\n\
101,202,CHAT,5,Great support,2024-12-01 12:00:00,Thanks team\n";

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    handle: JoinHandle<()>,
    _tmp: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let tmp = TempDir::new().unwrap();
        let port = find_free_port();

        let mut cfg = Config::minimal();
        cfg.db.path = tmp.path().join("data/http.sqlite");
        cfg.server.bind = format!("127.0.0.1:{}", port);
        cfg.paging.max_size = 50;

        let handle = tokio::spawn(async move {
            run_server(&cfg).await.ok();
        });
        wait_for_server(port).await;

        Self {
            base: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            handle,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn upload_csv(&self, csv: &str) -> reqwest::Response {
        let part = multipart::Part::bytes(csv.as_bytes().to_vec())
            .file_name("interactions.csv")
            .mime_str("text/csv")
            .unwrap();
        let form = multipart::Form::new().part("file", part);
        self.client
            .post(self.url("/api/interactions"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn search(&self, query: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .get(self.url("/api/interactions"))
            .query(query)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let body: Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_csv_upload_then_search() {
    let server = TestServer::start().await;

    let resp = server.upload_csv(SAMPLE_CSV).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ingested"], 1);

    let resp = server
        .search(&[("customerId", "202"), ("interactionType", "CHAT")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["number"], 0);
    assert_eq!(page["size"], 20);
    assert_eq!(page["first"], true);
    assert_eq!(page["last"], true);
    assert_eq!(page["empty"], false);

    let item = &page["content"][0];
    assert_eq!(item["productId"], 101);
    assert_eq!(item["customerId"], 202);
    assert_eq!(item["interactionType"], "CHAT");
    assert_eq!(item["customerRating"], 5);
    assert_eq!(item["feedback"], "Great support");
    assert_eq!(item["interactionDate"], "2024-12-01T12:00:00");
    assert_eq!(item["responsesFromCustomerSupport"], "Thanks team");
    assert!(item["id"].as_i64().is_some());
    assert!(item.get("version").is_none());
}

#[tokio::test]
async fn test_generated_rows_upload() {
    let server = TestServer::start().await;

    let header = SAMPLE_CSV.lines().next().unwrap();
    let mut csv = format!("{}\n", header);
    for _ in 0..3 {
        csv.push_str(&random_interaction_csv_row().unwrap());
        csv.push('\n');
    }

    let resp = server.upload_csv(&csv).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ingested"], 3);

    let fetched: Value = server
        .client
        .get(server.url("/api/interactions/3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rating = fetched["customerRating"].as_i64().unwrap();
    assert!((1..=5).contains(&rating));
    assert!(fetched["feedback"].as_str().is_some());
}

#[tokio::test]
async fn test_csv_upload_errors() {
    let server = TestServer::start().await;

    let resp = server.upload_csv("").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "CSV file must not be empty");

    let resp = server
        .upload_csv("product_id,customer_id,interaction_type\n1,2,CHAT\n3,4,\n")
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let form = multipart::Form::new().text("other", "value");
    let resp = server
        .client
        .post(server.url("/api/interactions"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Required part 'file' is not present");

    // Nothing from the rejected batch was stored.
    let page: Value = server
        .search(&[("customerId", "2")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["totalElements"], 0);
    assert_eq!(page["empty"], true);
}

#[tokio::test]
async fn test_create_returns_location_and_get_finds_it() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/api/interactions"))
        .json(&json!({
            "productId": 11,
            "customerId": 22,
            "interactionType": "TICKET",
            "customerRating": 3,
            "feedback": "Printer on fire",
            "interactionDate": "2024-06-01T08:00:00",
            "id": 999
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_ne!(id, 999);
    assert_eq!(location, format!("/api/interactions/{}", id));

    let fetched: Value = server
        .client
        .get(server.url(&location))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_validation() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/api/interactions"))
        .json(&json!({ "customerId": 22, "interactionType": "CHAT" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "productId is required");

    let resp = server
        .client
        .post(server.url("/api/interactions"))
        .header("content-type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_bulk_ingest() {
    let server = TestServer::start().await;

    let batch = json!([
        {"productId": 1, "customerId": 5, "interactionType": "EMAIL"},
        {"productId": 2, "customerId": 5, "interactionType": "FORM"}
    ]);
    let resp = server
        .client
        .post(server.url("/api/interactions/bulk"))
        .json(&batch)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ingested"], 2);

    let resp = server
        .client
        .post(server.url("/api/interactions/bulk"))
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "JSON payload must not be empty");
}

#[tokio::test]
async fn test_search_requires_customer_id() {
    let server = TestServer::start().await;
    server.upload_csv(SAMPLE_CSV).await;

    let resp = server
        .search(&[("productId", "101"), ("interactionType", "CHAT")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "customerId is required for search");

    let resp = server.search(&[("customerId", "abc")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_date_range_and_default_order() {
    let server = TestServer::start().await;

    let csv = "product_id,customer_id,interaction_type,timestamp\n\
               1,9,CHAT,2024-01-10 10:00:00\n\
               1,9,EMAIL,2024-01-20 10:00:00\n\
               1,9,CHAT,2024-01-30 10:00:00\n\
               1,9,FORM,2024-02-10 10:00:00\n\
               1,8,CHAT,2024-01-20 10:00:00\n";
    assert_eq!(server.upload_csv(csv).await.status(), StatusCode::CREATED);

    let page: Value = server
        .search(&[
            ("customerId", "9"),
            ("startDate", "2024-01-20T10:00:00"),
            ("endDate", "2024-02-10T10:00:00"),
        ])
        .await
        .json()
        .await
        .unwrap();
    let dates: Vec<&str> = page["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["interactionDate"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec![
            "2024-02-10T10:00:00",
            "2024-01-30T10:00:00",
            "2024-01-20T10:00:00"
        ]
    );

    let page: Value = server
        .search(&[
            ("customerId", "9"),
            ("sort", "interactionDate,asc"),
            ("size", "2"),
            ("page", "1"),
        ])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["totalElements"], 4);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["numberOfElements"], 2);
    assert_eq!(page["last"], true);
    assert_eq!(page["content"][0]["interactionDate"], "2024-01-30T10:00:00");
}

#[tokio::test]
async fn test_page_size_is_capped() {
    let server = TestServer::start().await;
    server.upload_csv(SAMPLE_CSV).await;

    let page: Value = server
        .search(&[("customerId", "202"), ("size", "10000")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["size"], 50);
}

#[tokio::test]
async fn test_get_by_id_errors() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/api/interactions/12345"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().is_empty());

    let resp = server
        .client
        .get(server.url("/api/interactions/not-a-number"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
