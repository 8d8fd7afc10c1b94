use reqwest::StatusCode;
use serde_json::json;

use lendbook_api::middleware::IDENTITY_HEADER;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the same router as prod, but bind to an ephemeral port.
        let app = lendbook_api::app::build_app().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_json(
    client: &reqwest::Client,
    url: String,
    identity: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(url)
        .header(IDENTITY_HEADER, identity)
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn get_json(
    client: &reqwest::Client,
    url: String,
    identity: &str,
) -> serde_json::Value {
    let res = client
        .get(url)
        .header(IDENTITY_HEADER, identity)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn identity_header_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .header(IDENTITY_HEADER, "   ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whoami_echoes_the_identity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = get_json(&client, format!("{}/whoami", srv.base_url), "alice@example.com").await;
    assert_eq!(body["identity"], "alice@example.com");
}

#[tokio::test]
async fn repeated_adds_merge_into_one_inventory_row() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = "alice@example.com";

    for quantity in [2, 3] {
        let res = post_json(
            &client,
            format!("{}/inventory/items", srv.base_url),
            alice,
            json!({ "item_name": "Ladder", "quantity": quantity }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let items = get_json(&client, format!("{}/inventory", srv.base_url), alice).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(items[0]["available"], true);
}

#[tokio::test]
async fn full_lend_and_return_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = "alice@example.com";
    let bob = "bob@example.com";

    let res = post_json(
        &client,
        format!("{}/inventory/items", srv.base_url),
        alice,
        json!({ "item_name": "Drill", "quantity": 2 }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Lend 2 drills to bob.
    let res = post_json(
        &client,
        format!("{}/loans", srv.base_url),
        alice,
        json!({
            "borrower": bob,
            "item_name": "Drill",
            "quantity": 2,
            "date_given": "2026-08-01",
            "date_due": "2026-08-15",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let receipt: serde_json::Value = res.json().await.unwrap();
    assert!(receipt["stock_warning"].is_null());
    let loan_id = receipt["loan"]["id"].as_str().unwrap().to_string();

    // Stock is exhausted; the available-only listing hides the drill.
    let available = get_json(
        &client,
        format!("{}/inventory?available=true", srv.base_url),
        alice,
    )
    .await;
    assert!(available.as_array().unwrap().is_empty());

    // Each side sees the loan from its own angle.
    let lent = get_json(&client, format!("{}/loans/lent", srv.base_url), alice).await;
    assert_eq!(lent.as_array().unwrap().len(), 1);
    assert_eq!(lent[0]["borrower"], bob);

    let borrowed = get_json(&client, format!("{}/loans/borrowed", srv.base_url), bob).await;
    assert_eq!(borrowed.as_array().unwrap().len(), 1);

    let all = get_json(&client, format!("{}/loans", srv.base_url), bob).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    // Return it.
    let res = post_json(
        &client,
        format!("{}/loans/{}/return", srv.base_url, loan_id),
        alice,
        json!({ "item_name": "Drill", "quantity": 2 }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let items = get_json(&client, format!("{}/inventory", srv.base_url), alice).await;
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["available"], true);

    let lent = get_json(&client, format!("{}/loans/lent", srv.base_url), alice).await;
    assert!(lent.as_array().unwrap().is_empty());

    // Both sides find it in the archive.
    for identity in [alice, bob] {
        let archive =
            get_json(&client, format!("{}/loans/archive", srv.base_url), identity).await;
        assert_eq!(archive.as_array().unwrap().len(), 1);
        assert_eq!(archive[0]["returned"], true);
    }
}

#[tokio::test]
async fn lending_more_than_stock_is_unprocessable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = "alice@example.com";

    post_json(
        &client,
        format!("{}/inventory/items", srv.base_url),
        alice,
        json!({ "item_name": "Drill", "quantity": 1 }),
    )
    .await;

    let res = post_json(
        &client,
        format!("{}/loans", srv.base_url),
        alice,
        json!({
            "borrower": "bob@example.com",
            "item_name": "Drill",
            "quantity": 2,
            "date_given": "2026-08-01",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_quantity");
}

#[tokio::test]
async fn self_loan_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = "alice@example.com";

    let res = post_json(
        &client,
        format!("{}/loans", srv.base_url),
        alice,
        json!({
            "borrower": alice,
            "item_name": "Drill",
            "quantity": 1,
            "date_given": "2026-08-01",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn lending_an_unknown_item_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = post_json(
        &client,
        format!("{}/loans", srv.base_url),
        "alice@example.com",
        json!({
            "borrower": "bob@example.com",
            "item_name": "Drill",
            "quantity": 1,
            "date_given": "2026-08-01",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
