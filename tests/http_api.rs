use pos_invoicing::{api, config::database};
use reqwest::StatusCode;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, on an in-memory database and an ephemeral port.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await.unwrap();
        database::create_tables(&db).await.unwrap();

        let app = api::build_router(db);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("x-cashier-id", "cashier-1")
    }

    fn post(&self, path: &str, body: &Value) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("x-cashier-id", "cashier-1")
            .json(body)
    }

    async fn create_store(&self, name: &str) -> i64 {
        let res = self.post("/api/stores", &json!({ "name": name })).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }

    async fn create_product(&self, store_id: i64, name: &str, price: f64, stock: i64) -> i64 {
        let res = self
            .post(
                "/api/products",
                &json!({ "storeId": store_id, "name": name, "price": price, "stock": stock }),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }

    async fn stock_of(&self, product_id: i64) -> i64 {
        let body: Value = self
            .get(&format!("/api/products/{product_id}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["stock"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn identity_required_for_api_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(format!("{}/api/invoices", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn invoice_lifecycle_decrements_stock() {
    let srv = TestServer::spawn().await;
    let store_id = srv.create_store("Main").await;
    let pen = srv.create_product(store_id, "Pen", 10.0, 5).await;

    let res = srv
        .client
        .post(format!("{}/api/invoices", srv.base_url))
        .header("x-cashier-id", "cashier-1")
        .header("x-store-id", store_id.to_string())
        .json(&json!({
            "customerName": "Asha",
            "paymentMethod": "upi",
            "items": [{ "productId": pen, "quantity": 2 }]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let invoice: Value = res.json().await.unwrap();
    assert_eq!(invoice["invoiceNumber"], format!("INV-{store_id}-000001"));
    assert_eq!(invoice["totalAmount"].as_f64().unwrap(), 20.0);
    assert_eq!(invoice["paymentMethod"], "upi");
    assert_eq!(invoice["cashierId"], "cashier-1");
    assert_eq!(invoice["items"][0]["productName"], "Pen");
    assert_eq!(invoice["items"][0]["subtotal"].as_f64().unwrap(), 20.0);
    assert_eq!(srv.stock_of(pen).await, 3);

    let id = invoice["id"].as_i64().unwrap();
    let fetched: Value = srv
        .get(&format!("/api/invoices/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["invoiceNumber"], invoice["invoiceNumber"]);

    let listed: Value = srv
        .get(&format!("/api/invoices?storeId={store_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn insufficient_stock_is_unprocessable_and_changes_nothing() {
    let srv = TestServer::spawn().await;
    let store_id = srv.create_store("Main").await;
    let pen = srv.create_product(store_id, "Pen", 10.0, 5).await;
    let book = srv.create_product(store_id, "Book", 50.0, 1).await;

    let res = srv
        .post(
            "/api/invoices",
            &json!({
                "storeId": store_id,
                "items": [
                    { "productId": pen, "quantity": 2 },
                    { "productId": book, "quantity": 3 }
                ]
            }),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["message"], "Insufficient stock for Book");

    assert_eq!(srv.stock_of(pen).await, 5);
    assert_eq!(srv.stock_of(book).await, 1);
    let listed: Value = srv
        .get(&format!("/api/invoices?storeId={store_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invoice_request_errors_map_to_status_codes() {
    let srv = TestServer::spawn().await;
    let store_id = srv.create_store("Main").await;
    let other_store = srv.create_store("Branch").await;
    let foreign = srv.create_product(other_store, "Lamp", 30.0, 4).await;

    // no store anywhere
    let res = srv
        .post("/api/invoices", &json!({ "items": [{ "productId": foreign, "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Store ID is required");

    // unknown field
    let res = srv
        .post("/api/invoices", &json!({ "storeId": store_id, "items": [], "discount": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // product from another store
    let res = srv
        .post(
            "/api/invoices",
            &json!({
                "storeId": store_id,
                "items": [{ "productId": foreign, "productName": "Lamp", "quantity": 1 }]
            }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product Lamp not found in this store");
    assert_eq!(srv.stock_of(foreign).await, 4);

    let res = srv.get("/api/invoices/999").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_ids_get_json_errors() {
    let srv = TestServer::spawn().await;

    for path in ["/api/invoices/abc", "/api/products/abc", "/api/stores/abc"] {
        let res = srv.get(path).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_request", "{path}");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn low_stock_requires_a_store() {
    let srv = TestServer::spawn().await;
    let store_id = srv.create_store("Main").await;
    srv.create_product(store_id, "Pen", 10.0, 2).await;
    srv.create_product(store_id, "Book", 50.0, 40).await;

    let res = srv.get("/api/products/low-stock").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .get(&format!("/api/products/low-stock?storeId={store_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pen"]);
}
