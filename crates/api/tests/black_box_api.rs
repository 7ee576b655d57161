use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use shopcore_auth::{JwtClaims, Role};
use shopcore_core::AccountId;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = shopcore_api::app::build_app(jwt_secret.to_string());
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

fn mint_jwt(jwt_secret: &str, email: &str, role: Role) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: AccountId::new(),
        email: email.to_string(),
        role,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    admin_token: &str,
    title: &str,
    price: u64,
    stock: u32,
    category: &str,
) -> String {
    let res = client
        .post(format!("{}/api/products", base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "title": title,
            "price": price,
            "stock": stock,
            "category": category,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["payload"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn cart_endpoints_require_a_token() {
    let srv = TestServer::spawn("test-secret").await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/carts", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_current_round_trip() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/sessions/register", srv.base_url))
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "age": 36,
            "password": "difference engine",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["payload"]["role"], "user");
    assert!(body["payload"].get("password_hash").is_none());

    // Same email again is a conflict.
    let res = client
        .post(format!("{}/api/sessions/register", srv.base_url))
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "password": "difference engine",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Wrong password is rejected.
    let res = client
        .post(format!("{}/api/sessions/login", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/sessions/login", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "password": "difference engine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/api/sessions/current", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["first_name"], "Ada");
}

#[tokio::test]
async fn product_mutations_are_admin_only() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let user_token = mint_jwt(jwt_secret, "shopper@example.com", Role::user());
    let admin_token = mint_jwt(jwt_secret, "admin@example.com", Role::admin());

    let res = client
        .post(format!("{}/api/products", srv.base_url))
        .bearer_auth(&user_token)
        .json(&json!({ "title": "Nope", "price": 1, "stock": 1, "category": "misc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let id = create_product(&client, &srv.base_url, &admin_token, "Widget", 500, 3, "misc").await;

    // Public read, no token.
    let res = client
        .get(format!("{}/api/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["payload"]["title"], "Widget");

    let res = client
        .put(format!("{}/api/products/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .json(&json!({ "price": 450 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["payload"]["price"], 450);

    let res = client
        .delete(format!("{}/api/products/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_paginates_filters_and_sorts() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let admin_token = mint_jwt(jwt_secret, "admin@example.com", Role::admin());

    create_product(&client, &srv.base_url, &admin_token, "A", 300, 1, "audio").await;
    create_product(&client, &srv.base_url, &admin_token, "B", 100, 1, "audio").await;
    create_product(&client, &srv.base_url, &admin_token, "C", 200, 1, "video").await;

    // Page 2 of size 2.
    let res = client
        .get(format!("{}/api/products?limit=2&page=2", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["prevPage"], 1);
    assert_eq!(body["nextPage"], serde_json::Value::Null);
    assert_eq!(body["hasPrevPage"], true);
    assert_eq!(body["prevLink"], "/api/products?limit=2&page=1");
    assert_eq!(body["payload"].as_array().unwrap().len(), 1);

    // Category filter + ascending price sort.
    let res = client
        .get(format!("{}/api/products?query=audio&sort=asc", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let titles: Vec<&str> = body["payload"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
}

#[tokio::test]
async fn add_to_cart_merges_and_purchase_splits() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let admin_token = mint_jwt(jwt_secret, "admin@example.com", Role::admin());
    let user_token = mint_jwt(jwt_secret, "shopper@example.com", Role::user());

    let in_stock =
        create_product(&client, &srv.base_url, &admin_token, "InStock", 1000, 5, "misc").await;
    let scarce =
        create_product(&client, &srv.base_url, &admin_token, "Scarce", 2000, 1, "misc").await;

    let res = client
        .post(format!("{}/api/carts", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let cart_id = body["payload"]["id"].as_str().unwrap().to_string();

    // Add the same product twice: one line, quantity 2.
    for _ in 0..2 {
        let res = client
            .post(format!(
                "{}/api/carts/{}/products/{}",
                srv.base_url, cart_id, in_stock
            ))
            .bearer_auth(&user_token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .post(format!(
            "{}/api/carts/{}/products/{}",
            srv.base_url, cart_id, scarce
        ))
        .bearer_auth(&user_token)
        .json(&json!({ "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["payload"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[1]["quantity"], 3);

    let res = client
        .post(format!("{}/api/carts/{}/purchase", srv.base_url, cart_id))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let ticket = &body["payload"]["ticket"];
    assert_eq!(ticket["amount"], 2000);
    assert_eq!(ticket["purchaser"], "shopper@example.com");
    assert!(ticket["code"].as_str().is_some());

    let not_processed = body["payload"]["productsNotProcessed"].as_array().unwrap();
    assert_eq!(not_processed.len(), 1);
    assert_eq!(not_processed[0]["product_id"], scarce);
    assert_eq!(not_processed[0]["quantity"], 3);

    // Stock of the fulfilled product dropped; the scarce one is untouched.
    let res = client
        .get(format!("{}/api/products/{}", srv.base_url, in_stock))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["payload"]["stock"], 3);

    let res = client
        .get(format!("{}/api/products/{}", srv.base_url, scarce))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["payload"]["stock"], 1);

    // The cart now holds exactly the unfulfilled remainder.
    let res = client
        .get(format!("{}/api/carts/{}", srv.base_url, cart_id))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["payload"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], scarce);
}

#[tokio::test]
async fn purchase_on_missing_cart_is_not_found() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let user_token = mint_jwt(jwt_secret, "shopper@example.com", Role::user());

    let res = client
        .post(format!(
            "{}/api/carts/{}/purchase",
            srv.base_url,
            uuid::Uuid::now_v7()
        ))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_cannot_add_to_carts_but_may_list_them() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let admin_token = mint_jwt(jwt_secret, "admin@example.com", Role::admin());
    let user_token = mint_jwt(jwt_secret, "shopper@example.com", Role::user());

    let res = client
        .post(format!("{}/api/carts", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let cart_id = body["payload"]["id"].as_str().unwrap().to_string();

    // Merge-adds are shopper-only.
    let res = client
        .post(format!(
            "{}/api/carts/{}/products/{}",
            srv.base_url,
            cart_id,
            uuid::Uuid::now_v7()
        ))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Cart listing is admin-only.
    let res = client
        .get(format!("{}/api/carts", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/api/carts", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["payload"].as_array().unwrap().len(), 1);
}
