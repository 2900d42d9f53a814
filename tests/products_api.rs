//! End-to-end HTTP tests against an in-process server over the in-memory store.

use product_catalog::transport::http::{self, AppState};
use product_catalog::InMemoryCatalogStore;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Starts the API on an ephemeral port and returns its base URL.
async fn spawn_api(items_per_page: u32) -> Result<String, Box<dyn std::error::Error>> {
    let state = AppState::from_store(Arc::new(InMemoryCatalogStore::new()), items_per_page);
    let router = http::create_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

async fn create_category(
    client: &reqwest::Client,
    base: &str,
    name: &str,
) -> Result<i64, Box<dyn std::error::Error>> {
    let resp = client
        .post(format!("{}/categories", base))
        .json(&json!({ "name": name }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    Ok(body["id"].as_i64().unwrap())
}

async fn create_product(
    client: &reqwest::Client,
    base: &str,
    name: &str,
    price: f64,
    category_id: i64,
) -> Result<Value, Box<dyn std::error::Error>> {
    let resp = client
        .post(format!("{}/products", base))
        .json(&json!({ "name": name, "price": price, "categoryId": category_id }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    Ok(resp.json().await?)
}

async fn list(
    client: &reqwest::Client,
    base: &str,
    query: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let resp = client
        .get(format!("{}/products{}", base, query))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(resp.json().await?)
}

fn names(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_and_fetch_product() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();

    let category_id = create_category(&client, &base, "Footwear").await?;
    let created = create_product(&client, &base, "Hiking boot", 49.9, category_id).await?;
    assert_eq!(created["price"], "49.90");
    assert_eq!(created["category"]["id"], category_id);
    assert_eq!(created["category"]["name"], "Footwear");

    let id = created["id"].as_i64().unwrap();
    let fetched: Value = client
        .get(format!("{}/products/{}", base, id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_with_unknown_category_is_404() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/products", base))
        .json(&json!({ "name": "Shoe", "price": 20, "categoryId": 999 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Category with ID 999 not found");

    let page = list(&client, &base, "").await?;
    assert_eq!(page["total"], 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_payloads_are_400() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();
    let category_id = create_category(&client, &base, "Footwear").await?;

    for body in [
        json!({ "name": "Sh", "price": 20, "categoryId": category_id }),
        json!({ "name": "Shoe", "price": 0, "categoryId": category_id }),
        json!({ "name": "Shoe", "price": -5, "categoryId": category_id }),
        json!({ "name": "Shoe", "price": 20, "categoryId": 0 }),
        json!({ "name": "Shoe", "price": 20 }),
        json!({ "name": "Shoe", "price": "cheap", "categoryId": category_id }),
        json!({ "name": "Shoe", "price": "20", "categoryId": category_id }),
    ] {
        let resp = client
            .post(format!("{}/products", base))
            .json(&body)
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    let resp = client
        .post(format!("{}/categories", base))
        .json(&json!({ "name": "ab" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .get(format!("{}/products?page=-1", base))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pagination_envelope() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();
    let category_id = create_category(&client, &base, "Footwear").await?;
    for i in 0..25 {
        create_product(&client, &base, &format!("Shoe {:02}", i), 10.0, category_id).await?;
    }

    let page = list(&client, &base, "?page=3").await?;
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert_eq!(page["total"], 25);
    assert_eq!(page["page"], 3);
    assert_eq!(page["lastPage"], 3);

    let first = list(&client, &base, "").await?;
    assert_eq!(first["page"], 1);
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["items"][0]["name"], "Shoe 00");

    let zeroth = list(&client, &base, "?page=0").await?;
    assert_eq!(zeroth["page"], 1);

    let beyond = list(&client, &base, "?page=7").await?;
    assert!(beyond["items"].as_array().unwrap().is_empty());
    assert_eq!(beyond["total"], 25);
    assert_eq!(beyond["lastPage"], 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_filter_and_sort() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();
    let shoes = create_category(&client, &base, "Footwear").await?;
    let hats = create_category(&client, &base, "Headwear").await?;
    create_product(&client, &base, "Leather boots", 80.0, shoes).await?;
    create_product(&client, &base, "Rain boots", 35.0, shoes).await?;
    create_product(&client, &base, "Sandal", 15.0, shoes).await?;
    create_product(&client, &base, "Boater hat", 25.0, hats).await?;
    create_product(&client, &base, "Beanie", 12.0, hats).await?;

    let plain = list(&client, &base, "?query=boots").await?;
    let quoted = list(&client, &base, "?query=%22boots%22").await?;
    assert_eq!(plain, quoted);
    assert_eq!(names(&plain), vec!["Leather boots", "Rain boots"]);

    // Category names are searched as well.
    let by_category = list(&client, &base, "?query=HEAD").await?;
    assert_eq!(names(&by_category), vec!["Boater hat", "Beanie"]);

    let ranged = list(
        &client,
        &base,
        "?minPrice=15&maxPrice=35&sortBy=price&sortOrder=DESC",
    )
    .await?;
    assert_eq!(names(&ranged), vec!["Rain boots", "Boater hat", "Sandal"]);
    for item in ranged["items"].as_array().unwrap() {
        let price: f64 = item["price"].as_str().unwrap().parse()?;
        assert!((15.0..=35.0).contains(&price));
    }

    let in_category = list(&client, &base, &format!("?categoryId={}&sortBy=name", hats)).await?;
    assert_eq!(names(&in_category), vec!["Beanie", "Boater hat"]);
    assert_eq!(in_category["total"], 2);

    // Zero is treated as "no filter".
    let unfiltered = list(&client, &base, "?minPrice=0&categoryId=0").await?;
    assert_eq!(unfiltered["total"], 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_sort_field_is_500() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/products?sortBy=colour", base))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "Internal server error");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn patch_moves_product_to_another_category() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();
    let shoes = create_category(&client, &base, "Footwear").await?;
    let hats = create_category(&client, &base, "Headwear").await?;
    let created = create_product(&client, &base, "Boot", 30.0, shoes).await?;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{}/products/{}", base, id))
        .json(&json!({ "categoryId": hats, "name": "Renamed boot" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["category"]["id"], hats);
    assert_eq!(updated["name"], "Boot");

    let resp = client
        .patch(format!("{}/products/{}", base, id))
        .json(&json!({ "categoryId": 404 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .patch(format!("{}/products/9999", base))
        .json(&json!({ "categoryId": hats }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_product() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();
    let category_id = create_category(&client, &base, "Footwear").await?;
    let created = create_product(&client, &base, "Boot", 30.0, category_id).await?;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .delete(format!("{}/products/{}", base, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], true);

    let resp = client
        .delete(format!("{}/products/{}", base, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!("{}/products/{}", base, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn categories_health_and_docs() -> TestResult {
    let base = spawn_api(10).await?;
    let client = reqwest::Client::new();
    let a = create_category(&client, &base, "Footwear").await?;
    let b = create_category(&client, &base, "Footwear").await?;
    assert_ne!(a, b);

    let all: Value = client
        .get(format!("{}/categories", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{}/categories/{}", base, a))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = client
        .get(format!("{}/categories/12345", base))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client.get(format!("{}/health", base)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let doc: Value = client
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await?
        .json()
        .await?;
    assert!(doc["paths"]["/products"].is_object());
    assert!(doc["paths"]["/products/{id}"]["patch"].is_object());
    Ok(())
}
