//! User, product and transaction management over HTTP

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestApp, spawn_app, spawn_app_with_static};

async fn create_product(app: &TestApp, token: &str, name: &str) -> i64 {
    let (status, body) = app
        .post("/products/create", Some(token), json!({ "productName": name }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["payload"]["pid"].as_i64().unwrap()
}

fn uid_of(users: &Value, username: &str) -> i64 {
    users["payload"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == username)
        .and_then(|u| u["uid"].as_i64())
        .unwrap()
}

// ==================== Users ====================

#[tokio::test]
async fn user_listing_hides_password_hashes() {
    let app = spawn_app().await;
    let token = app.login("user", "user").await;

    let (status, body) = app.get("/users/get", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let users = body["payload"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    for user in users {
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("isAdmin").is_some());
        assert!(user.get("isHandler").is_some());
    }
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;

    let (status, body) = app
        .post(
            "/users/create",
            Some(&admin),
            json!({ "username": "user", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with that username already exists");
}

#[tokio::test]
async fn create_user_requires_fields() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;

    let (status, body) = app
        .post("/users/create", Some(&admin), json!({ "password": "pw" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username not provided");

    let (status, body) = app
        .post("/users/create", Some(&admin), json!({ "username": "someone" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password not provided");
}

#[tokio::test]
async fn update_user_changes_roles_password_and_name() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;
    let (_, users) = app.get("/users/get", Some(&admin)).await;
    let uid = uid_of(&users, "user");

    let (status, body) = app
        .post(
            "/users/update",
            Some(&admin),
            json!({ "uid": uid, "username": "renamed", "password": "fresh", "isHandler": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payload"]["username"], "renamed");
    assert_eq!(body["payload"]["isHandler"], true);
    assert_eq!(body["payload"]["isAdmin"], false);

    let token = app.login("renamed", "fresh").await;
    let claims = app.state.jwt.validate_token(&token).unwrap();
    assert!(claims.is_handler);

    let (status, _) = app
        .post("/login", None, json!({ "username": "renamed", "password": "user" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_user_validates_target() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;

    let (status, body) = app.post("/users/update", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID not provided");

    let (status, body) = app
        .post("/users/update", Some(&admin), json!({ "uid": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User does not exist");

    let (_, users) = app.get("/users/get", Some(&admin)).await;
    let uid = uid_of(&users, "user");
    let (status, body) = app
        .post("/users/update", Some(&admin), json!({ "uid": uid, "username": "handler" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with that username already exists");
}

#[tokio::test]
async fn rejected_update_leaves_user_unchanged() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;
    let (_, users) = app.get("/users/get", Some(&admin)).await;
    let uid = uid_of(&users, "user");

    let (status, body) = app
        .post(
            "/users/update",
            Some(&admin),
            json!({ "uid": uid, "username": "handler", "password": "changed", "isAdmin": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with that username already exists");

    let (_, users) = app.get("/users/get", Some(&admin)).await;
    let stored = users["payload"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["uid"] == uid)
        .unwrap();
    assert_eq!(stored["username"], "user");
    assert_eq!(stored["isAdmin"], false);

    // Old password still works, new one does not
    app.login("user", "user").await;
    let (status, _) = app
        .post("/login", None, json!({ "username": "user", "password": "changed" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn free_form_usernames_and_long_passwords_are_accepted() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;
    let long_password = "p".repeat(300);

    for (username, password) in [
        ("john doe", "pw"),
        ("jane@example.com", "pw"),
        ("longpass", long_password.as_str()),
    ] {
        let (status, body) = app
            .post(
                "/users/create",
                Some(&admin),
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{username}: {body}");
        app.login(username, password).await;
    }

    // A long password is not truncated to a shared prefix
    let (status, _) = app
        .post(
            "/login",
            None,
            json!({ "username": "longpass", "password": "p".repeat(299) }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_user_removes_account() {
    let app = spawn_app().await;
    let admin = app.login("admin", "admin").await;
    let (_, users) = app.get("/users/get", Some(&admin)).await;
    let uid = uid_of(&users, "user");

    let (status, _) = app.post("/users/delete", Some(&admin), json!({ "uid": uid })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/users/delete", Some(&admin), json!({ "uid": uid })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User does not exist");

    let (status, _) = app
        .post("/login", None, json!({ "username": "user", "password": "user" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ==================== Products ====================

#[tokio::test]
async fn product_lifecycle() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;

    let pid = create_product(&app, &handler, "Widget").await;

    let (status, body) = app
        .post("/products/create", Some(&handler), json!({ "productName": "Widget" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Product with that name already exists");

    let (status, body) = app
        .post(
            "/products/update",
            Some(&handler),
            json!({ "pid": pid, "productName": "Widget Pro" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["productName"], "Widget Pro");

    let (_, body) = app.get("/products/get", Some(&handler)).await;
    assert_eq!(body["payload"], json!([{ "pid": pid, "productName": "Widget Pro" }]));

    let (status, _) = app.post("/products/delete", Some(&handler), json!({ "pid": pid })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/products/delete", Some(&handler), json!({ "pid": pid })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product does not exist");
}

#[tokio::test]
async fn product_requests_validate_fields() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;

    let (status, body) = app.post("/products/create", Some(&handler), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product name not provided");

    let (status, body) = app
        .post("/products/update", Some(&handler), json!({ "productName": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product ID not provided");

    let (status, body) = app
        .post("/products/update", Some(&handler), json!({ "pid": 42, "productName": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product does not exist");
}

// ==================== Transactions ====================

#[tokio::test]
async fn transaction_lifecycle() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;
    let handler_uid = app.state.jwt.validate_token(&handler).unwrap().uid;
    let pid = create_product(&app, &handler, "Widget").await;

    let (status, body) = app
        .post(
            "/transactions/create",
            Some(&handler),
            json!({
                "transactionDate": "2024-03-01",
                "transactionProduct": pid,
                "transactionCount": 3,
                "price": 2.5,
                "actualTotal": 7.0,
                "handler1": handler_uid,
                "remarks": "first sale"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let tid = body["payload"]["tid"].as_i64().unwrap();
    assert_eq!(body["payload"]["estimatedTotal"], 7.5);
    assert_eq!(body["payload"]["product"], pid);
    assert!(body["payload"]["handler2"].is_null());

    let (status, body) = app
        .post(
            "/transactions/update",
            Some(&handler),
            json!({ "tid": tid, "price": 3.0, "remarks": "repriced" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payload"]["estimatedTotal"], 9.0);
    assert_eq!(body["payload"]["actualTotal"], 7.0);
    assert_eq!(body["payload"]["remarks"], "repriced");

    let (_, body) = app.get("/transactions/get", Some(&handler)).await;
    assert_eq!(body["payload"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .post("/transactions/delete", Some(&handler), json!({ "tid": tid }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/transactions/delete", Some(&handler), json!({ "tid": tid }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Transaction does not exist");
}

#[tokio::test]
async fn transaction_create_lists_missing_fields() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;

    let (status, body) = app
        .post(
            "/transactions/create",
            Some(&handler),
            json!({ "transactionDate": "2024-03-01", "transactionCount": 1, "actualTotal": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing field(s): product, price, handler1");
}

#[tokio::test]
async fn transaction_create_rejects_bad_date_and_references() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;
    let handler_uid = app.state.jwt.validate_token(&handler).unwrap().uid;
    let pid = create_product(&app, &handler, "Widget").await;

    let mut request = json!({
        "transactionDate": "yesterday",
        "product": pid,
        "transactionCount": 1,
        "price": 1,
        "actualTotal": 1,
        "handler1": handler_uid
    });
    let (status, _) = app
        .post("/transactions/create", Some(&handler), request.clone())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    request["transactionDate"] = json!("2024-03-01T10:00:00Z");
    request["product"] = json!(pid + 100);
    let (status, _) = app.post("/transactions/create", Some(&handler), request).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn referenced_product_cannot_be_deleted() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;
    let handler_uid = app.state.jwt.validate_token(&handler).unwrap().uid;
    let pid = create_product(&app, &handler, "Widget").await;

    let (status, _) = app
        .post(
            "/transactions/create",
            Some(&handler),
            json!({
                "transactionDate": "2024-03-01",
                "product": pid,
                "transactionCount": 1,
                "price": 1,
                "actualTotal": 1,
                "handler1": handler_uid
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post("/products/delete", Some(&handler), json!({ "pid": pid })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn transaction_update_requires_existing_id() {
    let app = spawn_app().await;
    let handler = app.login("handler", "handler").await;

    let (status, body) = app.post("/transactions/update", Some(&handler), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Transaction ID not provided");

    let (status, body) = app
        .post("/transactions/update", Some(&handler), json!({ "tid": 77 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Transaction does not exist");
}

// ==================== Static frontend ====================

#[tokio::test]
async fn static_dir_serves_index_for_unknown_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>sales</html>").unwrap();

    let app = spawn_app_with_static(Some(dir.path())).await;
    let request = axum::http::Request::builder()
        .uri("/dashboard")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>sales</html>");
}
