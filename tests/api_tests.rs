//! HTTP-level tests for the terminal API, exercising the routes the
//! frontend depends on against a throwaway database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tillgate::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("tillgate-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = tillgate::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    tillgate::api::router(state).await
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login_admin(app: &Router) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn system_status_and_timer_are_public() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/system/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database_ok"], true);

    // The lock screen polls the cooldown without a session.
    let response = app.clone().oneshot(get_request("/api/timer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["enabled"], true);
    assert_eq!(body["data"]["blocked"], false);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get_request("/api/auth/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/drawers/1001/state",
            &json!({"open": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_failures_carry_structured_detail() {
    let app = spawn_app().await;

    let bad = json!({"username": "admin", "password": "nope"});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/login", &bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "invalid-credentials");
    assert_eq!(body["remaining_attempts"], 2);

    app.clone()
        .oneshot(json_request("POST", "/api/auth/login", &bad))
        .await
        .unwrap();

    // Third failure locks the account and switches the status code.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/login", &bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::LOCKED);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "account-locked");
    assert!(body["lock_seconds"].as_u64().unwrap() > 0);

    // The right password is also refused while locked.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::LOCKED);
}

#[tokio::test]
async fn login_and_drawer_flow() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "admin");

    let response = app.clone().oneshot(get_request("/api/auth/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "admin");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/drawers/1001/state",
            &json!({"open": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_open"], true);
    assert_eq!(body["data"]["no_change"], false);
    assert_eq!(body["data"]["audit_recorded"], true);

    // Asking again is a first-class no-op.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/drawers/1001/state",
            &json!({"open": true}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["no_change"], true);

    let response = app
        .clone()
        .oneshot(get_request("/api/drawers/1001/history"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["action"], "opened");

    // The open armed the cooldown; an admin clears it.
    let response = app.clone().oneshot(get_request("/api/timer")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["blocked"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/timer/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["cleared"], true);

    let response = app.clone().oneshot(get_request("/api/timer")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["blocked"], false);
}

#[tokio::test]
async fn blocked_open_reports_423_to_the_frontend() {
    let app = spawn_app().await;
    login_admin(&app).await;

    // Provision a seller while the admin holds the session.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            &json!({"username": "sam", "password": "sellerpass1", "role": "seller"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Arm the window with an admin open, then hand the terminal over.
    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/drawers/1001/state",
            &json!({"open": true}),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/drawers/1001/state",
            &json!({"open": false}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "sam", "password": "sellerpass1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/drawers/1001/state",
            &json!({"open": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::LOCKED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().contains("suspended"),
        "{body}"
    );
}

#[tokio::test]
async fn user_admin_routes_enforce_the_invariants() {
    let app = spawn_app().await;
    login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            &json!({"username": "rita", "password": "restock1pw", "role": "restocker"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "restocker");
    let rita_id = body["data"]["id"].as_i64().unwrap();

    // Duplicate usernames are a conflict.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            &json!({"username": "rita", "password": "restock1pw", "role": "seller"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Deleting the only active admin is refused.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/users/{rita_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "rita");
    assert_eq!(body["data"]["is_active"], true);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{rita_id}/active"),
            &json!({"active": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_active"], false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{rita_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone means gone.
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/users/{rita_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
