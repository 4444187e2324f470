/// Router-level tests for authentication, authorization, and validation
///
/// Every request here is rejected before the handler touches the database,
/// so the tests run against an unreachable lazy pool.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;
use workboard_shared::auth::jwt::{create_token, Claims, TokenType};
use workboard_shared::models::user::UserRole;

#[tokio::test]
async fn test_protected_route_requires_auth() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header("authorization", "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_as_access_token() {
    let app = TestApp::new();

    let claims = Claims::new("user@example.com", UserRole::Employee, TokenType::Refresh);
    let refresh_token = create_token(&claims, common::TEST_JWT_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header("authorization", format!("Bearer {}", refresh_token))
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    let app = TestApp::new();

    let claims = Claims::new("user@example.com", UserRole::Admin, TokenType::Access);
    let token = create_token(&claims, "a-different-secret-also-32-bytes!!").unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "id": "not-an-email",
                "name": "Jordan",
                "password": "Correct.Horse.Battery.1"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "id");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "id": "user@example.com",
                "name": "Jordan",
                "password": "short"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_refresh_rejects_invalid_token() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "refresh_token": "not.a.jwt" }).to_string(),
        ))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_employee_cannot_create_project() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/projects")
        .header(
            "authorization",
            app.auth_header("worker@example.com", UserRole::Employee),
        )
        .header("content-type", "application/json")
        .body(Body::from(json!({ "id": "AB12C" }).to_string()))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_project_rejects_malformed_id() {
    let app = TestApp::new();

    // Lowercase, too short, digits-only, and symbol-bearing ids all fail
    for bad_id in ["abcde", "AB1", "12345", "AB12!"] {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/projects")
            .header(
                "authorization",
                app.auth_header("manager@example.com", UserRole::ProjectManager),
            )
            .header("content-type", "application/json")
            .body(Body::from(json!({ "id": bad_id }).to_string()))
            .unwrap();

        let response = app.request(request).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Project id '{}' should be rejected",
            bad_id
        );
    }
}

#[tokio::test]
async fn test_project_manager_cannot_appoint_other_manager() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/projects")
        .header(
            "authorization",
            app.auth_header("manager@example.com", UserRole::ProjectManager),
        )
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "id": "AB12C", "manager_id": "other@example.com" }).to_string(),
        ))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_assign_rejects_status_field() {
    let app = TestApp::new();

    // Assignment never sets a status; a request carrying one must fail
    // instead of having the field silently dropped
    let request = Request::builder()
        .method("POST")
        .uri("/v1/projects/AB12C/tasks/T1/assign")
        .header(
            "authorization",
            app.auth_header("admin@example.com", UserRole::Admin),
        )
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "description": "Write the report",
                "assignee": "worker@example.com",
                "status": "in_progress"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_non_admin_cannot_list_users() {
    let app = TestApp::new();

    for role in [UserRole::ProjectManager, UserRole::Employee] {
        let request = Request::builder()
            .method("GET")
            .uri("/v1/users")
            .header("authorization", app.auth_header("user@example.com", role))
            .body(Body::empty())
            .unwrap();

        let response = app.request(request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_non_admin_cannot_change_roles() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("PUT")
        .uri("/v1/users/worker@example.com/role")
        .header(
            "authorization",
            app.auth_header("manager@example.com", UserRole::ProjectManager),
        )
        .header("content-type", "application/json")
        .body(Body::from(json!({ "role": "project_manager" }).to_string()))
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_admin_cannot_remove_project() {
    let app = TestApp::new();

    for role in [UserRole::ProjectManager, UserRole::Employee] {
        let request = Request::builder()
            .method("DELETE")
            .uri("/v1/projects/AB12C")
            .header("authorization", app.auth_header("user@example.com", role))
            .body(Body::empty())
            .unwrap();

        let response = app.request(request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_health_reports_database_state() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The test pool points at an unreachable database
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
