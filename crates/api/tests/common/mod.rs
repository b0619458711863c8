#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use elearn_api::auth::jwt::{generate_access_token, JwtConfig};
use elearn_api::auth::password::hash_password;
use elearn_api::config::ServerConfig;
use elearn_api::routes;
use elearn_api::state::AppState;
use elearn_core::roles::{
    ROLE_ADMIN, ROLE_ID_ADMIN, ROLE_ID_STUDENT, ROLE_ID_TEACHER, ROLE_STUDENT, ROLE_TEACHER,
};
use elearn_core::types::DbId;
use elearn_db::models::lesson::CreateLesson;
use elearn_db::models::subject::CreateSubject;
use elearn_db::models::teacher::CreateTeacher;
use elearn_db::models::user::{CreateUser, User};
use elearn_db::repositories::{LessonRepo, SubjectRepo, TeacherRepo, UserRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Password used for every fixture account.
pub const PASSWORD: &str = "Rahasia123";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        bootstrap_admin: None,
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A fixture account with a ready-to-use access token.
pub struct Account {
    pub user: User,
    /// `teachers.id` for teacher accounts.
    pub teacher_id: Option<DbId>,
    pub token: String,
}

pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

async fn create_user(pool: &PgPool, username: &str, role_id: DbId) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: format!("User {username}"),
            username: username.to_string(),
            email: format!("{username}@sekolah.test"),
            password_hash: hash_password(PASSWORD).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap()
}

pub async fn admin(pool: &PgPool, username: &str) -> Account {
    let user = create_user(pool, username, ROLE_ID_ADMIN).await;
    let token = token_for(user.id, ROLE_ADMIN);
    Account {
        user,
        teacher_id: None,
        token,
    }
}

pub async fn student(pool: &PgPool, username: &str) -> Account {
    let user = create_user(pool, username, ROLE_ID_STUDENT).await;
    let token = token_for(user.id, ROLE_STUDENT);
    Account {
        user,
        teacher_id: None,
        token,
    }
}

pub async fn teacher(pool: &PgPool, username: &str) -> Account {
    let user = create_user(pool, username, ROLE_ID_TEACHER).await;
    let profile = TeacherRepo::create(
        pool,
        &CreateTeacher {
            user_id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            nrk: format!("NRK-{username}"),
            phone: "0812345678".to_string(),
        },
    )
    .await
    .unwrap();
    let token = token_for(user.id, ROLE_TEACHER);
    Account {
        user,
        teacher_id: Some(profile.id),
        token,
    }
}

pub async fn subject_for(pool: &PgPool, teacher_id: DbId, title: &str) -> DbId {
    SubjectRepo::create(
        pool,
        &CreateSubject {
            title: title.to_string(),
            description: "Materi pembelajaran".to_string(),
            category: "KELAS_8".to_string(),
            teacher_id,
        },
    )
    .await
    .unwrap()
    .id
}

/// Insert `n` lessons titled `L1..Ln` with orders `1..=n`; returns ids in order.
pub async fn seed_lessons(pool: &PgPool, subject_id: DbId, n: i32) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(n as usize);
    for order in 1..=n {
        let lesson = LessonRepo::create_with_order(
            pool,
            subject_id,
            &CreateLesson {
                title: format!("L{order}"),
                body: None,
                files: Vec::new(),
            },
            order,
        )
        .await
        .unwrap();
        ids.push(lesson.id);
    }
    ids
}

/// Lesson ids of a subject in display order.
pub async fn ids_in_order(pool: &PgPool, subject_id: DbId) -> Vec<DbId> {
    LessonRepo::list_orders(pool, subject_id)
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect()
}

/// `sort_order` values of a subject in display order.
pub async fn orders_of(pool: &PgPool, subject_id: DbId) -> Vec<i32> {
    LessonRepo::list_orders(pool, subject_id)
        .await
        .unwrap()
        .into_iter()
        .map(|(_, order)| order)
        .collect()
}
