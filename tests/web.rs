//! The browser surface, driven through the router without a socket.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gobarber_web::{
    config::Config,
    context::AppContext,
    pages::Pages,
    routes::{self, AppState},
    storage::{MemoryStorage, Storage, TOKEN_KEY, USER_KEY},
    templates::Templates,
};

fn app(api_url: &str, storage: Arc<dyn Storage>) -> (Router, AppContext) {
    let config = Config {
        api_url: api_url.to_string(),
        ..Config::default()
    };
    let ctx = AppContext::with_storage(storage, &config).unwrap();
    let state = AppState {
        pages: Arc::new(Pages::new(&ctx)),
        templates: Arc::new(Templates::load(&config.templates).unwrap()),
        ctx: ctx.clone(),
    };

    (routes::router(state, &config.public_dir), ctx)
}

fn signed_in() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_items([
        (TOKEN_KEY, "token-123"),
        (USER_KEY, r#"{"id":"user-123","name":"John Doe","email":"john@email.com"}"#),
    ]))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

async fn body_text(response: Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn private_pages_redirect_to_sign_in() {
    let (app, _ctx) = app("http://127.0.0.1:9", Arc::new(MemoryStorage::new()));

    for uri in ["/dashboard", "/profile"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), Some("/"), "{uri}");
    }
}

#[tokio::test]
async fn signed_in_users_skip_sign_in() {
    let (app, _ctx) = app("http://127.0.0.1:9", signed_in());

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn invalid_email_stays_on_sign_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (app, ctx) = app(&server.uri(), Arc::new(MemoryStorage::new()));

    let response = app
        .oneshot(post_form("/", "email=not-valid-email&password=123456"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(location(&response), None);
    let page = body_text(response).await;
    assert!(page.contains("Digite um email válido"));
    assert!(page.contains(r#"value="not-valid-email""#));
    assert!(!ctx.session.is_authenticated());
}

#[tokio::test]
async fn sign_in_goes_to_dashboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "id": "user-id", "name": "name", "email": "mail@mail.com" },
            "token": "token-123",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryStorage::new());
    let (app, ctx) = app(&server.uri(), storage.clone());

    let response = app
        .oneshot(post_form("/", "email=mail%40mail.com&password=123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("token-123"));
    assert_eq!(ctx.session.user().unwrap().email, "mail@mail.com");
}

#[tokio::test]
async fn failed_sign_in_renders_one_error_toast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "message": "Incorrect email/password combination.",
        })))
        .mount(&server)
        .await;
    let (app, ctx) = app(&server.uri(), Arc::new(MemoryStorage::new()));

    let response = app
        .oneshot(post_form("/", "email=john%40email.com&password=wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), None);
    let page = body_text(response).await;
    assert_eq!(page.matches("toast-error").count(), 1);
    assert!(page.contains("Erro na autenticação"));
    assert!(!page.contains("wrong"));
    assert_eq!(ctx.toasts.messages().len(), 1);
}

#[tokio::test]
async fn dashboard_renders_empty_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    let (app, ctx) = app(&server.uri(), signed_in());

    let response = app.oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Horários agendados"));
    assert!(page.contains("John Doe"));
    assert!(page.contains("Nenhum agendamento neste período"));
    assert!(ctx.toasts.messages().is_empty());
}

#[tokio::test]
async fn sign_out_clears_session() {
    let storage = signed_in();
    let (app, ctx) = app("http://127.0.0.1:9", storage.clone());

    let response = app.oneshot(post_form("/signout", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    assert!(!ctx.session.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn dismissing_a_toast_returns_to_the_page() {
    let (app, ctx) = app("http://127.0.0.1:9", Arc::new(MemoryStorage::new()));
    let id = ctx
        .toasts
        .add_toast(gobarber_web::model::NewToast::info("Olá"));

    let response = app
        .oneshot(post_form(
            &format!("/toasts/{id}/dismiss"),
            "back=%2Fforgot-password",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/forgot-password"));
    assert!(ctx.toasts.messages().is_empty());
}

#[tokio::test]
async fn serves_static_files() {
    let (app, _ctx) = app("http://127.0.0.1:9", Arc::new(MemoryStorage::new()));

    let response = app.oneshot(get("/static/style.css")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dismiss_ignores_unknown_back_targets() {
    let (app, ctx) = app("http://127.0.0.1:9", Arc::new(MemoryStorage::new()));
    let id = ctx
        .toasts
        .add_toast(gobarber_web::model::NewToast::info("Olá"));

    for back in ["%2Fdashboard%0A", "%2Fagenda%C3%A9", "https%3A%2F%2Fevil.example"] {
        let response = app
            .clone()
            .oneshot(post_form(&format!("/toasts/{id}/dismiss"), &format!("back={back}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{back}");
        assert_eq!(location(&response), Some("/"), "{back}");
    }
    assert!(ctx.toasts.messages().is_empty());
}
