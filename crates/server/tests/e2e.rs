use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::AppConfig;
use server::startup::{build_app, build_state};

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }
}

async fn start_server(cfg: AppConfig) -> anyhow::Result<TestApp> {
    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    // cookie store on, so the auth_token cookie alone authenticates follow-up calls
    let client = reqwest::Client::builder().cookie_store(true).build()?;
    Ok(TestApp { base_url, client })
}

async fn full_flow(app: &TestApp) -> anyhow::Result<()> {
    let email = format!("e2e_{}@example.com", Uuid::new_v4().simple());

    let resp = app.client.get(app.url("/health")).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);

    let resp = app
        .client
        .post(app.url("/api/signup"))
        .json(&json!({
            "name": "E2E User",
            "email": email,
            "password": "Secret123!",
            "password_confirmation": "Secret123!"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let session: Value = resp.json().await?;
    let token = session["token"].as_str().unwrap_or_default().to_string();

    // cookie only
    let resp = app.client.get(app.url("/api/user")).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let me: Value = resp.json().await?;
    assert_eq!(me["email"], email.as_str());

    let resp = app
        .client
        .get(app.url(&format!("/api/users?search={}", email)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let page: Value = resp.json().await?;
    assert_eq!(page["meta"]["total"], 1);

    let resp = app.client.post(app.url("/api/logout")).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);

    let resp = reqwest::Client::new().get(app.url("/api/user")).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({"email": email, "password": "Secret123!"}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let session: Value = resp.json().await?;
    let id = session["user"]["id"].as_str().unwrap_or_default().to_string();
    let token = session["token"].as_str().unwrap_or_default().to_string();

    let resp = app.client.delete(app.url(&format!("/api/users/{}", id))).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);

    // the user is gone, and so is its token
    let resp = reqwest::Client::new().get(app.url("/api/user")).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_in_memory() -> anyhow::Result<()> {
    let app = start_server(AppConfig::default()).await?;
    full_flow(&app).await
}

#[tokio::test]
async fn e2e_postgres() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL missing; skip e2e postgres test.");
        return Ok(());
    };
    let mut cfg = AppConfig::default();
    cfg.database.url = url;
    cfg.database.min_connections = 1;
    let app = match start_server(cfg).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip: cannot start against postgres: {}", e);
            return Ok(());
        }
    };
    full_flow(&app).await
}
