#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use watchlist_api::config::{AppConfig, Environment};
use watchlist_api::database::{MemoryStore, UuidGenerator};
use watchlist_api::{app, AppState};

pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

/// Logged-in user as seen by the tests
pub struct TestUser {
    pub user_id: String,
    pub token: String,
}

impl TestServer {
    /// Serve the full router over a fresh in-memory store on an unused port
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let mut config = AppConfig::preset(Environment::Development);
        config.server.port = port;

        let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()), Arc::new(UuidGenerator));
        let listener = tokio::net::TcpListener::bind(config.bind_addr())
            .await
            .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.expect("server");
        });

        Ok(Self {
            base_url: format!("http://{}", config.bind_addr()),
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register `username` and log in, returning its id and bearer token
    pub async fn signup(&self, username: &str) -> Result<TestUser> {
        let credentials = json!({ "username": username, "password": "password123" });

        let res = self.client.post(self.url("/users")).json(&credentials).send().await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.client.post(self.url("/auth/login")).json(&credentials).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;

        Ok(TestUser {
            user_id: body["data"]["user"]["userId"].as_str().context("missing userId")?.to_string(),
            token: body["data"]["token"].as_str().context("missing token")?.to_string(),
        })
    }

    /// Create a private list owned by `user`, returning its id
    pub async fn create_list(&self, user: &TestUser, name: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/watchlists"))
            .bearer_auth(&user.token)
            .json(&json!({ "listName": name }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        let body = res.json::<Value>().await?;
        Ok(body["data"]["listId"].as_str().context("missing listId")?.to_string())
    }
}
