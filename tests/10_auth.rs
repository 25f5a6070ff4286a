mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn register_and_login_round_trip() -> Result<()> {
    let server = TestServer::spawn().await?;

    let user = server.signup("alice").await?;
    assert!(!user.user_id.is_empty());
    assert!(!user.token.is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.signup("alice").await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "username": "alice", "password": "password456" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn bad_password_is_unauthorized() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.signup("alice").await?;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "alice", "password": "not-the-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/watchlists"))
        .json(&json!({ "listName": "Movies" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .get(server.url("/watchlists/anything"))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn change_password_then_delete_account() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user = server.signup("alice").await?;

    let res = server
        .client
        .put(server.url("/users/me/password"))
        .bearer_auth(&user.token)
        .json(&json!({ "currentPassword": "password123", "newPassword": "password789" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "alice", "password": "password789" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .delete(server.url("/users/me"))
        .bearer_auth(&user.token)
        .json(&json!({ "password": "password789" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "alice", "password": "password789" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
