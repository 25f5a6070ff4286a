mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn create_with_blank_name_is_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.signup("owner").await?;

    let res = server
        .client
        .post(server.url("/watchlists"))
        .bearer_auth(&owner.token)
        .json(&json!({ "listName": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "List name cannot be empty.");
    Ok(())
}

#[tokio::test]
async fn visibility_decides_who_can_read() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.signup("owner").await?;
    let stranger = server.signup("stranger").await?;
    let list_id = server.create_list(&owner, "Movies").await?;
    let path = format!("/watchlists/{}", list_id);

    let res = server.client.get(server.url(&path)).bearer_auth(&owner.token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["isPublic"], false);

    let res = server.client.get(server.url(&path)).bearer_auth(&stranger.token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .get(server.url("/watchlists/does-not-exist"))
        .bearer_auth(&stranger.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(&owner.token)
        .json(&json!({ "isPublic": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["message"], "Watchlist updated successfully");

    let res = server.client.get(server.url(&path)).bearer_auth(&stranger.token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn update_errors_map_to_statuses() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.signup("owner").await?;
    let other = server.signup("other").await?;
    server.create_list(&owner, "Updated").await?;
    let second = server.create_list(&owner, "Second").await?;
    let path = format!("/watchlists/{}", second);

    let cases = [
        (&owner, json!({ "listName": "Updated" }), StatusCode::CONFLICT, "A watchlist with that name already exists!"),
        (&owner, json!({ "listName": " " }), StatusCode::BAD_REQUEST, "List name cannot be empty."),
        (&owner, json!({ "isPublic": "yes" }), StatusCode::BAD_REQUEST, "isPublic must be a boolean."),
    ];
    for (user, payload, status, message) in cases {
        let res = server.client.put(server.url(&path)).bearer_auth(&user.token).json(&payload).send().await?;
        assert_eq!(res.status(), status, "payload {}", payload);
        let body = res.json::<Value>().await?;
        assert_eq!(body["message"], message);
    }

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(&other.token)
        .json(&json!({ "listName": "Mine now" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Renaming to its own name is not a conflict
    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(&owner.token)
        .json(&json!({ "listName": "Second" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn like_toggles() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.signup("owner").await?;
    let fan = server.signup("fan").await?;
    let list_id = server.create_list(&owner, "Movies").await?;
    let path = format!("/watchlists/{}/likes", list_id);

    for expected in ["liked", "unliked"] {
        let res = server.client.patch(server.url(&path)).bearer_auth(&fan.token).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<Value>().await?;
        assert_eq!(body["data"]["action"], expected);
        assert_eq!(body["data"]["message"], format!("List has been successfully {}", expected));
    }

    let res = server
        .client
        .patch(server.url("/watchlists/missing/likes"))
        .bearer_auth(&fan.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn comments_respect_visibility_and_can_be_deleted() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.signup("owner").await?;
    let stranger = server.signup("stranger").await?;
    let list_id = server.create_list(&owner, "Movies").await?;
    let path = format!("/watchlists/{}/comments", list_id);

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(&stranger.token)
        .json(&json!({ "comment": "let me in" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Unauthorized: You cannot comment on this watchlist.");

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(&owner.token)
        .json(&json!({ "comment": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut ids = Vec::new();
    for text in ["first", "second", "third"] {
        let res = server
            .client
            .put(server.url(&path))
            .bearer_auth(&owner.token)
            .json(&json!({ "comment": text }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["data"]["message"], "Comment added successfully");
        assert_eq!(body["data"]["comment"]["username"], "owner");
        ids.push(body["data"]["comment"]["commentId"].as_str().unwrap_or_default().to_string());
    }

    let res = server
        .client
        .delete(server.url(&format!("{}/{}", path, ids[1])))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let remaining: Vec<&str> = body["data"]["watchlist"]["comments"]
        .as_array()
        .map(|cs| cs.iter().filter_map(|c| c["comment"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(remaining, ["first", "third"]);

    let res = server
        .client
        .delete(server.url(&format!("{}/{}", path, ids[1])))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn wrongly_typed_bodies_are_bad_requests() -> Result<()> {
    let server = TestServer::spawn().await?;
    let owner = server.signup("owner").await?;
    let list_id = server.create_list(&owner, "Movies").await?;

    let res = server
        .client
        .put(server.url(&format!("/watchlists/{}", list_id)))
        .bearer_auth(&owner.token)
        .json(&json!({ "listName": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let res = server
        .client
        .post(server.url("/watchlists"))
        .bearer_auth(&owner.token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
