// tests/post_tests.rs

mod common;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use common::TestUser;
use social_backend::{models::user::AuthUser, store::PostStore};

async fn create_post(
    client: &reqwest::Client,
    posts_url: &str,
    user: &TestUser,
    content: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/posts", posts_url))
        .header("Authorization", user.bearer())
        .json(&serde_json::json!({ "content": content }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn feed(client: &reqwest::Client, posts_url: &str, user: Option<&TestUser>) -> serde_json::Value {
    let mut request = client.get(&format!("{}/api/posts", posts_url));
    if let Some(user) = user {
        request = request.header("Authorization", user.bearer());
    }
    let response = request.send().await.expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.unwrap()
}

fn find_post<'a>(feed: &'a serde_json::Value, post_id: &str) -> &'a serde_json::Value {
    feed["posts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|post| post["id"] == post_id)
        .expect("post missing from feed")
}

fn like_url(posts_url: &str, post_id: &str) -> String {
    format!("{}/api/posts/{}/like", posts_url, post_id)
}

#[tokio::test]
async fn like_and_unlike_scenario() {
    // Arrange
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;
    let bob = common::signup(&client, &stack.auth_url).await;
    let carol = common::signup(&client, &stack.auth_url).await;

    // 1. Alice posts
    let response = create_post(&client, &stack.posts_url, &alice, "hello").await;
    assert_eq!(response.status().as_u16(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    let post_id = created["post"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["post"]["content"], "hello");
    assert_eq!(created["post"]["author_id"], alice.user_id.as_str());
    assert_eq!(created["post"]["author_username"], alice.username.as_str());
    assert!(created["post"].get("like_count").is_none());

    // 2. Bob likes it
    let response = client
        .post(&like_url(&stack.posts_url, &post_id))
        .header("Authorization", bob.bearer())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let liked: serde_json::Value = response.json().await.unwrap();
    assert_eq!(liked["like_count"], 1);
    assert_eq!(liked["like"]["user_id"], bob.user_id.as_str());

    // 3. Feed as Bob and as Carol
    let as_bob = feed(&client, &stack.posts_url, Some(&bob)).await;
    assert_eq!(find_post(&as_bob, &post_id)["is_liked_by_user"], true);
    assert_eq!(find_post(&as_bob, &post_id)["like_count"], 1);

    let as_carol = feed(&client, &stack.posts_url, Some(&carol)).await;
    assert_eq!(find_post(&as_carol, &post_id)["is_liked_by_user"], false);
    assert_eq!(find_post(&as_carol, &post_id)["like_count"], 1);

    // 4. Bob unlikes
    let response = client
        .delete(&like_url(&stack.posts_url, &post_id))
        .header("Authorization", bob.bearer())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let unliked: serde_json::Value = response.json().await.unwrap();
    assert_eq!(unliked["like_count"], 0);

    let as_bob = feed(&client, &stack.posts_url, Some(&bob)).await;
    assert_eq!(find_post(&as_bob, &post_id)["is_liked_by_user"], false);
    assert_eq!(find_post(&as_bob, &post_id)["like_count"], 0);
}

#[tokio::test]
async fn repeated_like_and_unlike_map_to_400_and_404() {
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;
    let created: serde_json::Value = create_post(&client, &stack.posts_url, &alice, "hi")
        .await
        .json()
        .await
        .unwrap();
    let post_id = created["post"]["id"].as_str().unwrap();
    let url = like_url(&stack.posts_url, post_id);

    let first = client.post(&url).header("Authorization", alice.bearer()).send().await.unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client.post(&url).header("Authorization", alice.bearer()).send().await.unwrap();
    assert_eq!(second.status().as_u16(), 400);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Post already liked");

    let first = client.delete(&url).header("Authorization", alice.bearer()).send().await.unwrap();
    assert_eq!(first.status().as_u16(), 200);

    let second = client.delete(&url).header("Authorization", alice.bearer()).send().await.unwrap();
    assert_eq!(second.status().as_u16(), 404);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Like not found");
}

#[tokio::test]
async fn liking_a_missing_post_is_404() {
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let bob = common::signup(&client, &stack.auth_url).await;

    let response = client
        .post(&like_url(&stack.posts_url, "does-not-exist"))
        .header("Authorization", bob.bearer())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn concurrent_like_requests_succeed_exactly_once() {
    const N: usize = 10;
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;
    let created: serde_json::Value = create_post(&client, &stack.posts_url, &alice, "race")
        .await
        .json()
        .await
        .unwrap();
    let post_id = created["post"]["id"].as_str().unwrap().to_string();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..N {
        let client = client.clone();
        let url = like_url(&stack.posts_url, &post_id);
        let bearer = alice.bearer();
        tasks.spawn(async move {
            client
                .post(&url)
                .header("Authorization", bearer)
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        });
    }

    let mut statuses = Vec::new();
    while let Some(status) = tasks.join_next().await {
        statuses.push(status.unwrap());
    }

    assert_eq!(statuses.iter().filter(|&&s| s == 201).count(), 1);
    assert_eq!(statuses.iter().filter(|&&s| s == 400).count(), N - 1);
    assert_eq!(stack.store.count_likes(&post_id).await.unwrap(), 1);
}

#[tokio::test]
async fn writes_require_a_valid_bearer_token() {
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;
    let created: serde_json::Value = create_post(&client, &stack.posts_url, &alice, "mine")
        .await
        .json()
        .await
        .unwrap();
    let post_id = created["post"]["id"].as_str().unwrap();

    for auth_header in [
        None,
        Some("Basic dXNlcjpwYXNz".to_string()),
        Some("Bearer".to_string()),
        Some("Bearer not.a.token".to_string()),
        Some(alice.token.clone()),
    ] {
        let mut create = client
            .post(&format!("{}/api/posts", stack.posts_url))
            .json(&serde_json::json!({ "content": "sneaky" }));
        let mut like = client.post(&like_url(&stack.posts_url, post_id));
        let mut unlike = client.delete(&like_url(&stack.posts_url, post_id));
        if let Some(value) = &auth_header {
            create = create.header("Authorization", value);
            like = like.header("Authorization", value);
            unlike = unlike.header("Authorization", value);
        }

        for request in [create, like, unlike] {
            let response = request.send().await.unwrap();
            assert_eq!(response.status().as_u16(), 401, "header {:?}", auth_header);
            let body: serde_json::Value = response.json().await.unwrap();
            assert_eq!(body["error"], "Unauthorized");
        }
    }

    // Nothing was written by the rejected requests.
    let public = feed(&client, &stack.posts_url, None).await;
    assert_eq!(public["posts"].as_array().unwrap().len(), 1);
    assert_eq!(stack.store.count_likes(post_id).await.unwrap(), 0);
}

#[tokio::test]
async fn like_with_expired_token_is_rejected_without_side_effects() {
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;
    let created: serde_json::Value = create_post(&client, &stack.posts_url, &alice, "old news")
        .await
        .json()
        .await
        .unwrap();
    let post_id = created["post"]["id"].as_str().unwrap();

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    let expired = common::codec()
        .issue_at(
            &AuthUser {
                user_id: alice.user_id.clone(),
                email: format!("{}@example.com", alice.username),
                username: alice.username.clone(),
            },
            now - common::TEST_TTL - 1,
        )
        .unwrap();

    let response = client
        .post(&like_url(&stack.posts_url, post_id))
        .header("Authorization", format!("Bearer {}", expired))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(stack.store.count_likes(post_id).await.unwrap(), 0);
    assert!(stack.store.find_like(post_id, &alice.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn content_is_validated_before_storage() {
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;

    let too_long = "a".repeat(501);
    let response = create_post(&client, &stack.posts_url, &alice, &too_long).await;
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("500 characters"));

    for blank in ["", "   ", "\n\t"] {
        let response = create_post(&client, &stack.posts_url, &alice, blank).await;
        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("Content is required"));
    }

    // Missing field and malformed JSON are 400 too.
    let response = client
        .post(&format!("{}/api/posts", stack.posts_url))
        .header("Authorization", alice.bearer())
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(&format!("{}/api/posts", stack.posts_url))
        .header("Authorization", alice.bearer())
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let public = feed(&client, &stack.posts_url, None).await;
    assert!(public["posts"].as_array().unwrap().is_empty());

    // Exactly 500 characters is accepted, counting characters rather than bytes.
    let response = create_post(&client, &stack.posts_url, &alice, &"é".repeat(500)).await;
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn feed_is_public_and_ignores_bad_tokens() {
    let stack = common::spawn_stack().await;
    let client = reqwest::Client::new();
    let alice = common::signup(&client, &stack.auth_url).await;
    let created: serde_json::Value = create_post(&client, &stack.posts_url, &alice, "public")
        .await
        .json()
        .await
        .unwrap();
    let post_id = created["post"]["id"].as_str().unwrap();
    client
        .post(&like_url(&stack.posts_url, post_id))
        .header("Authorization", alice.bearer())
        .send()
        .await
        .unwrap();

    // No header at all
    let anonymous = feed(&client, &stack.posts_url, None).await;
    let post = find_post(&anonymous, post_id);
    assert_eq!(post["is_liked_by_user"], false);
    assert_eq!(post["like_count"], 1);

    // Malformed and forged tokens are treated as anonymous, never as 401
    for header in ["Bearer garbage", "Basic abc", "Bearer "] {
        let response = client
            .get(&format!("{}/api/posts", stack.posts_url))
            .header("Authorization", header)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(find_post(&body, post_id)["is_liked_by_user"], false);
    }
}

#[tokio::test]
async fn slow_auth_service_yields_401_not_a_hang() {
    let slow_auth = common::spawn_slow_server(Duration::from_secs(3)).await;
    let posts_url = common::spawn_post_service(&slow_auth, Duration::from_millis(200)).await;
    let client = reqwest::Client::new();

    let started = tokio::time::Instant::now();
    let response = client
        .post(&format!("{}/api/posts", posts_url))
        .header("Authorization", "Bearer some.jwt.token")
        .json(&serde_json::json!({ "content": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn unreachable_auth_service_yields_401_on_writes_and_anonymous_reads() {
    let dead_auth = common::dead_address().await;
    let posts_url = common::spawn_post_service(&dead_auth, Duration::from_secs(1)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/posts", posts_url))
        .header("Authorization", "Bearer some.jwt.token")
        .json(&serde_json::json!({ "content": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(&format!("{}/api/posts", posts_url))
        .header("Authorization", "Bearer some.jwt.token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
