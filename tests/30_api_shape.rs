mod common;

use anyhow::Result;
use reqwest::StatusCode;

// Protected-surface checks that hold with or without a database: the
// bearer-token middleware and path-id validation both run before any
// data-store access.

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/auth/whoami",
        "/api/itineraries",
        "/api/notifications",
    ] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            path
        );

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], true, "body: {}", body);
        assert_eq!(body["code"], "UNAUTHORIZED", "body: {}", body);
    }

    Ok(())
}

#[tokio::test]
async fn malformed_authorization_headers_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/itineraries", server.base_url);

    // Wrong scheme
    let res = client
        .get(&url)
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Bearer with garbage token
    let res = client
        .get(&url)
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn valid_token_passes_the_middleware() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::bearer_token(1, "Test User", "test-user@example.com");

    // Past the middleware the handler needs the database; anything but
    // 401 proves the token was accepted.
    let res = client
        .get(format!("{}/api/itineraries", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn non_numeric_ids_fail_validation_before_any_lookup() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::bearer_token(1, "Test User", "test-user@example.com");

    let res = client
        .put(format!(
            "{}/api/notifications/not-a-number/read",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR", "body: {}", body);

    let res = client
        .get(format!("{}/api/itineraries/abc", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
