mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

// Full collaboration workflow against a real database. When DATABASE_URL
// is unset or the database is unreachable the test skips instead of
// failing, so the rest of the suite stays runnable anywhere.

/// Apply embedded migrations through the CLI. Failure means no usable
/// database; the workflow test skips.
fn init_db() -> bool {
    std::process::Command::new(env!("CARGO_BIN_EXE_itinero-api"))
        .arg("init-db")
        .env("DATABASE_CONNECTION_TIMEOUT", "5")
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Emails must be unique per run so the flow is rerunnable against a
/// persistent database.
fn unique_email(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    format!("{}-{}@example.com", tag, nanos)
}

async fn register_user(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
) -> Result<(i64, String)> {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "name": name,
            "email": email,
            "password": "correct-horse-battery",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    let user_id = body["data"]["user"]["id"]
        .as_i64()
        .context("user id missing")?;
    let token = body["data"]["token"]
        .as_str()
        .context("token missing")?
        .to_string();
    Ok((user_id, token))
}

#[tokio::test]
async fn collaboration_flow_end_to_end() -> Result<()> {
    if !init_db() {
        eprintln!("skipping collaboration_flow_end_to_end: no reachable database");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let (_owner_id, owner_token) =
        register_user(&client, base, "Owner", &unique_email("owner")).await?;
    let guest_email = unique_email("guest");
    let (guest_id, guest_token) = register_user(&client, base, "Guest", &guest_email).await?;

    // Owner creates a trip
    let res = client
        .post(format!("{}/api/itineraries", base))
        .bearer_auth(&owner_token)
        .json(&json!({
            "title": "Lisbon getaway",
            "description": "long weekend",
            "startDate": "2030-05-01T00:00:00Z",
            "endDate": "2030-05-10T00:00:00Z",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let itinerary_id = body["data"]["id"].as_i64().context("itinerary id")?;

    // Invite twice with different roles; the second invite overwrites the
    // first rather than adding a row
    for role in ["VIEWER", "EDITOR"] {
        let res = client
            .post(format!("{}/api/collaborators", base))
            .bearer_auth(&owner_token)
            .json(&json!({
                "itineraryId": itinerary_id,
                "email": guest_email,
                "role": role,
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED, "invite as {}", role);
    }

    let res = client
        .get(format!(
            "{}/api/itineraries/{}/collaborators",
            base, itinerary_id
        ))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let rows: Vec<&Value> = body["data"]
        .as_array()
        .context("collaborator list")?
        .iter()
        .filter(|row| row["userId"].as_i64() == Some(guest_id))
        .collect();
    assert_eq!(rows.len(), 1, "upsert must leave one row: {}", body);
    assert_eq!(rows[0]["role"], "EDITOR", "latest invite wins: {}", body);

    // The guest sees the trip with editor capability
    let res = client
        .get(format!("{}/api/itineraries/{}", base, itinerary_id))
        .bearer_auth(&guest_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["capability"], "EDITOR");

    // Both invites produced a notification; mark-read is one-way and
    // repeatable
    let res = client
        .get(format!("{}/api/notifications", base))
        .bearer_auth(&guest_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let notifications = body["data"]["data"].as_array().context("notifications")?;
    assert!(notifications.len() >= 2, "body: {}", body);
    let notification_id = notifications[0]["id"].as_i64().context("notification id")?;
    assert_eq!(notifications[0]["isRead"], false);

    for _ in 0..2 {
        let res = client
            .put(format!(
                "{}/api/notifications/{}/read",
                base, notification_id
            ))
            .bearer_auth(&guest_token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await?;
        assert_eq!(body["data"]["isRead"], true);
    }

    // Editors may add activities, but only inside the itinerary window
    let res = client
        .post(format!(
            "{}/api/itineraries/{}/activities",
            base, itinerary_id
        ))
        .bearer_auth(&guest_token)
        .json(&json!({
            "name": "Tram 28 ride",
            "startTime": "2030-05-12T09:00:00Z",
            "endTime": "2030-05-12T11:00:00Z",
            "locationName": "Lisbon",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "outside the window");

    let res = client
        .post(format!(
            "{}/api/itineraries/{}/activities",
            base, itinerary_id
        ))
        .bearer_auth(&guest_token)
        .json(&json!({
            "name": "Tram 28 ride",
            "startTime": "2030-05-03T09:00:00Z",
            "endTime": "2030-05-03T11:00:00Z",
            "locationName": "Lisbon",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let activity_id = body["data"]["id"].as_i64().context("activity id")?;

    // Demoted to viewer, the guest loses activity mutation rights
    let res = client
        .post(format!("{}/api/collaborators", base))
        .bearer_auth(&owner_token)
        .json(&json!({
            "itineraryId": itinerary_id,
            "email": guest_email,
            "role": "VIEWER",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .delete(format!("{}/api/activities/{}", base, activity_id))
        .bearer_auth(&guest_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Deleting the itinerary is blocked until its activities are gone
    let res = client
        .delete(format!("{}/api/itineraries/{}", base, itinerary_id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "CONFLICT", "body: {}", body);

    let res = client
        .delete(format!("{}/api/activities/{}", base, activity_id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/api/itineraries/{}", base, itinerary_id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
