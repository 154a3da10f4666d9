//! Spawns the built server binary once per test process and waits for it
//! to answer on /health.

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

/// Signing secret shared by the spawned server and test-side token minting
pub const TEST_JWT_SECRET: &str = "itinero-integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| spawn_server().expect("failed to spawn server binary"));
    await_health(&server.base_url, Duration::from_secs(10)).await?;
    Ok(server)
}

fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("no free port available")?;

    // DATABASE_URL is inherited from the environment (or .env) when set;
    // the suite holds without one.
    let child = Command::new(env!("CARGO_BIN_EXE_itinero-api"))
        .env("ITINERO_API_PORT", port.to_string())
        .env("JWT_SECRET", TEST_JWT_SECRET)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .context("failed to spawn server binary")?;

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        child,
    })
}

/// Poll /health until the server answers. A degraded (503) response still
/// counts as up; these tests do not require a database.
async fn await_health(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;

    while Instant::now() < deadline {
        if let Ok(resp) = client.get(format!("{}/health", base_url)).send().await {
            let status = resp.status();
            if status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("server did not come up on {} within {:?}", base_url, timeout)
}

/// Mint a bearer token the spawned server will accept
#[allow(dead_code)]
pub fn bearer_token(user_id: i64, name: &str, email: &str) -> String {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
    let claims = itinero_api::auth::Claims::new(user_id, name.to_string(), email.to_string());
    itinero_api::auth::generate_jwt(claims).expect("token generation")
}
