//! Test server management.
//!
//! Spawns and manages usagid instances for integration testing.

use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    client: reqwest::Client,
    _data_dir: TempDir,
}

/// Ask the OS for a port that is free right now.
fn free_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

impl TestServer {
    /// Spawn a server with the default test configuration.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("").await
    }

    /// Spawn a server; `extra` is appended to the generated config and may
    /// add `[modules]`, `[incognito]` or `[logging]` tables.
    pub async fn spawn_with(extra: &str) -> anyhow::Result<Self> {
        let port = free_port()?;
        let data_dir = tempfile::tempdir()?;

        let config_path = data_dir.path().join("usagi.toml");
        let config_content = format!(
            r#"
[server]
listen = "127.0.0.1:{port}"
route = "/bunny"

{extra}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_usagid"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let server = Self {
            child,
            port,
            client,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// GET `path` without following redirects.
    pub async fn get(&self, path: &str) -> anyhow::Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Send `command` to the redirect endpoint and return the `Location`.
    pub async fn bunny(&self, command: &str) -> anyhow::Result<String> {
        self.bunny_with(&[("query", command)], None).await
    }

    /// Redirect endpoint with arbitrary parameters and Accept-Language.
    pub async fn bunny_with(
        &self,
        params: &[(&str, &str)],
        accept_language: Option<&str>,
    ) -> anyhow::Result<String> {
        let mut request = self.client.get(self.url("/bunny")).query(params);
        if let Some(value) = accept_language {
            request = request.header(reqwest::header::ACCEPT_LANGUAGE, value);
        }
        let response = request.send().await?;
        anyhow::ensure!(
            response.status() == reqwest::StatusCode::SEE_OTHER,
            "expected 303, got {}",
            response.status()
        );
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .ok_or_else(|| anyhow::anyhow!("missing Location header"))?
            .to_str()?
            .to_string();
        Ok(location)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
