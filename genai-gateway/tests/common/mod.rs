#![allow(dead_code)]

use genai_gateway::config::GatewayConfig;
use genai_gateway::services::providers::mock::MockProvider;
use genai_gateway::startup::Application;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockProvider>,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the gateway on a random port in front of `provider`.
    pub async fn spawn(provider: MockProvider) -> Self {
        Self::spawn_with_config(provider, GatewayConfig::for_port(0)).await
    }

    pub async fn spawn_with_config(provider: MockProvider, config: GatewayConfig) -> Self {
        let provider = Arc::new(provider);

        let app = Application::build_with_provider(config, provider.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            provider,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

pub fn file_part(bytes: Vec<u8>, file_name: &str, mime: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("valid mime type")
}
