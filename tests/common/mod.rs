//! Common test utilities and fixtures.

#![cfg(feature = "server")]
#![allow(dead_code)]

use axum_test::TestServer;
use moviesdb::server::{AppState, Config, DatabaseConfig, StoreEngine, router};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Test application wrapper that manages a temporary database.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestApp {
    /// Create a test application backed by a fresh on-disk fjall store.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_engine(StoreEngine::Fjall)
    }

    /// Create a test application backed by the in-memory store.
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::with_engine(StoreEngine::Memory)
    }

    fn with_engine(engine: StoreEngine) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("db");
        let config = Config {
            database: DatabaseConfig {
                engine,
                path: db_path.to_string_lossy().into(),
                ..DatabaseConfig::default()
            },
            ..Config::default()
        };
        let state = AppState::from_config(&config)?;
        let server = TestServer::new(router(state.clone()))?;
        Ok(Self {
            server,
            state,
            _temp_dir: temp_dir,
        })
    }

    /// Create a movie through the API and return its id.
    pub async fn create_movie(
        &self,
        name: &str,
        description: &str,
        cover_image: &str,
    ) -> anyhow::Result<String> {
        let response = self
            .server
            .post("/movie")
            .json(&json!({
                "name": name,
                "description": description,
                "cover_image": cover_image,
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["inserted_id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("no inserted_id in {}", body))
    }

    /// Create several movies that only differ by name.
    pub async fn create_named(&self, names: &[&str]) -> anyhow::Result<Vec<String>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            ids.push(self.create_movie(name, "", "").await?);
        }
        Ok(ids)
    }
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Assert that a response body is a JSON error with the given code.
pub fn assert_error_code(body: &Value, code: &str) {
    assert_eq!(body["code"].as_str(), Some(code), "unexpected error body: {}", body);
    assert!(
        body["message"].as_str().is_some_and(|m| !m.is_empty()),
        "error body without message: {}",
        body
    );
}

/// Collect the `name` field of every movie in a JSON array.
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|movies| {
            movies
                .iter()
                .filter_map(|m| m["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
