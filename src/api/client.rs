// astro-miner/src/api/client.rs
// HTTP client for the game server's player and mining endpoints

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::PlayerView;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("server rejected collection: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectRequest {
    pub user_id: String,
    pub system: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectResponse {
    pub success: bool,
    #[serde(default)]
    pub collected: f64,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: PlayerView },
    Bare(PlayerView),
}

pub struct GameApiClient {
    client: Client,
    api_base: String,
    player_id: String,
    token: Option<String>,
}

impl GameApiClient {
    pub fn new(
        api_base: String,
        player_id: String,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            player_id,
            token,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn user_url(&self) -> String {
        format!(
            "{}/api/user/{}",
            self.api_base,
            urlencoding::encode(&self.player_id)
        )
    }

    pub fn collect_url(&self) -> String {
        format!("{}/api/mining/collect", self.api_base)
    }

    /// Fetch the current player record.
    pub async fn fetch_player(&self) -> Result<PlayerView, ApiError> {
        let url = self.user_url();
        debug!("GET {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;

        let player = match response.json::<UserEnvelope>().await? {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        };
        Ok(player)
    }

    /// Submit a collection estimate; the server decides what is credited.
    pub async fn collect(&self, system: u32, amount: f64) -> Result<CollectResponse, ApiError> {
        let url = self.collect_url();
        let body = self.collect_request(system, amount);
        debug!("POST {} system={} amount={:.5}", url, system, amount);

        let response = self.authorized(self.client.post(&url)).json(&body).send().await?;
        let response = check_status(response).await?;

        let result: CollectResponse = response.json().await?;
        if !result.success {
            return Err(ApiError::Rejected(
                result.message.unwrap_or_else(|| "no reason given".to_string()),
            ));
        }

        info!(
            "Collected {:.5} in system {} (balance: {})",
            result.collected,
            system,
            result
                .balance
                .map(|b| format!("{:.5}", b))
                .unwrap_or_else(|| "?".to_string())
        );
        Ok(result)
    }

    pub fn collect_request(&self, system: u32, amount: f64) -> CollectRequest {
        CollectRequest {
            user_id: self.player_id.clone(),
            system,
            amount,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}
