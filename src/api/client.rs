use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, ModelsRequest, ModelsResponse};
use crate::utils::url::construct_api_url;

/// Fetch the model catalog from the aggregation endpoint.
///
/// The endpoint authenticates with the forwarded credential; a non-2xx status
/// is surfaced as a generic error string, the same way transport failures are.
pub async fn fetch_models(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
) -> Result<ModelsResponse, Box<dyn std::error::Error + Send + Sync>> {
    let models_url = construct_api_url(endpoint, "api/models");
    debug!(url = %models_url, "requesting model catalog");

    let response = client
        .post(models_url)
        .header("Content-Type", "application/json")
        .json(&ModelsRequest {
            api_key: api_key.to_string(),
        })
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let models_response = response.json::<ModelsResponse>().await?;
    debug!(count = models_response.models.len(), "model catalog loaded");
    Ok(models_response)
}

/// Send one chat turn to the listed models and collect the per-model replies.
pub async fn send_chat(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    models: Vec<String>,
    messages: Vec<ChatMessage>,
) -> Result<ChatResponse, Box<dyn std::error::Error + Send + Sync>> {
    let chat_url = construct_api_url(endpoint, "api/chat");
    debug!(url = %chat_url, targets = models.len(), "dispatching chat turn");

    let response = client
        .post(chat_url)
        .header("Content-Type", "application/json")
        .json(&ChatRequest {
            api_key: api_key.to_string(),
            models,
            messages,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let chat_response = response.json::<ChatResponse>().await?;
    debug!(replies = chat_response.responses.len(), "chat turn completed");
    Ok(chat_response)
}
