use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

/// SerpAPI Google search used to list a brand's competitors.
#[derive(Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl SearchClient {
    pub fn new(client: reqwest::Client, api_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Links of the organic results for `"{brand_name} competitors"`.
    /// Transport, HTTP and API errors all propagate.
    pub async fn fetch_competitors(&self, brand_name: &str) -> Result<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .context("SERPAPI_API_KEY is not set")?;
        let query = format!("{} competitors", brand_name);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("engine", "google"), ("q", query.as_str()), ("api_key", api_key)])
            .send()
            .await
            .context("Competitor search request failed")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to decode competitor search response")?;

        if let Some(message) = body.get("error").and_then(Value::as_str) {
            anyhow::bail!("Competitor search failed ({}): {}", status, message);
        }
        if !status.is_success() {
            anyhow::bail!("Competitor search failed: HTTP {}", status);
        }

        let links = competitor_links(&body);
        info!("Found {} competitor links for {:?}", links.len(), brand_name);
        Ok(links)
    }
}

/// `link` of every `organic_results` entry, in order. Entries without one are skipped.
pub fn competitor_links(results: &Value) -> Vec<String> {
    results
        .get("organic_results")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("link").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
