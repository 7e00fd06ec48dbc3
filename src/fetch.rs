use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::models::{BrandResponse, Product};
use crate::parser;

const USER_AGENT: &str = concat!("brand_insights/", env!("CARGO_PKG_VERSION"));

/// Prepend `https://` unless the URL already carries an http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// HTTP access to a storefront: the product feed and the root page.
#[derive(Clone)]
pub struct StorefrontClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl StorefrontClient {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn build_http_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")
    }

    /// Products from `{base_url}/products.json`. Never fails: any fetch or
    /// parse error yields an empty list.
    pub async fn fetch_products(&self, base_url: &str) -> Vec<Product> {
        match self.try_fetch_products(base_url).await {
            Ok(products) => products,
            Err(e) => {
                warn!("No product feed for {}: {:#}", base_url, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_products(&self, base_url: &str) -> Result<Vec<Product>> {
        let body = self.get_text(&format!("{}/products.json", base_url)).await?;
        parser::parse_product_feed(base_url, &body)
    }

    /// Raw HTML of the storefront's root page. Errors propagate.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }

    /// Feed first, then the root page, merged into one response.
    pub async fn scrape(&self, website_url: &str) -> Result<BrandResponse> {
        let url = normalize_url(website_url);

        let products = self.fetch_products(&url).await;
        debug!("{} products in feed for {}", products.len(), url);

        let html = self.fetch_page(&url).await?;
        let mut brand = parser::extract_page(&url, &html);
        brand.products = products;

        info!(
            "Extracted {:?} from {}: {} products, {} hero products, {} emails, {} links",
            brand.brand_name(),
            url,
            brand.products.len(),
            brand.hero_products.len(),
            brand.contact_emails.len(),
            brand.important_links.len(),
        );
        Ok(brand)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}
