use anyhow::Result;
use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::info;

use crate::competitors::SearchClient;
use crate::config::Config;
use crate::db::{self, StoredBrand};
use crate::error::InsightsError;
use crate::fetch::StorefrontClient;
use crate::models::BrandResponse;

/// Everything one request needs: storefront access, competitor search, storage.
pub struct Insights {
    storefront: StorefrontClient,
    search: SearchClient,
    conn: Mutex<Connection>,
}

impl Insights {
    pub fn new(config: &Config, conn: Connection) -> Result<Self> {
        db::init_schema(&conn)?;
        let http = StorefrontClient::build_http_client()?;
        Ok(Self {
            storefront: StorefrontClient::new(http.clone(), config.fetch_timeout),
            search: SearchClient::new(
                http,
                config.serpapi_url.clone(),
                config.serpapi_api_key.clone(),
            ),
            conn: Mutex::new(conn),
        })
    }

    /// Scrape, look up competitors, persist. A page without any storefront
    /// data is `NotAStorefront`; every other failure is `Internal`.
    pub async fn fetch_brand_insights(
        &self,
        website_url: &str,
    ) -> Result<BrandResponse, InsightsError> {
        let mut brand = self.storefront.scrape(website_url).await?;
        if !brand.has_storefront_data() {
            info!("No storefront data on {}", website_url);
            return Err(InsightsError::NotAStorefront);
        }

        let competitors = self.search.fetch_competitors(brand.brand_name()).await?;
        brand.competitors = Some(competitors);

        let id = {
            let conn = self.conn.lock().await;
            db::save_brand(&conn, &brand)?
        };
        info!("Saved {:?} as brand {}", brand.brand_name(), id);

        Ok(brand)
    }

    pub async fn stored_brand(&self, id: i64) -> Result<StoredBrand, InsightsError> {
        let conn = self.conn.lock().await;
        db::fetch_brand(&conn, id)?.ok_or(InsightsError::BrandNotFound(id))
    }
}
