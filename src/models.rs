use serde::{Deserialize, Serialize};

/// Fallback `about` text when the page has no `section#about`.
pub const ABOUT_NOT_FOUND: &str = "About section not found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub price: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Everything extracted for one storefront.
///
/// List fields are always present (possibly empty). `competitors` is `None`
/// until the search lookup has run, so "never fetched" and "fetched, nothing
/// found" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandResponse {
    pub brand_name: Option<String>,
    pub about: Option<String>,
    #[serde(default)]
    pub contact_emails: Vec<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub social_handles: Vec<String>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub hero_products: Vec<Product>,
    pub privacy_policy: Option<String>,
    pub refund_policy: Option<String>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub important_links: Vec<String>,
    pub competitors: Option<Vec<String>>,
}

impl BrandResponse {
    /// True when the page and feed yielded something that looks like a store.
    pub fn has_storefront_data(&self) -> bool {
        let about_found = self
            .about
            .as_deref()
            .is_some_and(|a| !a.is_empty() && a != ABOUT_NOT_FOUND);

        self.brand_name.as_deref().is_some_and(|n| !n.is_empty())
            || about_found
            || !self.products.is_empty()
            || !self.hero_products.is_empty()
            || !self.contact_emails.is_empty()
            || !self.phone_numbers.is_empty()
            || !self.social_handles.is_empty()
            || !self.important_links.is_empty()
            || !self.faqs.is_empty()
    }

    pub fn brand_name(&self) -> &str {
        self.brand_name.as_deref().unwrap_or("")
    }
}
