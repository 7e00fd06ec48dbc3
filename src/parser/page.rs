use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::patterns::{extract_emails, extract_phone_numbers, find_links, ANCHOR_SEL};
use crate::models::{BrandResponse, Faq, Product, ABOUT_NOT_FOUND};

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static ABOUT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section#about").unwrap());

const SOCIAL_NETWORKS: &[&str] = &["instagram", "facebook", "twitter", "tiktok"];
const HERO_FALLBACK_TITLE: &str = "Hero Product";

const PRIVACY_KEYWORDS: &[&str] = &["privacy"];
const REFUND_KEYWORDS: &[&str] = &["refund", "return"];
const FAQ_KEYWORDS: &[&str] = &["faq", "help"];
const CONTACT_KEYWORDS: &[&str] = &["contact"];

/// Map a storefront's root page to a response. `products` is left empty
/// (the feed fills it) and `competitors` starts as an empty list.
pub fn extract_page(base_url: &str, html: &str) -> BrandResponse {
    let document = Html::parse_document(html);
    let text: String = document.root_element().text().collect();
    let links = anchor_links(&document);

    let privacy_links = find_links(&document, PRIVACY_KEYWORDS);
    let refund_links = find_links(&document, REFUND_KEYWORDS);
    let faq_links = find_links(&document, FAQ_KEYWORDS);
    let contact_links = find_links(&document, CONTACT_KEYWORDS);

    let privacy_policy = privacy_links.first().cloned().unwrap_or_default();
    let refund_policy = refund_links.first().cloned().unwrap_or_default();

    let important_links: Vec<String> = privacy_links
        .into_iter()
        .chain(refund_links)
        .chain(faq_links)
        .chain(contact_links)
        .collect();

    let social_handles = links
        .iter()
        .filter(|(href, _)| SOCIAL_NETWORKS.iter().any(|s| href.contains(s)))
        .map(|(href, _)| href.clone())
        .collect();

    BrandResponse {
        brand_name: Some(title(&document).unwrap_or_default()),
        about: Some(about(&document).unwrap_or_else(|| ABOUT_NOT_FOUND.to_string())),
        contact_emails: extract_emails(&text),
        phone_numbers: extract_phone_numbers(&text),
        social_handles,
        products: Vec::new(),
        hero_products: hero_products(base_url, &links),
        privacy_policy: Some(privacy_policy),
        refund_policy: Some(refund_policy),
        faqs: faqs(&links),
        important_links,
        competitors: Some(Vec::new()),
    }
}

/// (href, trimmed text) for every anchor with an href, in document order.
fn anchor_links(document: &Html) -> Vec<(String, String)> {
    document
        .select(&ANCHOR_SEL)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            Some((href.to_string(), element_text(&a).trim().to_string()))
        })
        .collect()
}

fn title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SEL)
        .next()
        .map(|el| element_text(&el).trim().to_string())
}

fn about(document: &Html) -> Option<String> {
    let section = document.select(&ABOUT_SEL).next()?;
    Some(
        section
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn hero_products(base_url: &str, links: &[(String, String)]) -> Vec<Product> {
    let base = base_url.trim_end_matches('/');
    links
        .iter()
        .filter(|(href, _)| href.contains("/products/"))
        .map(|(href, text)| Product {
            title: if text.is_empty() {
                HERO_FALLBACK_TITLE.to_string()
            } else {
                text.clone()
            },
            price: None,
            url: Some(format!("{}{}", base, href)),
        })
        .collect()
}

// Any link mentioning "faq" becomes a pseudo question; page contents are not read.
fn faqs(links: &[(String, String)]) -> Vec<Faq> {
    links
        .iter()
        .filter(|(href, _)| href.to_lowercase().contains("faq"))
        .map(|(href, text)| Faq {
            question: text.clone(),
            answer: format!("Available on {}", href),
        })
        .collect()
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect()
}
