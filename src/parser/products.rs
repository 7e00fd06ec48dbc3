use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::Product;

// Entries stay untyped so one odd entry can't reject the whole feed.
#[derive(Deserialize)]
struct ProductFeed {
    #[serde(default)]
    products: Vec<Value>,
}

/// Parse a `/products.json` body into products linked under `base_url`.
///
/// A body that isn't a product feed is an error. Entries without a title,
/// a first variant or a handle are skipped with a warning.
pub fn parse_product_feed(base_url: &str, body: &str) -> Result<Vec<Product>> {
    let feed: ProductFeed = serde_json::from_str(body).context("Malformed product feed")?;

    let products = feed
        .products
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let product = to_product(base_url, entry);
            if product.is_none() {
                warn!(
                    "Skipping product feed entry {} on {}: missing or invalid title, variants or handle",
                    i, base_url
                );
            }
            product
        })
        .collect();

    Ok(products)
}

fn to_product(base_url: &str, entry: Value) -> Option<Product> {
    let title = entry.get("title")?.as_str()?;
    let handle = entry.get("handle")?.as_str()?;
    let variant = entry.get("variants")?.as_array()?.first()?.as_object()?;

    Some(Product {
        title: title.to_string(),
        price: variant.get("price").and_then(price_text),
        url: Some(format!("{}/products/{}", base_url, handle)),
    })
}

fn price_text(price: &Value) -> Option<String> {
    match price {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry() {
        let body = r#"{"products":[{"title":"Shirt","variants":[{"price":"19.99"}],"handle":"shirt"}]}"#;
        let products = parse_product_feed("https://shop.com", body).unwrap();
        assert_eq!(
            products,
            vec![Product {
                title: "Shirt".into(),
                price: Some("19.99".into()),
                url: Some("https://shop.com/products/shirt".into()),
            }]
        );
    }

    #[test]
    fn numeric_price_is_stringified() {
        let body = r#"{"products":[{"title":"Mug","variants":[{"price":12.5},{"price":"99"}],"handle":"mug"}]}"#;
        let products = parse_product_feed("https://shop.com", body).unwrap();
        assert_eq!(products[0].price.as_deref(), Some("12.5"));
    }

    #[test]
    fn missing_products_key_is_empty() {
        assert!(parse_product_feed("https://shop.com", "{}").unwrap().is_empty());
    }

    #[test]
    fn html_body_is_an_error() {
        assert!(parse_product_feed("https://shop.com", "<html>404</html>").is_err());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let body = r#"{"products":[
            {"title":"No handle","variants":[{"price":"1.00"}]},
            {"title":"No variants","handle":"nv"},
            {"title":"Empty variants","variants":[],"handle":"ev"},
            {"title":"Hat","variants":[{"price":"5.00"}],"handle":"hat"}
        ]}"#;
        let products = parse_product_feed("https://shop.com", body).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Hat");
        assert_eq!(products[0].url.as_deref(), Some("https://shop.com/products/hat"));
    }

    #[test]
    fn wrong_typed_entries_are_skipped() {
        let body = r#"{"products":[
            {"title":"Odd","variants":[{"price":"1"}],"handle":42},
            {"title":"Null variant","variants":[null],"handle":"nv"},
            {"title":7,"variants":[{"price":"1"}],"handle":"seven"},
            {"title":"Flat","variants":"1.00","handle":"flat"},
            "not an object",
            {"title":"Hat","variants":[{"price":"5.00"}],"handle":"hat"}
        ]}"#;
        let products = parse_product_feed("https://shop.com", body).unwrap();
        assert_eq!(
            products,
            vec![Product {
                title: "Hat".into(),
                price: Some("5.00".into()),
                url: Some("https://shop.com/products/hat".into()),
            }]
        );
    }

    #[test]
    fn variant_without_price_has_no_price() {
        let body = r#"{"products":[{"title":"Gift card","variants":[{}],"handle":"gift"}]}"#;
        let products = parse_product_feed("https://shop.com", body).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, None);
    }

    #[test]
    fn feed_order_is_kept() {
        let body = r#"{"products":[
            {"title":"B","variants":[{"price":"2"}],"handle":"b"},
            {"title":"A","variants":[{"price":"1"}],"handle":"a"}
        ]}"#;
        let titles: Vec<_> = parse_product_feed("https://shop.com", body)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }
}
