use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::models::{BrandResponse, Faq, Product};

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS brands (
            id              INTEGER PRIMARY KEY,
            name            TEXT,
            about           TEXT,
            contact_emails  TEXT NOT NULL,
            phone_numbers   TEXT NOT NULL,
            social_handles  TEXT NOT NULL,
            products        TEXT NOT NULL,
            hero_products   TEXT NOT NULL,
            privacy_policy  TEXT,
            refund_policy   TEXT,
            faqs            TEXT NOT NULL,
            important_links TEXT NOT NULL,
            competitors     TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_brands_name ON brands(name);
        ",
    )?;
    Ok(())
}

// ── Brands ──

/// Flatten a response into one row. Lists are stored as JSON text;
/// `competitors` is NULL only when it was never fetched.
pub fn save_brand(conn: &Connection, brand: &BrandResponse) -> Result<i64> {
    let competitors = brand
        .competitors
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO brands
         (name, about, contact_emails, phone_numbers, social_handles, products,
          hero_products, privacy_policy, refund_policy, faqs, important_links, competitors)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            brand.brand_name,
            brand.about,
            serde_json::to_string(&brand.contact_emails)?,
            serde_json::to_string(&brand.phone_numbers)?,
            serde_json::to_string(&brand.social_handles)?,
            serde_json::to_string(&brand.products)?,
            serde_json::to_string(&brand.hero_products)?,
            brand.privacy_policy,
            brand.refund_policy,
            serde_json::to_string(&brand.faqs)?,
            serde_json::to_string(&brand.important_links)?,
            competitors,
        ],
    )
    .context("Failed to save brand")?;

    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Serialize)]
pub struct StoredBrand {
    pub id: i64,
    pub created_at: String,
    #[serde(flatten)]
    pub brand: BrandResponse,
}

struct BrandRow {
    id: i64,
    name: Option<String>,
    about: Option<String>,
    contact_emails: String,
    phone_numbers: String,
    social_handles: String,
    products: String,
    hero_products: String,
    privacy_policy: Option<String>,
    refund_policy: Option<String>,
    faqs: String,
    important_links: String,
    competitors: Option<String>,
    created_at: String,
}

impl BrandRow {
    fn into_stored(self) -> Result<StoredBrand> {
        let competitors = self
            .competitors
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()?;

        Ok(StoredBrand {
            id: self.id,
            created_at: self.created_at,
            brand: BrandResponse {
                brand_name: self.name,
                about: self.about,
                contact_emails: serde_json::from_str(&self.contact_emails)?,
                phone_numbers: serde_json::from_str(&self.phone_numbers)?,
                social_handles: serde_json::from_str(&self.social_handles)?,
                products: serde_json::from_str::<Vec<Product>>(&self.products)?,
                hero_products: serde_json::from_str::<Vec<Product>>(&self.hero_products)?,
                privacy_policy: self.privacy_policy,
                refund_policy: self.refund_policy,
                faqs: serde_json::from_str::<Vec<Faq>>(&self.faqs)?,
                important_links: serde_json::from_str(&self.important_links)?,
                competitors,
            },
        })
    }
}

pub fn fetch_brand(conn: &Connection, id: i64) -> Result<Option<StoredBrand>> {
    let row = conn
        .query_row(
            "SELECT id, name, about, contact_emails, phone_numbers, social_handles, products,
                    hero_products, privacy_policy, refund_policy, faqs, important_links,
                    competitors, created_at
             FROM brands WHERE id = ?1",
            [id],
            |row| {
                Ok(BrandRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    about: row.get(2)?,
                    contact_emails: row.get(3)?,
                    phone_numbers: row.get(4)?,
                    social_handles: row.get(5)?,
                    products: row.get(6)?,
                    hero_products: row.get(7)?,
                    privacy_policy: row.get(8)?,
                    refund_policy: row.get(9)?,
                    faqs: row.get(10)?,
                    important_links: row.get(11)?,
                    competitors: row.get(12)?,
                    created_at: row.get(13)?,
                })
            },
        )
        .optional()?;

    row.map(|r| {
        let id = r.id;
        r.into_stored()
            .with_context(|| format!("Corrupt brand row {}", id))
    })
    .transpose()
}

// ── Overview ──

pub struct BrandOverview {
    pub id: i64,
    pub name: String,
    pub product_count: usize,
    pub email_count: usize,
    pub competitor_count: Option<usize>,
    pub created_at: String,
}

pub fn fetch_overview(conn: &Connection, limit: usize) -> Result<Vec<BrandOverview>> {
    let mut stmt = conn.prepare(
        "SELECT id, COALESCE(name,''),
                json_array_length(products), json_array_length(contact_emails),
                json_array_length(competitors), created_at
         FROM brands
         ORDER BY id DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(BrandOverview {
                id: row.get(0)?,
                name: row.get(1)?,
                product_count: row.get(2)?,
                email_count: row.get(3)?,
                competitor_count: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub with_products: usize,
    pub with_competitors: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM brands", [], |r| r.get(0))?;
    let with_products: usize = conn.query_row(
        "SELECT COUNT(*) FROM brands WHERE json_array_length(products) > 0",
        [],
        |r| r.get(0),
    )?;
    let with_competitors: usize = conn.query_row(
        "SELECT COUNT(*) FROM brands WHERE json_array_length(competitors) > 0",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        total,
        with_products,
        with_competitors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn sample() -> BrandResponse {
        BrandResponse {
            brand_name: Some("Acme".into()),
            about: Some("Outdoor gear".into()),
            contact_emails: vec!["b@acme.com".into(), "a@acme.com".into(), "b@acme.com".into()],
            phone_numbers: vec!["+1 555 123 4567".into()],
            social_handles: vec!["https://tiktok.com/@acme".into(), "https://instagram.com/acme".into()],
            products: vec![
                Product {
                    title: "Shirt".into(),
                    price: Some("19.99".into()),
                    url: Some("https://acme.com/products/shirt".into()),
                },
                Product {
                    title: "Cap".into(),
                    price: None,
                    url: None,
                },
            ],
            hero_products: vec![Product {
                title: "Hero Product".into(),
                price: None,
                url: Some("https://acme.com/products/x".into()),
            }],
            privacy_policy: Some("/privacy".into()),
            refund_policy: Some(String::new()),
            faqs: vec![
                Faq {
                    question: "Z?".into(),
                    answer: "Available on /faq#z".into(),
                },
                Faq {
                    question: "A?".into(),
                    answer: "Available on /faq#a".into(),
                },
            ],
            important_links: vec!["/privacy".into(), "/faq".into(), "/privacy".into()],
            competitors: Some(vec!["https://rival.com".into(), "https://other.com".into()]),
        }
    }

    #[test]
    fn save_and_reload_preserves_lists() {
        let conn = memory_db();
        let brand = sample();
        let id = save_brand(&conn, &brand).unwrap();
        let stored = fetch_brand(&conn, id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert!(!stored.created_at.is_empty());
        assert_eq!(stored.brand, brand);
    }

    #[test]
    fn competitors_null_vs_empty() {
        let conn = memory_db();
        let never = BrandResponse {
            competitors: None,
            ..sample()
        };
        let empty = BrandResponse {
            competitors: Some(vec![]),
            ..sample()
        };
        let a = save_brand(&conn, &never).unwrap();
        let b = save_brand(&conn, &empty).unwrap();
        assert_eq!(fetch_brand(&conn, a).unwrap().unwrap().brand.competitors, None);
        assert_eq!(fetch_brand(&conn, b).unwrap().unwrap().brand.competitors, Some(vec![]));
    }

    #[test]
    fn missing_brand() {
        assert!(fetch_brand(&memory_db(), 42).unwrap().is_none());
    }

    #[test]
    fn overview_newest_first() {
        let conn = memory_db();
        save_brand(&conn, &sample()).unwrap();
        let second = BrandResponse {
            brand_name: Some("Globex".into()),
            competitors: None,
            ..sample()
        };
        save_brand(&conn, &second).unwrap();

        let rows = fetch_overview(&conn, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Globex");
        assert_eq!(rows[0].competitor_count, None);
        assert_eq!(rows[1].name, "Acme");
        assert_eq!(rows[1].product_count, 2);
        assert_eq!(rows[1].email_count, 3);
        assert_eq!(rows[1].competitor_count, Some(2));

        assert_eq!(fetch_overview(&conn, 1).unwrap().len(), 1);
    }

    #[test]
    fn stats() {
        let conn = memory_db();
        save_brand(&conn, &sample()).unwrap();
        save_brand(
            &conn,
            &BrandResponse {
                products: vec![],
                competitors: Some(vec![]),
                ..sample()
            },
        )
        .unwrap();
        let s = get_stats(&conn).unwrap();
        assert_eq!(s.total, 2);
        assert_eq!(s.with_products, 1);
        assert_eq!(s.with_competitors, 1);
    }
}
