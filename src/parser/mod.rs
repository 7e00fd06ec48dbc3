pub mod page;
pub mod patterns;
pub mod products;

pub use page::extract_page;
pub use products::parse_product_feed;
