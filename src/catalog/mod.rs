//! # Catalog
//!
//! Static, read-only registry of categories and products. Lookups are pure; a missing id is
//! reported as `None` and handled by callers as a user-facing "not found".
//!
//! The catalog is built once at startup and shared behind an `Arc` by the router and the
//! session actors.

use crate::model::{Category, CategoryKey, Product, ProductId};

/// Upper bound on products listed under one category screen.
pub const PRODUCT_LIST_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from ordered categories and products.
    ///
    /// Product ids are expected to be unique; on duplicates the first entry wins lookups.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// Categories in display order.
    pub fn list_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, key: &CategoryKey) -> Option<&Category> {
        self.categories.iter().find(|c| &c.key == key)
    }

    /// Products of one category, in insertion order.
    pub fn list_products(&self, category: &CategoryKey) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| &p.category == category)
            .collect()
    }

    pub fn get_product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Every product, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    /// The Apple store assortment the bot ships with.
    fn default() -> Self {
        let categories = vec![
            Category::new("iphone", "iPhone"),
            Category::new("ipad", "iPad"),
            Category::new("mac", "Mac"),
            Category::new("watch", "Apple Watch"),
            Category::new("airpods", "AirPods"),
        ];
        let products = vec![
            Product::new(
                "iphone_15_pro",
                "iphone",
                "iPhone 15 Pro 128 GB",
                119_990,
                "Titanium body, A17 Pro chip, USB-C.\n6.1″ Super Retina XDR display with ProMotion.",
            ),
            Product::new(
                "iphone_15",
                "iphone",
                "iPhone 15 128 GB",
                89_990,
                "A16 Bionic chip, USB-C, great camera.\n6.1″ Super Retina XDR display.",
            ),
            Product::new(
                "ipad_air_m2",
                "ipad",
                "iPad Air (M2) 11″ 128 GB",
                79_990,
                "Apple M2 chip, Apple Pencil Pro support.\nLight body, bright display.",
            ),
            Product::new(
                "macbook_air_m2",
                "mac",
                "MacBook Air 13″ (M2) 8/256",
                109_990,
                "Thin and silent, up to 18 hours on battery.\nLiquid Retina display, Magic Keyboard.",
            ),
            Product::new(
                "watch_s9",
                "watch",
                "Apple Watch Series 9 41 mm",
                39_990,
                "Double tap gesture, bright display.\nTracks health, workouts and sleep.",
            ),
            Product::new(
                "airpods_pro_2",
                "airpods",
                "AirPods Pro (2nd generation)",
                27_990,
                "Active noise cancellation, Transparency mode.\nUSB-C charging, personalized sound.",
            ),
        ];
        Self::new(categories, products)
    }
}
