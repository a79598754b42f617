//! Per-user shopping cart.
//!
//! A cart only stores product ids and quantities. Prices, names and totals are derived from the
//! [`Catalog`] every time they are needed, so they can never go stale.

use crate::catalog::Catalog;
use crate::model::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};

/// Mapping product id → positive quantity, in the order products were first added.
///
/// Invariant: no entry ever holds a quantity of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<(ProductId, u32)>,
}

/// One priced line derived from the cart and the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Derived snapshot of a cart used for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<LineItem>,
    pub total: Price,
    pub count: u32,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjusts the quantity of `product_id` by `delta` and returns the new quantity.
    ///
    /// The result is clamped at zero and a zero quantity removes the entry.
    pub fn add(&mut self, product_id: &ProductId, delta: i64) -> u32 {
        let position = self.entries.iter().position(|(id, _)| id == product_id);
        let current = position
            .and_then(|i| self.entries.get(i))
            .map_or(0, |(_, qty)| *qty);
        let updated = (i64::from(current) + delta).clamp(0, i64::from(u32::MAX)) as u32;

        match (position, updated) {
            (Some(i), 0) => {
                self.entries.remove(i);
            }
            (Some(i), qty) => {
                if let Some(entry) = self.entries.get_mut(i) {
                    entry.1 = qty;
                }
            }
            (None, 0) => {}
            (None, qty) => self.entries.push((product_id.clone(), qty)),
        }
        updated
    }

    pub fn quantity(&self, product_id: &ProductId) -> u32 {
        self.entries
            .iter()
            .find(|(id, _)| id == product_id)
            .map_or(0, |(_, qty)| *qty)
    }

    /// Total number of units across all products.
    pub fn count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, (_, qty)| acc.saturating_add(*qty))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Products with their quantities. Ids no longer present in the catalog are skipped.
    pub fn line_items<'a>(&self, catalog: &'a Catalog) -> Vec<(&'a Product, u32)> {
        self.entries
            .iter()
            .filter_map(|(id, qty)| catalog.get_product(id).map(|product| (product, *qty)))
            .collect()
    }

    /// Σ price × quantity over the lines the catalog can still resolve.
    pub fn total(&self, catalog: &Catalog) -> Price {
        self.line_items(catalog)
            .into_iter()
            .map(|(product, qty)| product.price.times(qty))
            .sum()
    }

    pub fn view(&self, catalog: &Catalog) -> CartView {
        let lines: Vec<LineItem> = self
            .line_items(catalog)
            .into_iter()
            .map(|(product, quantity)| LineItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                line_total: product.price.times(quantity),
            })
            .collect();
        let total = lines.iter().map(|line| line.line_total).sum();
        CartView {
            lines,
            total,
            count: self.count(),
        }
    }
}
