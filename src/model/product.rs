//! Products, categories and prices.
//!
//! Products are immutable values: they are defined once when the
//! [`Catalog`](crate::catalog::Catalog) is built and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::iter::Sum;

/// Type-safe identifier for Products (e.g. `iphone_15_pro`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a catalog category (e.g. `iphone`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryKey(pub String);

impl From<&str> for CategoryKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Integer amount in the smallest unit the shop charges in (whole rubles).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(pub u64);

impl Price {
    /// Price of `quantity` units.
    pub fn times(self, quantity: u32) -> Price {
        Price(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        Price(iter.fold(0u64, |acc, p| acc.saturating_add(p.0)))
    }
}

/// Renders with a space as thousands separator: `119990` → `119 990 ₽`.
impl Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        write!(f, "{grouped} ₽")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category: CategoryKey,
    pub name: String,
    pub price: Price,
    pub description: String,
}

impl Product {
    pub fn new(
        id: &str,
        category: &str,
        name: impl Into<String>,
        price: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::from(id),
            category: CategoryKey::from(category),
            name: name.into(),
            price: Price(price),
            description: description.into(),
        }
    }
}

/// A catalog section shown as one button in the category menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: CategoryKey,
    pub title: String,
}

impl Category {
    pub fn new(key: &str, title: impl Into<String>) -> Self {
        Self {
            key: CategoryKey::from(key),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formatting_groups_thousands() {
        assert_eq!(Price(0).to_string(), "0 ₽");
        assert_eq!(Price(990).to_string(), "990 ₽");
        assert_eq!(Price(27990).to_string(), "27 990 ₽");
        assert_eq!(Price(119990).to_string(), "119 990 ₽");
        assert_eq!(Price(1234567).to_string(), "1 234 567 ₽");
    }

    #[test]
    fn test_price_arithmetic() {
        assert_eq!(Price(89990).times(2), Price(179980));
        let total: Price = [Price(1), Price(2), Price(3)].into_iter().sum();
        assert_eq!(total, Price(6));
    }
}
