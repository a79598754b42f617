//! Inline keyboards for every screen.

use super::action::ButtonAction;
use crate::catalog::{Catalog, PRODUCT_LIST_LIMIT};
use crate::model::{CartView, CategoryKey, DeliveryMethod, Product};
use crate::presenter::{Button, Keyboard};

fn button(label: impl Into<String>, action: ButtonAction) -> Button {
    Button::new(label, action)
}

pub fn main_menu(cart_count: u32) -> Keyboard {
    let cart_label = if cart_count > 0 {
        format!("🛒 Cart ({cart_count})")
    } else {
        "🛒 Cart".to_string()
    };
    Keyboard::new()
        .row(vec![button("✨ Catalog", ButtonAction::MenuCatalog)])
        .row(vec![button(cart_label, ButtonAction::CartView)])
        .row(vec![button("❔ Help", ButtonAction::MenuHelp)])
}

pub fn categories(catalog: &Catalog) -> Keyboard {
    catalog
        .list_categories()
        .iter()
        .fold(Keyboard::new(), |keyboard, category| {
            keyboard.row(vec![button(
                format!("◽️ {}", category.title),
                ButtonAction::Category(category.key.clone()),
            )])
        })
        .row(vec![button("⬅️ Back", ButtonAction::BackRoot)])
}

pub fn product_list(catalog: &Catalog, category: &CategoryKey) -> Keyboard {
    catalog
        .list_products(category)
        .into_iter()
        .take(PRODUCT_LIST_LIMIT)
        .fold(Keyboard::new(), |keyboard, product| {
            keyboard.row(vec![button(
                format!("{} — {}", product.name, product.price),
                ButtonAction::Product(product.id.clone()),
            )])
        })
        .row(vec![
            button("⬅️ To categories", ButtonAction::MenuCatalog),
            button("🛒 Cart", ButtonAction::CartView),
        ])
}

pub fn product_detail(product: &Product) -> Keyboard {
    Keyboard::new()
        .row(vec![button(
            "🖤 Add to cart",
            ButtonAction::CartAdd(product.id.clone()),
        )])
        .row(vec![
            button("⬅️ Back to list", ButtonAction::Category(product.category.clone())),
            button("🛒 Cart", ButtonAction::CartView),
        ])
}

/// One `− | name × qty | +` row per line, then checkout and housekeeping.
pub fn cart(view: &CartView) -> Keyboard {
    let mut keyboard = view.lines.iter().fold(Keyboard::new(), |keyboard, line| {
        keyboard.row(vec![
            button("➖", ButtonAction::CartDec(line.product_id.clone())),
            button(
                format!("{} × {}", line.name, line.quantity),
                ButtonAction::Product(line.product_id.clone()),
            ),
            button("➕", ButtonAction::CartInc(line.product_id.clone())),
        ])
    });
    if view.count > 0 {
        keyboard = keyboard.row(vec![button("💳 Checkout", ButtonAction::Checkout)]);
    }
    keyboard.row(vec![
        button("🧹 Clear", ButtonAction::CartClear),
        button("⬅️ Back", ButtonAction::BackRoot),
    ])
}

pub fn delivery() -> Keyboard {
    Keyboard::new()
        .row(vec![
            button(
                "🏬 Pickup",
                ButtonAction::CheckoutDelivery(DeliveryMethod::Pickup),
            ),
            button(
                "🚚 Courier",
                ButtonAction::CheckoutDelivery(DeliveryMethod::Courier),
            ),
        ])
        .row(vec![button("⬅️ Cancel", ButtonAction::CheckoutCancel)])
}

pub fn confirm() -> Keyboard {
    Keyboard::new().row(vec![
        button("✅ Confirm", ButtonAction::CheckoutConfirm),
        button("❌ Cancel", ButtonAction::CheckoutCancel),
    ])
}
