//! User-facing copy.

use crate::model::{CartView, CheckoutDetails, Product, ValidationError};

pub const WELCOME: &str = "Welcome to the Apple Store\n\
    A premium catalog of Apple devices. Pick a section below.\n\n\
    • Catalog with current models\n\
    • Cart and quick checkout";

pub const HELP: &str = "Help:\n\
    • Open the Catalog and pick a product.\n\
    • Add it to your cart.\n\
    • Check out from the Cart.";

pub const MAIN_MENU: &str = "Main menu:";
pub const CHOOSE_CATEGORY: &str = "Choose a category:";
pub const UNKNOWN_COMMAND: &str = "Command not found. Use /start.";

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const CATEGORY_NOT_FOUND: &str = "Category not found";
pub const ADDED_TO_CART: &str = "Added to cart 🖤";
pub const EMPTY_CART: &str = "Your cart is empty. Open the catalog and add some products.";
pub const CART_IS_EMPTY_ALERT: &str = "Your cart is empty";
pub const STEP_NOT_ACTIVE: &str = "This step is no longer active";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

pub const ASK_NAME: &str = "Enter your first and last name:";
pub const ASK_PHONE: &str = "Enter your phone number (for example, +79991234567):";
pub const ASK_DELIVERY: &str = "Choose a delivery method:";
pub const ASK_ADDRESS: &str = "Enter the delivery address (street, building, apartment):";
pub const CHECKOUT_CANCELLED: &str = "Checkout cancelled.";
pub const CHECKOUT_EXPIRED: &str = "Checkout details are incomplete. Please start checkout again.";

pub fn category_header(title: &str) -> String {
    format!("{}:", title.to_uppercase())
}

pub fn product_detail(product: &Product) -> String {
    format!(
        "{}\nPrice: {}\n\n{}",
        product.name, product.price, product.description
    )
}

pub fn cart(view: &CartView) -> String {
    let mut text = String::from("🛒 Cart\n");
    for line in &view.lines {
        text.push_str(&format!(
            "{} × {} — {}\n",
            line.name, line.quantity, line.line_total
        ));
    }
    text.push_str(&format!("\nTotal: {}", view.total));
    text
}

pub fn confirm(details: &CheckoutDetails, view: &CartView) -> String {
    format!(
        "Please review your order:\n\n\
         Name: {}\nPhone: {}\nDelivery: {}\nAddress: {}\n\n\
         Total: {}\n\n\
         Press Confirm to place the order.",
        details.name, details.phone, details.delivery, details.address, view.total
    )
}

/// Re-prompt after rejected input.
pub fn invalid_input(error: &ValidationError) -> &'static str {
    match error {
        ValidationError::EmptyName => "Please enter a non-empty name:",
        ValidationError::InvalidPhone => "Enter a valid phone number, for example +7XXXXXXXXXX",
        ValidationError::AddressTooShort => "Please enter the full address",
        ValidationError::UnknownDelivery(_) => "Choose one of the available delivery methods",
    }
}

pub fn operator_notification(summary: &str) -> String {
    format!("New order:\n{summary}")
}
