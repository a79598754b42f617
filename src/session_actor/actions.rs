//! Custom actions for the Session actor.
//!
//! Every user interaction that reads or mutates a [`Session`](crate::model::Session) is one of
//! these actions, so the shard owning the session applies them strictly in arrival order.

use crate::model::{CartView, CheckoutDetails, DeliveryMethod, OrderSummary, Product, ProductId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Adds one unit of a catalog product.
    AddToCart(ProductId),
    /// `+` on a cart line.
    Increment(ProductId),
    /// `−` on a cart line; removes the line at zero.
    Decrement(ProductId),
    ClearCart,
    ViewCart,
    /// Enters (or restarts) the checkout dialogue.
    StartCheckout,
    CancelCheckout,
    ChooseDelivery(DeliveryMethod),
    /// Free text typed by the user, interpreted by the current checkout step.
    SubmitText(String),
    /// Finalizes the order from the `Confirm` step.
    ConfirmOrder,
}

/// What the checkout dialogue wants to ask next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPrompt {
    AskName,
    AskPhone,
    AskDelivery,
    AskAddress,
    /// Everything is collected; shown together with the cart for a final review.
    Confirm {
        details: CheckoutDetails,
        cart: CartView,
    },
}

/// Results from [`SessionAction`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionActionResult {
    /// The product and its new quantity in the cart.
    Added { product: Product, quantity: u32 },
    /// Fresh cart snapshot after a cart action.
    Cart(CartView),
    /// The dialogue is waiting for this input.
    Checkout(CheckoutPrompt),
    /// Checkout was cancelled; the cart was left alone.
    Cancelled { cart_count: u32 },
    /// Free text arrived while no checkout was running.
    Idle { cart_count: u32 },
    Placed(OrderSummary),
}
