//! [`ActorEntity`] implementation for [`Session`].
//!
//! All cart and checkout rules live in the model types; this module sequences them per action
//! and turns the outcome into a [`SessionActionResult`].

use super::actions::{CheckoutPrompt, SessionAction, SessionActionResult};
use super::error::SessionError;
use super::SessionContext;
use crate::model::{CheckoutError, CheckoutState, OrderSummary, Session, UserId};
use async_trait::async_trait;
use keyed_actors::ActorEntity;
use tracing::{debug, info, warn};

#[async_trait]
impl ActorEntity for Session {
    type Id = UserId;
    type Action = SessionAction;
    type ActionResult = SessionActionResult;
    type Context = SessionContext;
    type Error = SessionError;

    /// Sessions start with an empty cart and no checkout in progress.
    fn from_key(id: &UserId) -> Self {
        Session::new(*id)
    }

    async fn handle_action(
        &mut self,
        action: SessionAction,
        ctx: &SessionContext,
    ) -> Result<SessionActionResult, SessionError> {
        let catalog = &ctx.catalog;
        match action {
            SessionAction::AddToCart(product_id) => {
                let product = catalog
                    .get_product(&product_id)
                    .ok_or_else(|| SessionError::ProductNotFound(product_id.clone()))?;
                let quantity = self.cart.add(&product_id, 1);
                debug!(user = %self.user_id, product = %product_id, quantity, "Added to cart");
                Ok(SessionActionResult::Added {
                    product: product.clone(),
                    quantity,
                })
            }
            SessionAction::Increment(product_id) => {
                if catalog.get_product(&product_id).is_none() {
                    return Err(SessionError::ProductNotFound(product_id));
                }
                self.cart.add(&product_id, 1);
                Ok(SessionActionResult::Cart(self.cart.view(catalog)))
            }
            SessionAction::Decrement(product_id) => {
                self.cart.add(&product_id, -1);
                Ok(SessionActionResult::Cart(self.cart.view(catalog)))
            }
            SessionAction::ClearCart => {
                self.cart.clear();
                Ok(SessionActionResult::Cart(self.cart.view(catalog)))
            }
            SessionAction::ViewCart => Ok(SessionActionResult::Cart(self.cart.view(catalog))),
            SessionAction::StartCheckout => {
                self.checkout.start(self.cart.count())?;
                Ok(SessionActionResult::Checkout(self.prompt(ctx)?))
            }
            SessionAction::CancelCheckout => {
                self.checkout.reset();
                Ok(SessionActionResult::Cancelled {
                    cart_count: self.cart.count(),
                })
            }
            SessionAction::ChooseDelivery(method) => {
                self.checkout.choose_delivery(method)?;
                Ok(SessionActionResult::Checkout(self.prompt(ctx)?))
            }
            SessionAction::SubmitText(text) => {
                self.checkout.submit_text(&text)?;
                if !self.checkout.is_active() {
                    return Ok(SessionActionResult::Idle {
                        cart_count: self.cart.count(),
                    });
                }
                Ok(SessionActionResult::Checkout(self.prompt(ctx)?))
            }
            SessionAction::ConfirmOrder => self.finalize(ctx).map(SessionActionResult::Placed),
        }
    }
}

impl Session {
    /// The prompt for the step the dialogue is currently in.
    fn prompt(&self, ctx: &SessionContext) -> Result<CheckoutPrompt, CheckoutError> {
        match self.checkout.state() {
            CheckoutState::AskName => Ok(CheckoutPrompt::AskName),
            CheckoutState::AskPhone => Ok(CheckoutPrompt::AskPhone),
            CheckoutState::AskDelivery => Ok(CheckoutPrompt::AskDelivery),
            CheckoutState::AskAddress => Ok(CheckoutPrompt::AskAddress),
            CheckoutState::Confirm => Ok(CheckoutPrompt::Confirm {
                details: self.checkout.ready()?,
                cart: self.cart.view(&ctx.catalog),
            }),
            CheckoutState::None => Err(CheckoutError::UnexpectedInput(CheckoutState::None)),
        }
    }

    /// Places the order: snapshot, number, then clear cart and dialogue.
    ///
    /// Any failed precondition resets the dialogue so the user can start over; the cart is
    /// kept in that case.
    fn finalize(&mut self, ctx: &SessionContext) -> Result<OrderSummary, SessionError> {
        let details = match self.checkout.ready() {
            Ok(details) => details,
            Err(e) => {
                warn!(
                    user = %self.user_id,
                    state = ?self.checkout.state(),
                    "Confirm without complete checkout"
                );
                self.checkout.reset();
                return Err(e.into());
            }
        };
        let view = self.cart.view(&ctx.catalog);
        if view.lines.is_empty() {
            warn!(user = %self.user_id, "Confirm with empty cart");
            self.checkout.reset();
            return Err(CheckoutError::EmptyCart.into());
        }

        let summary = OrderSummary {
            number: ctx.next_order_number(),
            user_id: self.user_id,
            lines: view.lines,
            total: view.total,
            details,
        };
        self.cart.clear();
        self.checkout.reset();
        info!(
            user = %self.user_id,
            order = %summary.number,
            total = %summary.total,
            "Order placed"
        );
        Ok(summary)
    }
}
