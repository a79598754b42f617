//! # Event Router
//!
//! Turns inbound events into session actions and the session's typed outcome into replies.
//!
//! ```text
//! InboundEvent ──parse──▶ SessionAction ──SessionClient──▶ shard owning the user
//!                                                            │
//!      Presenter ◀──Reply── render ◀── SessionActionResult ◀─┘
//! ```
//!
//! Screens that only read the catalog (category list, product pages) never touch a session.
//! Every handler is total: bad tokens, unknown products and stale buttons end in a notice or a
//! fallback menu, never in an error escaping the router.

pub mod action;
pub mod event;
pub mod keyboards;
pub mod texts;

pub use action::*;
pub use event::*;

use crate::catalog::Catalog;
use crate::clients::SessionClient;
use crate::model::{CartView, CheckoutError, UserId};
use crate::notifier::OrderNotifier;
use crate::presenter::{Presenter, Reply};
use crate::session_actor::{CheckoutPrompt, SessionAction, SessionActionResult, SessionError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Longest a single presenter call may take before the reply is given up on.
pub const PRESENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Dispatches inbound events. Cheap to clone; clones share the same sessions and presenter.
#[derive(Clone)]
pub struct EventRouter {
    sessions: SessionClient,
    catalog: Arc<Catalog>,
    presenter: Arc<dyn Presenter>,
    notifier: Option<OrderNotifier>,
    present_timeout: Duration,
}

impl EventRouter {
    /// `notifier` is `None` when no operator chat is configured.
    pub fn new(
        sessions: SessionClient,
        catalog: Arc<Catalog>,
        presenter: Arc<dyn Presenter>,
        notifier: Option<OrderNotifier>,
    ) -> Self {
        Self {
            sessions,
            catalog,
            presenter,
            notifier,
            present_timeout: PRESENT_TIMEOUT,
        }
    }

    /// Overrides [`PRESENT_TIMEOUT`].
    pub fn with_present_timeout(mut self, timeout: Duration) -> Self {
        self.present_timeout = timeout;
        self
    }

    /// Handles the event and hands every reply to the presenter.
    ///
    /// Presenter failures and timeouts are logged and otherwise ignored.
    pub async fn dispatch(&self, event: &InboundEvent) {
        for reply in self.handle(event).await {
            let presented =
                tokio::time::timeout(self.present_timeout, self.presenter.present(&reply)).await;
            match presented {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(user = %reply.target(), error = %e, "Failed to present reply");
                }
                Err(_) => {
                    warn!(
                        user = %reply.target(),
                        timeout_ms = self.present_timeout.as_millis() as u64,
                        "Presenter timed out, reply dropped"
                    );
                }
            }
        }
    }

    /// Computes the replies for one event without presenting them.
    #[instrument(skip(self, event), fields(user = %event.user_id, kind = ?event.kind))]
    pub async fn handle(&self, event: &InboundEvent) -> Vec<Reply> {
        let user = event.user_id;
        match event.kind {
            EventKind::Command => self.on_command(user, event.command_name()).await,
            EventKind::Button => match event.payload.parse::<ButtonAction>() {
                Ok(action) => self.on_button(user, action).await,
                Err(e) => {
                    debug!(error = %e, "Ignoring button");
                    Vec::new()
                }
            },
            EventKind::Text => self.on_text(user, &event.payload).await,
        }
    }

    async fn on_command(&self, user: UserId, command: &str) -> Vec<Reply> {
        let text = match command {
            "start" => texts::WELCOME,
            "help" => texts::HELP,
            other => {
                debug!(command = other, "Unknown command");
                texts::UNKNOWN_COMMAND
            }
        };
        self.with_cart_count(user, |count| {
            vec![Reply::send(user, text, Some(keyboards::main_menu(count)))]
        })
        .await
    }

    async fn on_button(&self, user: UserId, action: ButtonAction) -> Vec<Reply> {
        match action {
            ButtonAction::MenuCatalog => vec![Reply::edit(
                user,
                texts::CHOOSE_CATEGORY,
                Some(keyboards::categories(&self.catalog)),
            )],
            ButtonAction::MenuHelp => {
                self.with_cart_count(user, |count| {
                    vec![Reply::edit(user, texts::HELP, Some(keyboards::main_menu(count)))]
                })
                .await
            }
            ButtonAction::BackRoot => {
                self.with_cart_count(user, |count| {
                    vec![Reply::edit(
                        user,
                        texts::MAIN_MENU,
                        Some(keyboards::main_menu(count)),
                    )]
                })
                .await
            }
            ButtonAction::Category(key) => match self.catalog.category(&key) {
                Some(category) => vec![Reply::edit(
                    user,
                    texts::category_header(&category.title),
                    Some(keyboards::product_list(&self.catalog, &key)),
                )],
                None => vec![Reply::alert(user, texts::CATEGORY_NOT_FOUND)],
            },
            ButtonAction::Product(id) => match self.catalog.get_product(&id) {
                Some(product) => vec![Reply::edit(
                    user,
                    texts::product_detail(product),
                    Some(keyboards::product_detail(product)),
                )],
                None => vec![Reply::alert(user, texts::PRODUCT_NOT_FOUND)],
            },
            ButtonAction::CartAdd(id) => {
                match self.perform(user, SessionAction::AddToCart(id)).await {
                    Ok(SessionActionResult::Added { product, .. }) => vec![
                        Reply::notice(user, texts::ADDED_TO_CART),
                        Reply::edit(
                            user,
                            texts::product_detail(&product),
                            Some(keyboards::product_detail(&product)),
                        ),
                    ],
                    other => self.render(user, other),
                }
            }
            ButtonAction::CartView => self.cart_action(user, SessionAction::ViewCart).await,
            ButtonAction::CartInc(id) => self.cart_action(user, SessionAction::Increment(id)).await,
            ButtonAction::CartDec(id) => self.cart_action(user, SessionAction::Decrement(id)).await,
            ButtonAction::CartClear => self.cart_action(user, SessionAction::ClearCart).await,
            ButtonAction::Checkout => {
                let result = self.perform(user, SessionAction::StartCheckout).await;
                self.render(user, result)
            }
            ButtonAction::CheckoutCancel => {
                let result = self.perform(user, SessionAction::CancelCheckout).await;
                self.render(user, result)
            }
            ButtonAction::CheckoutDelivery(method) => {
                let result = self
                    .perform(user, SessionAction::ChooseDelivery(method))
                    .await;
                self.render(user, result)
            }
            ButtonAction::CheckoutConfirm => self.on_confirm(user).await,
            ButtonAction::Noop => Vec::new(),
        }
    }

    async fn on_text(&self, user: UserId, text: &str) -> Vec<Reply> {
        match self
            .perform(user, SessionAction::SubmitText(text.to_string()))
            .await
        {
            // typed answers get a fresh message rather than editing an old one
            Ok(SessionActionResult::Checkout(prompt)) => vec![prompt_reply(user, prompt, false)],
            Err(SessionError::Checkout(CheckoutError::Invalid(e))) => {
                vec![Reply::send(user, texts::invalid_input(&e), None)]
            }
            other => self.render(user, other),
        }
    }

    async fn on_confirm(&self, user: UserId) -> Vec<Reply> {
        match self.perform(user, SessionAction::ConfirmOrder).await {
            Ok(SessionActionResult::Placed(summary)) => {
                let text = summary.to_string();
                if let Some(notifier) = &self.notifier {
                    notifier.notify(texts::operator_notification(&text));
                }
                vec![Reply::edit(user, text, Some(keyboards::main_menu(0)))]
            }
            Err(SessionError::Checkout(
                e @ (CheckoutError::Incomplete | CheckoutError::EmptyCart),
            )) => {
                debug!(error = %e, "Confirm refused, checkout reset");
                self.with_cart_count(user, |count| {
                    vec![
                        Reply::alert(user, texts::CHECKOUT_EXPIRED),
                        Reply::edit(
                            user,
                            texts::CHECKOUT_EXPIRED,
                            Some(keyboards::main_menu(count)),
                        ),
                    ]
                })
                .await
            }
            other => self.render(user, other),
        }
    }

    async fn cart_action(&self, user: UserId, action: SessionAction) -> Vec<Reply> {
        let result = self.perform(user, action).await;
        self.render(user, result)
    }

    async fn perform(
        &self,
        user: UserId,
        action: SessionAction,
    ) -> Result<SessionActionResult, SessionError> {
        self.sessions.perform(user, action).await
    }

    /// Runs `build` with the user's current cart count, creating the session if needed.
    async fn with_cart_count(
        &self,
        user: UserId,
        build: impl FnOnce(u32) -> Vec<Reply>,
    ) -> Vec<Reply> {
        match self.perform(user, SessionAction::ViewCart).await {
            Ok(SessionActionResult::Cart(view)) => build(view.count),
            other => self.render(user, other),
        }
    }

    /// Default rendering of a session outcome, used by button handlers.
    fn render(
        &self,
        user: UserId,
        result: Result<SessionActionResult, SessionError>,
    ) -> Vec<Reply> {
        match result {
            Ok(SessionActionResult::Cart(view)) => vec![cart_screen(user, &view)],
            Ok(SessionActionResult::Checkout(prompt)) => vec![prompt_reply(user, prompt, true)],
            Ok(SessionActionResult::Cancelled { cart_count }) => vec![Reply::edit(
                user,
                texts::CHECKOUT_CANCELLED,
                Some(keyboards::main_menu(cart_count)),
            )],
            Ok(SessionActionResult::Idle { cart_count }) => vec![Reply::send(
                user,
                texts::MAIN_MENU,
                Some(keyboards::main_menu(cart_count)),
            )],
            Ok(other @ (SessionActionResult::Added { .. } | SessionActionResult::Placed(_))) => {
                error!(%user, result = ?other, "Unexpected session result");
                vec![Reply::alert(user, texts::SOMETHING_WENT_WRONG)]
            }
            Err(e) => failure(user, e),
        }
    }
}

fn cart_screen(user: UserId, view: &CartView) -> Reply {
    if view.lines.is_empty() {
        return Reply::edit(user, texts::EMPTY_CART, Some(keyboards::main_menu(view.count)));
    }
    Reply::edit(user, texts::cart(view), Some(keyboards::cart(view)))
}

/// The question for a checkout step. Button presses edit the screen, typed answers get a new
/// message.
fn prompt_reply(user: UserId, prompt: CheckoutPrompt, edit: bool) -> Reply {
    let (text, keyboard) = match prompt {
        CheckoutPrompt::AskName => (texts::ASK_NAME.to_string(), None),
        CheckoutPrompt::AskPhone => (texts::ASK_PHONE.to_string(), None),
        CheckoutPrompt::AskDelivery => {
            (texts::ASK_DELIVERY.to_string(), Some(keyboards::delivery()))
        }
        CheckoutPrompt::AskAddress => (texts::ASK_ADDRESS.to_string(), None),
        CheckoutPrompt::Confirm { details, cart } => {
            (texts::confirm(&details, &cart), Some(keyboards::confirm()))
        }
    };
    if edit {
        Reply::edit(user, text, keyboard)
    } else {
        Reply::send(user, text, keyboard)
    }
}

fn failure(user: UserId, error: SessionError) -> Vec<Reply> {
    match error {
        SessionError::ProductNotFound(id) => {
            debug!(%user, product = %id, "Product not found");
            vec![Reply::alert(user, texts::PRODUCT_NOT_FOUND)]
        }
        SessionError::Checkout(CheckoutError::EmptyCart) => {
            vec![Reply::alert(user, texts::CART_IS_EMPTY_ALERT)]
        }
        SessionError::Checkout(CheckoutError::Invalid(e)) => {
            vec![Reply::alert(user, texts::invalid_input(&e))]
        }
        SessionError::Checkout(CheckoutError::UnexpectedInput(state)) => {
            debug!(%user, ?state, "Stale checkout button");
            vec![Reply::alert(user, texts::STEP_NOT_ACTIVE)]
        }
        SessionError::Checkout(CheckoutError::Incomplete) => {
            vec![Reply::alert(user, texts::CHECKOUT_EXPIRED)]
        }
        SessionError::ActorCommunicationError(e) => {
            error!(%user, error = %e, "Session store unavailable");
            vec![Reply::alert(user, texts::SOMETHING_WENT_WRONG)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cart, ProductId, Session};
    use crate::presenter::{PresenterError, SendMode};
    use async_trait::async_trait;
    use keyed_actors::mock::MockClient;
    use keyed_actors::FrameworkError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPresenter {
        replies: Mutex<Vec<Reply>>,
    }

    #[async_trait]
    impl Presenter for RecordingPresenter {
        async fn present(&self, reply: &Reply) -> Result<(), PresenterError> {
            self.replies.lock().unwrap().push(reply.clone());
            Ok(())
        }
    }

    fn router(mock: &MockClient<Session>) -> (EventRouter, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::default());
        let router = EventRouter::new(
            SessionClient::new(mock.client()),
            Arc::new(Catalog::default()),
            presenter.clone(),
            None,
        );
        (router, presenter)
    }

    fn cart_view(count: u32) -> CartView {
        let mut cart = Cart::new();
        if count > 0 {
            cart.add(&ProductId::from("iphone_15"), i64::from(count));
        }
        cart.view(&Catalog::default())
    }

    #[tokio::test]
    async fn test_catalog_screens_do_not_touch_sessions() {
        let mock = MockClient::<Session>::new();
        let (router, _) = router(&mock);
        let user = UserId(1);

        let replies = router.handle(&InboundEvent::button(user, "menu:catalog")).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text(), texts::CHOOSE_CATEGORY);

        let replies = router.handle(&InboundEvent::button(user, "cat:iphone")).await;
        assert_eq!(replies[0].text(), "IPHONE:");

        let replies = router.handle(&InboundEvent::button(user, "product:pixel_9")).await;
        assert_eq!(replies, vec![Reply::alert(user, texts::PRODUCT_NOT_FOUND)]);

        mock.verify();
    }

    #[tokio::test]
    async fn test_unknown_and_noop_tokens_are_ignored() {
        let mock = MockClient::<Session>::new();
        let (router, _) = router(&mock);

        for token in ["noop", "cart:explode", "", "checkout:delivery:drone"] {
            let replies = router.handle(&InboundEvent::button(UserId(1), token)).await;
            assert!(replies.is_empty(), "{token}");
        }
        mock.verify();
    }

    #[tokio::test]
    async fn test_start_shows_cart_count_in_menu() {
        let mut mock = MockClient::<Session>::new();
        mock.expect_action(UserId(7))
            .return_ok(SessionActionResult::Cart(cart_view(2)));
        let (router, presenter) = router(&mock);

        router.dispatch(&InboundEvent::command(UserId(7), "/start")).await;

        let replies = presenter.replies.lock().unwrap().clone();
        assert_eq!(replies.len(), 1);
        let Reply::Message(message) = &replies[0] else {
            panic!("Expected a message");
        };
        assert_eq!(message.mode, SendMode::New);
        assert_eq!(message.text, texts::WELCOME);
        let keyboard = message.keyboard.as_ref().unwrap();
        assert_eq!(keyboard.find("cart:view").unwrap().label, "🛒 Cart (2)");
        mock.verify();
    }

    #[tokio::test]
    async fn test_invalid_phone_reprompts() {
        let mut mock = MockClient::<Session>::new();
        mock.expect_action(UserId(3)).return_err(FrameworkError::EntityError(Box::new(
            SessionError::Checkout(CheckoutError::Invalid(
                crate::model::ValidationError::InvalidPhone,
            )),
        )));
        let (router, _) = router(&mock);

        let replies = router.handle(&InboundEvent::text(UserId(3), "+7999123")).await;
        assert_eq!(
            replies,
            vec![Reply::send(
                UserId(3),
                texts::invalid_input(&crate::model::ValidationError::InvalidPhone),
                None
            )]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_is_an_alert() {
        let mut mock = MockClient::<Session>::new();
        mock.expect_action(UserId(3)).return_err(FrameworkError::EntityError(Box::new(
            SessionError::Checkout(CheckoutError::EmptyCart),
        )));
        let (router, _) = router(&mock);

        let replies = router.handle(&InboundEvent::button(UserId(3), "checkout")).await;
        assert_eq!(replies, vec![Reply::alert(UserId(3), texts::CART_IS_EMPTY_ALERT)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_store_failure_is_contained() {
        let mut mock = MockClient::<Session>::new();
        mock.expect_action(UserId(3))
            .return_err(FrameworkError::ActorClosed);
        let (router, _) = router(&mock);

        let replies = router.handle(&InboundEvent::button(UserId(3), "cart:view")).await;
        assert_eq!(replies, vec![Reply::alert(UserId(3), texts::SOMETHING_WENT_WRONG)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_emptied_cart_falls_back_to_main_menu() {
        let mut mock = MockClient::<Session>::new();
        mock.expect_action(UserId(4))
            .return_ok(SessionActionResult::Cart(cart_view(0)));
        let (router, _) = router(&mock);

        let replies = router
            .handle(&InboundEvent::button(UserId(4), "cart:dec:iphone_15"))
            .await;
        assert_eq!(
            replies,
            vec![Reply::edit(UserId(4), texts::EMPTY_CART, Some(keyboards::main_menu(0)))]
        );
        mock.verify();
    }

    /// Hangs on notices, records everything else.
    #[derive(Default)]
    struct StuckNoticePresenter {
        replies: Mutex<Vec<Reply>>,
    }

    #[async_trait]
    impl Presenter for StuckNoticePresenter {
        async fn present(&self, reply: &Reply) -> Result<(), PresenterError> {
            if matches!(reply, Reply::Notice(_)) {
                std::future::pending::<()>().await;
            }
            self.replies.lock().unwrap().push(reply.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stuck_presenter_does_not_stall_dispatch() {
        let catalog = Catalog::default();
        let product = catalog
            .get_product(&ProductId::from("iphone_15"))
            .unwrap()
            .clone();
        let mut mock = MockClient::<Session>::new();
        mock.expect_action(UserId(6))
            .return_ok(SessionActionResult::Added {
                product,
                quantity: 1,
            });
        let presenter = Arc::new(StuckNoticePresenter::default());
        let router = EventRouter::new(
            SessionClient::new(mock.client()),
            Arc::new(catalog),
            presenter.clone(),
            None,
        )
        .with_present_timeout(Duration::from_millis(50));

        let event = InboundEvent::button(UserId(6), "cart:add:iphone_15");
        tokio::time::timeout(Duration::from_secs(5), router.dispatch(&event))
            .await
            .expect("dispatch should give up on the stuck notice");

        // the product screen after the stuck notice still went out
        let replies = presenter.replies.lock().unwrap().clone();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].text().starts_with("iPhone 15"));
        mock.verify();
    }
}
