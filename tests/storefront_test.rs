use async_trait::async_trait;
use chat_storefront::catalog::Catalog;
use chat_storefront::lifecycle::{StorefrontSystem, SystemConfig};
use chat_storefront::model::{
    CheckoutState, DeliveryMethod, Price, ProductId, UserId, PICKUP_ADDRESS,
};
use chat_storefront::notifier::{NotifierConfig, OperatorChat, OrderSink, SinkError};
use chat_storefront::presenter::{Presenter, PresenterError, Reply, SendMode};
use chat_storefront::router::{texts, InboundEvent};
use keyed_actors::ActorClient;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

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

/// Records deliveries, or refuses every one when `fail` is set.
#[derive(Default)]
struct RecordingSink {
    fail: bool,
    calls: AtomicU32,
    delivered: Mutex<Vec<String>>,
}

#[async_trait]
impl OrderSink for RecordingSink {
    async fn deliver(&self, _destination: &OperatorChat, text: &str) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SinkError::Delivery("operator chat unreachable".to_string()));
        }
        self.delivered.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn start(sink: Arc<RecordingSink>) -> (StorefrontSystem, Arc<RecordingPresenter>) {
    let presenter = Arc::new(RecordingPresenter::default());
    let config = SystemConfig {
        session_shards: 4,
        notifier: Some(NotifierConfig {
            destination: OperatorChat(1000),
            max_attempts: 3,
            retry_delay: Duration::ZERO,
            queue_capacity: 8,
        }),
    };
    let system = StorefrontSystem::start(config, Catalog::default(), presenter.clone(), sink);
    (system, presenter)
}

async fn press(system: &StorefrontSystem, user: UserId, token: &str) -> Vec<Reply> {
    system.router.handle(&InboundEvent::button(user, token)).await
}

async fn say(system: &StorefrontSystem, user: UserId, text: &str) -> Vec<Reply> {
    system.router.handle(&InboundEvent::text(user, text)).await
}

async fn state_of(system: &StorefrontSystem, user: UserId) -> CheckoutState {
    system
        .sessions
        .get(user)
        .await
        .expect("Failed to get session")
        .expect("Session not found")
        .checkout
        .state()
}

/// Full checkout with courier delivery, through the router and real session shards.
#[tokio::test]
async fn test_courier_checkout_happy_path() {
    let sink = Arc::new(RecordingSink::default());
    let (system, _) = start(sink.clone());
    let user = UserId(101);

    press(&system, user, "cart:add:iphone_15").await;
    let replies = press(&system, user, "cart:add:iphone_15").await;
    assert_eq!(replies[0], Reply::notice(user, texts::ADDED_TO_CART));

    let replies = press(&system, user, "checkout").await;
    assert_eq!(replies[0].text(), texts::ASK_NAME);
    assert_eq!(say(&system, user, "Ivan Petrov").await[0].text(), texts::ASK_PHONE);
    assert_eq!(say(&system, user, "+79991234567").await[0].text(), texts::ASK_DELIVERY);
    assert_eq!(
        press(&system, user, "checkout:delivery:courier").await[0].text(),
        texts::ASK_ADDRESS
    );

    let replies = say(&system, user, "Main St 1").await;
    assert!(replies[0].text().contains("Address: Main St 1"));
    assert_eq!(state_of(&system, user).await, CheckoutState::Confirm);

    let replies = press(&system, user, "checkout:confirm").await;
    assert_eq!(replies.len(), 1);
    let Reply::Message(message) = &replies[0] else {
        panic!("Expected order summary message");
    };
    assert_eq!(message.mode, SendMode::Edit);
    assert!(message.text.starts_with("Order #1 placed!"));
    assert!(message.text.contains("iPhone 15 128 GB × 2 — 179 980 ₽"));
    assert!(message.text.contains("Total due: 179 980 ₽"));
    assert!(message.text.contains("Delivery: Courier"));

    let session = system.sessions.get(user).await.unwrap().unwrap();
    assert!(session.cart.is_empty());
    assert_eq!(session.checkout.state(), CheckoutState::None);
    assert!(session.checkout.data().name.is_none());

    system.shutdown().await.expect("Shutdown failed");
    let delivered = sink.delivered.lock().unwrap().clone();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].starts_with("New order:\nOrder #1 placed!"));
}

#[tokio::test]
async fn test_pickup_skips_address() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(102);

    press(&system, user, "cart:add:airpods_pro_2").await;
    press(&system, user, "checkout").await;
    say(&system, user, "Anna").await;
    say(&system, user, "89991234567").await;

    let replies = press(&system, user, "checkout:delivery:pickup").await;
    assert!(replies[0].text().starts_with("Please review your order"));

    let session = system.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.checkout.state(), CheckoutState::Confirm);
    assert_eq!(session.checkout.data().delivery, Some(DeliveryMethod::Pickup));
    assert_eq!(session.checkout.data().address.as_deref(), Some(PICKUP_ADDRESS));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancel_keeps_cart() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(103);

    press(&system, user, "cart:add:watch_s9").await;
    press(&system, user, "checkout").await;
    say(&system, user, "Ivan").await;

    let replies = press(&system, user, "checkout:cancel").await;
    assert_eq!(replies[0].text(), texts::CHECKOUT_CANCELLED);

    let session = system.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.checkout.state(), CheckoutState::None);
    assert!(session.checkout.data().name.is_none());
    assert_eq!(session.cart.quantity(&ProductId::from("watch_s9")), 1);

    // free text after cancelling falls back to the main menu
    let replies = say(&system, user, "hello?").await;
    assert_eq!(replies[0].text(), texts::MAIN_MENU);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_checkout_guarded_by_empty_cart() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(104);

    let replies = press(&system, user, "checkout").await;
    assert_eq!(replies, vec![Reply::alert(user, texts::CART_IS_EMPTY_ALERT)]);
    assert_eq!(state_of(&system, user).await, CheckoutState::None);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_input_does_not_advance() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(105);

    press(&system, user, "cart:add:ipad_air_m2").await;
    press(&system, user, "checkout").await;
    say(&system, user, "Ivan").await;

    say(&system, user, "+7999123").await;
    say(&system, user, "abc123456789").await;
    assert_eq!(state_of(&system, user).await, CheckoutState::AskPhone);

    say(&system, user, "+79991234567").await;
    press(&system, user, "checkout:delivery:courier").await;
    say(&system, user, "ул").await;
    assert_eq!(state_of(&system, user).await, CheckoutState::AskAddress);

    say(&system, user, "ул. Ленина 5").await;
    assert_eq!(state_of(&system, user).await, CheckoutState::Confirm);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stale_buttons_change_nothing() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(106);

    press(&system, user, "cart:add:mac_pro_2030").await;
    let replies = press(&system, user, "checkout:delivery:pickup").await;
    assert_eq!(replies, vec![Reply::alert(user, texts::STEP_NOT_ACTIVE)]);

    let replies = press(&system, user, "checkout:confirm").await;
    assert!(replies.contains(&Reply::alert(user, texts::CHECKOUT_EXPIRED)));

    assert!(press(&system, user, "cart:teleport:iphone_15").await.is_empty());

    let session = system.sessions.get(user).await.unwrap().unwrap();
    assert!(session.cart.is_empty());
    assert_eq!(session.checkout.state(), CheckoutState::None);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cart_buttons_update_totals() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(107);

    press(&system, user, "cart:add:iphone_15").await;
    press(&system, user, "cart:inc:iphone_15").await;
    press(&system, user, "cart:add:watch_s9").await;
    let replies = press(&system, user, "cart:dec:watch_s9").await;
    assert!(replies[0].text().contains("Total: 179 980 ₽"));

    let session = system.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.cart.count(), 2);
    assert_eq!(session.cart.total(&Catalog::default()), Price(179_980));

    let replies = press(&system, user, "cart:clear").await;
    assert_eq!(replies[0].text(), texts::EMPTY_CART);

    system.shutdown().await.unwrap();
}

/// Many users at once, each on their own session.
#[tokio::test]
async fn test_concurrent_users_are_independent() {
    let (system, _) = start(Arc::new(RecordingSink::default()));

    let mut tasks = Vec::new();
    for id in 1..=20 {
        let router = system.router.clone();
        tasks.push(tokio::spawn(async move {
            let user = UserId(id);
            for _ in 0..id {
                router
                    .handle(&InboundEvent::button(user, "cart:add:iphone_15"))
                    .await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for id in 1..=20 {
        let session = system.sessions.get(UserId(id)).await.unwrap().unwrap();
        assert_eq!(session.cart.count(), id as u32);
    }
    assert_eq!(system.sessions.session_count().await.unwrap(), 20);

    system.shutdown().await.unwrap();
}

/// Two checkouts advanced step by step in alternation keep their own details.
#[tokio::test]
async fn test_interleaved_checkouts_keep_separate_details() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let ivan = UserId(201);
    let anna = UserId(202);

    press(&system, ivan, "cart:add:iphone_15").await;
    press(&system, anna, "cart:add:watch_s9").await;
    press(&system, ivan, "checkout").await;
    press(&system, anna, "checkout").await;
    say(&system, anna, "Anna Smirnova").await;
    say(&system, ivan, "Ivan Petrov").await;
    say(&system, ivan, "+79991234567").await;
    say(&system, anna, "89997654321").await;
    press(&system, anna, "checkout:delivery:courier").await;
    press(&system, ivan, "checkout:delivery:pickup").await;
    say(&system, anna, "Nevsky Prospect 28").await;

    let ivan_session = system.sessions.get(ivan).await.unwrap().unwrap();
    let data = ivan_session.checkout.data();
    assert_eq!(data.name.as_deref(), Some("Ivan Petrov"));
    assert_eq!(data.phone.as_deref(), Some("+79991234567"));
    assert_eq!(data.delivery, Some(DeliveryMethod::Pickup));
    assert_eq!(data.address.as_deref(), Some(PICKUP_ADDRESS));

    let anna_session = system.sessions.get(anna).await.unwrap().unwrap();
    let data = anna_session.checkout.data();
    assert_eq!(data.name.as_deref(), Some("Anna Smirnova"));
    assert_eq!(data.phone.as_deref(), Some("89997654321"));
    assert_eq!(data.delivery, Some(DeliveryMethod::Courier));
    assert_eq!(data.address.as_deref(), Some("Nevsky Prospect 28"));

    let replies = press(&system, anna, "checkout:confirm").await;
    assert!(replies[0].text().contains("Name: Anna Smirnova"));
    assert!(!replies[0].text().contains("Ivan"));
    assert_eq!(state_of(&system, ivan).await, CheckoutState::Confirm);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failing_sink_does_not_affect_buyer() {
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..RecordingSink::default()
    });
    let (system, presenter) = start(sink.clone());
    let user = UserId(108);

    for event in [
        InboundEvent::button(user, "cart:add:macbook_air_m2"),
        InboundEvent::button(user, "checkout"),
        InboundEvent::text(user, "Ivan Petrov"),
        InboundEvent::text(user, "+79991234567"),
        InboundEvent::button(user, "checkout:delivery:pickup"),
        InboundEvent::button(user, "checkout:confirm"),
    ] {
        system.router.dispatch(&event).await;
    }

    let last = presenter.replies.lock().unwrap().last().cloned().unwrap();
    assert!(last.text().starts_with("Order #1 placed!"));

    system.shutdown().await.unwrap();
    assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
    assert!(sink.delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_commands_leave_checkout_alone() {
    let (system, _) = start(Arc::new(RecordingSink::default()));
    let user = UserId(109);

    press(&system, user, "cart:add:iphone_15_pro").await;
    press(&system, user, "checkout").await;

    let replies = system.router.handle(&InboundEvent::command(user, "/start")).await;
    assert_eq!(replies[0].text(), texts::WELCOME);
    let replies = system.router.handle(&InboundEvent::command(user, "/orders")).await;
    assert_eq!(replies[0].text(), texts::UNKNOWN_COMMAND);

    assert_eq!(state_of(&system, user).await, CheckoutState::AskName);

    system.shutdown().await.unwrap();
}
