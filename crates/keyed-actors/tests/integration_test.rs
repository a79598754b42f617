use async_trait::async_trait;
use keyed_actors::{ActorEntity, FrameworkError, ResourceActor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Tally {
    owner: String,
    items: Vec<String>,
}

#[derive(Debug)]
enum TallyAction {
    Push(String),
    Reset,
    Fail,
}

#[derive(Debug, thiserror::Error)]
#[error("Tally rejected the action")]
struct TallyError;

#[async_trait]
impl ActorEntity for Tally {
    type Id = String;
    type Action = TallyAction;
    type ActionResult = usize;
    type Context = Arc<AtomicUsize>;
    type Error = TallyError;

    fn from_key(id: &String) -> Self {
        Self {
            owner: id.clone(),
            items: Vec::new(),
        }
    }

    async fn on_create(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
        ctx.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: TallyAction,
        _ctx: &Self::Context,
    ) -> Result<usize, Self::Error> {
        match action {
            TallyAction::Push(item) => {
                self.items.push(item);
                Ok(self.items.len())
            }
            TallyAction::Reset => {
                self.items.clear();
                Ok(0)
            }
            TallyAction::Fail => Err(TallyError),
        }
    }
}

fn start(shards: usize) -> (keyed_actors::ResourceClient<Tally>, Arc<AtomicUsize>) {
    let created = Arc::new(AtomicUsize::new(0));
    let (actors, client) = ResourceActor::<Tally>::sharded(shards, 16);
    for actor in actors {
        tokio::spawn(actor.run(Arc::clone(&created)));
    }
    (client, created)
}

#[tokio::test]
async fn test_entities_are_created_lazily_and_kept() {
    let (client, created) = start(4);

    assert!(client.get("alice".to_string()).await.unwrap().is_none());
    assert_eq!(client.count().await.unwrap(), 0);

    let len = client
        .perform_action("alice".to_string(), TallyAction::Push("apple".into()))
        .await
        .unwrap();
    assert_eq!(len, 1);

    let snapshot = client.get_or_create("alice".to_string()).await.unwrap();
    assert_eq!(snapshot.owner, "alice");
    assert_eq!(snapshot.items, vec!["apple".to_string()]);

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(client.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_action_keeps_entity() {
    let (client, _) = start(2);

    client
        .perform_action("bob".to_string(), TallyAction::Push("pear".into()))
        .await
        .unwrap();
    let err = client
        .perform_action("bob".to_string(), TallyAction::Fail)
        .await
        .unwrap_err();

    match err {
        FrameworkError::EntityError(inner) => assert!(inner.downcast::<TallyError>().is_ok()),
        other => panic!("Expected EntityError, got {other:?}"),
    }

    let bob = client.get("bob".to_string()).await.unwrap().unwrap();
    assert_eq!(bob.items.len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_contact_creates_each_key_once() {
    let (client, created) = start(4);

    let mut handles = vec![];
    for i in 0..50 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("user_{}", i % 5);
            client
                .perform_action(key, TallyAction::Push(format!("item_{i}")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(created.load(Ordering::SeqCst), 5);
    assert_eq!(client.count().await.unwrap(), 5);
    for i in 0..5 {
        let tally = client.get(format!("user_{i}")).await.unwrap().unwrap();
        assert_eq!(tally.items.len(), 10);
    }

    client
        .perform_action("user_0".to_string(), TallyAction::Reset)
        .await
        .unwrap();
    let untouched = client.get("user_1".to_string()).await.unwrap().unwrap();
    assert_eq!(untouched.items.len(), 10);
}

#[tokio::test]
async fn test_actor_stops_when_clients_dropped() {
    let (actor, client) = ResourceActor::<Tally>::new(4);
    let handle = tokio::spawn(actor.run(Arc::new(AtomicUsize::new(0))));
    assert_eq!(client.shard_count(), 1);

    drop(client);
    handle.await.unwrap();
}
