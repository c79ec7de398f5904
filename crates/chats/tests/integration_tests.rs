//! End-to-end flows through the chat services on the in-memory store.

use std::time::Duration;

use courier_chats::{
    ChannelEvent, ChannelProvider, ChatError, ChatServices, MemoryStore, ServiceLimits, StreamEnd,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn services(limits: ServiceLimits) -> (ChatServices, MemoryStore) {
    let store = MemoryStore::new();
    (ChatServices::from_store(store.clone(), limits), store)
}

async fn wait_for_subscribers(services: &ChatServices, channel_id: &str, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while services.registry.subscriber_count(channel_id) != expected {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("subscriber count never reached the expected value");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_member_receives_message_sent_on_new_channel() {
    let (services, _store) = services(ServiceLimits::default());

    let chat_id = services
        .chats
        .create_chat("alice", "group", "Team", &["bob".to_string()])
        .await
        .unwrap();
    let general = services
        .channels
        .create_channel("bob", &chat_id, "general", "text")
        .await
        .unwrap();

    let (mut sink, mut events) = mpsc::channel::<ChannelEvent>(8);
    let cancel = CancellationToken::new();
    let stream = {
        let services = services.clone();
        let channel_id = general.id.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            services
                .channels
                .subscribe("alice", &channel_id, &mut sink, cancel)
                .await
        })
    };
    wait_for_subscribers(&services, &general.id, 1).await;

    assert!(events.try_recv().is_err(), "nothing may arrive before a send");

    let sent = services
        .messages
        .send_message("bob", &general.id, "hi")
        .await
        .unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    match received {
        ChannelEvent::NewMessage(message) => {
            assert_eq!(message.channel_id, general.id);
            assert_eq!(message.text, "hi");
            assert_eq!(message.sender_id, "bob");
            assert_eq!(message.id, sent.id);
        }
        other => panic!("unexpected event {other:?}"),
    }

    cancel.cancel();
    assert_eq!(stream.await.unwrap().unwrap(), StreamEnd::Cancelled);
    assert!(events.try_recv().is_err(), "exactly one event expected");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_subscriber_sees_nothing_and_is_removed() {
    let (services, _store) = services(ServiceLimits::default());
    let chat_id = services
        .chats
        .create_chat("alice", "group", "Team", &["bob".to_string()])
        .await
        .unwrap();
    let channel_id = services.chats.get_chat_info("alice", &chat_id).await.unwrap().channels[0]
        .id
        .clone();

    let (mut sink, mut events) = mpsc::channel::<ChannelEvent>(8);
    let cancel = CancellationToken::new();
    let stream = {
        let services = services.clone();
        let channel_id = channel_id.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            services
                .channels
                .subscribe("alice", &channel_id, &mut sink, cancel)
                .await
        })
    };
    wait_for_subscribers(&services, &channel_id, 1).await;

    cancel.cancel();
    stream.await.unwrap().unwrap();
    assert_eq!(services.registry.subscriber_count(&channel_id), 0);

    services
        .messages
        .send_message("bob", &channel_id, "too late")
        .await
        .unwrap();

    assert!(events.recv().await.is_none(), "sink is dropped with the stream");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_with_roomy_and_starved_subscribers() {
    const SENDS: usize = 50;

    let (services, store) = services(ServiceLimits {
        max_message_length: 100,
        subscriber_queue_capacity: SENDS,
    });
    let chat_id = services
        .chats
        .create_chat("alice", "group", "Team", &["bob".to_string()])
        .await
        .unwrap();
    let channel_id = services.chats.get_chat_info("alice", &chat_id).await.unwrap().channels[0]
        .id
        .clone();

    let mut roomy = services.registry.register(&channel_id);
    let mut starved = services.registry.register_with_capacity(&channel_id, 1);

    let mut tasks = Vec::with_capacity(SENDS);
    for i in 0..SENDS {
        let services = services.clone();
        let channel_id = channel_id.clone();
        tasks.push(tokio::spawn(async move {
            services
                .messages
                .send_message("bob", &channel_id, &format!("message {i}"))
                .await
        }));
    }

    for task in tasks {
        task.await.unwrap().expect("send must not fail on a full queue");
    }
    assert_eq!(store.message_count().await, SENDS);

    let stored_order = store
        .find_channel_by_id(&channel_id)
        .await
        .unwrap()
        .expect("channel exists")
        .message_ids;
    let mut received_order = Vec::with_capacity(SENDS);
    while let Some(ChannelEvent::NewMessage(message)) = roomy.try_recv() {
        received_order.push(message.id);
    }
    assert_eq!(received_order, stored_order);

    let mut starved_count = 0;
    while starved.try_recv().is_some() {
        starved_count += 1;
    }
    assert!(starved_count < SENDS);
    assert_eq!(starved_count, 1);
}

#[tokio::test]
async fn test_non_members_are_denied_everywhere() {
    let (services, _store) = services(ServiceLimits::default());
    let chat_id = services
        .chats
        .create_chat("alice", "group", "Team", &["bob".to_string()])
        .await
        .unwrap();
    let channel_id = services.chats.get_chat_info("bob", &chat_id).await.unwrap().channels[0]
        .id
        .clone();

    assert!(matches!(
        services
            .channels
            .create_channel("mallory", &chat_id, "side", "text")
            .await,
        Err(ChatError::AccessDenied)
    ));
    assert!(matches!(
        services.messages.send_message("mallory", &channel_id, "hi").await,
        Err(ChatError::AccessDenied)
    ));
    assert!(matches!(
        services.messages.get_messages("mallory", &channel_id, 10, 1).await,
        Err(ChatError::AccessDenied)
    ));

    let (mut sink, _events) = mpsc::channel::<ChannelEvent>(1);
    assert!(matches!(
        services
            .channels
            .subscribe("mallory", &channel_id, &mut sink, CancellationToken::new())
            .await,
        Err(ChatError::AccessDenied)
    ));
}
