//! End-to-end chat tests.
//!
//! The registry and every provider run as separate HTTP servers; killing a
//! provider withdraws everything it served. A silent client keeps its
//! connection open but never replies.

mod fixtures;

use fixtures::{SilentClient, TestPeer, TestRegistry, eventually, name};
use palaver_server::domain::{ChatRegistry, ChatRoom, ClientEvent, JOINED_NOTICE, LEFT_NOTICE};

fn notice(room: &str, sender: &str, message: &str) -> ClientEvent {
    ClientEvent::Delivered {
        room: name(room),
        sender: sender.to_string(),
        message: message.to_string(),
    }
}

async fn participants(peer: &TestPeer, room: &str) -> Option<String> {
    let info = peer.provider.get_entity_info(name(room)).await.ok()??;
    info.get("# Participants").cloned()
}

#[tokio::test]
async fn test_join_leave_and_auto_close() {
    // テスト項目: 参加・退出が双方に通知され、最後の参加者が抜けるとルームが閉じて登録が消える
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let mut a = TestPeer::with_client(&registry, "alice").await;
    let mut b = TestPeer::with_client(&registry, "bob").await;
    assert_eq!(a.provider.register_chat_room(name("r1")).await, Ok(true));
    assert!(a.expect_event(&notice("r1", "alice", JOINED_NOTICE)).await);

    // when (操作): bob が参加する
    assert_eq!(b.provider.join_chat_room(&name("r1")).await, Ok(true));

    // then (期待する結果):
    assert_eq!(participants(&a, "r1").await.as_deref(), Some("2"));
    assert!(a.expect_event(&notice("r1", "bob", JOINED_NOTICE)).await);
    assert!(b.expect_event(&notice("r1", "bob", JOINED_NOTICE)).await);

    // when (操作): bob が退出する
    assert_eq!(b.provider.leave_chat_room(&name("r1")).await, Ok(true));

    // then (期待する結果):
    assert_eq!(participants(&a, "r1").await.as_deref(), Some("1"));
    assert!(a.expect_event(&notice("r1", "bob", LEFT_NOTICE)).await);

    // when (操作): alice も退出する
    assert_eq!(a.provider.leave_chat_room(&name("r1")).await, Ok(true));

    // then (期待する結果):
    let a_ref = &a;
    assert!(
        eventually(move || async move {
            a_ref.provider.get_chat_rooms().await == Ok(vec![])
        })
        .await
    );
    assert!(a.provider.hosted_chat_rooms().await.is_empty());
    assert_eq!(b.provider.get_entity_info(name("r1")).await, Ok(None));
}

#[tokio::test]
async fn test_killed_member_is_dropped_on_talk() {
    // テスト項目: 退出せずに落ちた参加者は発言時に外され、レジストリからも回収される
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let a = TestPeer::with_client(&registry, "alice").await;
    let b = TestPeer::with_client(&registry, "bob").await;
    assert_eq!(a.provider.register_chat_room(name("r1")).await, Ok(true));
    assert_eq!(b.provider.join_chat_room(&name("r1")).await, Ok(true));
    assert_eq!(participants(&a, "r1").await.as_deref(), Some("2"));
    b.kill().await;

    // when (操作):
    let talked = a
        .provider
        .talk_chat_room(&name("r1"), "hi".to_string())
        .await;

    // then (期待する結果):
    assert_eq!(talked, Ok(true));
    assert_eq!(participants(&a, "r1").await.as_deref(), Some("1"));
    let a_ref = &a;
    assert!(
        eventually(move || async move {
            a_ref.provider.get_entity_info(name("bob")).await == Ok(None)
        })
        .await
    );
}

#[tokio::test]
async fn test_name_of_killed_provider_can_be_reused() {
    // テスト項目: 落ちたプロバイダのクライアント名は別のプロバイダが登録できる
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let first = TestPeer::with_client(&registry, "alice").await;
    let second = TestPeer::start(&registry).await;
    assert_eq!(
        second.provider.register_chat_client(name("alice")).await,
        Ok(false)
    );
    first.kill().await;

    // when (操作):
    let third = TestPeer::start(&registry).await;
    let registered = third.provider.register_chat_client(name("alice")).await;

    // then (期待する結果):
    assert_eq!(registered, Ok(true));
    assert_eq!(third.provider.client_name().await, Some(name("alice")));
}

#[tokio::test]
async fn test_dead_room_is_swept_from_listing() {
    // テスト項目: ホストが落ちたルームは一覧から消え、参加しようとしても失敗する
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let a = TestPeer::with_client(&registry, "alice").await;
    let b = TestPeer::with_client(&registry, "bob").await;
    assert_eq!(a.provider.register_chat_room(name("r1")).await, Ok(true));
    assert_eq!(a.provider.register_chat_room(name("r2")).await, Ok(true));
    assert_eq!(
        b.provider.get_chat_rooms().await,
        Ok(vec![name("r1"), name("r2")])
    );
    a.kill().await;

    // when (操作):
    let rooms = b.provider.get_chat_rooms().await;
    let joined = b.provider.join_chat_room(&name("r1")).await;

    // then (期待する結果):
    assert_eq!(rooms, Ok(vec![]));
    assert_eq!(joined, Ok(false));
    assert_eq!(b.provider.get_entity_info(name("alice")).await, Ok(None));
}

#[tokio::test]
async fn test_owner_deregisters_room() {
    // テスト項目: 所有者がルームを削除すると参加者に閉鎖が通知される
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let a = TestPeer::with_client(&registry, "alice").await;
    let mut b = TestPeer::with_client(&registry, "bob").await;
    assert_eq!(a.provider.register_chat_room(name("r1")).await, Ok(true));
    assert_eq!(b.provider.join_chat_room(&name("r1")).await, Ok(true));

    // when (操作):
    let removed = a.provider.deregister_chat_room(&name("r1")).await;

    // then (期待する結果):
    assert_eq!(removed, Ok(true));
    assert!(
        b.expect_event(&ClientEvent::RoomClosed { room: name("r1") })
            .await
    );
    assert!(b.provider.joined_chat_rooms().await.is_empty());
    assert_eq!(b.provider.get_chat_rooms().await, Ok(vec![]));
    assert_eq!(b.provider.deregister_chat_room(&name("r1")).await, Ok(false));
}

#[tokio::test]
async fn test_hung_member_does_not_fail_talk() {
    // テスト項目: 応答しなくなった参加者がいても発言は成功し、ルームは参加中・登録済みのまま残る
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let mut a = TestPeer::with_client(&registry, "alice").await;
    let b = TestPeer::with_client(&registry, "bob").await;
    assert_eq!(a.provider.register_chat_room(name("r1")).await, Ok(true));
    assert_eq!(b.provider.join_chat_room(&name("r1")).await, Ok(true));

    let mallory = SilentClient::start("mallory").await;
    let connector = b.server.connector();
    let rooms = connector
        .registry(registry.endpoint())
        .get_chat_rooms()
        .await
        .unwrap();
    let room = rooms[&name("r1")].clone();
    assert_eq!(room.join(mallory.handle(connector)).await, Ok(true));
    assert_eq!(participants(&a, "r1").await.as_deref(), Some("3"));
    mallory.hang();

    // when (操作):
    let talked = b
        .provider
        .talk_chat_room(&name("r1"), "hi".to_string())
        .await;

    // then (期待する結果):
    assert_eq!(talked, Ok(true));
    assert_eq!(b.provider.joined_chat_rooms().await, vec![name("r1")]);
    assert_eq!(b.provider.get_chat_rooms().await, Ok(vec![name("r1")]));
    assert_eq!(a.provider.hosted_chat_rooms().await, vec![name("r1")]);
    assert_eq!(participants(&a, "r1").await.as_deref(), Some("2"));
    assert!(a.expect_event(&notice("r1", "bob", "hi")).await);
    assert!(a.expect_event(&notice("r1", "mallory", LEFT_NOTICE)).await);
}

#[tokio::test]
async fn test_name_of_hung_client_is_reclaimed() {
    // テスト項目: 応答しなくなったクライアントの名前は呼び出し元のタイムアウト内に回収され、他の利用者も待たされない
    // given (前提条件):
    let registry = TestRegistry::start().await;
    let a = TestPeer::with_client(&registry, "alice").await;
    assert_eq!(a.provider.register_chat_room(name("r1")).await, Ok(true));

    let mallory = SilentClient::start("mallory").await;
    let connector = a.server.connector();
    let directory = connector.registry(registry.endpoint());
    assert_eq!(
        directory.register(mallory.handle(connector).into()).await,
        Ok(true)
    );
    mallory.hang();
    let successor = TestPeer::start(&registry).await;

    // when (操作):
    let (registered, rooms) = tokio::join!(
        successor.provider.register_chat_client(name("mallory")),
        a.provider.get_chat_rooms(),
    );

    // then (期待する結果):
    assert_eq!(registered, Ok(true));
    assert_eq!(rooms, Ok(vec![name("r1")]));
    assert_eq!(
        successor.provider.client_name().await,
        Some(name("mallory"))
    );
}
