use super::*;

use chrono::Utc;
use domain::repositories::chats::MockChatRepository;
use mockall::predicate::eq;

use crate::usecases::notify::MockRealtimeNotifier;

fn sample_chat(id: i64) -> ChatEntity {
    let now = Utc::now();
    ChatEntity {
        id,
        name: String::new(),
        object_id: 1,
        object_type: "repair_offer".to_string(),
        created_user_id: None,
        private: true,
        deleted: false,
        created_at: now,
        changed_at: now,
    }
}

fn sample_message(id: i64, chat_id: i64, user_id: Uuid, text: &str) -> MessageEntity {
    let now = Utc::now();
    MessageEntity {
        id,
        chat_id,
        user_id: Some(user_id),
        text: text.to_string(),
        deleted: false,
        created_at: now,
        changed_at: now,
    }
}

#[tokio::test]
async fn send_message_requires_participation() {
    let user_id = Uuid::new_v4();
    let mut chat_repo = MockChatRepository::new();
    let notifier = MockRealtimeNotifier::new();

    chat_repo
        .expect_find_by_id()
        .with(eq(8))
        .returning(|id| Box::pin(async move { Ok(Some(sample_chat(id))) }));
    chat_repo
        .expect_is_participant()
        .returning(|_, _| Box::pin(async { Ok(false) }));

    let usecase = ChatUseCase::new(Arc::new(chat_repo), Arc::new(notifier));
    let err = usecase
        .send_message(8, user_id, "hello".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn send_message_publishes_to_chat_and_participants() {
    let sender_id = Uuid::new_v4();
    let other_id = Uuid::new_v4();
    let mut chat_repo = MockChatRepository::new();
    let mut notifier = MockRealtimeNotifier::new();

    chat_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_chat(id))) }));
    chat_repo
        .expect_is_participant()
        .returning(|_, _| Box::pin(async { Ok(true) }));
    chat_repo
        .expect_insert_message()
        .withf(move |entity| entity.chat_id == 8 && entity.user_id == Some(sender_id))
        .times(1)
        .returning(move |entity| {
            let message = sample_message(70, entity.chat_id, sender_id, &entity.text);
            Box::pin(async move { Ok(message) })
        });
    chat_repo.expect_participants().returning(move |_| {
        Box::pin(async move { Ok(vec![sender_id, other_id]) })
    });

    // One publish to the chat topic and one to the other participant.
    notifier
        .expect_publish()
        .withf(|channel, _| channel == "chat-8")
        .times(1)
        .returning(|_, _| Box::pin(async { Ok(()) }));
    notifier
        .expect_publish()
        .withf(move |channel, _| channel == messages_topic(other_id))
        .times(1)
        .returning(|_, _| Box::pin(async { Ok(()) }));

    let usecase = ChatUseCase::new(Arc::new(chat_repo), Arc::new(notifier));
    let message = usecase
        .send_message(8, sender_id, "when can you start?".to_string())
        .await
        .unwrap();
    assert_eq!(message.id, 70);
}

#[tokio::test]
async fn send_message_rejects_empty_text() {
    let chat_repo = MockChatRepository::new();
    let notifier = MockRealtimeNotifier::new();

    let usecase = ChatUseCase::new(Arc::new(chat_repo), Arc::new(notifier));
    let err = usecase
        .send_message(8, Uuid::new_v4(), "   ".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn mark_read_publishes_read_event() {
    let user_id = Uuid::new_v4();
    let mut chat_repo = MockChatRepository::new();
    let mut notifier = MockRealtimeNotifier::new();

    chat_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_chat(id))) }));
    chat_repo
        .expect_is_participant()
        .returning(|_, _| Box::pin(async { Ok(true) }));
    chat_repo
        .expect_mark_read()
        .with(eq(8), eq(user_id))
        .times(1)
        .returning(|_, _| Box::pin(async { Ok(3) }));
    notifier
        .expect_publish()
        .withf(|channel, payload| {
            channel == "chat-8" && payload["type"] == "messages_read"
        })
        .times(1)
        .returning(|_, _| Box::pin(async { Ok(()) }));

    let usecase = ChatUseCase::new(Arc::new(chat_repo), Arc::new(notifier));
    assert_eq!(usecase.mark_read(8, user_id).await.unwrap(), 3);
}

#[tokio::test]
async fn mark_read_with_nothing_unread_stays_quiet() {
    let user_id = Uuid::new_v4();
    let mut chat_repo = MockChatRepository::new();
    let notifier = MockRealtimeNotifier::new();

    chat_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_chat(id))) }));
    chat_repo
        .expect_is_participant()
        .returning(|_, _| Box::pin(async { Ok(true) }));
    chat_repo
        .expect_mark_read()
        .returning(|_, _| Box::pin(async { Ok(0) }));
    // No publish expectation: nothing was read, nothing is announced.

    let usecase = ChatUseCase::new(Arc::new(chat_repo), Arc::new(notifier));
    assert_eq!(usecase.mark_read(8, user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn list_messages_for_unknown_chat_is_not_found() {
    let mut chat_repo = MockChatRepository::new();
    let notifier = MockRealtimeNotifier::new();

    chat_repo
        .expect_find_by_id()
        .returning(|_| Box::pin(async { Ok(None) }));

    let usecase = ChatUseCase::new(Arc::new(chat_repo), Arc::new(notifier));
    let err = usecase
        .list_messages(404, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
