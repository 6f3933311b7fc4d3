use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use domain::{
    entities::chats::MessageEntity,
    repositories::chats::ChatRepository,
    value_objects::chats::{ChatWithUnread, SendMessageModel},
};
use infra::{
    postgres::{postgres_connection::PgPoolSquad, repositories::chats::ChatPostgres},
    realtime::centrifugo_client::CentrifugoClient,
};
use serde_json::json;

use crate::{
    auth::AuthUser,
    config::config_model::DotEnvyConfig,
    usecases::{chats::ChatUseCase, error::ApiError, notify::RealtimeNotifier},
};

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let chat_repo = Arc::new(ChatPostgres::new(Arc::clone(&db_pool)));
    let notifier = Arc::new(CentrifugoClient::new(
        config.realtime.api_url.clone(),
        config.realtime.api_key.clone(),
    ));

    let chats_usecase = ChatUseCase::new(chat_repo, notifier);

    Router::new()
        .route("/", get(list_chats))
        .route("/:id/messages", get(list_messages).post(send_message))
        .route("/:id/read", post(mark_read))
        .with_state(Arc::new(chats_usecase))
}

pub async fn list_chats<C, N>(
    State(chats_usecase): State<Arc<ChatUseCase<C, N>>>,
    auth: AuthUser,
) -> Result<Json<Vec<ChatWithUnread>>, ApiError>
where
    C: ChatRepository + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
{
    let chats = chats_usecase.list_chats(auth.user_id).await?;
    Ok(Json(chats))
}

pub async fn list_messages<C, N>(
    State(chats_usecase): State<Arc<ChatUseCase<C, N>>>,
    auth: AuthUser,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<MessageEntity>>, ApiError>
where
    C: ChatRepository + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
{
    let messages = chats_usecase.list_messages(chat_id, auth.user_id).await?;
    Ok(Json(messages))
}

pub async fn send_message<C, N>(
    State(chats_usecase): State<Arc<ChatUseCase<C, N>>>,
    auth: AuthUser,
    Path(chat_id): Path<i64>,
    Json(model): Json<SendMessageModel>,
) -> Result<Json<MessageEntity>, ApiError>
where
    C: ChatRepository + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
{
    let message = chats_usecase
        .send_message(chat_id, auth.user_id, model.text)
        .await?;
    Ok(Json(message))
}

pub async fn mark_read<C, N>(
    State(chats_usecase): State<Arc<ChatUseCase<C, N>>>,
    auth: AuthUser,
    Path(chat_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: ChatRepository + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
{
    let marked = chats_usecase.mark_read(chat_id, auth.user_id).await?;
    Ok(Json(json!({"read": marked})))
}
