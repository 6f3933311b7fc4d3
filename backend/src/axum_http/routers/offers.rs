use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, patch, post},
};
use domain::{
    entities::{chats::ChatEntity, grades::GradeEntity, offers::OfferEntity},
    repositories::{
        chats::ChatRepository, offers::OfferRepository, storage::MediaStorage,
        users::UserRepository,
    },
    value_objects::{
        offers::{CreateOfferModel, OfferDetailsDto, SendGradeModel, SetMasterModel, SuggestMasterModel},
        uploads::UploadedFile,
    },
};
use infra::{
    media::fs_storage::FsMediaStorage,
    postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            chats::ChatPostgres, offers::OfferPostgres, plans::PlanPostgres,
            subscriptions::SubscriptionPostgres, users::UserPostgres,
        },
    },
    realtime::centrifugo_client::CentrifugoClient,
};

use crate::{
    auth::AuthUser,
    config::config_model::DotEnvyConfig,
    usecases::{
        entitlements::{ActionGate, EntitlementResolver},
        error::ApiError,
        notify::RealtimeNotifier,
        offers::OfferUseCase,
    },
};

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let offer_repo = Arc::new(OfferPostgres::new(Arc::clone(&db_pool)));
    let user_repo = Arc::new(UserPostgres::new(Arc::clone(&db_pool)));
    let chat_repo = Arc::new(ChatPostgres::new(Arc::clone(&db_pool)));
    let media = Arc::new(FsMediaStorage::new(config.media.root.clone()));
    let notifier = Arc::new(CentrifugoClient::new(
        config.realtime.api_url.clone(),
        config.realtime.api_key.clone(),
    ));
    let action_gate = Arc::new(EntitlementResolver::new(
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
    ));

    let offers_usecase = OfferUseCase::new(
        offer_repo,
        user_repo,
        chat_repo,
        media,
        notifier,
        action_gate,
        config.media.max_image_bytes,
        config.media.max_files,
    );

    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", get(get_offer))
        .route("/:id/suggest", post(suggest))
        .route("/:id/respond", post(respond))
        .route("/:id/refuse", post(refuse))
        .route("/:id/master", patch(set_master))
        .route("/:id/grade", post(send_grade))
        .with_state(Arc::new(offers_usecase))
}

/// Pulls scalar fields and file parts out of a multipart request. File parts
/// are collected from every field named `file_field`.
async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<(std::collections::HashMap<String, String>, Vec<UploadedFile>), ApiError> {
    let mut fields = std::collections::HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == file_field {
            let filename = field
                .file_name()
                .map(ToString::to_string)
                .ok_or_else(|| ApiError::BadRequest("file part without a filename".to_string()))?;
            let content = field
                .bytes()
                .await
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
            files.push(UploadedFile::new(filename, content.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, files))
}

fn parse_category_ids(raw: Option<&String>) -> Result<Vec<i64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("invalid category id: {}", part)))
        })
        .collect()
}

pub async fn create<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<OfferEntity>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let (fields, images) = read_multipart(multipart, "images").await?;

    let model = CreateOfferModel {
        title: fields.get("title").cloned().unwrap_or_default(),
        description: fields.get("description").cloned().unwrap_or_default(),
        category_ids: parse_category_ids(fields.get("category_ids"))?,
        private: fields
            .get("private")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(false),
    };

    let offer = offers_usecase.create(auth.user_id, model, images).await?;
    Ok(Json(offer))
}

pub async fn list<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
) -> Result<Json<Vec<OfferEntity>>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let offers = offers_usecase.list(auth.user_id).await?;
    Ok(Json(offers))
}

pub async fn get_offer<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
) -> Result<Json<OfferDetailsDto>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let details = offers_usecase.get(offer_id, auth.user_id).await?;
    Ok(Json(details))
}

pub async fn suggest<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
    Json(model): Json<SuggestMasterModel>,
) -> Result<Json<ChatEntity>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let chat = offers_usecase.suggest(offer_id, auth.user_id, model).await?;
    Ok(Json(chat))
}

pub async fn respond<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
) -> Result<Json<ChatEntity>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let chat = offers_usecase.respond(offer_id, auth.user_id).await?;
    Ok(Json(chat))
}

pub async fn refuse<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    offers_usecase.refuse(offer_id, auth.user_id).await?;
    Ok(Json(serde_json::json!({"detail": "offer refused"})))
}

pub async fn set_master<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
    Json(model): Json<SetMasterModel>,
) -> Result<Json<OfferEntity>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let offer = offers_usecase
        .set_master(offer_id, auth.user_id, model.master_id)
        .await?;
    Ok(Json(offer))
}

pub async fn send_grade<O, U, C, M, N, E>(
    State(offers_usecase): State<Arc<OfferUseCase<O, U, C, M, N, E>>>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<GradeEntity>, ApiError>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    let (fields, photos) = read_multipart(multipart, "photos").await?;

    let grade = fields
        .get("grade")
        .and_then(|value| value.parse::<i32>().ok())
        .ok_or_else(|| ApiError::BadRequest("grade must be an integer".to_string()))?;
    let model = SendGradeModel {
        grade,
        comment: fields.get("comment").cloned().unwrap_or_default(),
    };

    let grade = offers_usecase
        .send_grade(offer_id, auth.user_id, model, photos)
        .await?;
    Ok(Json(grade))
}
