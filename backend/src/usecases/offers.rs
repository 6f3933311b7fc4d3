use std::sync::Arc;

use domain::{
    entities::{
        chats::ChatEntity,
        grades::{GradeEntity, InsertGradeEntity},
        offers::{InsertOfferEntity, OfferEntity},
    },
    repositories::{
        chats::ChatRepository, offers::OfferRepository, storage::MediaStorage,
        users::UserRepository,
    },
    value_objects::{
        chats::DEFAULT_GREETING,
        enums::user_roles::UserRole,
        grades::{AttachGradeOutcome, GradeParty},
        offers::{CreateOfferModel, OfferDetailsDto, SendGradeModel, SuggestMasterModel},
        plans::actions::CAN_TAKE_OFFERS,
        uploads::{UploadedFile, validate_image_upload},
    },
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::usecases::{
    entitlements::ActionGate,
    error::{ApiError, ApiResult},
    notify::{RealtimeNotifier, messages_topic},
};

pub struct OfferUseCase<O, U, C, M, N, E>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    offer_repo: Arc<O>,
    user_repo: Arc<U>,
    chat_repo: Arc<C>,
    media: Arc<M>,
    notifier: Arc<N>,
    action_gate: Arc<E>,
    max_image_bytes: u64,
    max_files: usize,
}

impl<O, U, C, M, N, E> OfferUseCase<O, U, C, M, N, E>
where
    O: OfferRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    C: ChatRepository + Send + Sync + 'static,
    M: MediaStorage + Send + Sync + 'static,
    N: RealtimeNotifier + 'static,
    E: ActionGate + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        offer_repo: Arc<O>,
        user_repo: Arc<U>,
        chat_repo: Arc<C>,
        media: Arc<M>,
        notifier: Arc<N>,
        action_gate: Arc<E>,
        max_image_bytes: u64,
        max_files: usize,
    ) -> Self {
        Self {
            offer_repo,
            user_repo,
            chat_repo,
            media,
            notifier,
            action_gate,
            max_image_bytes,
            max_files,
        }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        model: CreateOfferModel,
        images: Vec<UploadedFile>,
    ) -> ApiResult<OfferEntity> {
        let owner = self
            .user_repo
            .find_by_id(owner_id)
            .await?
            .ok_or(ApiError::UserDoesNotExist)?;
        if !owner.is_active {
            return Err(ApiError::Forbidden("account is not active".to_string()));
        }

        if model.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".to_string()));
        }
        if model.description.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "description must not be empty".to_string(),
            ));
        }

        self.validate_uploads(&images)?;
        let image_paths = self.store_uploads("offers", &images).await?;

        let insert_offer_entity = InsertOfferEntity {
            owner_id,
            title: model.title,
            description: model.description,
            private: model.private,
        };

        let created = self
            .offer_repo
            .create_with_images(insert_offer_entity, model.category_ids, image_paths.clone())
            .await;

        match created {
            Ok(offer) => {
                info!(offer_id = offer.id, %owner_id, "offers: offer created");
                Ok(offer)
            }
            Err(err) => {
                self.discard_uploads(&image_paths).await;
                Err(ApiError::Internal(err))
            }
        }
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<OfferEntity>> {
        Ok(self.offer_repo.list_visible(user_id).await?)
    }

    pub async fn get(&self, offer_id: i64, user_id: Uuid) -> ApiResult<OfferDetailsDto> {
        let offer = self.find_offer(offer_id).await?;

        if offer.private && offer.owner_id != user_id && offer.master_id != Some(user_id) {
            return Err(ApiError::Forbidden(
                "this offer is private".to_string(),
            ));
        }

        let images = self.offer_repo.list_images(offer_id).await?;
        let category_ids = self.offer_repo.list_category_ids(offer_id).await?;
        let canceled_masters = self.offer_repo.canceled_masters(offer_id).await?;

        let owner_grade = match offer.owner_grade_id {
            Some(grade_id) => self.offer_repo.find_grade(grade_id).await?,
            None => None,
        };
        let master_grade = match offer.master_grade_id {
            Some(grade_id) => self.offer_repo.find_grade(grade_id).await?,
            None => None,
        };

        Ok(OfferDetailsDto {
            completed: offer.is_completed(),
            offer,
            images,
            category_ids,
            canceled_masters,
            owner_grade,
            master_grade,
        })
    }

    /// Owner proposes the offer to a specific master and opens the offer chat.
    pub async fn suggest(
        &self,
        offer_id: i64,
        acting_user_id: Uuid,
        model: SuggestMasterModel,
    ) -> ApiResult<ChatEntity> {
        let offer = self.find_offer(offer_id).await?;

        if offer.owner_id != acting_user_id {
            return Err(ApiError::Forbidden(
                "only the offer owner can suggest a master".to_string(),
            ));
        }
        if offer.has_master() {
            return Err(ApiError::BadRequest(
                "offer already has a master".to_string(),
            ));
        }
        if model.master_id == offer.owner_id {
            return Err(ApiError::SelfAppointedOffer);
        }

        let master = self
            .user_repo
            .find_active_master(model.master_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest("master not found or inactive".to_string()))?;

        if self
            .chat_repo
            .find_offer_chat(offer_id, acting_user_id)
            .await?
            .is_some()
        {
            return Err(ApiError::BadRequest(
                "a chat for this offer already exists".to_string(),
            ));
        }

        let text = model
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());

        let (chat, message) = self
            .chat_repo
            .create_offer_chat(
                offer_id,
                acting_user_id,
                vec![offer.owner_id, master.id],
                text,
            )
            .await?;

        info!(
            offer_id,
            chat_id = chat.id,
            master_id = %master.id,
            "offers: master suggested"
        );
        self.notify(
            &messages_topic(master.id),
            json!({
                "type": "new_chat",
                "chat_id": chat.id,
                "offer_id": offer_id,
                "message_id": message.id,
            }),
        )
        .await;

        Ok(chat)
    }

    /// Master-initiated response; gated by the `can_take_offers` entitlement.
    /// Returns the existing chat when the master already responded.
    pub async fn respond(&self, offer_id: i64, acting_user_id: Uuid) -> ApiResult<ChatEntity> {
        let offer = self.find_offer(offer_id).await?;

        let acting_user = self
            .user_repo
            .find_by_id(acting_user_id)
            .await?
            .ok_or(ApiError::UserDoesNotExist)?;
        if UserRole::from_str(&acting_user.role) != UserRole::Master {
            return Err(ApiError::MasterRoleRequired);
        }
        if offer.owner_id == acting_user_id {
            return Err(ApiError::BadRequest(
                "the offer owner cannot respond to their own offer".to_string(),
            ));
        }

        self.action_gate
            .require_action(acting_user_id, CAN_TAKE_OFFERS)
            .await?;

        // A refusal recorded earlier no longer applies once the master
        // responds again.
        self.offer_repo
            .clear_refusal(offer_id, acting_user_id)
            .await?;

        if let Some(chat) = self
            .chat_repo
            .find_offer_chat(offer_id, acting_user_id)
            .await?
        {
            return Ok(chat);
        }

        let (chat, message) = self
            .chat_repo
            .create_offer_chat(
                offer_id,
                acting_user_id,
                vec![offer.owner_id, acting_user_id],
                DEFAULT_GREETING.to_string(),
            )
            .await?;

        info!(
            offer_id,
            chat_id = chat.id,
            master_id = %acting_user_id,
            "offers: master responded"
        );
        self.notify(
            &messages_topic(offer.owner_id),
            json!({
                "type": "new_chat",
                "chat_id": chat.id,
                "offer_id": offer_id,
                "message_id": message.id,
            }),
        )
        .await;

        Ok(chat)
    }

    /// The assigned master steps away; the refusal is recorded so the same
    /// master is excluded from re-matching until cleared.
    pub async fn refuse(&self, offer_id: i64, acting_user_id: Uuid) -> ApiResult<()> {
        let offer = self.find_offer(offer_id).await?;

        if offer.master_id != Some(acting_user_id) {
            return Err(ApiError::BadRequest(
                "only the assigned master can refuse the offer".to_string(),
            ));
        }

        self.offer_repo.refuse(offer_id, acting_user_id).await?;
        info!(offer_id, master_id = %acting_user_id, "offers: master refused");
        Ok(())
    }

    pub async fn set_master(
        &self,
        offer_id: i64,
        acting_user_id: Uuid,
        master_id: Option<Uuid>,
    ) -> ApiResult<OfferEntity> {
        let offer = self.find_offer(offer_id).await?;

        if offer.owner_id != acting_user_id {
            return Err(ApiError::Forbidden(
                "only the offer owner can change the master".to_string(),
            ));
        }

        match master_id {
            None => {
                self.offer_repo.update_master(offer_id, None).await?;
            }
            Some(master_id) => {
                if master_id == offer.owner_id {
                    return Err(ApiError::SelfAppointedOffer);
                }
                self.user_repo
                    .find_active_master(master_id)
                    .await?
                    .ok_or(ApiError::UserDoesNotExist)?;
                self.offer_repo
                    .update_master(offer_id, Some(master_id))
                    .await?;
            }
        }

        info!(offer_id, ?master_id, "offers: master assignment changed");
        self.find_offer(offer_id).await
    }

    pub async fn send_grade(
        &self,
        offer_id: i64,
        acting_user_id: Uuid,
        model: SendGradeModel,
        photos: Vec<UploadedFile>,
    ) -> ApiResult<GradeEntity> {
        if !(1..=5).contains(&model.grade) {
            return Err(ApiError::BadRequest(
                "grade must be between 1 and 5".to_string(),
            ));
        }

        let offer = self.find_offer(offer_id).await?;

        let (party, valued_user_id) = if offer.owner_id == acting_user_id {
            let master_id = offer.master_id.ok_or_else(|| {
                ApiError::BadRequest("offer has no master to grade".to_string())
            })?;
            (GradeParty::Owner, master_id)
        } else if offer.master_id == Some(acting_user_id) {
            (GradeParty::Master, offer.owner_id)
        } else {
            return Err(ApiError::Forbidden(
                "only the offer owner or master can grade it".to_string(),
            ));
        };

        let slot_taken = match party {
            GradeParty::Owner => offer.owner_grade_id.is_some(),
            GradeParty::Master => offer.master_grade_id.is_some(),
        };
        if slot_taken {
            return Err(ApiError::BadRequest(
                "grade already submitted for this offer".to_string(),
            ));
        }

        self.validate_uploads(&photos)?;
        let photo_paths = self
            .store_uploads(&format!("offers/{}/grades", offer_id), &photos)
            .await?;

        let insert_grade_entity = InsertGradeEntity {
            rating_user_id: acting_user_id,
            valued_user_id,
            grade: model.grade,
            comment: model.comment,
        };

        let outcome = self
            .offer_repo
            .attach_grade(offer_id, party, insert_grade_entity, photo_paths.clone())
            .await;

        match outcome {
            Ok(AttachGradeOutcome::Attached(grade)) => {
                info!(offer_id, grade_id = grade.id, "offers: grade submitted");
                Ok(grade)
            }
            Ok(AttachGradeOutcome::SlotTaken) => {
                self.discard_uploads(&photo_paths).await;
                Err(ApiError::BadRequest(
                    "grade already submitted for this offer".to_string(),
                ))
            }
            Err(err) => {
                self.discard_uploads(&photo_paths).await;
                Err(ApiError::Internal(err))
            }
        }
    }

    async fn find_offer(&self, offer_id: i64) -> ApiResult<OfferEntity> {
        self.offer_repo
            .find_by_id(offer_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("offer".to_string()))
    }

    fn validate_uploads(&self, files: &[UploadedFile]) -> ApiResult<()> {
        if files.len() > self.max_files {
            return Err(ApiError::BadRequest(format!(
                "at most {} files per upload",
                self.max_files
            )));
        }
        for file in files {
            validate_image_upload(file, self.max_image_bytes)
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        }
        Ok(())
    }

    async fn store_uploads(
        &self,
        namespace: &str,
        files: &[UploadedFile],
    ) -> ApiResult<Vec<String>> {
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            match self
                .media
                .store(namespace, &file.filename, &file.content)
                .await
            {
                Ok(path) => paths.push(path),
                Err(err) => {
                    self.discard_uploads(&paths).await;
                    return Err(ApiError::Internal(err));
                }
            }
        }
        Ok(paths)
    }

    async fn discard_uploads(&self, paths: &[String]) {
        for path in paths {
            if let Err(err) = self.media.remove(path).await {
                warn!(path, error = ?err, "offers: failed to clean up stored file");
            }
        }
    }

    async fn notify(&self, channel: &str, payload: serde_json::Value) {
        if let Err(err) = self.notifier.publish(channel, payload).await {
            warn!(channel, error = ?err, "offers: realtime publish failed");
        }
    }
}
