use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use domain::{
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        plans::PlanDto,
        subscriptions::{CurrentSubscriptionDto, SubscribeModel, SubscribeResponse},
    },
};
use infra::{
    payments::yookassa_client::{YookassaClient, YookassaNotification},
    postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
    },
    realtime::centrifugo_client::CentrifugoClient,
};
use serde_json::json;
use tracing::info;

use crate::{
    auth::AuthUser,
    config::config_model::DotEnvyConfig,
    usecases::{
        entitlements::{ActionGate, EntitlementResolver},
        error::ApiError,
        notify::RealtimeNotifier,
        subscriptions::{PaymentGateway, SubscriptionUseCase},
    },
};

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repo = Arc::new(PlanPostgres::new(Arc::clone(&db_pool)));
    let subscription_repo = Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool)));
    let payment_gateway = Arc::new(YookassaClient::new(
        config.payments.shop_id.clone(),
        config.payments.secret_key.clone(),
        config.payments.api_url.clone(),
    ));
    let notifier = Arc::new(CentrifugoClient::new(
        config.realtime.api_url.clone(),
        config.realtime.api_key.clone(),
    ));

    let subscriptions_usecase = SubscriptionUseCase::new(
        Arc::clone(&plan_repo),
        Arc::clone(&subscription_repo),
        payment_gateway,
        notifier,
    );
    let entitlement_resolver = EntitlementResolver::new(plan_repo, subscription_repo);

    Router::new()
        .route("/plans", get(list_plans))
        .route("/current", get(current))
        .route("/subscribe", post(subscribe))
        .route("/cancel", post(cancel))
        .route("/payments/webhook", post(payment_webhook))
        .with_state(Arc::new(subscriptions_usecase))
        .merge(
            Router::new()
                .route("/actions/:code", get(check_action))
                .with_state(Arc::new(entitlement_resolver)),
        )
}

pub async fn list_plans<P, S, G, N>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, G, N>>>,
    _auth: AuthUser,
) -> Result<Json<Vec<PlanDto>>, ApiError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    let plans = subscriptions_usecase.list_plans().await?;
    Ok(Json(plans))
}

pub async fn current<P, S, G, N>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, G, N>>>,
    auth: AuthUser,
) -> Result<Json<CurrentSubscriptionDto>, ApiError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    let current = subscriptions_usecase.current(auth.user_id).await?;
    Ok(Json(current))
}

pub async fn check_action<P, S>(
    State(entitlement_resolver): State<Arc<EntitlementResolver<P, S>>>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let allowed = entitlement_resolver
        .check_action(auth.user_id, &code)
        .await?;
    Ok(Json(json!({"action": code, "allowed": allowed})))
}

pub async fn subscribe<P, S, G, N>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, G, N>>>,
    auth: AuthUser,
    Json(model): Json<SubscribeModel>,
) -> Result<Json<SubscribeResponse>, ApiError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    let response = subscriptions_usecase.subscribe(auth.user_id, model).await?;
    Ok(Json(response))
}

pub async fn cancel<P, S, G, N>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, G, N>>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    let canceled = subscriptions_usecase.cancel_active(auth.user_id).await?;
    Ok(Json(json!({"canceled": canceled})))
}

/// Payment-provider callback; authenticated upstream by the provider's IP
/// allowlist, not by a bearer token.
pub async fn payment_webhook<P, S, G, N>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, G, N>>>,
    Json(notification): Json<YookassaNotification>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    info!(
        event = %notification.event,
        payment_id = %notification.object.id,
        "subscriptions: payment webhook received"
    );
    subscriptions_usecase
        .confirm_payment(&notification.object.id, notification.succeeded())
        .await?;
    Ok(Json(json!({"detail": "ok"})))
}
