use super::*;

use domain::entities::{
    plans::{PlanEntity, SubscriptionActionEntity},
    subscriptions::SubscriptionEntity,
};
use domain::repositories::{
    plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
};
use mockall::predicate::eq;

use crate::usecases::notify::MockRealtimeNotifier;

fn sample_plan(id: i64) -> PlanEntity {
    PlanEntity {
        id,
        code: "master-month".to_string(),
        name: "Master monthly".to_string(),
        role: "master".to_string(),
        cost_minor: 50000,
        currency: "RUB".to_string(),
        duration: 30,
        duration_type: "day".to_string(),
        disabled: false,
        is_default: false,
        active_date_start: None,
        active_date_end: None,
    }
}

fn sample_subscription(
    id: i64,
    user_id: Uuid,
    start_date: NaiveDate,
    expiration_date: NaiveDate,
) -> SubscriptionEntity {
    SubscriptionEntity {
        id,
        user_id,
        plan_id: 1,
        payment_id: format!("pay-{}", id),
        start_date,
        expiration_date,
        value: "Master monthly".to_string(),
        active: true,
        created_at: Utc::now(),
    }
}

struct Mocks {
    plan_repo: MockPlanRepository,
    subscription_repo: MockSubscriptionRepository,
    payment_gateway: MockPaymentGateway,
    notifier: MockRealtimeNotifier,
}

impl Mocks {
    fn new() -> Self {
        Self {
            plan_repo: MockPlanRepository::new(),
            subscription_repo: MockSubscriptionRepository::new(),
            payment_gateway: MockPaymentGateway::new(),
            notifier: MockRealtimeNotifier::new(),
        }
    }

    fn into_usecase(
        self,
    ) -> SubscriptionUseCase<
        MockPlanRepository,
        MockSubscriptionRepository,
        MockPaymentGateway,
        MockRealtimeNotifier,
    > {
        SubscriptionUseCase::new(
            Arc::new(self.plan_repo),
            Arc::new(self.subscription_repo),
            Arc::new(self.payment_gateway),
            Arc::new(self.notifier),
        )
    }
}

#[test]
fn validity_end_adds_days() {
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let end = validity_end(start, 30, DurationType::Day).unwrap();
    assert_eq!(end, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
}

#[test]
fn validity_end_adds_calendar_months() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let end = validity_end(start, 1, DurationType::Month).unwrap();
    // Clamped to the last day of the shorter month.
    assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn validity_end_adds_years() {
    let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let end = validity_end(start, 2, DurationType::Year).unwrap();
    assert_eq!(end, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
}

#[test]
fn validity_end_rejects_negative_duration() {
    let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    assert!(validity_end(start, -1, DurationType::Day).is_err());
}

#[tokio::test]
async fn list_plans_carries_the_granted_actions() {
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_list_offered()
        .returning(|_| Box::pin(async { Ok(vec![sample_plan(1)]) }));
    mocks
        .plan_repo
        .expect_list_actions()
        .with(eq(1))
        .returning(|_| {
            Box::pin(async {
                Ok(vec![SubscriptionActionEntity {
                    id: 1,
                    code: "can_take_offers".to_string(),
                    name: "Take offers".to_string(),
                    value: "true".to_string(),
                    description: String::new(),
                }])
            })
        });

    let usecase = mocks.into_usecase();
    let plans = usecase.list_plans().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].actions.len(), 1);
    assert_eq!(plans[0].actions[0].code, "can_take_offers");
}

#[tokio::test]
async fn subscribe_starts_today_without_active_subscription() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_find_by_id()
        .with(eq(1))
        .returning(|id| Box::pin(async move { Ok(Some(sample_plan(id))) }));
    mocks
        .subscription_repo
        .expect_find_active_on()
        .returning(|_, _| Box::pin(async { Ok(None) }));
    mocks
        .payment_gateway
        .expect_create_payment()
        .withf(|amount_minor, currency, _, return_url| {
            *amount_minor == 50000 && currency == "RUB" && return_url == "https://app/return"
        })
        .times(1)
        .returning(|_, _, _, _| {
            Box::pin(async {
                Ok(PaymentCreated {
                    payment_id: "pay-9".to_string(),
                    confirmation_url: "https://pay/confirm/9".to_string(),
                })
            })
        });
    mocks
        .subscription_repo
        .expect_create_pending_if_absent()
        .withf(|entity| {
            entity.payment_id == "pay-9"
                && !entity.active
                && validity_end(entity.start_date, 30, DurationType::Day).unwrap()
                    == entity.expiration_date
        })
        .times(1)
        .returning(|_| Box::pin(async { Ok(true) }));

    let usecase = mocks.into_usecase();
    let response = usecase
        .subscribe(
            user_id,
            SubscribeModel {
                plan_id: 1,
                return_url: "https://app/return".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(response.payment_id, "pay-9");
    assert_eq!(response.confirmation_url, "https://pay/confirm/9");
}

#[tokio::test]
async fn subscribe_extends_back_to_back_from_current_expiration() {
    let user_id = Uuid::new_v4();
    let current_expiration = Utc::now().date_naive() + Days::new(10);
    let current_start = Utc::now().date_naive() - Days::new(20);
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_plan(id))) }));
    mocks
        .subscription_repo
        .expect_find_active_on()
        .returning(move |_, _| {
            let current = sample_subscription(3, user_id, current_start, current_expiration);
            Box::pin(async move { Ok(Some(current)) })
        });
    mocks
        .payment_gateway
        .expect_create_payment()
        .returning(|_, _, _, _| {
            Box::pin(async {
                Ok(PaymentCreated {
                    payment_id: "pay-10".to_string(),
                    confirmation_url: "https://pay/confirm/10".to_string(),
                })
            })
        });
    mocks
        .subscription_repo
        .expect_create_pending_if_absent()
        .withf(move |entity| {
            entity.start_date == current_expiration
                && entity.expiration_date == current_expiration + Days::new(30)
        })
        .times(1)
        .returning(|_| Box::pin(async { Ok(true) }));

    let usecase = mocks.into_usecase();
    usecase
        .subscribe(
            user_id,
            SubscribeModel {
                plan_id: 1,
                return_url: "https://app/return".to_string(),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn subscribe_rejects_disabled_plan() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    mocks.plan_repo.expect_find_by_id().returning(|id| {
        Box::pin(async move {
            let mut plan = sample_plan(id);
            plan.disabled = true;
            Ok(Some(plan))
        })
    });
    // The gateway must never be reached for a disabled plan.

    let usecase = mocks.into_usecase();
    let err = usecase
        .subscribe(
            user_id,
            SubscribeModel {
                plan_id: 1,
                return_url: "https://app/return".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn subscribe_surfaces_provider_rejection_without_local_row() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_plan(id))) }));
    mocks
        .subscription_repo
        .expect_find_active_on()
        .returning(|_, _| Box::pin(async { Ok(None) }));
    mocks
        .payment_gateway
        .expect_create_payment()
        .returning(|_, _, _, _| {
            Box::pin(async { Err(anyhow::anyhow!("shop is not allowed to accept payments")) })
        });
    // No create_pending_if_absent expectation: no row may be written.

    let usecase = mocks.into_usecase();
    let err = usecase
        .subscribe(
            user_id,
            SubscribeModel {
                plan_id: 1,
                return_url: "https://app/return".to_string(),
            },
        )
        .await
        .unwrap_err();
    match err {
        ApiError::BadRequest(message) => {
            assert!(message.contains("not allowed to accept payments"));
        }
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn subscribe_tolerates_duplicate_payment_row() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_plan(id))) }));
    mocks
        .subscription_repo
        .expect_find_active_on()
        .returning(|_, _| Box::pin(async { Ok(None) }));
    mocks
        .payment_gateway
        .expect_create_payment()
        .returning(|_, _, _, _| {
            Box::pin(async {
                Ok(PaymentCreated {
                    payment_id: "pay-9".to_string(),
                    confirmation_url: "https://pay/confirm/9".to_string(),
                })
            })
        });
    mocks
        .subscription_repo
        .expect_create_pending_if_absent()
        .returning(|_| Box::pin(async { Ok(false) }));

    let usecase = mocks.into_usecase();
    let response = usecase
        .subscribe(
            user_id,
            SubscribeModel {
                plan_id: 1,
                return_url: "https://app/return".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(response.payment_id, "pay-9");
}

#[tokio::test]
async fn confirm_success_activates_and_notifies() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    let today = Utc::now().date_naive();
    mocks
        .subscription_repo
        .expect_activate_by_payment_id()
        .withf(|payment_id| payment_id == "pay-9")
        .times(1)
        .returning(move |_| {
            let subscription =
                sample_subscription(5, user_id, today, today + Days::new(30));
            Box::pin(async move { Ok(ActivationResult::Activated(subscription)) })
        });
    mocks
        .notifier
        .expect_publish()
        .withf(move |channel, _| channel == permissions_topic(user_id))
        .times(1)
        .returning(|_, _| Box::pin(async { Ok(()) }));

    let usecase = mocks.into_usecase();
    usecase.confirm_payment("pay-9", true).await.unwrap();
}

#[tokio::test]
async fn confirm_rejects_overlapping_window() {
    let mut mocks = Mocks::new();

    mocks
        .subscription_repo
        .expect_activate_by_payment_id()
        .returning(|_| Box::pin(async { Ok(ActivationResult::Overlapping) }));

    let usecase = mocks.into_usecase();
    let err = usecase.confirm_payment("pay-9", true).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn confirm_unknown_payment_is_not_found() {
    let mut mocks = Mocks::new();

    mocks
        .subscription_repo
        .expect_activate_by_payment_id()
        .returning(|_| Box::pin(async { Ok(ActivationResult::Unknown) }));

    let usecase = mocks.into_usecase();
    let err = usecase.confirm_payment("pay-0", true).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn confirm_failure_deletes_pending_row() {
    let mut mocks = Mocks::new();

    mocks
        .subscription_repo
        .expect_delete_by_payment_id()
        .withf(|payment_id| payment_id == "pay-9")
        .times(1)
        .returning(|_| Box::pin(async { Ok(1) }));
    // No activation and no notification on failure.

    let usecase = mocks.into_usecase();
    usecase.confirm_payment("pay-9", false).await.unwrap();
}

#[tokio::test]
async fn cancel_active_notifies_when_a_row_changed() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    mocks
        .subscription_repo
        .expect_deactivate_active()
        .returning(|_, _| Box::pin(async { Ok(1) }));
    mocks
        .notifier
        .expect_publish()
        .times(1)
        .returning(|_, _| Box::pin(async { Ok(()) }));

    let usecase = mocks.into_usecase();
    assert_eq!(usecase.cancel_active(user_id).await.unwrap(), 1);
}

#[tokio::test]
async fn has_active_ignores_freeze_intervals() {
    let user_id = Uuid::new_v4();
    let mut mocks = Mocks::new();

    let today = Utc::now().date_naive();
    mocks
        .subscription_repo
        .expect_find_active_on()
        .returning(move |_, _| {
            let subscription =
                sample_subscription(6, user_id, today - Days::new(1), today + Days::new(29));
            Box::pin(async move { Ok(Some(subscription)) })
        });
    // No has_freeze_on expectation: unlike entitlement resolution, this
    // helper only checks interval membership.

    let usecase = mocks.into_usecase();
    assert!(usecase.has_active(user_id).await.unwrap());
}

#[tokio::test]
async fn set_default_plan_requires_existing_plan() {
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_find_by_id()
        .returning(|_| Box::pin(async { Ok(None) }));

    let usecase = mocks.into_usecase();
    let err = usecase.set_default_plan(99).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn set_default_plan_moves_the_flag() {
    let mut mocks = Mocks::new();

    mocks
        .plan_repo
        .expect_find_by_id()
        .returning(|id| Box::pin(async move { Ok(Some(sample_plan(id))) }));
    mocks
        .plan_repo
        .expect_set_default_plan()
        .with(eq(2))
        .times(1)
        .returning(|_| Box::pin(async { Ok(()) }));

    let usecase = mocks.into_usecase();
    usecase.set_default_plan(2).await.unwrap();
}
