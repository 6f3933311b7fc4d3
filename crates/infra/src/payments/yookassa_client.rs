use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

/// Minimal YooKassa client built on reqwest.
pub struct YookassaClient {
    http: reqwest::Client,
    shop_id: String,
    secret_key: String,
    api_url: String,
}

/// Pending payment created at the provider. The confirmation URL is where the
/// user completes the payment.
#[derive(Debug, Clone)]
pub struct PaymentCreated {
    pub payment_id: String,
    pub confirmation_url: String,
}

#[derive(Debug, Deserialize)]
struct YookassaPayment {
    id: String,
    confirmation: Option<YookassaConfirmation>,
}

#[derive(Debug, Deserialize)]
struct YookassaConfirmation {
    confirmation_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YookassaErrorEnvelope {
    code: Option<String>,
    description: Option<String>,
}

/// Inbound webhook notification: `{event, object: {id, status}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YookassaNotification {
    pub event: String,
    pub object: YookassaPaymentObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YookassaPaymentObject {
    pub id: String,
    pub status: Option<String>,
}

impl YookassaNotification {
    pub fn succeeded(&self) -> bool {
        self.event == "payment.succeeded"
    }
}

/// Formats minor units as the decimal string the provider expects.
pub fn format_amount(amount_minor: i32) -> String {
    format!("{}.{:02}", amount_minor / 100, amount_minor % 100)
}

impl YookassaClient {
    pub fn new(shop_id: String, secret_key: String, api_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            shop_id,
            secret_key,
            api_url,
        }
    }

    pub async fn create_payment(
        &self,
        amount_minor: i32,
        currency: &str,
        description: &str,
        return_url: &str,
    ) -> Result<PaymentCreated> {
        let body = json!({
            "amount": {
                "value": format_amount(amount_minor),
                "currency": currency,
            },
            "capture": true,
            "confirmation": {
                "type": "redirect",
                "return_url": return_url,
            },
            "description": description,
        });

        let response = self
            .http
            .post(format!("{}/payments", self.api_url))
            .basic_auth(&self.shop_id, Some(&self.secret_key))
            .header("Idempotence-Key", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .context("payment provider is unreachable")?;

        if !response.status().is_success() {
            let status = response.status();
            let envelope = response
                .json::<YookassaErrorEnvelope>()
                .await
                .unwrap_or(YookassaErrorEnvelope {
                    code: None,
                    description: None,
                });
            let detail = envelope
                .description
                .or(envelope.code)
                .unwrap_or_else(|| status.to_string());
            error!(%status, detail, "yookassa: create payment rejected");
            return Err(anyhow!("{}", detail));
        }

        let payment = response
            .json::<YookassaPayment>()
            .await
            .context("invalid payment provider response")?;

        let confirmation_url = payment
            .confirmation
            .and_then(|confirmation| confirmation.confirmation_url)
            .ok_or_else(|| anyhow!("payment {} has no confirmation url", payment.id))?;

        Ok(PaymentCreated {
            payment_id: payment.id,
            confirmation_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minor_units_as_decimal() {
        assert_eq!(format_amount(50000), "500.00");
        assert_eq!(format_amount(509), "5.09");
        assert_eq!(format_amount(100), "1.00");
        assert_eq!(format_amount(7), "0.07");
    }

    #[test]
    fn notification_success_event() {
        let notification: YookassaNotification = serde_json::from_value(json!({
            "event": "payment.succeeded",
            "object": {"id": "pay-1", "status": "succeeded"}
        }))
        .unwrap();
        assert!(notification.succeeded());

        let canceled: YookassaNotification = serde_json::from_value(json!({
            "event": "payment.canceled",
            "object": {"id": "pay-2", "status": "canceled"}
        }))
        .unwrap();
        assert!(!canceled.succeeded());
    }
}
