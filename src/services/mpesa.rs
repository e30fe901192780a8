//! M-Pesa (Daraja) STK push and its payment callback.
//!
//! The gateway flow is: fetch an OAuth token with the consumer credentials,
//! POST an STK push request for the customer's phone, then wait for the
//! gateway to call back with the outcome. Successful callbacks settle the
//! payment whose `transactionRef` matches the gateway's request id.

use crate::{
    config::MpesaConfig, entities::payment, errors::ServiceError, services::payments::PaymentService,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";
const RECEIPT_ITEM: &str = "MpesaReceiptNumber";

/// Shared client for outbound gateway calls.
pub(crate) fn gateway_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    pub order_id: i32,
}

/// `yyyyMMddHHmmss` in UTC, as the gateway expects.
pub fn stk_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

pub fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{}{}{}", shortcode, passkey, timestamp))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushBody<'a> {
    business_short_code: &'a str,
    password: String,
    timestamp: String,
    transaction_type: &'static str,
    amount: Decimal,
    party_a: &'a str,
    party_b: &'a str,
    phone_number: &'a str,
    #[serde(rename = "CallBackURL")]
    call_back_url: &'a str,
    account_reference: String,
    transaction_desc: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Payload the gateway POSTs to the callback URL.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CallbackEnvelope {
    #[serde(rename = "Body", default)]
    pub body: Option<CallbackBody>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CallbackBody {
    #[serde(rename = "stkCallback", default)]
    pub stk_callback: Option<StkCallback>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: Option<String>,
    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: Option<String>,
    #[serde(default)]
    pub result_code: Option<i64>,
    #[serde(default)]
    pub result_desc: Option<String>,
    #[serde(default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CallbackItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default)]
    #[schema(value_type = Object)]
    pub value: Option<Value>,
}

impl StkCallback {
    pub fn succeeded(&self) -> bool {
        self.result_code == Some(0)
    }

    /// Request id used to find the pending payment.
    pub fn reference(&self) -> Option<&str> {
        self.merchant_request_id
            .as_deref()
            .or(self.checkout_request_id.as_deref())
    }

    pub fn receipt_number(&self) -> Option<String> {
        let item = self
            .callback_metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.name == RECEIPT_ITEM)?;
        match item.value.as_ref()? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MpesaService {
    config: MpesaConfig,
    client: Client,
    payments: PaymentService,
}

impl MpesaService {
    pub fn new(config: MpesaConfig, payments: PaymentService) -> Self {
        Self::with_client(config, payments, gateway_client())
    }

    pub fn with_client(config: MpesaConfig, payments: PaymentService, client: Client) -> Self {
        Self {
            config,
            client,
            payments,
        }
    }

    fn credential<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ServiceError> {
        value.as_deref().filter(|v| !v.is_empty()).ok_or_else(|| {
            ServiceError::ServiceUnavailable(format!("M-Pesa is not configured ({} missing)", name))
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<String, ServiceError> {
        let key = Self::credential(&self.config.consumer_key, "consumer key")?;
        let secret = Self::credential(&self.config.consumer_secret, "consumer secret")?;

        let response = self
            .client
            .get(self.url("/oauth/v1/generate"))
            .query(&[("grant_type", "client_credentials")])
            .basic_auth(key, Some(secret))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "M-Pesa token request failed with status {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Sends an STK push to the customer's phone and returns the gateway's answer as-is.
    #[instrument(skip(self))]
    pub async fn initiate(&self, request: InitiatePaymentRequest) -> Result<Value, ServiceError> {
        if !self.config.is_configured() {
            return Err(ServiceError::ServiceUnavailable(
                "M-Pesa is not configured".to_string(),
            ));
        }
        let shortcode = Self::credential(&self.config.shortcode, "shortcode")?;
        let passkey = Self::credential(&self.config.passkey, "passkey")?;
        let callback_url = Self::credential(&self.config.callback_url, "callback url")?;

        let token = self.access_token().await?;
        let timestamp = stk_timestamp(Utc::now());
        let body = StkPushBody {
            business_short_code: shortcode,
            password: stk_password(shortcode, passkey, &timestamp),
            timestamp,
            transaction_type: TRANSACTION_TYPE,
            amount: request.amount,
            party_a: &request.phone,
            party_b: shortcode,
            phone_number: &request.phone,
            call_back_url: callback_url,
            account_reference: format!("ORDER{}", request.order_id),
            transaction_desc: format!("Payment for order #{}", request.order_id),
        };

        let response = self
            .client
            .post(self.url("/mpesa/stkpush/v1/processrequest"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "STK push rejected");
            return Err(ServiceError::ExternalServiceError(format!(
                "M-Pesa STK push failed (status: {}): {}",
                status, text
            )));
        }

        info!(order_id = request.order_id, "STK push sent");
        Ok(response.json().await?)
    }

    /// Applies a gateway callback. Failed or unmatched callbacks are ignored.
    #[instrument(skip(self, envelope))]
    pub async fn handle_callback(
        &self,
        envelope: CallbackEnvelope,
    ) -> Result<Option<payment::Model>, ServiceError> {
        let Some(callback) = envelope.body.and_then(|b| b.stk_callback) else {
            warn!("callback without stkCallback body");
            return Ok(None);
        };
        if !callback.succeeded() {
            info!(result_code = ?callback.result_code, desc = ?callback.result_desc, "payment not completed");
            return Ok(None);
        }
        let Some(reference) = callback.reference() else {
            return Ok(None);
        };

        self.payments
            .settle_by_reference(reference, callback.receipt_number())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use wiremock::{
        matchers::{header, header_exists, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn payments() -> PaymentService {
        PaymentService::new(Arc::new(sea_orm::DatabaseConnection::Disconnected))
    }

    fn configured(base_url: String) -> MpesaConfig {
        MpesaConfig {
            base_url,
            consumer_key: Some("key".into()),
            consumer_secret: Some("secret".into()),
            shortcode: Some("174379".into()),
            passkey: Some("passkey".into()),
            callback_url: Some("https://pos.example.com/api/payments/mpesa/callback".into()),
        }
    }

    fn request() -> InitiatePaymentRequest {
        InitiatePaymentRequest {
            amount: Decimal::new(1500, 0),
            phone: "254700000001".into(),
            order_id: 42,
        }
    }

    #[test]
    fn timestamp_and_password_match_gateway_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let ts = stk_timestamp(now);
        assert_eq!(ts, "20240309070501");
        assert_eq!(
            stk_password("174379", "pk", &ts),
            STANDARD.encode("174379pk20240309070501")
        );
    }

    #[test]
    fn callback_parsing_prefers_merchant_request_id() {
        let envelope: CallbackEnvelope = serde_json::from_value(serde_json::json!({
            "Body": {"stkCallback": {
                "MerchantRequestID": "m-1",
                "CheckoutRequestID": "c-1",
                "ResultCode": 0,
                "CallbackMetadata": {"Item": [
                    {"Name": "Amount", "Value": 1500},
                    {"Name": "MpesaReceiptNumber", "Value": "QKJ7XYZ"}
                ]}
            }}
        }))
        .unwrap();
        let callback = envelope.body.unwrap().stk_callback.unwrap();
        assert!(callback.succeeded());
        assert_eq!(callback.reference(), Some("m-1"));
        assert_eq!(callback.receipt_number().as_deref(), Some("QKJ7XYZ"));
    }

    #[tokio::test]
    async fn unconfigured_gateway_is_unavailable() {
        let service = MpesaService::new(MpesaConfig::default(), payments());
        let err = service.initiate(request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn failed_callback_is_ignored() {
        let service = MpesaService::new(MpesaConfig::default(), payments());
        let envelope: CallbackEnvelope = serde_json::from_value(serde_json::json!({
            "Body": {"stkCallback": {"MerchantRequestID": "m-1", "ResultCode": 1032}}
        }))
        .unwrap();
        assert!(service.handle_callback(envelope).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stk_push_fetches_token_then_posts_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/v1/generate"))
            .and(query_param("grant_type", "client_credentials"))
            .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "tok", "expires_in": "3599"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .and(header("authorization", "Bearer tok"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "MerchantRequestID": "m-1",
                "CheckoutRequestID": "c-1",
                "ResponseCode": "0"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = MpesaService::new(configured(server.uri()), payments());
        let answer = service.initiate(request()).await.unwrap();
        assert_eq!(answer["MerchantRequestID"], "m-1");

        let received = server.received_requests().await.unwrap();
        let push: Value = serde_json::from_slice(&received[1].body).unwrap();
        assert_eq!(push["AccountReference"], "ORDER42");
        assert_eq!(push["TransactionDesc"], "Payment for order #42");
        assert_eq!(push["PartyB"], "174379");
        assert_eq!(push["TransactionType"], "CustomerPayBillOnline");
    }

    #[tokio::test]
    async fn gateway_rejection_is_a_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/v1/generate"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let service = MpesaService::new(configured(server.uri()), payments());
        let err = service.initiate(request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::ExternalServiceError(_)));
    }
}
