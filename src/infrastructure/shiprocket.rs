//! Shiprocket client: bearer-token auth plus the two calls the dispatcher
//! makes (adhoc order creation, AWB assignment).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::ports::LogisticsProvider;
use crate::domain::shipping::{AwbAssignment, LogisticsOrder, LogisticsOrderRequest};

pub const DEFAULT_API_BASE: &str = "https://apiv2.shiprocket.in/v1/external";

pub struct ShiprocketClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    password: String,
}

impl ShiprocketClient {
    pub fn new(email: String, password: String) -> Self {
        Self::with_base_url(email, password, DEFAULT_API_BASE.to_string())
    }

    pub fn with_base_url(email: String, password: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            email,
            password,
        }
    }

    /// Exchange credentials for a bearer token. Tokens are not cached; each
    /// provider call authenticates afresh.
    async fn authenticate(&self) -> Result<String, DomainError> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest {
                email: &self.email,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| DomainError::Shipping(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::Shipping(format!(
                "authentication failed: {}",
                response.status()
            )));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Shipping(e.to_string()))?;
        Ok(login.token)
    }
}

#[async_trait]
impl LogisticsProvider for ShiprocketClient {
    async fn create_order(
        &self,
        request: LogisticsOrderRequest,
    ) -> Result<LogisticsOrder, DomainError> {
        #[derive(Deserialize)]
        struct CreateOrderResponse {
            order_id: Option<i64>,
            shipment_id: Option<i64>,
            #[serde(default)]
            courier_company_id: Option<i64>,
            #[serde(default)]
            courier_name: Option<String>,
        }

        let token = self.authenticate().await?;
        let response = self
            .http
            .post(format!("{}/orders/create/adhoc", self.base_url))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Shipping(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Shipping(format!(
                "order creation failed ({status}): {body}"
            )));
        }

        let created: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Shipping(e.to_string()))?;

        let order_id = created
            .order_id
            .ok_or_else(|| DomainError::Shipping("response missing order_id".to_string()))?;
        let shipment_id = created
            .shipment_id
            .ok_or_else(|| DomainError::Shipping("response missing shipment_id".to_string()))?;

        Ok(LogisticsOrder {
            order_id: order_id.to_string(),
            shipment_id: shipment_id.to_string(),
            courier_id: created.courier_company_id.map(|id| id.to_string()),
            courier_name: created.courier_name,
        })
    }

    async fn assign_awb(
        &self,
        shipment_id: &str,
        courier_id: Option<&str>,
    ) -> Result<AwbAssignment, DomainError> {
        #[derive(Serialize)]
        struct AwbRequest<'a> {
            shipment_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            courier_id: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct AwbResponse {
            awb_code: Option<String>,
        }

        let token = self.authenticate().await?;
        let response = self
            .http
            .post(format!("{}/courier/assign/awb", self.base_url))
            .bearer_auth(token)
            .json(&AwbRequest {
                shipment_id,
                courier_id,
            })
            .send()
            .await
            .map_err(|e| DomainError::Shipping(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Shipping(format!(
                "AWB assignment failed ({status}): {body}"
            )));
        }

        let assigned: AwbResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Shipping(e.to_string()))?;

        let awb_code = assigned
            .awb_code
            .ok_or_else(|| DomainError::Shipping("response missing awb_code".to_string()))?;

        Ok(AwbAssignment { awb_code })
    }
}
