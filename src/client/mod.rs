//! REST client for the persistence API behind the console.
//!
//! Every call goes through [`ApiClient::send`], which applies the shared 401
//! contract: the session is invalidated and the caller receives
//! [`ConsoleError::Unauthorized`] carrying the login entry point.

pub mod session;

use std::sync::Arc;

use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::models::customer::Customer;
use crate::models::design::{DesignFields, DesignRecord, RecordId};
use crate::models::qr_record::QrRecord;
use crate::structs::customer_request::{CustomerUpdate, NewCustomer};
use crate::structs::qr_code_request::QrCodeForm;
pub use session::Session;

/// Saved-design endpoints of the persistence API.
#[allow(async_fn_in_trait)]
pub trait DesignApi {
    async fn list_designs(&self, qr_id: &RecordId) -> Result<Vec<DesignRecord>, ConsoleError>;
    async fn create_design(
        &self,
        qr_id: &RecordId,
        fields: &DesignFields,
    ) -> Result<DesignRecord, ConsoleError>;
    async fn delete_design(&self, design_id: &RecordId) -> Result<(), ConsoleError>;
}

/// Customer endpoints of the persistence API.
#[allow(async_fn_in_trait)]
pub trait CustomerApi {
    async fn list_customers(&self) -> Result<Vec<Customer>, ConsoleError>;
    async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<serde_json::Value, ConsoleError>;
    async fn update_customer(
        &self,
        customer_id: &RecordId,
        customer: &CustomerUpdate,
    ) -> Result<serde_json::Value, ConsoleError>;
    async fn delete_customer(&self, customer_id: &RecordId) -> Result<(), ConsoleError>;
}

/// Per-customer QR code records.
#[allow(async_fn_in_trait)]
pub trait QrCodeApi {
    async fn list_qr_codes(&self, customer_id: &RecordId) -> Result<Vec<QrRecord>, ConsoleError>;
    async fn create_qr_code(
        &self,
        customer_id: &RecordId,
        qr: &QrCodeForm,
    ) -> Result<serde_json::Value, ConsoleError>;
    async fn update_qr_code(
        &self,
        qr_id: &RecordId,
        qr: &QrCodeForm,
    ) -> Result<serde_json::Value, ConsoleError>;
}

#[derive(Deserialize)]
struct BaseUrlResponse {
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// `http` is a pooled client shared across requests.
    pub fn new(http: Client, base: &str, session: Arc<Session>) -> Self {
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base, path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ConsoleError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        if status == StatusCode::UNAUTHORIZED {
            warn!("Upstream rejected the session token, invalidating session");
            self.session.invalidate();
            return Err(ConsoleError::Unauthorized {
                login_url: self.session.login_url().to_string(),
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ConsoleError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConsoleError> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConsoleError> {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Legacy `GET /api/base_url`, used when no redirect base is configured.
    pub async fn fetch_base_url(&self) -> Result<String, ConsoleError> {
        let body: BaseUrlResponse = self.get_json("/api/base_url").await?;
        Ok(body.base_url)
    }
}

impl DesignApi for ApiClient {
    async fn list_designs(&self, qr_id: &RecordId) -> Result<Vec<DesignRecord>, ConsoleError> {
        self.get_json(&format!("/api/qr/{}/designs", qr_id)).await
    }

    async fn create_design(
        &self,
        qr_id: &RecordId,
        fields: &DesignFields,
    ) -> Result<DesignRecord, ConsoleError> {
        self.post_json(&format!("/api/qr/{}/designs", qr_id), fields)
            .await
    }

    async fn delete_design(&self, design_id: &RecordId) -> Result<(), ConsoleError> {
        self.delete(&format!("/api/designs/{}", design_id)).await
    }
}

impl CustomerApi for ApiClient {
    async fn list_customers(&self) -> Result<Vec<Customer>, ConsoleError> {
        self.get_json("/api/customers").await
    }

    async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<serde_json::Value, ConsoleError> {
        self.post_json("/api/customers", customer).await
    }

    async fn update_customer(
        &self,
        customer_id: &RecordId,
        customer: &CustomerUpdate,
    ) -> Result<serde_json::Value, ConsoleError> {
        self.put_json(&format!("/api/customers/{}", customer_id), customer)
            .await
    }

    async fn delete_customer(&self, customer_id: &RecordId) -> Result<(), ConsoleError> {
        self.delete(&format!("/api/customers/{}", customer_id)).await
    }
}

impl QrCodeApi for ApiClient {
    async fn list_qr_codes(&self, customer_id: &RecordId) -> Result<Vec<QrRecord>, ConsoleError> {
        self.get_json(&format!("/api/customers/{}/qrcodes", customer_id))
            .await
    }

    async fn create_qr_code(
        &self,
        customer_id: &RecordId,
        qr: &QrCodeForm,
    ) -> Result<serde_json::Value, ConsoleError> {
        self.post_json(&format!("/api/customers/{}/qrcodes", customer_id), qr)
            .await
    }

    async fn update_qr_code(
        &self,
        qr_id: &RecordId,
        qr: &QrCodeForm,
    ) -> Result<serde_json::Value, ConsoleError> {
        self.put_json(&format!("/api/qrcodes/{}", qr_id), qr).await
    }
}
