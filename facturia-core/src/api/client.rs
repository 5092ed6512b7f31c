use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::api::types::{
    ApiResponse, DashboardQuery, DeletedId, InvoiceQuery, Page, PaginatedResponse, SupplierQuery,
    TopSuppliersQuery,
};
use crate::api::{AnalyticsApi, ApiError, HealthApi, InvoiceApi, SupplierApi};
use crate::config::DashboardConfig;
use crate::models::{DashboardData, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, Supplier};

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// reqwest-backed client for the invoice backend.
///
/// Every request carries a JSON content type, the configured timeout and,
/// when present, a bearer token.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApiClient {
    /// Creates a client for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            config.api_timeout,
            config.api_token.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("API request: {} {}", method, url);

        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and decodes the body into `T`.
    ///
    /// Non-2xx statuses become `ApiError::Status` carrying the backend's
    /// error text when it sent one.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            error!("API request error: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let url = response.url().to_string();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            error!("API response error: {} {} ({})", status.as_u16(), url, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("API response: {} {}", status.as_u16(), url);
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send::<ApiResponse<T>>(builder).await?.into_result()
    }

    async fn send_page<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Page<T>, ApiError> {
        self.send::<PaginatedResponse<T>>(builder).await?.into_page()
    }
}

#[async_trait]
impl InvoiceApi for HttpApiClient {
    #[instrument(skip(self))]
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Page<Invoice>, ApiError> {
        self.send_page(self.request(Method::GET, "/invoices").query(query))
            .await
    }

    #[instrument(skip(self))]
    async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError> {
        self.send_data(self.request(Method::GET, &format!("/invoices/{}", id)))
            .await
    }

    #[instrument(skip(self, invoice))]
    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, ApiError> {
        self.send_data(self.request(Method::POST, "/invoices").json(invoice))
            .await
    }

    #[instrument(skip(self, changes))]
    async fn update_invoice(&self, id: i64, changes: &InvoiceChanges) -> Result<Invoice, ApiError> {
        self.send_data(self.request(Method::PUT, &format!("/invoices/{}", id)).json(changes))
            .await
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice, ApiError> {
        self.send_data(
            self.request(Method::PATCH, &format!("/invoices/{}/status", id))
                .json(&json!({ "status": status })),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_invoice(&self, id: i64) -> Result<i64, ApiError> {
        let deleted: DeletedId = self
            .send_data(self.request(Method::DELETE, &format!("/invoices/{}", id)))
            .await?;
        Ok(deleted.id)
    }
}

#[async_trait]
impl SupplierApi for HttpApiClient {
    #[instrument(skip(self))]
    async fn list_suppliers(&self, query: &SupplierQuery) -> Result<Page<Supplier>, ApiError> {
        self.send_page(self.request(Method::GET, "/suppliers").query(query))
            .await
    }

    #[instrument(skip(self))]
    async fn top_suppliers(&self, query: &TopSuppliersQuery) -> Result<Value, ApiError> {
        self.send_data(self.request(Method::GET, "/suppliers/analytics/top").query(query))
            .await
    }
}

#[async_trait]
impl AnalyticsApi for HttpApiClient {
    #[instrument(skip(self))]
    async fn dashboard(&self, query: &DashboardQuery) -> Result<DashboardData, ApiError> {
        self.send_data(self.request(Method::GET, "/analytics/dashboard").query(query))
            .await
    }

    #[instrument(skip(self))]
    async fn monthly_summary(
        &self,
        company_phone: &str,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![("company_phone", company_phone.to_string())];
        if let Some(year) = year {
            params.push(("year", year.to_string()));
        }
        if let Some(month) = month {
            params.push(("month", month.to_string()));
        }
        self.send_data(self.request(Method::GET, "/analytics/monthly").query(&params))
            .await
    }

    #[instrument(skip(self))]
    async fn trends(&self, company_phone: &str, period: Option<&str>) -> Result<Value, ApiError> {
        let mut params = vec![("company_phone", company_phone)];
        if let Some(period) = period {
            params.push(("period", period));
        }
        self.send_data(self.request(Method::GET, "/analytics/trends").query(&params))
            .await
    }

    #[instrument(skip(self))]
    async fn predictions(&self, company_phone: &str) -> Result<Value, ApiError> {
        self.send_data(
            self.request(Method::GET, "/analytics/predictions")
                .query(&[("company_phone", company_phone)]),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn cashflow(&self, company_phone: &str, months: Option<u32>) -> Result<Value, ApiError> {
        let mut params = vec![("company_phone", company_phone.to_string())];
        if let Some(months) = months {
            params.push(("months", months.to_string()));
        }
        self.send_data(self.request(Method::GET, "/analytics/cashflow").query(&params))
            .await
    }
}

#[async_trait]
impl HealthApi for HttpApiClient {
    async fn health(&self) -> Result<Value, ApiError> {
        self.send_data(self.request(Method::GET, "/health")).await
    }

    async fn system_metrics(&self) -> Result<Value, ApiError> {
        self.send_data(self.request(Method::GET, "/health/metrics"))
            .await
    }
}
