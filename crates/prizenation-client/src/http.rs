// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use prizenation_api::routes::{self, Endpoint, HttpMethod};
use prizenation_api::{
    AdminOrdersResponse, AdminStats, ApiError, AuthResponse, CheckoutRequest, CheckoutResponse,
    CompetitionPayload, CouponResponse, EntriesResponse, LoginRequest, RegisterRequest,
    UpdateCartRequest, UploadResponse, ValidationReport, WinnerLookup,
};
use prizenation_core::ClientConfig;
use prizenation_model::{
    Cart, CartItem, Competition, CompetitionId, Order, OrderId, PaymentMethod, Theme,
    TicketNumber, User,
};
use prizenation_storefront::{CompetitionForm, MediaKind, UploadCheck};
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ClientError;

fn verb(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Blocking client for the `/api` backend. One call, one request: no
/// retries and no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            config,
            client,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.config.api_base(), endpoint.path)
    }

    fn builder(&self, endpoint: &Endpoint) -> Result<RequestBuilder, ClientError> {
        if endpoint.requires_auth() && self.token.is_none() {
            return Err(ClientError::Unauthenticated);
        }
        let mut req = self.client.request(verb(endpoint.method), self.url(endpoint));
        if !endpoint.query.is_empty() {
            req = req.query(&endpoint.query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    fn execute(&self, endpoint: &Endpoint, req: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let started = Instant::now();
        let resp = req.send().map_err(|e| {
            warn!(method = %endpoint.method, path = %endpoint.path, error = %e, "api transport failure");
            ClientError::Transport(e.to_string())
        })?;
        let status = resp.status();
        let body = resp
            .bytes()
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .to_vec();
        debug!(
            method = %endpoint.method,
            path = %endpoint.path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api request"
        );
        if !status.is_success() {
            let err = ApiError::from_response_body(status.as_u16(), &body);
            warn!(method = %endpoint.method, path = %endpoint.path, status = status.as_u16(), message = ?err.message, "api error response");
            return Err(ClientError::Api(err));
        }
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(endpoint: &Endpoint, body: &[u8]) -> Result<T, ClientError> {
        serde_json::from_slice(body).map_err(|e| ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ClientError> {
        let body = self.execute(&endpoint, self.builder(&endpoint)?)?;
        Self::decode(&endpoint, &body)
    }

    fn submit<B, T>(&self, endpoint: Endpoint, payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(&endpoint, self.builder(&endpoint)?.json(payload))?;
        Self::decode(&endpoint, &body)
    }

    /// Sends and ignores whatever acknowledgement comes back.
    fn ack<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        payload: Option<&B>,
    ) -> Result<(), ClientError> {
        let mut req = self.builder(&endpoint)?;
        if let Some(payload) = payload {
            req = req.json(payload);
        }
        self.execute(&endpoint, req).map(|_| ())
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.submit(routes::register(), request)
    }

    pub fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.submit(routes::login(), request)
    }

    pub fn me(&self) -> Result<User, ClientError> {
        self.fetch(routes::me())
    }

    pub fn competitions(&self, tag: Option<&str>) -> Result<Vec<Competition>, ClientError> {
        self.fetch(routes::competitions(tag))
    }

    pub fn competition(&self, id: &CompetitionId) -> Result<Competition, ClientError> {
        self.fetch(routes::competition(id))
    }

    pub fn create_competition(
        &self,
        payload: &CompetitionPayload,
    ) -> Result<Competition, ClientError> {
        self.submit(routes::create_competition(), payload)
    }

    pub fn update_competition(
        &self,
        id: &CompetitionId,
        payload: &CompetitionPayload,
    ) -> Result<(), ClientError> {
        self.ack(routes::update_competition(id), Some(payload))
    }

    /// Validates the form first; an invalid form never reaches the network.
    /// Returns the created competition, or `None` after an update.
    pub fn save_competition(
        &self,
        id: Option<&CompetitionId>,
        form: &CompetitionForm,
    ) -> Result<Option<Competition>, ClientError> {
        let payload = form.to_payload()?;
        match id {
            Some(id) => self.update_competition(id, &payload).map(|()| None),
            None => self.create_competition(&payload).map(Some),
        }
    }

    pub fn delete_competition(&self, id: &CompetitionId) -> Result<(), ClientError> {
        self.ack::<()>(routes::delete_competition(id), None)
    }

    pub fn cart(&self) -> Result<Cart, ClientError> {
        self.fetch(routes::cart())
    }

    pub fn add_to_cart(&self, item: &CartItem) -> Result<(), ClientError> {
        self.ack(routes::cart_add(), Some(item))
    }

    pub fn update_cart(&self, id: &CompetitionId, quantity: u32) -> Result<(), ClientError> {
        let body = UpdateCartRequest {
            competition_id: id.clone(),
            quantity,
        };
        self.ack(routes::cart_update(), Some(&body))
    }

    pub fn clear_cart(&self) -> Result<(), ClientError> {
        self.ack::<()>(routes::cart_clear(), None)
    }

    pub fn apply_coupon(&self, code: &str) -> Result<CouponResponse, ClientError> {
        let endpoint = routes::apply_coupon(code.trim());
        let body = self.execute(&endpoint, self.builder(&endpoint)?)?;
        Self::decode(&endpoint, &body)
    }

    pub fn validate_checkout(&self) -> Result<ValidationReport, ClientError> {
        let endpoint = routes::checkout_validate();
        let body = self.execute(&endpoint, self.builder(&endpoint)?)?;
        Self::decode(&endpoint, &body)
    }

    pub fn complete_checkout(
        &self,
        payment_method: PaymentMethod,
    ) -> Result<CheckoutResponse, ClientError> {
        self.submit(
            routes::checkout_complete(),
            &CheckoutRequest { payment_method },
        )
    }

    pub fn orders(&self) -> Result<Vec<Order>, ClientError> {
        self.fetch(routes::orders())
    }

    pub fn order(&self, id: &OrderId) -> Result<Order, ClientError> {
        self.fetch(routes::order(id))
    }

    pub fn theme(&self) -> Result<Theme, ClientError> {
        self.fetch(routes::theme())
    }

    pub fn update_theme(&self, theme: &Theme) -> Result<(), ClientError> {
        self.ack(routes::update_theme(), Some(theme))
    }

    pub fn admin_stats(&self) -> Result<AdminStats, ClientError> {
        self.fetch(routes::admin_stats())
    }

    pub fn competition_entries(&self, id: &CompetitionId) -> Result<EntriesResponse, ClientError> {
        self.fetch(routes::admin_entries(id))
    }

    /// The ticket number is posted as a bare JSON integer.
    pub fn find_winner(
        &self,
        id: &CompetitionId,
        ticket: TicketNumber,
    ) -> Result<WinnerLookup, ClientError> {
        self.submit(routes::find_winner(id), &ticket.get())
    }

    pub fn mark_winner(&self, id: &CompetitionId, ticket: TicketNumber) -> Result<(), ClientError> {
        self.ack(routes::mark_winner(id), Some(&ticket.get()))
    }

    pub fn admin_orders(&self) -> Result<AdminOrdersResponse, ClientError> {
        self.fetch(routes::admin_orders())
    }

    /// Posts a media file after the local size guard and returns its
    /// kind with the absolute URL the backend serves it from.
    pub fn upload(&self, path: &Path) -> Result<(MediaKind, String), ClientError> {
        let size = fs::metadata(path)
            .map_err(|source| ClientError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        let check = UploadCheck::inspect(path, size).map_err(|m| ClientError::invalid("file", m))?;
        let form = multipart::Form::new()
            .file("file", path)
            .map_err(|source| ClientError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let endpoint = routes::upload();
        let body = self.execute(&endpoint, self.builder(&endpoint)?.multipart(form))?;
        let uploaded: UploadResponse = Self::decode(&endpoint, &body)?;
        Ok((check.kind, self.config.absolute_url(&uploaded.url)))
    }
}
