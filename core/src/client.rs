//! Stateless HTTP request builder for the ProsperWorks developer API.
//!
//! # Design
//! `ProsperworksClient` holds only an immutable `ClientConfig`. Each vendor
//! operation has a `build_*` method that produces an `HttpRequest`; the
//! single `parse_response` classifies whatever comes back. Executing the
//! round-trip is left to a `Transport` (see `Gateway`).
//!
//! The vendor expects POST with query parameters for every list and search
//! call, so those never carry a body.

use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{self, ApiResult};
use crate::types::{NewSubscription, RecordId};

pub const HEADER_ACCESS_TOKEN: &str = "X-PW-AccessToken";
pub const HEADER_APPLICATION: &str = "X-PW-Application";
pub const HEADER_USER_EMAIL: &str = "X-PW-UserEmail";
pub const APPLICATION_ID: &str = "developer_api";

/// Fixed sort and paging applied to every unfiltered collection fetch.
pub const LISTING_DEFAULTS: [(&str, &str); 3] = [
    ("sort_by", "date_created"),
    ("sort_direction", "asc"),
    ("page_size", "200"),
];

const USERS_PAGE: [(&str, &str); 1] = [("page_size", "200")];

/// Synchronous, stateless request builder for the ProsperWorks API.
#[derive(Debug, Clone)]
pub struct ProsperworksClient {
    config: ClientConfig,
}

impl ProsperworksClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build an authenticated request for `endpoint`, relative to the
    /// versioned base URL.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{endpoint}", self.config.base_url()),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            headers: vec![
                (HEADER_ACCESS_TOKEN.to_string(), self.config.api_key().to_string()),
                (HEADER_APPLICATION.to_string(), APPLICATION_ID.to_string()),
                (HEADER_USER_EMAIL.to_string(), self.config.email().to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }

    /// Like `build_request`, serializing `body` to JSON.
    pub fn build_json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, &str)],
        body: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(ApiError::Serialization)?;
        Ok(self.build_request(method, endpoint, query, Some(body)))
    }

    pub fn parse_response(&self, response: HttpResponse) -> ApiResult {
        response::classify(response)
    }

    // --- account & users ---

    pub fn build_get_account_info(&self) -> HttpRequest {
        self.build_request(HttpMethod::Get, "account", &[], None)
    }

    pub fn build_get_users_list(&self) -> HttpRequest {
        self.search("users", &USERS_PAGE)
    }

    pub fn build_get_user(&self, id: RecordId) -> HttpRequest {
        self.fetch("users", id)
    }

    // --- leads ---

    pub fn build_get_leads_list(&self) -> HttpRequest {
        self.search("leads", &LISTING_DEFAULTS)
    }

    pub fn build_get_lead_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("leads", id)
    }

    pub fn build_get_lead_by_email(&self, email: &str) -> HttpRequest {
        self.search("leads", &[("emails", email)])
    }

    pub fn build_get_lead_by_full_name(&self, full_name: &str) -> HttpRequest {
        self.search("leads", &[("name", full_name)])
    }

    pub fn build_get_lead_by_phone_number(&self, phone: &str) -> HttpRequest {
        self.search("leads", &[("phone_number", phone)])
    }

    pub fn build_create_new_lead<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("leads", fields)
    }

    // --- people ---

    pub fn build_get_person_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("people", id)
    }

    pub fn build_get_person_by_email(&self, email: &str) -> HttpRequest {
        self.build_request(HttpMethod::Post, "people/fetch_by_email", &[("email", email)], None)
    }

    pub fn build_get_person_by_full_name(&self, full_name: &str) -> HttpRequest {
        self.search("people", &[("name", full_name)])
    }

    pub fn build_get_person_by_phone_number(&self, phone: &str) -> HttpRequest {
        self.search("people", &[("phone_number", phone)])
    }

    pub fn build_get_list_of_people(&self) -> HttpRequest {
        self.search("people", &LISTING_DEFAULTS)
    }

    pub fn build_create_new_person<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("people", fields)
    }

    // --- companies ---

    pub fn build_get_company_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("companies", id)
    }

    pub fn build_get_company_by_full_name(&self, full_name: &str) -> HttpRequest {
        self.search("companies", &[("name", full_name)])
    }

    pub fn build_get_company_by_phone_number(&self, phone: &str) -> HttpRequest {
        self.search("companies", &[("phone_number", phone)])
    }

    pub fn build_get_list_of_companies(&self) -> HttpRequest {
        self.search("companies", &LISTING_DEFAULTS)
    }

    pub fn build_create_new_company<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("companies", fields)
    }

    // --- opportunities ---

    pub fn build_get_opportunity_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("opportunities", id)
    }

    pub fn build_get_opportunity_by_full_name(&self, full_name: &str) -> HttpRequest {
        self.search("opportunities", &[("name", full_name)])
    }

    pub fn build_get_list_of_opportunities(&self) -> HttpRequest {
        self.search("opportunities", &LISTING_DEFAULTS)
    }

    pub fn build_create_new_opportunity<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("opportunities", fields)
    }

    // --- projects ---

    pub fn build_get_project_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("projects", id)
    }

    pub fn build_get_list_of_projects(&self) -> HttpRequest {
        self.search("projects", &LISTING_DEFAULTS)
    }

    pub fn build_create_new_project<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("projects", fields)
    }

    // --- tasks ---

    pub fn build_get_task_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("tasks", id)
    }

    pub fn build_get_list_of_tasks(&self) -> HttpRequest {
        self.search("tasks", &LISTING_DEFAULTS)
    }

    pub fn build_create_new_task<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("tasks", fields)
    }

    // --- activities ---

    pub fn build_get_activity_by_id(&self, id: RecordId) -> HttpRequest {
        self.fetch("activities", id)
    }

    pub fn build_get_list_of_activities(&self) -> HttpRequest {
        self.search("activities", &LISTING_DEFAULTS)
    }

    pub fn build_create_new_activity<T: Serialize + ?Sized>(
        &self,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.create("activities", fields)
    }

    // --- webhooks ---

    pub fn build_get_list_of_subscriptions(&self) -> HttpRequest {
        self.build_request(HttpMethod::Get, "webhooks", &[], None)
    }

    pub fn build_create_new_subscription(
        &self,
        subscription: &NewSubscription,
    ) -> Result<HttpRequest, ApiError> {
        self.create("webhooks", subscription)
    }

    pub fn build_delete_subscription(&self, id: RecordId) -> HttpRequest {
        self.build_request(HttpMethod::Delete, &format!("webhooks/{id}"), &[], None)
    }

    fn fetch(&self, collection: &str, id: RecordId) -> HttpRequest {
        self.build_request(HttpMethod::Get, &format!("{collection}/{id}"), &[], None)
    }

    fn search(&self, collection: &str, query: &[(&str, &str)]) -> HttpRequest {
        self.build_request(HttpMethod::Post, &format!("{collection}/search"), query, None)
    }

    fn create<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        fields: &T,
    ) -> Result<HttpRequest, ApiError> {
        self.build_json_request(HttpMethod::Post, collection, &[], fields)
    }
}
