//! Blocking HTTP gateway for the ProsperWorks API.
//!
//! # Design
//! `Gateway` pairs the stateless `ProsperworksClient` with a `Transport`.
//! Every call is build, send, classify: one attempt, no retries, no
//! interpretation of the payload. The transport is a type parameter so tests
//! and embedders can swap in their own HTTP stack.

use serde::Serialize;

use crate::client::ProsperworksClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::ApiResult;
use crate::transport::{Transport, UreqTransport};
use crate::types::{NewSubscription, RecordId};

/// Executes ProsperWorks operations over a blocking transport.
#[derive(Debug, Clone)]
pub struct Gateway<T = UreqTransport> {
    client: ProsperworksClient,
    transport: T,
}

impl Gateway<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Gateway<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ProsperworksClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ProsperworksClient {
        &self.client
    }

    /// Issue an arbitrary request against `endpoint`, relative to the
    /// versioned base URL.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> ApiResult {
        self.execute(self.client.build_request(method, endpoint, query, body))
    }

    /// Like `request`, serializing `body` to JSON first.
    pub fn request_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> ApiResult {
        self.execute(self.client.build_json_request(method, endpoint, query, body)?)
    }

    /// Send a prepared request and classify the response.
    pub fn execute(&self, request: HttpRequest) -> ApiResult {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(&request).map_err(ApiError::Transport)?;
        tracing::debug!(status = response.status, url = %request.url, "received response");

        let result = self.client.parse_response(response);
        if let Err(ApiError::Status { kind, status, .. }) = &result {
            tracing::warn!(%kind, status, method = %request.method, url = %request.url, "request failed");
        }
        result
    }

    // --- account & users ---

    pub fn get_account_info(&self) -> ApiResult {
        self.execute(self.client.build_get_account_info())
    }

    pub fn get_users_list(&self) -> ApiResult {
        self.execute(self.client.build_get_users_list())
    }

    pub fn get_user(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_user(id))
    }

    // --- leads ---

    pub fn get_leads_list(&self) -> ApiResult {
        self.execute(self.client.build_get_leads_list())
    }

    pub fn get_lead_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_lead_by_id(id))
    }

    pub fn get_lead_by_email(&self, email: &str) -> ApiResult {
        self.execute(self.client.build_get_lead_by_email(email))
    }

    pub fn get_lead_by_full_name(&self, full_name: &str) -> ApiResult {
        self.execute(self.client.build_get_lead_by_full_name(full_name))
    }

    pub fn get_lead_by_phone_number(&self, phone: &str) -> ApiResult {
        self.execute(self.client.build_get_lead_by_phone_number(phone))
    }

    pub fn create_new_lead<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_lead(fields)?)
    }

    // --- people ---

    pub fn get_person_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_person_by_id(id))
    }

    pub fn get_person_by_email(&self, email: &str) -> ApiResult {
        self.execute(self.client.build_get_person_by_email(email))
    }

    pub fn get_person_by_full_name(&self, full_name: &str) -> ApiResult {
        self.execute(self.client.build_get_person_by_full_name(full_name))
    }

    pub fn get_person_by_phone_number(&self, phone: &str) -> ApiResult {
        self.execute(self.client.build_get_person_by_phone_number(phone))
    }

    pub fn get_list_of_people(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_people())
    }

    pub fn create_new_person<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_person(fields)?)
    }

    // --- companies ---

    pub fn get_company_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_company_by_id(id))
    }

    pub fn get_company_by_full_name(&self, full_name: &str) -> ApiResult {
        self.execute(self.client.build_get_company_by_full_name(full_name))
    }

    pub fn get_company_by_phone_number(&self, phone: &str) -> ApiResult {
        self.execute(self.client.build_get_company_by_phone_number(phone))
    }

    pub fn get_list_of_companies(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_companies())
    }

    pub fn create_new_company<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_company(fields)?)
    }

    // --- opportunities ---

    pub fn get_opportunity_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_opportunity_by_id(id))
    }

    pub fn get_opportunity_by_full_name(&self, full_name: &str) -> ApiResult {
        self.execute(self.client.build_get_opportunity_by_full_name(full_name))
    }

    pub fn get_list_of_opportunities(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_opportunities())
    }

    pub fn create_new_opportunity<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_opportunity(fields)?)
    }

    // --- projects ---

    pub fn get_project_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_project_by_id(id))
    }

    pub fn get_list_of_projects(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_projects())
    }

    pub fn create_new_project<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_project(fields)?)
    }

    // --- tasks ---

    pub fn get_task_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_task_by_id(id))
    }

    pub fn get_list_of_tasks(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_tasks())
    }

    pub fn create_new_task<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_task(fields)?)
    }

    // --- activities ---

    pub fn get_activity_by_id(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_get_activity_by_id(id))
    }

    pub fn get_list_of_activities(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_activities())
    }

    pub fn create_new_activity<B: Serialize + ?Sized>(&self, fields: &B) -> ApiResult {
        self.execute(self.client.build_create_new_activity(fields)?)
    }

    // --- webhooks ---

    pub fn get_list_of_subscriptions(&self) -> ApiResult {
        self.execute(self.client.build_get_list_of_subscriptions())
    }

    pub fn create_new_subscription(&self, subscription: &NewSubscription) -> ApiResult {
        self.execute(self.client.build_create_new_subscription(subscription)?)
    }

    pub fn delete_subscription(&self, id: RecordId) -> ApiResult {
        self.execute(self.client.build_delete_subscription(id))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use serde_json::json;

    use super::*;
    use crate::error::{ErrorKind, TransportError};
    use crate::http::HttpResponse;
    use crate::response::Payload;

    /// Records requests and replays canned responses in order.
    #[derive(Default)]
    struct Scripted {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<Result<HttpResponse, String>>>,
    }

    impl Scripted {
        fn reply(self, status: u16, content_type: &str, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: vec![("content-type".to_string(), content_type.to_string())],
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.responses.borrow_mut().push_back(Err(message.to_string()));
            self
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            match self.responses.borrow_mut().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(message.into()),
                None => Err("no scripted response".into()),
            }
        }
    }

    fn gateway(transport: &Scripted) -> Gateway<&Scripted> {
        Gateway::with_transport(ClientConfig::new("key", "me@example.com"), transport)
    }

    #[test]
    fn get_lead_by_email_sends_search_and_returns_payload() {
        let transport = Scripted::default().reply(200, "application/json", r#"[{"id":1}]"#);
        let result = gateway(&transport).get_lead_by_email("a@b.com").unwrap();
        assert_eq!(result, Some(Payload::Json(json!([{"id": 1}]))));

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Post);
        assert!(sent.url.ends_with("/v1/leads/search"));
        assert_eq!(sent.query, vec![("emails".to_string(), "a@b.com".to_string())]);
        assert!(sent.body.is_none());
    }

    #[test]
    fn create_new_project_sends_body_only() {
        let transport = Scripted::default().reply(200, "application/json", r#"{"id":9,"name":"X"}"#);
        gateway(&transport).create_new_project(&json!({"name": "X"})).unwrap();

        let sent = transport.last_request();
        assert!(sent.url.ends_with("/v1/projects"));
        assert!(sent.query.is_empty());
        assert_eq!(sent.body.as_deref(), Some(r#"{"name":"X"}"#));
    }

    #[test]
    fn delete_subscription_no_content() {
        let transport = Scripted::default().reply(204, "application/json", "");
        assert_eq!(gateway(&transport).delete_subscription(5).unwrap(), None);
        assert_eq!(transport.last_request().method, HttpMethod::Delete);
    }

    #[test]
    fn classified_failure_reaches_caller() {
        let transport =
            Scripted::default().reply(401, "application/json", r#"{"message":"bad token"}"#);
        let err = gateway(&transport).get_account_info().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Unauthorized));
        assert_eq!(err.payload(), Some(&Payload::Json(json!({"message": "bad token"}))));
    }

    #[test]
    fn transport_failure_is_not_classified() {
        let transport = Scripted::default().fail("connection refused");
        let err = gateway(&transport).get_users_list().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.kind().is_none());
    }

    #[test]
    fn generic_request_supports_patch() {
        let transport = Scripted::default().reply(200, "application/json", r#"{"id":3}"#);
        gateway(&transport)
            .request_json(HttpMethod::Patch, "leads/3", &[], &json!({"details": "x"}))
            .unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert!(sent.url.ends_with("/v1/leads/3"));
    }

    #[test]
    fn each_call_is_a_single_attempt() {
        let transport = Scripted::default()
            .reply(503, "text/plain", "maintenance")
            .reply(200, "application/json", "{}");
        let err = gateway(&transport).get_list_of_tasks().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ServiceUnavailable));
        assert_eq!(transport.requests.borrow().len(), 1);
    }
}
