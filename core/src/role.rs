//! Role resources: the entity, its page envelope and `RoleClient`.
//!
//! `RoleClient` is a `CrudClient` over `Role` plus paginated listing and two
//! broadcast channels that let independent parts of an application learn
//! that the role list changed or that a status message was posted.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::broadcast::{Broadcast, Subscription};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::resource::{parse_json, parse_untyped, CrudClient, Resource, ResourceClient};

pub const ACTIVE: i32 = 1;

fn active() -> i32 {
    ACTIVE
}

/// A named permission set. `id_role` is assigned by the server on create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_role: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "active")]
    pub status: i32,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id_role: None,
            name: name.into(),
            description: None,
            status: ACTIVE,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Identity in the string form used for request paths.
    pub fn id(&self) -> Option<String> {
        self.id_role.map(|id| id.to_string())
    }
}

impl Resource for Role {
    const COLLECTION: &'static str = "roles";
}

/// One page of a server-side paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number_of_elements: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

/// Client for `/roles` with change notification channels.
///
/// Clones share the transport and both channels.
#[derive(Debug, Clone)]
pub struct RoleClient {
    resource: ResourceClient<Role>,
    role_change: Broadcast<Vec<Role>>,
    message_change: Broadcast<String>,
}

impl RoleClient {
    pub fn new(host: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            resource: ResourceClient::new(host, transport),
            role_change: Broadcast::new(),
            message_change: Broadcast::new(),
        }
    }

    pub fn from_config(config: &ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(config.host(), transport)
    }

    /// Page bounds are passed through as-is; the server decides what is valid.
    pub fn build_list_pageable(&self, page_number: u32, page_size: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/pageable?page={page_number}&size={page_size}",
                self.url()
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_pageable(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_untyped(response)
    }

    pub fn parse_list_page(&self, response: HttpResponse) -> Result<Page<Role>, ApiError> {
        parse_json(response)
    }

    /// Fetch one page as the raw envelope the server returned.
    pub async fn list_pageable(&self, page_number: u32, page_size: u32) -> Result<Value, ApiError> {
        let request = self.build_list_pageable(page_number, page_size);
        let response = self.execute(request).await?;
        self.parse_list_pageable(response)
    }

    pub async fn list_page(&self, page_number: u32, page_size: u32) -> Result<Page<Role>, ApiError> {
        let request = self.build_list_pageable(page_number, page_size);
        let response = self.execute(request).await?;
        self.parse_list_page(response)
    }

    /// Announce a new role list. Returns the number of subscribers reached.
    pub fn set_role_change(&self, roles: Vec<Role>) -> usize {
        self.role_change.emit(roles)
    }

    pub fn role_change(&self) -> Subscription<Vec<Role>> {
        self.role_change.subscribe()
    }

    pub fn set_message_change(&self, message: impl Into<String>) -> usize {
        self.message_change.emit(message.into())
    }

    pub fn message_change(&self) -> Subscription<String> {
        self.message_change.subscribe()
    }
}

impl CrudClient for RoleClient {
    type Item = Role;

    fn url(&self) -> &str {
        self.resource.url()
    }

    fn transport(&self) -> &Arc<dyn HttpTransport> {
        self.resource.transport()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct Offline;

    #[async_trait]
    impl HttpTransport for Offline {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
    }

    fn client() -> RoleClient {
        RoleClient::new("http://localhost:8080", Arc::new(Offline))
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn roles_live_under_roles_collection() {
        assert_eq!(client().url(), "http://localhost:8080/roles");
        assert_eq!(client().build_find_by_id("r1").unwrap().path, "http://localhost:8080/roles/r1");
    }

    #[test]
    fn build_list_pageable_produces_query() {
        let req = client().build_list_pageable(2, 10);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/roles/pageable?page=2&size=10");
        assert!(req.body.is_none());
    }

    #[test]
    fn new_role_serializes_without_id() {
        let role = Role::new("OPERATOR").with_description("Traffic operations");
        let json = serde_json::to_value(&role).unwrap();
        assert!(json.get("idRole").is_none());
        assert_eq!(json["name"], "OPERATOR");
        assert_eq!(json["description"], "Traffic operations");
        assert_eq!(json["status"], 1);
    }

    #[test]
    fn role_reads_camel_case_id() {
        let role: Role = serde_json::from_str(
            r#"{"idRole":"00000000-0000-0000-0000-000000000001","name":"ADMIN","status":0}"#,
        )
        .unwrap();
        assert_eq!(role.id().as_deref(), Some("00000000-0000-0000-0000-000000000001"));
        assert_eq!(role.status, 0);
        assert!(role.description.is_none());
    }

    #[test]
    fn parse_list_pageable_keeps_envelope_untouched() {
        let body = r#"{"content":[],"totalElements":0,"pageable":{"sort":{"empty":true}}}"#;
        let page = client().parse_list_pageable(ok(body)).unwrap();
        assert_eq!(page["pageable"]["sort"]["empty"], true);
    }

    #[test]
    fn parse_list_page_ignores_unknown_fields() {
        let body = r#"{
            "content":[{"idRole":"00000000-0000-0000-0000-000000000002","name":"INSTALLER","status":1}],
            "totalElements":11,"totalPages":6,"number":5,"size":2,
            "numberOfElements":1,"first":false,"last":true,"empty":false,
            "sort":{"sorted":false}
        }"#;
        let page = client().parse_list_page(ok(body)).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "INSTALLER");
        assert_eq!(page.total_elements, 11);
        assert!(page.last);
    }

    #[tokio::test]
    async fn role_change_reaches_active_subscriber_once() {
        let client = client();
        let mut sub = client.role_change();
        let roles = vec![Role::new("A"), Role::new("B")];

        assert_eq!(client.set_role_change(roles.clone()), 1);
        assert_eq!(sub.recv().await, Some(roles));
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn message_and_role_channels_are_independent() {
        let client = client();
        let mut roles = client.role_change();
        let mut messages = client.message_change();

        client.set_message_change("Role saved");
        assert_eq!(messages.recv().await.as_deref(), Some("Role saved"));
        assert_eq!(roles.try_recv(), None);
    }

    #[tokio::test]
    async fn clones_share_channels() {
        let client = client();
        let mut sub = client.message_change();
        client.clone().set_message_change("from clone");
        assert_eq!(sub.recv().await.as_deref(), Some("from clone"));
    }
}
