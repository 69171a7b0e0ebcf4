//! Generic CRUD client over a REST resource collection.
//!
//! # Design
//! `CrudClient` carries the five REST verbs as provided methods; an
//! implementor only supplies its collection URL and the shared transport.
//! Each verb is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; the async method
//! of the same name runs `build -> execute -> parse`. Futures returned by the
//! async methods are lazy: no request leaves the process until they are
//! polled, and each poll-to-completion issues exactly one request.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Characters escaped when an id is placed in a path. `/`, `?` and `#` would
/// otherwise split the id into extra segments, a query or a fragment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'[')
    .add(b']');

/// An entity type addressable as a REST collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Path segment of the collection, e.g. `"roles"`.
    const COLLECTION: &'static str;
}

/// The standard REST verbs over one resource collection.
#[async_trait]
pub trait CrudClient: Send + Sync {
    type Item: Resource;

    /// The collection URL every request is addressed to.
    fn url(&self) -> &str;

    fn transport(&self) -> &Arc<dyn HttpTransport>;

    /// Send a request through the shared transport.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport().execute(request).await
    }

    async fn find_all(&self) -> Result<Vec<Self::Item>, ApiError> {
        let response = self.execute(self.build_find_all()).await?;
        self.parse_find_all(response)
    }

    async fn find_by_id(&self, id: &str) -> Result<Self::Item, ApiError> {
        let request = self.build_find_by_id(id)?;
        let response = self.execute(request).await?;
        self.parse_find_by_id(response)
    }

    async fn save(&self, item: &Self::Item) -> Result<Value, ApiError> {
        let request = self.build_save(item)?;
        let response = self.execute(request).await?;
        self.parse_save(response)
    }

    async fn update(&self, id: &str, item: &Self::Item) -> Result<Value, ApiError> {
        let request = self.build_update(id, item)?;
        let response = self.execute(request).await?;
        self.parse_update(response)
    }

    async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        let request = self.build_delete(id)?;
        let response = self.execute(request).await?;
        self.parse_delete(response)
    }

    fn build_find_all(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url().to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn build_find_by_id(&self, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: item_url(self.url(), id)?,
            headers: Vec::new(),
            body: None,
        })
    }

    fn build_save(&self, item: &Self::Item) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url().to_string(),
            headers: json_headers(),
            body: Some(to_json(item)?),
        })
    }

    fn build_update(&self, id: &str, item: &Self::Item) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: item_url(self.url(), id)?,
            headers: json_headers(),
            body: Some(to_json(item)?),
        })
    }

    fn build_delete(&self, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: item_url(self.url(), id)?,
            headers: Vec::new(),
            body: None,
        })
    }

    fn parse_find_all(&self, response: HttpResponse) -> Result<Vec<Self::Item>, ApiError> {
        parse_json(response)
    }

    fn parse_find_by_id(&self, response: HttpResponse) -> Result<Self::Item, ApiError> {
        parse_json(response)
    }

    fn parse_save(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_untyped(response)
    }

    fn parse_update(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_untyped(response)
    }

    fn parse_delete(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_untyped(response)
    }
}

/// `CrudClient` for any `Resource`, addressed at `<host>/<T::COLLECTION>`.
pub struct ResourceClient<T> {
    url: String,
    transport: Arc<dyn HttpTransport>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceClient<T> {
    /// A trailing slash on `host` is ignored.
    pub fn new(host: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            url: format!("{}/{}", host.trim_end_matches('/'), T::COLLECTION),
            transport,
            _resource: PhantomData,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(config.host(), transport)
    }
}

impl<T: Resource> CrudClient for ResourceClient<T> {
    type Item = T;

    fn url(&self) -> &str {
        &self.url
    }

    fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            transport: Arc::clone(&self.transport),
            _resource: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient").field("url", &self.url).finish_non_exhaustive()
    }
}

/// `<url>/<id>` with `id` kept as exactly one segment. Empty and dot
/// segments are refused because URL normalization would resolve them to a
/// different resource even when escaped.
fn item_url(url: &str, id: &str) -> Result<String, ApiError> {
    if matches!(id, "" | "." | "..") {
        return Err(ApiError::InvalidId(id.to_string()));
    }
    Ok(format!("{url}/{}", utf8_percent_encode(id, PATH_SEGMENT)))
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<S: Serialize>(value: &S) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

pub(crate) fn parse_json<D: DeserializeOwned>(response: HttpResponse) -> Result<D, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Empty bodies (typical for DELETE) parse as `Value::Null`.
pub(crate) fn parse_untyped(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
