use std::time::Duration;

use board_logging::{board_debug, board_warn};
use futures_util::StreamExt;
use jobboard_core::Id;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{ApiError, FailureKind, Resource, SessionContext};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// REST access to the data API's collections.
///
/// Records travel as raw JSON; the typed helpers in this module decode them.
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync {
    /// `GET /{resource}?field=value...`
    async fn list(&self, resource: Resource, query: &[(&str, &str)]) -> Result<Vec<Value>, ApiError>;

    /// `GET /{resource}/{id}`
    async fn get(&self, resource: Resource, id: &Id) -> Result<Value, ApiError>;

    /// `POST /{resource}`; the server assigns the id.
    async fn create(&self, resource: Resource, body: Value) -> Result<Value, ApiError>;

    /// `PUT /{resource}/{id}`
    async fn replace(&self, resource: Resource, id: &Id, body: Value) -> Result<Value, ApiError>;

    /// `PATCH /{resource}/{id}`
    async fn patch(&self, resource: Resource, id: &Id, body: Value) -> Result<Value, ApiError>;

    /// `DELETE /{resource}/{id}`
    async fn delete(&self, resource: Resource, id: &Id) -> Result<(), ApiError>;
}

pub struct ReqwestClient {
    settings: ApiSettings,
    base: Url,
    http: reqwest::Client,
    session: SessionContext,
}

impl ReqwestClient {
    pub fn new(settings: ApiSettings, session: SessionContext) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            http,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn endpoint(&self, resource: Resource, id: Option<&Id>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ApiError::new(FailureKind::InvalidUrl, "base url cannot have path segments")
            })?;
            segments.pop_if_empty().push(resource.path());
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        board_debug!("{} {}", method, url);
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.session.bearer() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            if self.session.end().is_some() {
                board_warn!("{} {} answered 401; session ended", method, url);
            }
            return Err(ApiError::new(FailureKind::Unauthorized, status.to_string()));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::new(FailureKind::NotFound, url.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ResourceClient for ReqwestClient {
    async fn list(&self, resource: Resource, query: &[(&str, &str)]) -> Result<Vec<Value>, ApiError> {
        let mut url = self.endpoint(resource, None)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        match self.send(Method::GET, url, None).await? {
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(ApiError::new(
                FailureKind::Decode,
                format!("expected a list from {resource}, got {}", json_kind(&other)),
            )),
            None => Ok(Vec::new()),
        }
    }

    async fn get(&self, resource: Resource, id: &Id) -> Result<Value, ApiError> {
        let url = self.endpoint(resource, Some(id))?;
        expect_body(self.send(Method::GET, url, None).await?, resource)
    }

    async fn create(&self, resource: Resource, body: Value) -> Result<Value, ApiError> {
        let url = self.endpoint(resource, None)?;
        expect_body(self.send(Method::POST, url, Some(&body)).await?, resource)
    }

    async fn replace(&self, resource: Resource, id: &Id, body: Value) -> Result<Value, ApiError> {
        let url = self.endpoint(resource, Some(id))?;
        expect_body(self.send(Method::PUT, url, Some(&body)).await?, resource)
    }

    async fn patch(&self, resource: Resource, id: &Id, body: Value) -> Result<Value, ApiError> {
        let url = self.endpoint(resource, Some(id))?;
        expect_body(self.send(Method::PATCH, url, Some(&body)).await?, resource)
    }

    async fn delete(&self, resource: Resource, id: &Id) -> Result<(), ApiError> {
        let url = self.endpoint(resource, Some(id))?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}

/// Lists `resource` and decodes every row; rows that do not decode are
/// skipped and logged.
pub async fn list_as<T: DeserializeOwned>(
    client: &dyn ResourceClient,
    resource: Resource,
    query: &[(&str, &str)],
) -> Result<Vec<T>, ApiError> {
    let rows = client.list(resource, query).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match decode::<T>(row) {
            Ok(record) => Some(record),
            Err(err) => {
                board_warn!("Skipping malformed {} row: {}", resource, err);
                None
            }
        })
        .collect())
}

pub async fn get_as<T: DeserializeOwned>(
    client: &dyn ResourceClient,
    resource: Resource,
    id: &Id,
) -> Result<T, ApiError> {
    decode(client.get(resource, id).await?)
}

pub async fn create_as<T: DeserializeOwned, B: Serialize + Sync>(
    client: &dyn ResourceClient,
    resource: Resource,
    body: &B,
) -> Result<T, ApiError> {
    decode(client.create(resource, encode(body)?).await?)
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

pub(crate) fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn expect_body(body: Option<Value>, resource: Resource) -> Result<Value, ApiError> {
    body.ok_or_else(|| {
        ApiError::new(
            FailureKind::Decode,
            format!("empty response body from {resource}"),
        )
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
