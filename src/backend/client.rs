use prost::Message;
use thiserror::Error;

use super::{proto, INTERNAL_KEY_HEADER};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("backend returned {status}: {message}")]
    Remote { status: u16, message: String },
}

/// Typed client for the backend facade. Errors come back verbatim; there is
/// no retry and no circuit breaking.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    shared_secret: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            shared_secret: shared_secret.into(),
        }
    }

    pub async fn list_games(
        &self,
        pagination: proto::PaginationRequest,
    ) -> Result<proto::ListGamesResponse, BackendError> {
        let request = proto::ListGamesRequest { pagination: Some(pagination) };
        self.call("/backend/games/list", &request).await
    }

    pub async fn search_games(
        &self,
        query: impl Into<String>,
        pagination: proto::PaginationRequest,
    ) -> Result<proto::ListGamesResponse, BackendError> {
        let request = proto::SearchGamesRequest {
            pagination: Some(pagination),
            query: query.into(),
        };
        self.call("/backend/games/search", &request).await
    }

    pub async fn list_groups(
        &self,
        pagination: proto::PaginationRequest,
    ) -> Result<proto::ListGroupsResponse, BackendError> {
        let request = proto::ListGroupsRequest { pagination: Some(pagination) };
        self.call("/backend/groups/list", &request).await
    }

    async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, BackendError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("content-type", "application/x-protobuf")
            .header(INTERNAL_KEY_HEADER, self.shared_secret.as_str())
            .body(request.encode_to_vec())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(BackendError::Remote {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Resp::decode(body.as_ref())?)
    }
}
