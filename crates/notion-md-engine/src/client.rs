//! Blocking HTTP client for the Notion block children endpoint.

use serde::Deserialize;
use std::time::Duration;

use crate::error::ConvertError;
use crate::fetch::ChildrenSource;
use crate::models::{BlockId, BlockPage};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized: the token is invalid or the page is not shared with the integration")]
    Unauthorized,
    #[error("HTTP {status} ({code}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Rate limiting, server errors and transport failures may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Transport(_) => true,
            ApiError::Unauthorized | ApiError::Decode(_) => false,
        }
    }

    fn from_status(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            code: String,
            #[serde(default)]
            message: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(err) => ApiError::Status {
                status,
                code: err.code,
                message: err.message,
            },
            Err(_) => ApiError::Status {
                status,
                code: "unknown".to_string(),
                message: body.trim().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub notion_version: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct NotionClient {
    agent: ureq::Agent,
    token: String,
    settings: ClientSettings,
}

impl NotionClient {
    pub fn new(token: impl Into<String>, settings: ClientSettings) -> Result<Self, ConvertError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConvertError::Auth("integration token is empty".to_string()));
        }

        let agent = ureq::AgentBuilder::new().timeout(settings.timeout).build();
        Ok(Self {
            agent,
            token,
            settings,
        })
    }

    fn children_url(&self, block_id: &BlockId) -> String {
        format!(
            "{}/v1/blocks/{block_id}/children",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn page_size(&self) -> u32 {
        self.settings.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl ChildrenSource for NotionClient {
    fn list_children(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, ApiError> {
        let mut request = self
            .agent
            .get(&self.children_url(block_id))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Notion-Version", &self.settings.notion_version)
            .query("page_size", &self.page_size().to_string());
        if let Some(cursor) = cursor {
            request = request.query("start_cursor", cursor);
        }

        match request.call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                Ok(serde_json::from_str(&body)?)
            }
            Err(ureq::Error::Status(401, _)) => Err(ApiError::Unauthorized),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(ApiError::from_status(status, &body))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(ApiError::Transport(transport.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_id() -> BlockId {
        BlockId::resolve("cec1568190834e1fa0ae72d268507aab").unwrap()
    }

    #[test]
    fn empty_token_is_an_auth_error() {
        let result = NotionClient::new("  ", ClientSettings::default());
        assert!(matches!(result, Err(ConvertError::Auth(_))));
    }

    #[test]
    fn children_url_uses_canonical_id() {
        let settings = ClientSettings {
            base_url: "http://localhost:8080/".to_string(),
            ..ClientSettings::default()
        };
        let client = NotionClient::new("secret", settings).unwrap();

        assert_eq!(
            client.children_url(&block_id()),
            "http://localhost:8080/v1/blocks/cec15681-9083-4e1f-a0ae-72d268507aab/children"
        );
    }

    #[test]
    fn page_size_is_clamped() {
        let settings = ClientSettings {
            page_size: 500,
            ..ClientSettings::default()
        };
        let client = NotionClient::new("secret", settings).unwrap();
        assert_eq!(client.page_size(), MAX_PAGE_SIZE);

        let settings = ClientSettings {
            page_size: 0,
            ..ClientSettings::default()
        };
        let client = NotionClient::new("secret", settings).unwrap();
        assert_eq!(client.page_size(), 1);
    }

    #[test]
    fn status_error_uses_api_error_body() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find block"}"#;

        let err = ApiError::from_status(404, body);

        assert_eq!(
            err.to_string(),
            "HTTP 404 (object_not_found): Could not find block"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn status_error_falls_back_to_raw_body() {
        let err = ApiError::from_status(502, "Bad Gateway\n");

        assert_eq!(err.to_string(), "HTTP 502 (unknown): Bad Gateway");
        assert!(err.is_retryable());
    }

    #[test]
    fn rate_limit_is_retryable() {
        let err = ApiError::from_status(429, r#"{"code":"rate_limited","message":"slow down"}"#);
        assert!(err.is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(ApiError::Transport("connection reset".to_string()).is_retryable());
    }
}
