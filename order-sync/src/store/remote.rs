//! Account-scoped order store on the remote preference service
//!
//! `GET  {base}/api/accounts/{account_id}/preferences/{scope}` → JSON array, 404 when unset
//! `PUT  {base}/api/accounts/{account_id}/preferences/{scope}` ← JSON array

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use shared::error::ApiResponse;
use shared::models::{OrderList, Scope};

use super::{Backend, OrderStore, Session, decode_order};
use crate::error::{StoreError, StoreResult};

/// 远程偏好存储 (已登录账户)
#[derive(Debug, Clone)]
pub struct RemoteOrderStore {
    client: Client,
    base_url: Url,
    session: Session,
}

impl RemoteOrderStore {
    /// Account ids `""`, `"."` and `".."` are rejected: they cannot be
    /// carried as a single path segment.
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> StoreResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }
        if matches!(session.account_id.as_str(), "" | "." | "..") {
            return Err(StoreError::InvalidAccountId(session.account_id.clone()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Record URL, with `account_id` percent-encoded as one path segment
    fn url(&self, scope: Scope) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "accounts",
                self.session.account_id.as_str(),
                "preferences",
                scope.remote_key(),
            ]);
        Ok(url)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.session.token)
    }

    /// Map a non-success response to an error
    async fn error_from(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return StoreError::Http(e),
        };
        // 尝试解析为 API 错误响应
        if let Ok(api_err) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            && let Some(code) = api_err.code
        {
            return StoreError::Api {
                code,
                message: api_err.message,
            };
        }
        match status {
            StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
            _ => StoreError::Status {
                status: status.as_u16(),
                body: text,
            },
        }
    }
}

#[async_trait]
impl OrderStore for RemoteOrderStore {
    fn backend(&self) -> Backend {
        Backend::Remote
    }

    async fn load(&self, scope: Scope) -> StoreResult<Option<OrderList>> {
        let response = self
            .client
            .get(self.url(scope)?)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let bytes = response.bytes().await?;
        Ok(decode_order(scope, Backend::Remote, &bytes))
    }

    async fn save(&self, scope: Scope, order: &OrderList) -> StoreResult<()> {
        let response = self
            .client
            .put(self.url(scope)?)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(order)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        tracing::debug!(
            %scope,
            account_id = %self.session.account_id,
            len = order.len(),
            "Order saved to remote store"
        );
        Ok(())
    }
}
