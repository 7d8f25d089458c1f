use fairy_shared::protocol::{ApiRequest, GetResearchRequest};
use fairy_shared::{ResearchRequest, ResearchResult};

use crate::auth::{RequestOptions, TokenAuth};
use crate::error::{ApiError, HttpError};
use crate::request::{HttpClient, HttpResponse};
use crate::storage::KeyValueStore;
use crate::web::{BrowserStorage, FetchClient};

/// 浏览器环境下使用的 API 客户端
pub type BrowserApi = FairyApi<BrowserStorage, FetchClient>;

#[derive(Clone)]
pub struct FairyApi<S, C> {
    auth: TokenAuth<S, C>,
}

impl<S, C> FairyApi<S, C>
where
    S: KeyValueStore,
    C: HttpClient,
{
    pub fn new(auth: TokenAuth<S, C>) -> Self {
        Self { auth }
    }

    fn url(&self, path: &str) -> String {
        self.auth.config().url(path)
    }

    fn decode<T: serde::de::DeserializeOwned>(res: HttpResponse) -> Result<T, ApiError> {
        match res.status {
            404 => Err(ApiError::NotFound),
            _ if !res.ok() => Err(ApiError::Status(res.status)),
            _ => Ok(res.json::<T>()?),
        }
    }

    /// 发起调研
    pub async fn start_research(&self, keyword: &str) -> Result<ResearchResult, ApiError> {
        let payload = ResearchRequest {
            user_id: self.auth.user_id()?,
            keyword: keyword.to_string(),
        };
        let body = serde_json_wasm::to_string(&payload)
            .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let res = self
            .auth
            .fetch_with_auth(
                &self.url(ResearchRequest::PATH),
                RequestOptions::new(ResearchRequest::METHOD).json_body(body),
            )
            .await?;

        Self::decode(res)
    }

    /// 获取调研结果
    pub async fn get_research(&self, uuid: &str) -> Result<ResearchResult, ApiError> {
        let req = GetResearchRequest {
            uuid: uuid.to_string(),
        };
        let res = self
            .auth
            .fetch_with_auth(
                &self.url(&req.path()),
                RequestOptions::new(GetResearchRequest::METHOD),
            )
            .await?;

        Self::decode(res)
    }
}
