use crate::{ResearchRequest, ResearchResult, TokenRequest, TokenResponse};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Request Definitions
// =========================================================

/// Issue a bearer token for a client identifier
impl ApiRequest for TokenRequest {
    type Response = TokenResponse;
    const PATH: &'static str = "/api/auth/token";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Start a research run
impl ApiRequest for ResearchRequest {
    type Response = ResearchResult;
    const PATH: &'static str = "/api/research";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Fetch a finished research result by its uuid
#[derive(Debug, Serialize, Deserialize)]
pub struct GetResearchRequest {
    pub uuid: String,
}

impl GetResearchRequest {
    /// The path carries the uuid as its last segment.
    pub fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.uuid)
    }
}

impl ApiRequest for GetResearchRequest {
    type Response = ResearchResult;
    const PATH: &'static str = "/api/research";
    const METHOD: HttpMethod = HttpMethod::Get;
}
