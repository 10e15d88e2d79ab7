pub mod url;

pub use url::UrlBuilder;

use crate::internal::models::{
    ApiCallResponse, ApiErrorCallResponse, AuthorModel, CategoryModel, HomeContent,
    NetworkResponse, PostComment, PostCommentRequest, PostModel,
};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use strum_macros::Display;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.debugdesk.in/api";

/// Fixed request timeout, applied to every call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Path segments and query parameter names of the blog API.
pub mod endpoint {
    pub const ID: &str = "_id";
    pub const DATE: &str = "date";
    pub const TYPE: &str = "type";
    pub const TITLE: &str = "title";
    pub const POSTS: &str = "posts";
    pub const AUTHOR: &str = "author";
    pub const POST: &str = "post";
    pub const CATEGORY: &str = "category";
    pub const NEW: &str = "new";
    pub const SEARCH: &str = "search";
    pub const HOME_CONTENT: &str = "gethomecontent";
    pub const ADD_COMMENT: &str = "addcomment";
    pub const COMMENTS: &str = "comments";
    pub const UPDATE_COMMENT: &str = "updatecomment";
}

/// Outcome of the most recent API call, driving loading/error UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ResponseState {
    #[default]
    Loaded,
    Loading,
    NoData,
    NotFound,
    SomeErrorOccurred,
}

impl ResponseState {
    /// Map an HTTP status code to a response state. This mapping is the
    /// whole error taxonomy of the client; recovery is always a
    /// user-triggered refresh.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            404 => Self::NotFound,
            400 => Self::NoData,
            200 => Self::Loaded,
            _ => Self::SomeErrorOccurred,
        }
    }
}

/// HTTP client for the blog API.
///
/// One method per server endpoint. Every call flips the shared state to
/// `Loading` first and swallows transport/decode failures into
/// `NetworkResponse::Error`; nothing is retried. The shared state/message
/// pair reflects the latest call only. Per-call outcomes are the returned
/// `NetworkResponse` values and, one layer up, the `ResponseState` each
/// repository operation returns.
pub struct ApiClient {
    client: Client,
    builder: UrlBuilder,
    timeout: Duration,
    state: Arc<RwLock<ResponseState>>,
    message: Arc<RwLock<String>>,
}

impl ApiClient {
    /// Create a client against the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_settings(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_settings(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            builder: UrlBuilder::new(base_url),
            timeout,
            state: Arc::new(RwLock::new(ResponseState::default())),
            message: Arc::new(RwLock::new(String::new())),
        }
    }

    // -- shared state signal --------------------------------------------

    pub fn loading(&self) {
        self.set_state(ResponseState::Loading);
    }

    pub fn loaded(&self) {
        self.set_state(ResponseState::Loaded);
    }

    pub fn no_data(&self) {
        self.set_state(ResponseState::NoData);
    }

    pub fn not_found(&self) {
        self.set_state(ResponseState::NotFound);
    }

    pub fn some_error_occurred(&self) {
        self.set_state(ResponseState::SomeErrorOccurred);
    }

    /// Apply the status-code mapping to the shared signal.
    pub fn update_response_state(&self, status_code: u16) {
        debug!(status_code, "updating response state");
        self.set_state(ResponseState::from_status(status_code));
    }

    pub fn response_state(&self) -> ResponseState {
        self.state.read().map(|s| *s).unwrap_or_default()
    }

    pub fn update_response_message(&self, message: impl Into<String>) {
        if let Ok(mut current) = self.message.write() {
            *current = message.into();
        }
    }

    pub fn clear_message(&self) {
        self.update_response_message("");
    }

    pub fn response_message(&self) -> String {
        self.message.read().map(|m| m.clone()).unwrap_or_default()
    }

    fn set_state(&self, state: ResponseState) {
        if let Ok(mut current) = self.state.write() {
            *current = state;
        }
    }

    // -- endpoints ------------------------------------------------------

    pub fn get_home_content(&mut self) -> NetworkResponse<HomeContent> {
        self.loading();
        let url = self.builder.add_path_segment(endpoint::HOME_CONTENT).build();
        self.dispatch_get("get_home_content", &url, ApiErrorCallResponse::default())
    }

    pub fn get_author_by_id(&mut self, author_id: &str) -> NetworkResponse<AuthorModel> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::AUTHOR)
            .add_query_param(endpoint::ID, author_id)
            .build();
        self.dispatch_get(
            "get_author_by_id",
            &url,
            ApiErrorCallResponse::with_message("Author is not available with associated id."),
        )
    }

    pub fn retrieve_post(&mut self, post_id: &str) -> NetworkResponse<PostModel> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::POST)
            .add_query_param(endpoint::ID, post_id)
            .build();
        self.dispatch_get("retrieve_post", &url, ApiErrorCallResponse::default())
    }

    /// Title search.
    pub fn get_posts_by_name(&mut self, search_string: &str) -> NetworkResponse<Vec<PostModel>> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::SEARCH)
            .add_query_param(endpoint::TITLE, search_string)
            .build();
        self.dispatch_get("get_posts_by_name", &url, ApiErrorCallResponse::default())
    }

    pub fn get_posts_by_category(&mut self, category_id: &str) -> NetworkResponse<Vec<PostModel>> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::NEW)
            .add_query_param(endpoint::CATEGORY, category_id)
            .build();
        self.dispatch_get("get_posts_by_category", &url, ApiErrorCallResponse::default())
    }

    pub fn get_category_by_id(&mut self, category_id: &str) -> NetworkResponse<CategoryModel> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::CATEGORY)
            .add_query_param(endpoint::ID, category_id)
            .build();
        self.dispatch_get("get_category_by_id", &url, ApiErrorCallResponse::default())
    }

    pub fn retrieve_categories(&mut self) -> NetworkResponse<Vec<CategoryModel>> {
        self.loading();
        let url = self.builder.add_path_segment(endpoint::CATEGORY).build();
        self.dispatch_get("retrieve_categories", &url, ApiErrorCallResponse::default())
    }

    /// Posts by a given author, paged by an optional date cursor.
    pub fn get_authors_posts(
        &mut self,
        author_id: &str,
        date: Option<&str>,
    ) -> NetworkResponse<Vec<PostModel>> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::AUTHOR)
            .add_query_param_map([
                (endpoint::ID, author_id),
                (endpoint::POSTS, "true"),
                (endpoint::DATE, date.unwrap_or("")),
            ])
            .build();
        self.dispatch_get("get_authors_posts", &url, ApiErrorCallResponse::default())
    }

    /// All posts, optionally filtered by type (e.g. "popular").
    pub fn fetch_all_posts(&mut self, post_type: Option<&str>) -> NetworkResponse<Vec<PostModel>> {
        self.loading();
        let builder = self.builder.add_path_segment(endpoint::POST);
        if let Some(post_type) = post_type {
            builder.add_query_param(endpoint::TYPE, post_type);
        }
        let url = builder.build();
        self.dispatch_get("fetch_all_posts", &url, ApiErrorCallResponse::default())
    }

    pub fn add_comment(&mut self, request: &PostCommentRequest) -> NetworkResponse<String> {
        self.loading();
        let url = self.builder.add_path_segment(endpoint::ADD_COMMENT).build();
        self.dispatch_post("add_comment", &url, request)
    }

    pub fn get_comments(&mut self, post_id: &str) -> NetworkResponse<Vec<PostComment>> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::COMMENTS)
            .add_query_param(endpoint::ID, post_id)
            .build();
        self.dispatch_get("get_comments", &url, ApiErrorCallResponse::default())
    }

    pub fn update_child_comment(&mut self, request: &PostCommentRequest) -> NetworkResponse<String> {
        self.loading();
        let url = self
            .builder
            .add_path_segment(endpoint::UPDATE_COMMENT)
            .build();
        self.dispatch_post("update_child_comment", &url, request)
    }

    // -- transport ------------------------------------------------------

    fn dispatch_get<T>(
        &self,
        call: &str,
        url: &str,
        error: ApiErrorCallResponse,
    ) -> NetworkResponse<T>
    where
        T: DeserializeOwned,
    {
        match self.get_envelope(url) {
            Ok(envelope) => NetworkResponse::Success(envelope),
            Err(err) => {
                debug!(call, error = %format!("{err:#}"), "api call failed");
                NetworkResponse::Error(error)
            }
        }
    }

    fn dispatch_post<T, B>(&self, call: &str, url: &str, body: &B) -> NetworkResponse<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        match self.post_envelope(url, body) {
            Ok(envelope) => NetworkResponse::Success(envelope),
            Err(err) => {
                debug!(call, error = %format!("{err:#}"), "api call failed");
                NetworkResponse::Error(ApiErrorCallResponse::default())
            }
        }
    }

    /// GET a URL and decode the JSON envelope. Unknown fields in the body
    /// are ignored on decode.
    fn get_envelope<T>(&self, url: &str) -> Result<ApiCallResponse<T>>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .with_context(|| format!("failed to send GET request to {}", url))?;

        resp.json::<ApiCallResponse<T>>()
            .with_context(|| format!("failed to parse JSON response from {}", url))
    }

    fn post_envelope<T, B>(&self, url: &str, body: &B) -> Result<ApiCallResponse<T>>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .with_context(|| format!("failed to send POST request to {}", url))?;

        resp.json::<ApiCallResponse<T>>()
            .with_context(|| format!("failed to parse JSON response from {}", url))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ApiClient {
    /// Clones share the response state/message signal and the connection
    /// pool, so a `Repository` and a `CommentProcessor` built from the same
    /// client observe one "latest call" signal.
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            builder: self.builder.clone(),
            timeout: self.timeout,
            state: Arc::clone(&self.state),
            message: Arc::clone(&self.message),
        }
    }
}
