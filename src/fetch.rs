//! Remote retrieval of pages and block trees.
//!
//! The client is always passed explicitly; concurrency across documents is
//! bounded by a caller-owned [`Semaphore`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::Semaphore;
//! use unnotion::fetch::{fetch_documents, NotionClient};
//!
//! # async fn run() -> unnotion::Result<()> {
//! let client = Arc::new(NotionClient::new("secret_token")?);
//! let pages = client.query_database("database-id").await?;
//! let ids = pages.into_iter().map(|p| p.id).collect();
//! let docs = fetch_documents(client, ids, Arc::new(Semaphore::new(4))).await;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::load::Listing;
use crate::model::{Block, Document, Page};

/// API version sent with every request.
pub const API_VERSION: &str = "2022-06-28";

/// Public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Largest page size the API accepts.
const PAGE_SIZE: u32 = 100;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error body returned by the API.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Authenticated API client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    /// Create a client with a default HTTP stack.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("unnotion/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, token))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(http: Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Endpoint in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Notion-Version", API_VERSION)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// One page of a block's children.
    pub async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<Listing<Block>> {
        let mut request = self
            .http
            .get(self.endpoint(&format!("blocks/{}/children", block_id)))
            .query(&[("page_size", PAGE_SIZE.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }
        Self::send(self.authorize(request)).await
    }

    /// Every direct child of a block, following pagination.
    pub async fn list_all_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let mut children = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let listing = self.list_children(block_id, cursor.as_deref()).await?;
            children.extend(listing.results);

            match listing.next_cursor {
                Some(next) if listing.has_more => cursor = Some(next),
                _ => break,
            }
        }

        log::debug!("Fetched {} children of {}", children.len(), block_id);
        Ok(children)
    }

    /// The fully materialized subtree below a block.
    pub fn fetch_block_tree<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, Result<Vec<Block>>> {
        Box::pin(async move {
            let mut children = self.list_all_children(block_id).await?;
            for child in &mut children {
                if child.has_children && !child.kind.is_subpage() {
                    child.children = self.fetch_block_tree(&child.id).await?;
                }
            }
            Ok(children)
        })
    }

    /// Retrieve a page object.
    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        let request = self.http.get(self.endpoint(&format!("pages/{}", page_id)));
        Self::send(self.authorize(request)).await
    }

    /// Every entry of a database, following pagination.
    pub async fn query_database(&self, database_id: &str) -> Result<Vec<Page>> {
        let url = self.endpoint(&format!("databases/{}/query", database_id));
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(ref cursor) = cursor {
                body["start_cursor"] = Value::String(cursor.clone());
            }

            let request = self.http.post(&url).json(&body);
            let listing: Listing<Page> = Self::send(self.authorize(request)).await?;
            pages.extend(listing.results);

            match listing.next_cursor {
                Some(next) if listing.has_more => cursor = Some(next),
                _ => break,
            }
        }

        log::info!("Database {} has {} entries", database_id, pages.len());
        Ok(pages)
    }

    /// Retrieve a page with its full block tree.
    pub async fn fetch_document(&self, page_id: &str) -> Result<Document> {
        let page = self.retrieve_page(page_id).await?;
        let blocks = self.fetch_block_tree(page_id).await?;
        Ok(Document::from_page(&page, blocks))
    }
}

/// Fetch many documents concurrently.
///
/// At most as many documents as `limit` has permits are in flight at once.
/// Results are returned in the order of `ids`; one failure does not affect
/// the others.
pub async fn fetch_documents(
    client: Arc<NotionClient>,
    ids: Vec<String>,
    limit: Arc<Semaphore>,
) -> Vec<Result<Document>> {
    let count = ids.len();
    let mut tasks = JoinSet::new();

    for (index, id) in ids.into_iter().enumerate() {
        let client = Arc::clone(&client);
        let limit = Arc::clone(&limit);

        tasks.spawn(async move {
            let result = match limit.acquire_owned().await {
                Ok(_permit) => client.fetch_document(&id).await,
                Err(_) => Err(Error::Other(format!(
                    "Fetch limiter closed before {} started",
                    id
                ))),
            };
            if let Err(ref e) = result {
                log::warn!("Failed to fetch {}: {}", id, e);
            }
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<Document>>> = (0..count).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => log::error!("Fetch task failed: {}", e),
        }
    }

    results
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(Error::Other("Fetch task aborted".to_string()))))
        .collect()
}

fn api_error_message(body: String) -> String {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    }
}
