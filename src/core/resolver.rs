use futures::{
    stream,
    StreamExt,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::FetchError;
use crate::api::{
    client::ApiClient,
    types::RelatedSource,
};

/// Fetches every URL concurrently and returns the entities in `urls` order, whatever order
/// the responses arrive in. `limit` caps the requests in flight; `None` issues all at once.
///
/// Any failure fails the whole resolution with [`FetchError::PartialFetch`], which lists
/// every URL that failed.
pub async fn fan_out<T>(
    api: &ApiClient,
    urls: &[String],
    limit: Option<usize>,
) -> Result<Vec<T>, FetchError>
where
    T: DeserializeOwned + Send + 'static,
{
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    let in_flight = limit.unwrap_or(urls.len()).max(1);
    let results: Vec<Result<T, FetchError>> = stream::iter(urls.iter().cloned())
        .map(|url| {
            let api = api.clone();
            async move { api.fetch_by_url::<T>(&url).await }
        })
        .buffered(in_flight)
        .collect()
        .await;

    let mut items = Vec::with_capacity(urls.len());
    let mut failed = Vec::new();
    let mut cause = None;

    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(item) => items.push(item),
            Err(error) => {
                failed.push(url.clone());
                if cause.is_none() {
                    cause = Some(error);
                }
            }
        }
    }

    match cause {
        None => Ok(items),
        Some(cause) => {
            Err(FetchError::PartialFetch { failed, total: urls.len(), cause: Box::new(cause) })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveState<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(FetchError),
}

/// Identifies one resolution request: the parent it was issued for and the selection
/// generation at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    generation: u64,
    parent_id: u32,
    urls: Vec<String>,
}

impl ResolveTicket {
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

/// Tracks the selected parent of one page context and the related entities resolved for it.
///
/// Each selection bumps a generation counter. A result is applied only if its ticket carries
/// the current generation, so a slow resolution for an earlier selection can never overwrite
/// the list shown for the current one.
#[derive(Debug)]
pub struct DependentResolver<P, T> {
    selected: Option<P>,
    generation: u64,
    state: ResolveState<T>,
}

impl<P, T> Default for DependentResolver<P, T> {
    fn default() -> Self {
        Self { selected: None, generation: 0, state: ResolveState::Idle }
    }
}

impl<P, T> DependentResolver<P, T>
where
    P: RelatedSource + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `parent`. Returns the ticket to resolve with, or `None` when nothing has to be
    /// fetched: the same parent is already loading or resolved, or it has no related URLs.
    pub fn select(&mut self, parent: &P) -> Option<ResolveTicket> {
        let same_parent = self.selected_id() == Some(parent.parent_id());
        if same_parent && !matches!(self.state, ResolveState::Failed(_)) {
            return None;
        }

        self.generation += 1;
        self.selected = Some(parent.clone());

        let urls = parent.related_urls().to_vec();
        if urls.is_empty() {
            self.state = ResolveState::Ready(Vec::new());
            return None;
        }

        self.state = ResolveState::Loading;
        Some(ResolveTicket { generation: self.generation, parent_id: parent.parent_id(), urls })
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.state = ResolveState::Idle;
    }

    /// Applies a finished resolution. Returns `false` and drops the result when the selection
    /// has changed since `ticket` was issued.
    pub fn apply(&mut self, ticket: &ResolveTicket, result: Result<Vec<T>, FetchError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                parent_id = ticket.parent_id,
                current = ?self.selected_id(),
                "discarding stale resolution"
            );
            return false;
        }

        self.state = match result {
            Ok(items) => ResolveState::Ready(items),
            Err(error) => ResolveState::Failed(error),
        };
        true
    }

    pub fn selected(&self) -> Option<&P> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.selected.as_ref().map(|p| p.parent_id())
    }

    pub fn state(&self) -> &ResolveState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResolveState::Loading)
    }
}
