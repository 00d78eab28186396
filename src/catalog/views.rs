use crate::{
    api::types::{
        CharacterStatus,
        Page,
    },
    core::{
        cache::CacheEntry,
        resolver::ResolveState,
        FetchError,
    },
};

/// What a list should render in place of its rows.
#[derive(Debug, PartialEq)]
pub enum ListStatus<'a, T> {
    Loading,
    Ready(&'a Page<T>),
    Failed(&'a FetchError),
}

/// Read-only snapshot of one list view for the presentation layer.
#[derive(Debug)]
pub struct ListView<'a, T> {
    pub page: u32,
    pub name_input: &'a str,
    pub status_filter: Option<CharacterStatus>,
    pub entry: Option<&'a CacheEntry<Page<T>>>,
}

impl<'a, T> ListView<'a, T> {
    /// Last successfully fetched page for the current key, even if a refresh failed since.
    pub fn data(&self) -> Option<&'a Page<T>> {
        self.entry.and_then(|e| e.data())
    }

    pub fn error(&self) -> Option<&'a FetchError> {
        self.entry.and_then(|e| e.error())
    }

    pub fn status(&self) -> ListStatus<'a, T> {
        match (self.data(), self.error()) {
            (Some(page), _) => ListStatus::Ready(page),
            (None, Some(error)) if !self.is_fetching() => ListStatus::Failed(error),
            _ => ListStatus::Loading,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.entry.map_or(false, |e| e.is_pending())
    }

    /// Background revalidation over data that is already shown.
    pub fn is_refreshing(&self) -> bool {
        self.is_fetching() && self.data().is_some()
    }

    pub fn can_prev(&self) -> bool {
        self.data().map_or(false, |p| p.has_prev())
    }

    pub fn can_next(&self) -> bool {
        self.data().map_or(false, |p| p.has_next())
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.data().map(|p| p.info.pages)
    }
}

/// Selected parent and the state of its resolved related entities.
#[derive(Debug)]
pub struct RelatedView<'a, P, T> {
    pub selected: Option<&'a P>,
    pub state: &'a ResolveState<T>,
}

impl<'a, P, T> RelatedView<'a, P, T> {
    pub fn items(&self) -> Option<&'a [T]> {
        match self.state {
            ResolveState::Ready(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResolveState::Loading)
    }

    pub fn error(&self) -> Option<&'a FetchError> {
        match self.state {
            ResolveState::Failed(error) => Some(error),
            _ => None,
        }
    }
}
