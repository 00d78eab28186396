//! The catalog coordinator: owns the page caches, the three list views, the two dependent
//! resolvers and the favorites set, and is driven once per frame by the UI loop.
//!
//! All state lives on the caller's thread. Network work runs on the [`TaskManager`] runtime
//! and its results are applied in [`Catalog::poll`], so every cache key has a single writer.

mod list;
pub mod views;

use std::{
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

pub use list::ListState;
use tracing::debug;
pub use views::{
    ListStatus,
    ListView,
    RelatedView,
};

use crate::{
    api::{
        client::ApiClient,
        transport::Transport,
        types::{
            Character,
            CharacterStatus,
            Episode,
            Location,
            Page,
            PageInfo,
            ResourceKind,
        },
    },
    core::{
        cache::QueryCache,
        favorites::{
            Favorites,
            FavoritesStore,
        },
        query::QueryKey,
        resolver::DependentResolver,
        tasks::{
            RelatedScope,
            TaskManager,
            TaskResult,
        },
        FinderError,
        Settings,
    },
};

pub struct Catalog {
    tasks: TaskManager,

    // Page caches, one per resource kind
    characters: QueryCache<QueryKey, Page<Character>>,
    locations: QueryCache<QueryKey, Page<Location>>,
    episodes: QueryCache<QueryKey, Page<Episode>>,

    // List views
    character_list: ListState,
    location_list: ListState,
    episode_list: ListState,

    // Dependent resolutions
    residents: DependentResolver<Location, Character>,
    episode_characters: DependentResolver<Episode, Character>,

    favorites: Favorites,
}

impl Catalog {
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        store: Box<dyn FavoritesStore>,
    ) -> Result<Self, FinderError> {
        let api = ApiClient::new(settings.api_base.clone(), transport);
        let tasks = TaskManager::new(api, settings.fan_out_limit)?;

        let stale_after = settings.stale_after();
        let capacity = settings.cache_capacity;
        let debounce = settings.debounce();

        Ok(Self {
            tasks,

            characters: QueryCache::new(stale_after, capacity),
            locations: QueryCache::new(stale_after, capacity),
            episodes: QueryCache::new(stale_after, capacity),

            character_list: ListState::new(ResourceKind::Character, debounce),
            location_list: ListState::new(ResourceKind::Location, debounce),
            episode_list: ListState::new(ResourceKind::Episode, debounce),

            residents: DependentResolver::new(),
            episode_characters: DependentResolver::new(),

            favorites: Favorites::load_or_empty(store),
        })
    }

    pub fn list(&self, kind: ResourceKind) -> &ListState {
        match kind {
            ResourceKind::Character => &self.character_list,
            ResourceKind::Location => &self.location_list,
            ResourceKind::Episode => &self.episode_list,
        }
    }

    fn list_mut(&mut self, kind: ResourceKind) -> &mut ListState {
        match kind {
            ResourceKind::Character => &mut self.character_list,
            ResourceKind::Location => &mut self.location_list,
            ResourceKind::Episode => &mut self.episode_list,
        }
    }

    /// Issues a fetch for `key` unless it is cached and fresh or already in flight.
    ///
    /// Returns whether a network request was started.
    pub fn ensure_fresh(&mut self, key: &QueryKey, now: Instant) -> bool {
        let started = match key.kind() {
            ResourceKind::Character => self.characters.begin_fetch(key, now),
            ResourceKind::Location => self.locations.begin_fetch(key, now),
            ResourceKind::Episode => self.episodes.begin_fetch(key, now),
        };
        if !started {
            return false;
        }

        let key = key.clone();
        match key.kind() {
            ResourceKind::Character => self.tasks.fetch_page(key, TaskResult::Characters),
            ResourceKind::Location => self.tasks.fetch_page(key, TaskResult::Locations),
            ResourceKind::Episode => self.tasks.fetch_page(key, TaskResult::Episodes),
        }
        true
    }

    fn ensure_current(&mut self, kind: ResourceKind, now: Instant) {
        let key = self.list(kind).key();
        self.ensure_fresh(&key, now);
    }

    /// The view for `kind` became visible.
    pub fn visit(&mut self, kind: ResourceKind, now: Instant) {
        self.list_mut(kind).resume(now);
        self.ensure_current(kind, now);
    }

    /// The view for `kind` was hidden; a pending search emission is dropped.
    pub fn leave(&mut self, kind: ResourceKind) {
        self.list_mut(kind).suspend();
    }

    pub fn set_name_input(&mut self, kind: ResourceKind, text: &str, now: Instant) {
        if !kind.supports_name() {
            debug!(?kind, "name filter not supported");
            return;
        }
        self.list_mut(kind).set_name_input(text, now);
    }

    pub fn set_status(
        &mut self,
        kind: ResourceKind,
        status: Option<CharacterStatus>,
        now: Instant,
    ) {
        if !kind.supports_status() {
            debug!(?kind, "status filter not supported");
            return;
        }
        if self.list_mut(kind).set_status(status) {
            self.ensure_current(kind, now);
        }
    }

    fn current_info(&self, kind: ResourceKind) -> Option<&PageInfo> {
        let key = self.list(kind).key();
        match kind {
            ResourceKind::Character => self.characters.get(&key).and_then(|e| e.data()).map(|p| &p.info),
            ResourceKind::Location => self.locations.get(&key).and_then(|e| e.data()).map(|p| &p.info),
            ResourceKind::Episode => self.episodes.get(&key).and_then(|e| e.data()).map(|p| &p.info),
        }
    }

    /// Moves to the next page if the current page reports one.
    pub fn next_page(&mut self, kind: ResourceKind, now: Instant) -> bool {
        if !self.current_info(kind).map_or(false, |info| info.next.is_some()) {
            return false;
        }
        let page = self.list(kind).params().page() + 1;
        self.list_mut(kind).set_page(page);
        self.ensure_current(kind, now);
        true
    }

    /// Moves to the previous page if the current page reports one.
    pub fn prev_page(&mut self, kind: ResourceKind, now: Instant) -> bool {
        if !self.current_info(kind).map_or(false, |info| info.prev.is_some()) {
            return false;
        }
        let page = self.list(kind).params().page().saturating_sub(1).max(1);
        self.list_mut(kind).set_page(page);
        self.ensure_current(kind, now);
        true
    }

    /// Revalidates the current page in the background; cached rows stay visible meanwhile.
    pub fn refresh(&mut self, kind: ResourceKind, now: Instant) {
        let key = self.list(kind).key();
        match kind {
            ResourceKind::Character => self.characters.invalidate(&key),
            ResourceKind::Location => self.locations.invalidate(&key),
            ResourceKind::Episode => self.episodes.invalidate(&key),
        }
        self.ensure_fresh(&key, now);
    }

    pub fn select_location(&mut self, location: &Location) {
        if let Some(ticket) = self.residents.select(location) {
            self.tasks.resolve_related(RelatedScope::Residents, ticket);
        }
    }

    pub fn select_episode(&mut self, episode: &Episode) {
        if let Some(ticket) = self.episode_characters.select(episode) {
            self.tasks.resolve_related(RelatedScope::EpisodeCharacters, ticket);
        }
    }

    pub fn clear_selection(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Location => self.residents.clear(),
            ResourceKind::Episode => self.episode_characters.clear(),
            ResourceKind::Character => {}
        }
    }

    /// Applies finished work and settled search input. Call once per frame.
    ///
    /// Returns the number of task results applied.
    pub fn poll(&mut self, now: Instant) -> usize {
        let results = self.tasks.poll_results();
        let applied = results.len();
        for result in results {
            self.apply(result, now);
        }

        for kind in ResourceKind::ALL {
            if self.list_mut(kind).settle(now) {
                self.ensure_current(kind, now);
            }
        }

        applied
    }

    /// Blocks for at most `timeout` waiting for one task result and applies it.
    pub fn wait_for_result(&mut self, timeout: Duration, now: Instant) -> bool {
        match self.tasks.wait_result(timeout) {
            Some(result) => {
                self.apply(result, now);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, result: TaskResult, now: Instant) {
        debug!(task = result.task_type(), ok = result.is_ok(), "task finished");

        match result {
            TaskResult::Characters(key, result) => self.characters.complete(&key, result, now),
            TaskResult::Locations(key, result) => self.locations.complete(&key, result, now),
            TaskResult::Episodes(key, result) => self.episodes.complete(&key, result, now),
            TaskResult::Related { scope, ticket, result } => {
                let applied = match scope {
                    RelatedScope::Residents => self.residents.apply(&ticket, result),
                    RelatedScope::EpisodeCharacters => {
                        self.episode_characters.apply(&ticket, result)
                    }
                };
                if !applied {
                    debug!(?scope, parent_id = ticket.parent_id(), "selection changed, result dropped");
                }
            }
        }
    }

    /// Earliest instant at which [`Catalog::poll`] has time-based work to do.
    pub fn next_wakeup(&self) -> Option<Instant> {
        ResourceKind::ALL.iter().filter_map(|kind| self.list(*kind).deadline()).min()
    }

    pub fn is_busy(&self) -> bool {
        self.characters.in_flight() > 0
            || self.locations.in_flight() > 0
            || self.episodes.in_flight() > 0
            || self.residents.is_loading()
            || self.episode_characters.is_loading()
    }

    pub fn characters_view(&self) -> ListView<'_, Character> {
        Self::list_view(&self.character_list, &self.characters)
    }

    pub fn locations_view(&self) -> ListView<'_, Location> {
        Self::list_view(&self.location_list, &self.locations)
    }

    pub fn episodes_view(&self) -> ListView<'_, Episode> {
        Self::list_view(&self.episode_list, &self.episodes)
    }

    fn list_view<'a, T>(
        list: &'a ListState,
        cache: &'a QueryCache<QueryKey, Page<T>>,
    ) -> ListView<'a, T> {
        ListView {
            page: list.params().page(),
            name_input: list.name_input(),
            status_filter: list.params().status(),
            entry: cache.get(&list.key()),
        }
    }

    pub fn residents(&self) -> RelatedView<'_, Location, Character> {
        RelatedView { selected: self.residents.selected(), state: self.residents.state() }
    }

    pub fn episode_characters(&self) -> RelatedView<'_, Episode, Character> {
        RelatedView {
            selected: self.episode_characters.selected(),
            state: self.episode_characters.state(),
        }
    }

    pub fn is_favorite(&self, episode_id: u32) -> bool {
        self.favorites.contains(episode_id)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn toggle_favorite(&mut self, episode_id: u32) -> Result<bool, FinderError> {
        self.favorites.toggle(episode_id)
    }
}
