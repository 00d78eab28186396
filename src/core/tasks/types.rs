use crate::{
    api::types::{
        Character,
        Episode,
        Location,
        Page,
    },
    core::{
        query::QueryKey,
        resolver::ResolveTicket,
        FetchError,
    },
};

pub type PageResult<T> = Result<Page<T>, FetchError>;

/// Which page context a related-entity resolution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedScope {
    Residents,
    EpisodeCharacters,
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    Characters(QueryKey, PageResult<Character>),
    Locations(QueryKey, PageResult<Location>),
    Episodes(QueryKey, PageResult<Episode>),
    Related {
        scope: RelatedScope,
        ticket: ResolveTicket,
        result: Result<Vec<Character>, FetchError>,
    },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::Characters(..) => "characters_page",
            TaskResult::Locations(..) => "locations_page",
            TaskResult::Episodes(..) => "episodes_page",
            TaskResult::Related { scope, .. } => match scope {
                RelatedScope::Residents => "residents",
                RelatedScope::EpisodeCharacters => "episode_characters",
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            TaskResult::Characters(_, result) => result.is_ok(),
            TaskResult::Locations(_, result) => result.is_ok(),
            TaskResult::Episodes(_, result) => result.is_ok(),
            TaskResult::Related { result, .. } => result.is_ok(),
        }
    }
}
