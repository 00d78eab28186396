use chrono::{
    DateTime,
    Utc,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Character,
    Location,
    Episode,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] =
        [ResourceKind::Character, ResourceKind::Location, ResourceKind::Episode];

    /// Collection path segment under the API base.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Character => "character",
            ResourceKind::Location => "location",
            ResourceKind::Episode => "episode",
        }
    }

    /// Whether the collection accepts the `name` filter.
    pub fn supports_name(&self) -> bool {
        matches!(self, ResourceKind::Character | ResourceKind::Episode)
    }

    /// Whether the collection accepts the `status` filter.
    pub fn supports_status(&self) -> bool {
        matches!(self, ResourceKind::Character)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Character => "Characters",
            ResourceKind::Location => "Locations",
            ResourceKind::Episode => "Episodes",
        }
    }
}

/// An entity type served by one of the provider's collections.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;
}

/// A parent entity whose field lists reference URLs of related characters.
pub trait RelatedSource {
    fn parent_id(&self) -> u32;
    fn related_urls(&self) -> &[String];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
    #[serde(rename = "Alive", alias = "alive")]
    Alive,
    #[serde(rename = "Dead", alias = "dead")]
    Dead,
    #[serde(rename = "unknown", alias = "Unknown")]
    Unknown,
}

impl CharacterStatus {
    pub const ALL: [CharacterStatus; 3] =
        [CharacterStatus::Alive, CharacterStatus::Dead, CharacterStatus::Unknown];

    /// Value sent in the `status` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "alive",
            CharacterStatus::Dead => "dead",
            CharacterStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "Alive",
            CharacterStatus::Dead => "Dead",
            CharacterStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: EntityRef,
    pub location: EntityRef,
    pub image: String,
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
}

impl Resource for Character {
    const KIND: ResourceKind = ResourceKind::Character;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dimension: String,
    pub residents: Vec<String>,
    #[serde(default)]
    pub url: String,
}

impl Resource for Location {
    const KIND: ResourceKind = ResourceKind::Location;
}

impl RelatedSource for Location {
    fn parent_id(&self) -> u32 {
        self.id
    }

    fn related_urls(&self) -> &[String] {
        &self.residents
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    /// Season/episode code such as `S01E01`.
    pub episode: String,
    pub characters: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

impl Resource for Episode {
    const KIND: ResourceKind = ResourceKind::Episode;
}

impl RelatedSource for Episode {
    fn parent_id(&self) -> u32 {
        self.id
    }

    fn related_urls(&self) -> &[String] {
        &self.characters
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Paginated envelope returned by every collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.info.prev.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
