pub mod client;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::ApiClient;
pub use transport::{
    HttpTransport,
    Transport,
};
pub use types::{
    Character,
    CharacterStatus,
    EntityRef,
    Episode,
    Location,
    Page,
    PageInfo,
    RelatedSource,
    Resource,
    ResourceKind,
};
