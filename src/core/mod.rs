pub mod cache;
pub mod debounce;
pub mod errors;
pub mod favorites;
pub mod query;
pub mod resolver;
pub mod settings;
pub mod tasks;

pub use errors::{
    FetchError,
    FinderError,
};
pub use settings::Settings;
