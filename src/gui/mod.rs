mod app;
mod pages;

pub use app::PortalFinderApp;
