//! Hash-routed Hacker News reader.
//!
//! Fetches the hnpwa feed and item JSON, substitutes it into HTML templates
//! and mounts one page per navigation. `#/page/<n>` shows the news list,
//! `#/show/<id>` a story with its comment thread, and the empty fragment
//! the first page.

pub mod app;
pub mod config;
pub mod detail_view;
pub mod error;
pub mod feed_view;
pub mod hn_client;
pub mod models;
pub mod mount;
pub mod router;
pub mod session;
pub mod view;

pub use app::App;
pub use config::Config;
pub use error::{ConfigError, FetchError, MountError, RenderError};
