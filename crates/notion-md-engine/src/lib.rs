pub mod client;
pub mod error;
pub mod fetch;
pub mod io;
pub mod models;
pub mod render;

// Re-export key types for easier usage
pub use client::{ApiError, ClientSettings, NotionClient};
pub use error::ConvertError;
pub use fetch::{
    CancelToken, ChildrenSource, FetchObserver, LogObserver, NoopObserver, Retrying, TreeFetcher,
};
pub use io::*;
pub use models::*;
pub use render::{MarkdownRenderer, format_rich_text, render};
