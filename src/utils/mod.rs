//! Utility modules supporting detection and metadata lookup.
//!
//! - [`HttpClient`]: shared reqwest client, also the default [`PageFetcher`](crate::doi::PageFetcher)
//! - [`extract_text`]: extract text content from PDF files
//! - [`KeyValueStore`], [`MemoryStore`], [`FileStore`]: caches with expiry
//! - [`RetryConfig`], [`with_retry`]: retry with exponential backoff
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use doi_cite::sources::SourceError;
//! use doi_cite::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let data = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod http;
mod pdf;
mod retry;

pub use cache::{CacheResult, FileStore, KeyValueStore, MemoryStore};
pub use http::HttpClient;
pub use pdf::{extract_text, PdfExtractError};
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
