//! Single bounded HTTP retrieval with content-type classification.
//!
//! The [`Fetcher`] retrieves one page, enforcing the request timeout, the
//! 10 MB body ceiling and the set of content types the link extractor knows
//! how to read (HTML, JSON and XML).
//!
//! # Example
//!
//! ```no_run
//! use lsweb_core::{Config, Fetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(&Config::default())?;
//! let page = fetcher.fetch("https://example.com/downloads/").await?;
//! println!("{} bytes of {}", page.body.len(), page.content_type);
//! # Ok(())
//! # }
//! ```

mod client;
mod content_type;
mod error;

pub use client::{FetchedPage, Fetcher, MAX_CONTENT_SIZE};
pub(crate) use client::read_body_limited;
pub use content_type::{ContentKind, SNIFF_LEN, sniff_content_kind};
pub use error::FetchError;
