//! Douyin web API client: profile fetch, cursor-paginated video listing,
//! short-link resolution, and media size probing.
//!
//! All endpoints ride on a borrowed browser cookie (the `Cookie` header is
//! set verbatim from the acquired jar) and a desktop user agent. The API is
//! unofficial; every response shape is treated as optional-by-default and
//! normalized into owned record types before leaving this crate.

mod client;
mod error;
mod probe;
mod profile;
mod resolve;
mod retry;
mod types;
mod videos;

pub use client::DouyinClient;
pub use error::DouyinError;
pub use probe::format_size;
pub use profile::{ProfileRecord, ProfileSource};
pub use resolve::extract_sec_user_id;
pub use types::{VideoRecord, VideoStats};
pub use videos::{ListingOutcome, ListingPolicy};
