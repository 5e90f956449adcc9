//! Browser cookie acquisition and the on-disk credential store.
//!
//! The acquisition side pulls `douyin.com` cookies out of installed browsers
//! (via the `rookie` crate, behind the [`CookieSource`] trait so tests never
//! touch a real browser profile) and validates them with a two-tier check:
//! structurally valid vs. actually logged in. The store side persists the
//! winning cookie string to a line-oriented config file, backing up the
//! previous content first.

mod acquire;
mod browser;
mod error;
mod jar;
mod store;

pub use acquire::{acquire, available_browsers, pull, Acquired};
pub use browser::{Browser, CookieSource, RookieSource, DOUYIN_DOMAIN};
pub use error::CookieError;
pub use jar::{validate, CookieCheck, CookieJar};
pub use store::{Credential, CredentialStore};
