//! Link discovery on a fetched page.
//!
//! - [`extract_matching_links`] walks the parsed document and collects the
//!   `href` of every anchor ending with a suffix.
//! - [`resolve`] turns those (possibly relative) references into absolute URLs.

mod extract;
mod resolve;

pub use extract::extract_matching_links;
pub use resolve::{resolve, resolve_against};
