//! URL reference resolution (RFC 3986 §5).

use url::Url;

use crate::error::{HarvestError, UrlRole};

/// Resolves `reference` against `base`, returning an absolute URL.
///
/// An already-absolute reference comes back unchanged; a relative one is
/// merged with the base scheme, authority and path, with `.`/`..` segments
/// removed and query/fragment inherited per the standard algorithm.
///
/// # Errors
///
/// Returns [`HarvestError::UrlParse`] if `base` is not an absolute URL or if
/// `reference` is not a valid URL reference.
pub fn resolve(base: &str, reference: &str) -> Result<Url, HarvestError> {
    let base_url =
        Url::parse(base).map_err(|e| HarvestError::url_parse(base, UrlRole::Base, e))?;
    resolve_against(&base_url, reference)
}

/// Resolves `reference` against an already-parsed base URL.
///
/// # Errors
///
/// Returns [`HarvestError::UrlParse`] if `reference` is not a valid URL
/// reference, or cannot be combined with `base`.
pub fn resolve_against(base: &Url, reference: &str) -> Result<Url, HarvestError> {
    base.join(reference)
        .map_err(|e| HarvestError::url_parse(reference, UrlRole::Reference, e))
}
