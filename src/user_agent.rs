//! User-Agent string sent with page fetches and file downloads.

/// Tool identifier used as the User-Agent product token.
const PRODUCT: &str = "doc-harvest";

/// Default User-Agent for all requests (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_crate_version() {
        let ua = default_user_agent();
        assert_eq!(
            ua.strip_prefix("doc-harvest/"),
            Some(env!("CARGO_PKG_VERSION")),
            "UA must be product/version: {ua}"
        );
    }
}
