use crate::config::LinkConfig;

/// Where unmatched paths are sent, if anywhere.
pub fn fallback_target(links: &LinkConfig) -> Option<&str> {
    links.default_url.as_deref()
}
