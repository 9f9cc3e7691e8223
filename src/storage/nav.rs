//! Navigation parameters carried in a page query string.

use tracing::debug;

use crate::types::Competency;

/// Parameters the assessment views read from the navigation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavParams {
    pub competency: Competency,
}

impl NavParams {
    /// Parse `competency` from a query string or a full URL.
    ///
    /// Falls back to `fallback` when the parameter is absent or names no
    /// known competency.
    pub fn parse_with_default(input: &str, fallback: Competency) -> Self {
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();

        let competency = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "competency")
            .and_then(|(_, value)| match value.parse::<Competency>() {
                Ok(c) => Some(c),
                Err(_) => {
                    debug!(value = %value, "Unknown competency parameter, using default");
                    None
                }
            })
            .unwrap_or(fallback);

        Self { competency }
    }
}
