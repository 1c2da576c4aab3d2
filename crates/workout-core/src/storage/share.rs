//! Shareable workout links.
//!
//! A link carries only the timer configurations: no ids, no progress. The
//! list is JSON, percent-encoded into the `workout` query parameter.

use url::{form_urlencoded, Url};

use crate::error::ShareError;
use crate::timer::TimerConfig;

pub const SHARE_PARAM: &str = "workout";

/// Percent-encoded JSON array of `configs`.
pub fn encode_configs(configs: &[TimerConfig]) -> Result<String, ShareError> {
    let json = serde_json::to_string(configs)?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// `base_url` with the workout parameter set, replacing any existing query.
pub fn share_url(base_url: &str, configs: &[TimerConfig]) -> Result<String, ShareError> {
    let mut url = Url::parse(base_url)?;
    let encoded = encode_configs(configs)?;
    url.set_query(Some(&format!("{SHARE_PARAM}={encoded}")));
    Ok(url.into())
}

/// Parse configs from a full URL, a bare query string, or the encoded
/// parameter value itself. All three decode as form data, so `+` is a space.
pub fn decode_link(input: &str) -> Result<Vec<TimerConfig>, ShareError> {
    let input = input.trim();
    let query = match Url::parse(input) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        // An encoded value never contains a literal '='.
        Err(_) if input.contains('=') => input.trim_start_matches('?').to_string(),
        Err(_) => format!("{SHARE_PARAM}={input}"),
    };
    let json = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == SHARE_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ShareError::MissingParameter(SHARE_PARAM.to_string()))?;
    Ok(serde_json::from_str(&json)?)
}
