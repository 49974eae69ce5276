use reqwest::Url;

use crate::error::HandlerError;

/// Validate an Access API base URL such as `https://rest-mainnet.onflow.org/v1/`.
pub(super) fn parse_base_url(base_url: &str) -> Result<Url, HandlerError> {
    let parsed = Url::parse(base_url).map_err(|e| {
        HandlerError::InvalidUrl(format!("{base_url} (expected an HTTP(S) URL: {e})"))
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(HandlerError::InvalidUrl(format!(
                "{base_url} (unsupported scheme `{other}`; expected http or https)"
            )));
        }
    }
    if parsed.cannot_be_a_base() {
        return Err(HandlerError::InvalidUrl(base_url.to_owned()));
    }
    Ok(parsed)
}

/// Append path segments to the base URL, percent-encoding each one.
pub(super) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, HandlerError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| HandlerError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
