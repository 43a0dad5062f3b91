use std::error::Error as StdError;
use std::io::ErrorKind;

use anyhow::anyhow;

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == ErrorKind::ConnectionRefused
        {
            return true;
        }

        if source
            .to_string()
            .to_ascii_lowercase()
            .contains("connection refused")
        {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == ErrorKind::TimedOut
        {
            return true;
        }

        if source
            .to_string()
            .to_ascii_lowercase()
            .contains("timed out")
        {
            return true;
        }

        current = source.source();
    }

    false
}

/// Maps a failed outbound request onto the transport/timeout error taxonomy.
/// Non-2xx statuses never reach here; those are reported by the caller once
/// the response body has been read.
pub(crate) fn api_request_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: f64,
) -> anyhow::Error {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return anyhow!(
            "Request did not complete within {}s while calling '{}'. \
             Increase PERPLEXITY_TIMEOUT_MS or narrow the query.",
            timeout_secs,
            api_url
        );
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return anyhow!(
                "Connection refused by '{}'. \
                 Check PERPLEXITY_BASE_URL and that the endpoint is reachable.",
                api_url
            );
        }

        // Keep the full source chain: DNS and TLS failures carry the
        // diagnosable reason in a nested error, not in the top Display.
        return anyhow!(
            "Failed to connect to '{}': {:#}. Check network connectivity.",
            api_url,
            anyhow::Error::new(err)
        );
    }

    anyhow!("Failed to call '{}': {}", api_url, err)
}
