//! Endpoint URL helpers for the settings dialog and the header.

use reqwest::Url;

/// Parse `url` as an absolute http(s) URL with a host, the way the HTTP
/// client will when the endpoint is used.
pub fn parse_endpoint(url: &str) -> Option<Url> {
    let url = Url::parse(url.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().filter(|host| !host.is_empty())?;
    Some(url)
}

/// Whether `url` is an absolute http(s) URL with a host.
///
/// ```
/// use orange_coach::utils::url::is_http_url;
///
/// assert!(is_http_url("https://coach.example.com/chat"));
/// assert!(!is_http_url("coach.example.com/chat"));
/// assert!(!is_http_url("https://host:99999/chat"));
/// ```
pub fn is_http_url(url: &str) -> bool {
    parse_endpoint(url).is_some()
}

/// Host (with port, if not the scheme default) of an http(s) endpoint.
pub fn endpoint_host(url: &str) -> Option<String> {
    let url = parse_endpoint(url)?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Short description of where replies come from.
pub fn mode_label(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return "示範模式".to_string();
    }
    format!(
        "後端：{}",
        endpoint_host(endpoint).unwrap_or_else(|| endpoint.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_http_schemes() {
        assert!(is_http_url("http://localhost:8787"));
        assert!(is_http_url("  https://coach.example.com/.netlify/functions/chat "));
        assert!(!is_http_url("ftp://coach.example.com"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn rejects_what_the_http_client_cannot_send_to() {
        for url in [
            "http://:80/chat",
            "https://host:99999/chat",
            "https://[::1/chat",
            "http://ex%ample.com/",
            "https://coach example.com/chat",
        ] {
            assert!(!is_http_url(url), "{url} should be rejected");
        }
    }

    #[test]
    fn host_drops_path_query_credentials_and_default_port() {
        assert_eq!(
            endpoint_host("https://coach.example.com/chat?x=1").as_deref(),
            Some("coach.example.com")
        );
        assert_eq!(
            endpoint_host("http://user@127.0.0.1:8787/").as_deref(),
            Some("127.0.0.1:8787")
        );
        assert_eq!(
            endpoint_host("https://coach.example.com:443/chat").as_deref(),
            Some("coach.example.com")
        );
        assert_eq!(endpoint_host("http://[::1]:8787/").as_deref(), Some("[::1]:8787"));
    }

    #[test]
    fn mode_label_names_demo_or_host() {
        assert_eq!(mode_label(""), "示範模式");
        assert_eq!(mode_label("   "), "示範模式");
        assert_eq!(
            mode_label("https://coach.example.com/chat"),
            "後端：coach.example.com"
        );
    }
}
