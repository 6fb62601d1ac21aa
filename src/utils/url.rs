//! URL helpers for Horizon endpoints.

/// Joins a base URL and a relative endpoint with exactly one `/` between them.
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Reduces a URL to scheme and host for log output, masking path and query.
///
/// - `https://horizon.stellar.org/accounts/GABC` → `https://horizon.stellar.org/***`
/// - `http://localhost:8000` → `http://localhost:8000`
/// - `not a url` → `***`
pub fn mask_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return "***".to_string();
    };

    let host_start = scheme_end + 3;
    let rest = &url[host_start..];
    match rest.find(['/', '?']) {
        Some(offset) if rest.len() > offset + 1 => {
            format!("{}/***", &url[..host_start + offset])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://horizon.stellar.org/", "/transactions/"),
            "https://horizon.stellar.org/transactions/"
        );
        assert_eq!(
            join_url("http://localhost:8000", "accounts/GA"),
            "http://localhost:8000/accounts/GA"
        );
    }

    #[test]
    fn test_mask_url_hides_path() {
        assert_eq!(
            mask_url("https://horizon.stellar.org/accounts/GABC?cursor=now"),
            "https://horizon.stellar.org/***"
        );
    }

    #[test]
    fn test_mask_url_hides_query_without_path() {
        assert_eq!(
            mask_url("https://friendbot.stellar.org?addr=GABC"),
            "https://friendbot.stellar.org/***"
        );
    }

    #[test]
    fn test_mask_url_keeps_bare_host() {
        assert_eq!(mask_url("http://localhost:8000"), "http://localhost:8000");
        assert_eq!(mask_url("http://localhost:8000/"), "http://localhost:8000/");
    }

    #[test]
    fn test_mask_url_without_scheme() {
        assert_eq!(mask_url("horizon"), "***");
    }
}
