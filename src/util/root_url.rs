/// Returns `"{scheme}://{netloc}"` for `raw`, with both parts as written.
///
/// Never fails and never normalizes: the host keeps its case, ports are kept
/// even when they are the scheme default, and nothing is IDNA-encoded. Only
/// the scheme is lowercased. A netloc is taken only after a literal `//`;
/// missing parts are left empty, which can give results like `"://"`.
///
/// Leading control characters and spaces are ignored, as are tabs and line
/// breaks anywhere in the input.
///
/// # Examples
///
/// ```
/// use feedbox::util::get_root_url;
///
/// assert_eq!(get_root_url("https://example.com/a/b?q=1"), "https://example.com");
/// assert_eq!(get_root_url("no scheme here"), "://");
/// ```
pub fn get_root_url(raw: &str) -> String {
    let cleaned: String = raw
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();

    let (scheme, rest) = match cleaned.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme.to_ascii_lowercase(), rest),
        _ => (String::new(), cleaned.as_str()),
    };
    let netloc = rest
        .strip_prefix("//")
        .and_then(|after| after.split(['/', '?', '#']).next())
        .unwrap_or("");
    format!("{scheme}://{netloc}")
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_path_query_fragment() {
        assert_eq!(get_root_url("https://example.com/a/b?q=1"), "https://example.com");
        assert_eq!(get_root_url("http://example.com/#top"), "http://example.com");
        assert_eq!(get_root_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_keeps_port_and_userinfo() {
        assert_eq!(
            get_root_url("http://rsshub.example.com:1200/twitter/user/x"),
            "http://rsshub.example.com:1200"
        );
        assert_eq!(
            get_root_url("https://user:pw@example.com/feed"),
            "https://user:pw@example.com"
        );
    }

    #[test]
    fn test_ipv6_host() {
        assert_eq!(get_root_url("http://[2001:db8::1]:8080/rss"), "http://[2001:db8::1]:8080");
    }

    #[test]
    fn test_no_scheme_degrades() {
        assert_eq!(get_root_url("example.com/feed"), "://");
        assert_eq!(get_root_url(""), "://");
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(get_root_url("//cdn.example.com/img.png"), "://cdn.example.com");
    }

    #[test]
    fn test_scheme_without_netloc() {
        assert_eq!(get_root_url("mailto:someone@example.com"), "mailto://");
        assert_eq!(get_root_url("file:///etc/hosts"), "file://");
    }

    #[test]
    fn test_host_and_port_as_written() {
        assert_eq!(get_root_url("https://Example.COM:443/x"), "https://Example.COM:443");
        assert_eq!(get_root_url("https://example.com:443/feed"), "https://example.com:443");
        assert_eq!(get_root_url("http://例子.中国/feed"), "http://例子.中国");
        assert_eq!(get_root_url("HTTPS://Example.com/"), "https://Example.com");
    }

    #[test]
    fn test_no_netloc_without_double_slash() {
        assert_eq!(get_root_url("http:example.com/path"), "http://");
        assert_eq!(get_root_url("https:/example.com/a"), "https://");
    }

    #[test]
    fn test_leading_junk_and_embedded_breaks_ignored() {
        assert_eq!(get_root_url("  \u{1}https://example.com/a"), "https://example.com");
        assert_eq!(get_root_url("https://exa\tmple.com\n/a"), "https://example.com");
        assert_eq!(get_root_url("https://example.com /a"), "https://example.com ");
    }

    #[test]
    fn test_unparseable_host_kept_raw() {
        assert_eq!(get_root_url("https://[bad/feed"), "https://[bad");
        assert_eq!(get_root_url("http://exa mple.com/x"), "http://exa mple.com");
    }

    #[test]
    fn test_is_scheme() {
        assert!(is_scheme("https"));
        assert!(is_scheme("git+ssh"));
        assert!(!is_scheme(""));
        assert!(!is_scheme("1http"));
        assert!(!is_scheme("ht tp"));
    }
}
