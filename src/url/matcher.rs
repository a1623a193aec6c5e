/// Checks if a host equals `suffix` or is a subdomain of it
///
/// Both sides are compared case-insensitively.
///
/// # Examples
///
/// ```
/// use post_harvest::url::matches_host_suffix;
///
/// assert!(matches_host_suffix("vimeo.com", "player.vimeo.com"));
/// assert!(matches_host_suffix("vimeo.com", "vimeo.com"));
/// assert!(!matches_host_suffix("vimeo.com", "notvimeo.com"));
/// ```
pub fn matches_host_suffix(suffix: &str, host: &str) -> bool {
    let suffix = suffix.trim().trim_start_matches('.').to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    if suffix.is_empty() || host.is_empty() {
        return false;
    }

    host == suffix || host.ends_with(&format!(".{}", suffix))
}

/// Returns true if `host` matches any of the given suffixes
pub fn matches_any_host_suffix<S: AsRef<str>>(suffixes: &[S], host: &str) -> bool {
    suffixes
        .iter()
        .any(|suffix| matches_host_suffix(suffix.as_ref(), host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_host_suffix("youtube.com", "youtube.com"));
        assert!(matches_host_suffix("youtu.be", "youtu.be"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(matches_host_suffix("youtube.com", "www.youtube.com"));
        assert!(matches_host_suffix("mitadmissions.org", "cdn.mitadmissions.org"));
    }

    #[test]
    fn test_no_partial_label_match() {
        assert!(!matches_host_suffix("youtube.com", "notyoutube.com"));
        assert!(!matches_host_suffix("disqus.com", "disqus.com.evil.net"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches_host_suffix("Vimeo.com", "PLAYER.VIMEO.COM"));
    }

    #[test]
    fn test_empty_strings() {
        assert!(!matches_host_suffix("", "example.com"));
        assert!(!matches_host_suffix("example.com", ""));
    }

    #[test]
    fn test_any_suffix() {
        let hosts = vec!["youtube.com".to_string(), "vimeo.com".to_string()];
        assert!(matches_any_host_suffix(&hosts, "player.vimeo.com"));
        assert!(!matches_any_host_suffix(&hosts, "example.com"));
    }
}
