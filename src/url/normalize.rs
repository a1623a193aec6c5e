use crate::{UrlError, UrlResult};
use url::Url;

/// Computes the deduplication key of a media URL
///
/// # Canonicalization Steps
///
/// 1. Resolve `raw` against `base`; reject if malformed
/// 2. Only HTTP and HTTPS schemes are accepted
/// 3. Lowercase the host
/// 4. Remove username and password
/// 5. Remove the query string
/// 6. Remove the fragment
///
/// Two URLs that differ only in query, fragment, credentials or host casing
/// produce the same key.
///
/// # Examples
///
/// ```
/// use post_harvest::url::media_key;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blogs/entry/post/").unwrap();
/// let key = media_key("https://user:pw@CDN.Example.com/a.png?w=300#top", &base).unwrap();
/// assert_eq!(key, "https://cdn.example.com/a.png");
/// ```
pub fn media_key(raw: &str, base: &Url) -> UrlResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty media URL".to_string()));
    }

    let mut url = base
        .join(raw)
        .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS media are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingHost)?;
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;

    // Setting credentials only fails for URLs that cannot carry them
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url.to_string())
}
