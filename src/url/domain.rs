use url::Url;

/// Resolves `href` against `base`, keeping only HTTP(S) results
///
/// Returns None for empty values, `javascript:`/`mailto:`/`tel:`/`data:`
/// references and anything that fails to parse.
pub fn resolve_http_url(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}
