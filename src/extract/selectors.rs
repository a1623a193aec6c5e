//! Static selector lists used by the resolvers

use scraper::{ElementRef, Html, Selector};

/// Compiles a list of static selectors, dropping any that fail to parse
pub fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::error!("Invalid built-in selector {:?}: {:?}", s, e);
                None
            }
        })
        .collect()
}

/// Compiles one static selector group
pub fn compile_one(selector: &str) -> Option<Selector> {
    compile(&[selector]).into_iter().next()
}

/// Returns the first element matched by the highest-ranked selector that matches
pub fn pick<'a>(document: &'a Html, ranked: &[Selector]) -> Option<ElementRef<'a>> {
    ranked
        .iter()
        .find_map(|selector| document.select(selector).next())
}

/// Returns true if the element matches any of the selectors
pub fn matches_any(element: &ElementRef, selectors: &[Selector]) -> bool {
    selectors.iter().any(|selector| selector.matches(element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_drops_invalid() {
        let compiled = compile(&["p", "[[[", "h1.title"]);
        assert_eq!(compiled.len(), 2);
    }

    #[test]
    fn test_pick_respects_rank() {
        let doc = Html::parse_document(
            r#"<html><body><h1>Plain</h1><article><h1>In article</h1></article></body></html>"#,
        );
        let ranked = compile(&["article h1", "h1"]);
        let picked = pick(&doc, &ranked).unwrap();
        assert_eq!(picked.text().collect::<String>(), "In article");
    }

    #[test]
    fn test_pick_none() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert!(pick(&doc, &compile(&["article"])).is_none());
    }
}
