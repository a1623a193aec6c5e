//! Article body location and text extraction

use crate::extract::selectors::{compile, matches_any, pick};
use crate::extract::text::{
    join_blocks, norm, normalize_block, normalize_fallback, render_inner_text, Substitute,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static CONTAINER_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        "article .article__body",
        ".article__body",
        "article .entry-content",
        ".entry-content",
        "article .post-content",
        "article .content",
        "article",
        ".post-content",
    ])
});

/// Non-content subtrees dropped from the body
static REMOVED_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        "nav",
        "aside",
        "footer",
        ".comments",
        "#comments",
        ".comment-list",
        ".page__footnotes",
        ".share-tools-mod",
        ".article__tags-mod",
        ".annotation__number",
        ".annotation",
    ])
});

/// Citation wrappers rendered as their plain annotation text
static ANNOTATION_WRAPPER: Lazy<Vec<Selector>> = Lazy::new(|| compile(&[".annotation-mod"]));

static ANNOTATION_TEXT: Lazy<Vec<Selector>> = Lazy::new(|| compile(&[".annotation__text"]));

static BLOCK_SELECTOR: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&["p, h1, h2, h3, h4, h5, h6, li, pre, blockquote, figure, figcaption"])
});

/// The located article body with its cleaning rules
#[derive(Clone, Copy)]
pub struct ArticleBody<'a> {
    container: ElementRef<'a>,
}

impl<'a> ArticleBody<'a> {
    /// Finds the body container using the ranked selector list
    pub fn locate(document: &'a Html) -> Option<Self> {
        pick(document, &CONTAINER_SELECTORS).map(|container| Self { container })
    }

    /// The container element as found in the document
    pub fn container(&self) -> ElementRef<'a> {
        self.container
    }

    /// Returns true if `element` lies inside a removed or replaced subtree
    ///
    /// Only ancestors below the container are checked; the container itself
    /// is never considered removed.
    pub fn is_removed(&self, element: &ElementRef) -> bool {
        let container_id = self.container.id();
        let mut current = Some(*element);

        while let Some(el) = current {
            if el.id() == container_id {
                return false;
            }
            if matches_any(&el, &REMOVED_SELECTORS) || matches_any(&el, &ANNOTATION_WRAPPER) {
                return true;
            }
            current = el.parent().and_then(ElementRef::wrap);
        }

        // Not a descendant of the container
        true
    }

    /// Elements matched by `selector` that survive cleaning, in document order
    pub fn select<'s>(
        &'s self,
        selector: &'s Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 's {
        self.container
            .select(selector)
            .filter(move |el| el.id() != self.container.id() && !self.is_removed(el))
    }

    /// Extracts the cleaned body text
    ///
    /// Block elements are rendered one by one (list items get a bullet) and
    /// joined with a blank line. Without block children the whole container
    /// text is used instead.
    pub fn text(&self) -> String {
        let blocks: Vec<String> = BLOCK_SELECTOR
            .iter()
            .flat_map(|selector| self.select(selector).collect::<Vec<_>>())
            .map(|block| {
                let rendered = render_inner_text(block, &substitute);
                normalize_block(&rendered, block.value().name() == "li")
            })
            .collect();

        if !blocks.is_empty() {
            return join_blocks(&blocks);
        }

        normalize_fallback(&render_inner_text(self.container, &substitute))
    }
}

/// Rendering rule for descendants of the cleaned body
fn substitute(element: &ElementRef) -> Substitute {
    if matches_any(element, &REMOVED_SELECTORS) {
        return Substitute::Drop;
    }

    if matches_any(element, &ANNOTATION_WRAPPER) {
        let text = ANNOTATION_TEXT
            .iter()
            .flat_map(|selector| element.select(selector))
            .find(|annotation| !removed_within(annotation, element))
            .map(|annotation| norm(&annotation.text().collect::<String>()))
            .unwrap_or_default();
        return Substitute::Text(text);
    }

    Substitute::Keep
}

/// Returns true if `element` or an ancestor below `wrapper` is a removed subtree
fn removed_within(element: &ElementRef, wrapper: &ElementRef) -> bool {
    let mut current = Some(*element);

    while let Some(el) = current {
        if el.id() == wrapper.id() {
            return false;
        }
        if matches_any(&el, &REMOVED_SELECTORS) {
            return true;
        }
        current = el.parent().and_then(ElementRef::wrap);
    }

    false
}
