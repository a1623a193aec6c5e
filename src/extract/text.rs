//! Text normalization helpers shared by the resolvers
//!
//! `render_inner_text` approximates how a browser renders an element's text:
//! whitespace runs collapse, `<br>` becomes a line break, block elements start
//! new lines and paragraphs are separated by a blank line.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Node};

/// Zero-width characters left behind by citation markup
const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}'];

static LEADING_BY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^by\s+").unwrap());

static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static MULTI_NEWLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Block elements that separate lines in rendered text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "pre", "section", "summary", "table", "tr", "ul",
];

/// Elements whose content never renders as text
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Collapses all whitespace runs to a single space and trims
pub fn norm(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of an element
pub fn element_text(element: &ElementRef) -> String {
    norm(&element.text().collect::<String>())
}

/// Removes a leading "by " (any casing) from an author string
pub fn strip_by_prefix(author: &str) -> String {
    LEADING_BY_RE.replace(author, "").into_owned()
}

/// Removes zero-width characters
pub fn strip_zero_width(text: &str) -> String {
    text.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect()
}

/// Normalizes the rendered text of one body block
///
/// Windows line endings become `\n`, zero-width characters are dropped, runs of
/// two or more newlines collapse to one, and a single newline with non-space
/// characters on both sides (a soft wrap) becomes a space.
pub fn normalize_block(text: &str, list_item: bool) -> String {
    let text = strip_zero_width(&text.replace("\r\n", "\n"));
    let text = MULTI_NEWLINE_RE.replace_all(&text, "\n");
    let text = collapse_soft_breaks(&text);

    if list_item && !text.is_empty() {
        format!("- {}", text)
    } else {
        text
    }
}

fn collapse_soft_breaks(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let soft = c == '\n'
            && i > 0
            && i + 1 < chars.len()
            && !chars[i - 1].is_whitespace()
            && !chars[i + 1].is_whitespace();
        out.push(if soft { ' ' } else { c });
    }

    out
}

/// Joins normalized blocks with a blank line, dropping empty blocks
pub fn join_blocks<S: AsRef<str>>(blocks: &[S]) -> String {
    blocks
        .iter()
        .map(|b| b.as_ref())
        .filter(|b| !b.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Normalizes whole-container text when no blocks were found
pub fn normalize_fallback(text: &str) -> String {
    let text = strip_zero_width(&text.replace("\r\n", "\n"));
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}

/// Renders an element's text the way a browser lays it out
///
/// `skip` is consulted for every descendant element; returning
/// `Substitute::Drop` omits the subtree and `Substitute::Text` renders the
/// given text in its place.
pub fn render_inner_text<F>(element: ElementRef, skip: &F) -> String
where
    F: Fn(&ElementRef) -> Substitute,
{
    let mut renderer = InnerText::default();
    renderer.walk(element, skip);
    renderer.finish()
}

/// How a descendant element is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitute {
    /// Render normally
    Keep,
    /// Omit the element and its subtree
    Drop,
    /// Replace the element with plain inline text
    Text(String),
}

#[derive(Default)]
struct InnerText {
    out: String,
    pending_breaks: usize,
    pre_depth: usize,
}

impl InnerText {
    fn walk<F>(&mut self, element: ElementRef, skip: &F)
    where
        F: Fn(&ElementRef) -> Substitute,
    {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    match skip(&child) {
                        Substitute::Drop => continue,
                        Substitute::Text(text) => {
                            self.push_text(&text);
                            continue;
                        }
                        Substitute::Keep => {}
                    }
                    self.element(child, skip);
                }
                _ => {}
            }
        }
    }

    fn element<F>(&mut self, element: ElementRef, skip: &F)
    where
        F: Fn(&ElementRef) -> Substitute,
    {
        let tag = element.value().name();

        if SKIPPED_TAGS.contains(&tag) {
            return;
        }

        if tag == "br" {
            self.trim_trailing_spaces();
            self.flush_breaks();
            self.out.push('\n');
            return;
        }

        let breaks = if tag == "p" {
            2
        } else if BLOCK_TAGS.contains(&tag) {
            1
        } else {
            0
        };

        self.request_breaks(breaks);
        if tag == "pre" {
            self.pre_depth += 1;
        }
        self.walk(element, skip);
        if tag == "pre" {
            self.pre_depth -= 1;
        }
        self.request_breaks(breaks);
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if self.pre_depth > 0 {
            self.flush_breaks();
            self.out.push_str(text);
            return;
        }

        let collapsed = collapse_html_whitespace(text);
        let starts_with_space = collapsed.starts_with(' ');
        let content = collapsed.trim_start_matches(' ');

        if content.is_empty() {
            if self.pending_breaks == 0 && !self.at_line_start() && !self.out.ends_with(' ') {
                self.out.push(' ');
            }
            return;
        }

        self.flush_breaks();
        if starts_with_space && !self.at_line_start() && !self.out.ends_with(' ') {
            self.out.push(' ');
        }
        self.out.push_str(content);
    }

    fn request_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
    }

    fn flush_breaks(&mut self) {
        if self.pending_breaks > 0 && !self.out.is_empty() {
            self.trim_trailing_spaces();
            for _ in 0..self.pending_breaks {
                self.out.push('\n');
            }
        }
        self.pending_breaks = 0;
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
    }

    fn finish(mut self) -> String {
        self.trim_trailing_spaces();
        self.out.trim_end_matches(['\n', ' ']).to_string()
    }
}

/// Collapses HTML whitespace (space, tab, CR, LF, FF) runs to one space
fn collapse_html_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0C}') {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn render(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse("div.root").unwrap();
        let root = doc.select(&selector).next().unwrap();
        render_inner_text(root, &|_: &ElementRef| Substitute::Keep)
    }

    #[test]
    fn test_norm_collapses_whitespace() {
        assert_eq!(norm("  Hello \n\t world  "), "Hello world");
        assert_eq!(norm(""), "");
    }

    #[test]
    fn test_strip_by_prefix() {
        assert_eq!(strip_by_prefix("By Jane Doe"), "Jane Doe");
        assert_eq!(strip_by_prefix("by  Jane"), "Jane");
        assert_eq!(strip_by_prefix("Bygone Era"), "Bygone Era");
    }

    #[test]
    fn test_normalize_block_soft_break() {
        assert_eq!(normalize_block("Hello\nworld", false), "Hello world");
    }

    #[test]
    fn test_normalize_block_consecutive_soft_breaks() {
        assert_eq!(normalize_block("a\nb\nc", false), "a b c");
    }

    #[test]
    fn test_normalize_block_keeps_break_next_to_space() {
        assert_eq!(normalize_block("Hello \nworld", false), "Hello \nworld");
    }

    #[test]
    fn test_normalize_block_collapses_newline_runs() {
        // The run collapses to one newline, which is then a soft break
        assert_eq!(normalize_block("One\n\n\nTwo", false), "One Two");
    }

    #[test]
    fn test_normalize_block_strips_zero_width() {
        assert_eq!(normalize_block("cit\u{200B}ation\u{2060}", false), "citation");
    }

    #[test]
    fn test_normalize_block_list_item() {
        assert_eq!(normalize_block("Item", true), "- Item");
        assert_eq!(normalize_block("", true), "");
    }

    #[test]
    fn test_join_blocks_drops_empty() {
        let blocks = vec![
            normalize_block("Hello\nworld", false),
            normalize_block("", false),
            normalize_block("Next paragraph", false),
        ];
        assert_eq!(join_blocks(&blocks), "Hello world\n\nNext paragraph");
    }

    #[test]
    fn test_normalize_fallback() {
        assert_eq!(normalize_fallback("a\r\n\n\n\nb\u{200D}"), "a\n\nb");
    }

    #[test]
    fn test_render_collapses_inline_whitespace() {
        assert_eq!(
            render(r#"<div class="root">Hello   <b> bold </b>  world</div>"#),
            "Hello bold world"
        );
    }

    #[test]
    fn test_render_br_is_line_break() {
        assert_eq!(
            render(r#"<div class="root">line one<br>line two</div>"#),
            "line one\nline two"
        );
    }

    #[test]
    fn test_render_paragraphs_separated_by_blank_line() {
        assert_eq!(
            render(r#"<div class="root"><p>First</p><p>Second</p></div>"#),
            "First\n\nSecond"
        );
    }

    #[test]
    fn test_render_list_items_on_own_lines() {
        assert_eq!(
            render(r#"<div class="root"><ul><li>One</li><li>Two</li></ul></div>"#),
            "One\nTwo"
        );
    }

    #[test]
    fn test_render_skips_script() {
        assert_eq!(
            render(r#"<div class="root">Text<script>var x = 1;</script></div>"#),
            "Text"
        );
    }

    #[test]
    fn test_render_preserves_pre_whitespace() {
        assert_eq!(
            render("<div class=\"root\"><pre>a  b\n  c</pre></div>"),
            "a  b\n  c"
        );
    }

    #[test]
    fn test_render_substitution() {
        let doc = Html::parse_fragment(
            r#"<div class="root">Before <span class="swap"><i>x</i></span> after <em class="gone">no</em></div>"#,
        );
        let selector = Selector::parse("div.root").unwrap();
        let root = doc.select(&selector).next().unwrap();

        let text = render_inner_text(root, &|el: &ElementRef| {
            if el.value().has_class("swap", scraper::CaseSensitivity::CaseSensitive) {
                Substitute::Text("[1]".to_string())
            } else if el.value().has_class("gone", scraper::CaseSensitivity::CaseSensitive) {
                Substitute::Drop
            } else {
                Substitute::Keep
            }
        });
        assert_eq!(text, "Before [1] after");
    }
}
