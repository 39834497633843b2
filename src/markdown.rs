//! Subset markdown to HTML, for blog posts and coach bios.
//!
//! Supported: `#`/`##`/`###` headings, `---` rules, `-`/`*` and `1.` lists,
//! paragraphs separated by blank lines, `**bold**`, `*italic*`, `` `code` ``
//! and `[text](url)` links. Input is HTML-escaped first, so raw HTML in the
//! source is shown as text.

use regex::{Captures, Regex};
use std::sync::OnceLock;

static CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
static ITALIC_REGEX: OnceLock<Regex> = OnceLock::new();
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static ORDERED_ITEM_REGEX: OnceLock<Regex> = OnceLock::new();
static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

/// Delimits set-aside inline fragments while emphasis is applied.
const PLACEHOLDER: char = '\u{0}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(&self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Render markdown to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let mut html: Vec<String> = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut list: Option<(ListKind, Vec<String>)> = None;

    for raw_line in source.lines() {
        let line = raw_line.trim_end();
        let trimmed = line.trim_start();

        if let Some((kind, item)) = list_item(trimmed) {
            flush_paragraph(&mut paragraph, &mut html);
            match &mut list {
                Some((current, items)) if *current == kind => items.push(render_inline(item)),
                _ => {
                    flush_list(&mut list, &mut html);
                    list = Some((kind, vec![render_inline(item)]));
                }
            }
            continue;
        }

        flush_list(&mut list, &mut html);

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut html);
        } else if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut html);
            html.push(format!("<h{0}>{1}</h{0}>", level, render_inline(text)));
        } else if is_rule(trimmed) {
            flush_paragraph(&mut paragraph, &mut html);
            html.push("<hr>".to_string());
        } else {
            paragraph.push(render_inline(trimmed));
        }
    }

    flush_list(&mut list, &mut html);
    flush_paragraph(&mut paragraph, &mut html);

    html.join("\n")
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Strip markdown syntax, leaving plain text (for excerpts and meta tags).
pub fn strip_markdown(source: &str) -> String {
    let link = link_regex();
    let text = link.replace_all(source, "$1");

    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let without_marker = list_item(trimmed)
                .map(|(_, item)| item)
                .or_else(|| heading(trimmed).map(|(_, t)| t))
                .unwrap_or(trimmed);
            if is_rule(without_marker) {
                String::new()
            } else {
                without_marker.replace(['*', '`'], "")
            }
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn flush_paragraph(paragraph: &mut Vec<String>, html: &mut Vec<String>) {
    if !paragraph.is_empty() {
        html.push(format!("<p>{}</p>", paragraph.join("<br>")));
        paragraph.clear();
    }
}

fn flush_list(list: &mut Option<(ListKind, Vec<String>)>, html: &mut Vec<String>) {
    if let Some((kind, items)) = list.take() {
        let body: String = items.iter().map(|item| format!("<li>{}</li>", item)).collect();
        html.push(format!("<{0}>{1}</{0}>", kind.tag(), body));
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if (1..=3).contains(&level) {
        line[level..]
            .strip_prefix(' ')
            .map(|text| (level, text.trim()))
    } else {
        None
    }
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some((ListKind::Unordered, item.trim()));
    }

    let ordered = ORDERED_ITEM_REGEX.get_or_init(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
    ordered
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| (ListKind::Ordered, m.as_str().trim()))
}

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap())
}

fn render_inline(text: &str) -> String {
    let escaped = escape_html(&text.replace(PLACEHOLDER, ""));

    let code = CODE_REGEX.get_or_init(|| Regex::new(r"`([^`]+)`").unwrap());

    // Code spans and anchors are set aside before emphasis runs, so `*` inside
    // them is left alone.
    let mut stash: Vec<String> = Vec::new();
    let html = code.replace_all(&escaped, |caps: &Captures| {
        set_aside(&mut stash, format!("<code>{}</code>", &caps[1]))
    });
    let html = link_regex().replace_all(&html, |caps: &Captures| {
        let label = emphasize(&caps[1]);
        let url = &caps[2];
        let rendered = if !is_safe_url(url) {
            label
        } else if url.starts_with("http://") || url.starts_with("https://") {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                url, label
            )
        } else {
            format!("<a href=\"{}\">{}</a>", url, label)
        };
        set_aside(&mut stash, rendered)
    });

    restore(&emphasize(&html), &stash)
}

fn emphasize(text: &str) -> String {
    let bold = BOLD_REGEX.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
    let italic = ITALIC_REGEX.get_or_init(|| Regex::new(r"\*([^*]+)\*").unwrap());

    let html = bold.replace_all(text, "<strong>$1</strong>");
    italic.replace_all(&html, "<em>$1</em>").into_owned()
}

fn set_aside(stash: &mut Vec<String>, html: String) -> String {
    stash.push(html);
    format!("{0}{1}{0}", PLACEHOLDER, stash.len() - 1)
}

/// Put set-aside fragments back. An anchor label may hold a code span, so
/// restored fragments are restored in turn.
fn restore(text: &str, stash: &[String]) -> String {
    let token = TOKEN_REGEX.get_or_init(|| Regex::new(r"\x00(\d+)\x00").unwrap());
    token
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| stash.get(index))
                .map(|fragment| restore(fragment, stash))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Only web, mail and same-site links are rendered as anchors. Backslashes
/// are refused because browsers read `/\host` as `//host`.
fn is_safe_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    if lower.contains('\\') {
        return false;
    }
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || (lower.starts_with('/') && !lower.starts_with("//"))
        || lower.starts_with('#')
}
