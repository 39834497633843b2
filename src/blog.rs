//! Blog posts and the admin editing form.

use crate::error::{AppError, AppResult};
use crate::markdown::{render_markdown, strip_markdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Average adult reading speed used for the "N min read" label.
const WORDS_PER_MINUTE: usize = 200;

/// Default excerpt length in characters.
pub const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub slug: String,
    pub title: String,
    /// Markdown source
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn render_html(&self) -> String {
        render_markdown(&self.content)
    }

    /// Stored excerpt if present, otherwise derived from the content.
    pub fn summary(&self) -> String {
        self.excerpt
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| excerpt(&self.content, EXCERPT_CHARS))
    }

    pub fn reading_time_minutes(&self) -> usize {
        reading_time_minutes(&self.content)
    }
}

/// Admin form for creating or editing a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogDraft {
    pub id: Option<i64>,
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    pub published: bool,
}

impl BlogDraft {
    /// Check required fields and build the post to save. The slug is derived
    /// from the title when left blank. `now` stamps first publication.
    pub fn validate(self, now: DateTime<Utc>) -> AppResult<BlogPost> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required.".into()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("Content is required.".into()));
        }

        let slug = self
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));
        if slug.is_empty() {
            return Err(AppError::Validation(
                "Title must contain at least one letter or digit.".into(),
            ));
        }

        Ok(BlogPost {
            id: self.id,
            slug,
            title,
            content: self.content,
            excerpt: self.excerpt.filter(|e| !e.trim().is_empty()),
            cover_image_url: self.cover_image_url.filter(|u| !u.trim().is_empty()),
            published: self.published,
            published_at: self.published.then_some(now),
        })
    }
}

/// URL slug: lowercase ASCII letters and digits separated by single dashes.
/// Common German/French accented letters are transliterated.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let mapped: &str = match c {
            'ä' => "ae",
            'ö' => "oe",
            'ü' => "ue",
            'ß' => "ss",
            'à' | 'á' | 'â' => "a",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'ò' | 'ó' | 'ô' => "o",
            'ù' | 'ú' | 'û' => "u",
            'ç' => "c",
            'ñ' => "n",
            _ => "",
        };

        if !mapped.is_empty() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push_str(mapped);
        } else if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

pub fn reading_time_minutes(markdown: &str) -> usize {
    let words = strip_markdown(markdown).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Plain-text excerpt cut at a word boundary, with an ellipsis when cut.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let text = strip_markdown(markdown);
    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches([',', '.', ';', ':']))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    // ==================== slugify Tests ====================

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Finding Your Coach: 5 Tips!"), "finding-your-coach-5-tips");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Führung & Größe"), "fuehrung-groesse");
        assert_eq!(slugify("Café Crème"), "cafe-creme");
    }

    #[test]
    fn test_slugify_trims_dashes() {
        assert_eq!(slugify("  --hello--  "), "hello");
        assert_eq!(slugify("!!!"), "");
    }

    // ==================== Reading Time Tests ====================

    #[test]
    fn test_reading_time_minimum_one() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes("short post"), 1);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let content = "word ".repeat(201);
        assert_eq!(reading_time_minutes(&content), 2);
    }

    // ==================== Excerpt Tests ====================

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("**Hello** world", 50), "Hello world");
    }

    #[test]
    fn test_excerpt_cuts_at_word() {
        assert_eq!(excerpt("one two three four", 10), "one two…");
    }

    // ==================== Draft Tests ====================

    #[test]
    fn test_draft_requires_title_and_content() {
        let missing_title = BlogDraft {
            content: "body".into(),
            ..Default::default()
        };
        assert!(missing_title.validate(now()).unwrap_err().is_validation());

        let missing_content = BlogDraft {
            title: "Title".into(),
            content: "   ".into(),
            ..Default::default()
        };
        assert!(missing_content.validate(now()).is_err());
    }

    #[test]
    fn test_draft_derives_slug_and_publish_date() {
        let draft = BlogDraft {
            title: "Why Coaching Works".into(),
            content: "# Intro".into(),
            slug: Some("  ".into()),
            published: true,
            ..Default::default()
        };

        let post = draft.validate(now()).expect("Should validate");
        assert_eq!(post.slug, "why-coaching-works");
        assert_eq!(post.published_at, Some(now()));
        assert_eq!(post.render_html(), "<h1>Intro</h1>");
    }

    #[test]
    fn test_unpublished_draft_has_no_date() {
        let draft = BlogDraft {
            title: "Draft".into(),
            content: "text".into(),
            slug: Some("Custom Slug".into()),
            ..Default::default()
        };

        let post = draft.validate(now()).unwrap();
        assert_eq!(post.slug, "custom-slug");
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_summary_prefers_stored_excerpt() {
        let mut post = BlogDraft {
            title: "T".into(),
            content: "Generated from *content*".into(),
            ..Default::default()
        }
        .validate(now())
        .unwrap();

        assert_eq!(post.summary(), "Generated from content");
        post.excerpt = Some("Hand written".into());
        assert_eq!(post.summary(), "Hand written");
    }
}
