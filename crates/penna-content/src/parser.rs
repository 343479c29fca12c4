//! Markdown structure extraction.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// The pulldown-cmark extensions enabled for all post rendering.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Extract a table of contents from markdown content.
///
/// Headings inside code blocks are ignored by the parser, so only real
/// section headings produce entries.
pub fn extract_toc(content: &str) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut current_heading: Option<(u8, String)> = None;

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugify(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    toc
}

/// Extract a plain-text excerpt: the first paragraph of prose.
///
/// Headings and code blocks do not count as prose; an empty string is
/// returned for posts that contain nothing else.
pub fn extract_excerpt(content: &str) -> String {
    let mut in_paragraph = false;
    let mut excerpt = String::new();

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
            }

            Event::Text(text) | Event::Code(text) => {
                if in_paragraph {
                    excerpt.push_str(&text);
                }
            }

            Event::SoftBreak | Event::HardBreak => {
                if in_paragraph {
                    excerpt.push(' ');
                }
            }

            Event::End(TagEnd::Paragraph) => {
                if !excerpt.trim().is_empty() {
                    break;
                }
                in_paragraph = false;
            }

            _ => {}
        }
    }

    excerpt.trim().to_string()
}

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
