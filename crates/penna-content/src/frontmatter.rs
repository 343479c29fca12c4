//! Frontmatter extraction and parsing.

use chrono::NaiveDate;
use serde::Deserialize;

/// Parsed frontmatter from a post file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Post title (required)
    pub title: String,

    /// Publication date; overrides the date in the filename
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Tags the post belongs to
    #[serde(default)]
    pub tags: Vec<String>,

    /// Short description for feeds and meta tags
    #[serde(default)]
    pub description: Option<String>,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,

    /// Drafts are skipped by default builds
    #[serde(default)]
    pub draft: bool,
}

/// Extract frontmatter from post content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = &after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Circuit Breakers in Practice
date: 2024-03-01
tags: [resilience, patterns]
---

# Circuit Breakers
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "Circuit Breakers in Practice");
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(fm.tags, vec!["resilience", "patterns"]);
        assert!(!fm.draft);
        assert!(content.starts_with("# Circuit Breakers"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_missing_title() {
        let source = "---\ndate: 2024-01-01\n---\nBody";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn parses_draft_flag() {
        let source = "---\ntitle: WIP\ndraft: true\n---\nStill writing.";

        let (fm, _) = extract_frontmatter(source).unwrap();

        assert!(fm.unwrap().draft);
    }
}
