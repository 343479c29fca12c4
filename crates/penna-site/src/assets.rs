//! Asset pipeline for the default theme CSS and JavaScript.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* penna default theme */

:root {
  --content-max-width: 720px;
  --text: #1a1a1a;
  --muted: #6b7280;
  --background: #ffffff;
  --surface: #f6f7f8;
  --border: #e5e7eb;
  --accent: #2563eb;
}

@media (prefers-color-scheme: dark) {
  :root {
    --text: #e5e7eb;
    --muted: #9ca3af;
    --background: #111418;
    --surface: #1a1f26;
    --border: #2a313b;
    --accent: #7aa2f7;
  }
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--text);
  line-height: 1.65;
}

.site-header {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 1.5rem 1rem;
  border-bottom: 1px solid var(--border);
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--text);
  text-decoration: none;
}

.site-nav a {
  margin-left: 1rem;
  color: var(--muted);
  text-decoration: none;
}

.site-nav a:hover {
  color: var(--accent);
}

.main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem 1rem;
}

/* Post list */
.post-entry {
  margin-bottom: 2rem;
}

.post-entry h2 {
  font-size: 1.375rem;
  margin-bottom: 0.25rem;
}

.post-entry h2 a {
  color: var(--text);
  text-decoration: none;
}

.post-entry h2 a:hover {
  color: var(--accent);
}

.post-meta {
  font-size: 0.875rem;
  color: var(--muted);
  margin-bottom: 0.5rem;
}

.post-meta .tag {
  margin-left: 0.5rem;
  color: var(--accent);
  text-decoration: none;
}

.excerpt {
  color: var(--muted);
}

.empty {
  color: var(--muted);
  font-style: italic;
}

/* Pagination */
.pagination {
  display: flex;
  justify-content: space-between;
  align-items: center;
  margin-top: 2rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
}

.pagination a {
  color: var(--accent);
  text-decoration: none;
}

.page-number {
  color: var(--muted);
  font-size: 0.875rem;
}

/* Post page */
.post-header h1 {
  font-size: 2rem;
  margin-bottom: 0.5rem;
}

.content h2 {
  font-size: 1.5rem;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content h3 {
  font-size: 1.25rem;
  margin: 1.5rem 0 0.75rem;
}

.content p {
  margin-bottom: 1rem;
}

.content a {
  color: var(--accent);
  text-decoration: underline;
  text-underline-offset: 3px;
}

.content ul,
.content ol {
  margin: 0 0 1rem 1.5rem;
}

.content blockquote {
  border-left: 3px solid var(--border);
  padding-left: 1rem;
  color: var(--muted);
  margin-bottom: 1rem;
}

/* Code blocks */
.content pre {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1rem;
  overflow-x: auto;
  font-family: ui-monospace, monospace;
  font-size: 0.875rem;
  margin-bottom: 1rem;
  position: relative;
}

.content code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
  background: var(--surface);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.content pre code {
  background: none;
  padding: 0;
}

/* Copy button */
.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  background: var(--background);
  color: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  cursor: pointer;
}

.copy-btn:hover {
  color: var(--accent);
}

/* Table of contents */
.toc {
  margin-top: 2rem;
  padding: 1rem;
  background: var(--surface);
  border-radius: 0.5rem;
}

.toc h2 {
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted);
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  font-size: 0.875rem;
  color: var(--muted);
  text-decoration: none;
}

.toc a:hover {
  color: var(--accent);
}

.toc-level-3 {
  padding-left: 1rem;
}

.toc-level-4 {
  padding-left: 2rem;
}

/* Tag directory */
.tag-list ul {
  list-style: none;
  margin-top: 1rem;
}

.tag-list a {
  color: var(--accent);
  text-decoration: none;
}

.tag-list .count {
  color: var(--muted);
  font-size: 0.875rem;
}

.site-footer {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 1.5rem 1rem;
  border-top: 1px solid var(--border);
  color: var(--muted);
  font-size: 0.875rem;
}
"#;

const DEFAULT_JS: &str = r#"// penna - runtime JavaScript
(function() {
  'use strict';

  // Copy code button for pre blocks
  document.querySelectorAll('.content pre').forEach(pre => {
    if (pre.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const code = pre.querySelector('code');
      const text = code ? code.textContent : pre.textContent;

      try {
        await navigator.clipboard.writeText(text || '');
        btn.textContent = 'Copied!';
        setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
      } catch (err) {
        btn.textContent = 'Error';
        setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
      }
    });

    pre.appendChild(btn);
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains("--accent"));
        assert!(css.contains(".post-entry"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("addEventListener"));
        assert!(js.contains("clipboard"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.post {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".post"));
    }
}
