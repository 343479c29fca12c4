//! RSS 2.0 feed generation.

use penna_content::Post;

/// Maximum number of posts included in the feed.
const FEED_LIMIT: usize = 20;

/// Render the RSS 2.0 feed for the newest posts.
///
/// Posts are expected newest-first, as the content store orders them.
pub fn render_feed(
    site_title: &str,
    site_description: &str,
    base_url: &str,
    posts: &[Post],
) -> String {
    let base = base_url.trim_end_matches('/');

    let items: Vec<String> = posts
        .iter()
        .take(FEED_LIMIT)
        .map(|post| {
            let link = format!("{}/{}/", base, post.slug);
            let description = post
                .description
                .clone()
                .unwrap_or_else(|| post.excerpt.clone());

            format!(
                "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <guid>{}</guid>\n      <pubDate>{}</pubDate>\n      <description>{}</description>\n    </item>",
                xml_escape(&post.title),
                xml_escape(&link),
                xml_escape(&link),
                post.date.format("%a, %d %b %Y 00:00:00 +0000"),
                xml_escape(&description),
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>{}</title>
    <link>{}/</link>
    <description>{}</description>
{}
  </channel>
</rss>"#,
        xml_escape(site_title),
        xml_escape(base),
        xml_escape(site_description),
        items.join("\n")
    )
}

/// Escape text for inclusion in XML element content.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn post(slug: &str, title: &str, date: &str) -> Post {
        let source = format!("---\ntitle: {}\n---\n\nBody text.", title);
        Post::parse(Path::new(&format!("{}-{}.md", date, slug)), &source).unwrap()
    }

    #[test]
    fn renders_feed_with_items() {
        let posts = vec![
            post("newer", "Newer Post", "2024-06-01"),
            post("older", "Older Post", "2024-01-01"),
        ];

        let feed = render_feed("My Blog", "Notes", "https://example.com/", &posts);

        assert!(feed.contains("<rss version=\"2.0\">"));
        assert!(feed.contains("<title>My Blog</title>"));
        assert!(feed.contains("<link>https://example.com/newer/</link>"));
        assert!(feed.contains("Sat, 01 Jun 2024 00:00:00 +0000"));
        assert!(feed.contains("<description>Body text.</description>"));
    }

    #[test]
    fn escapes_xml_in_titles() {
        let posts = vec![post("generics", "Bounds & <T> Tricks", "2024-02-01")];

        let feed = render_feed("Blog", "", "https://example.com", &posts);

        assert!(feed.contains("Bounds &amp; &lt;T&gt; Tricks"));
        assert!(!feed.contains("<T>"));
    }

    #[test]
    fn limits_feed_length() {
        let posts: Vec<Post> = (1..=25)
            .map(|i| post(&format!("post-{:02}", i), &format!("Post {}", i), "2024-01-01"))
            .collect();

        let feed = render_feed("Blog", "", "https://example.com", &posts);

        assert_eq!(feed.matches("<item>").count(), 20);
    }

    #[test]
    fn xml_escape_handles_all_entities() {
        assert_eq!(xml_escape(r#"a & b < c > "d" 'e'"#), "a &amp; b &lt; c &gt; &quot;d&quot; &apos;e&apos;");
    }
}
