//! GitHub-flavored markdown anchor/slug generation for index and see-also links.

/// Link to a documented name, or keep a URL / markdown link usable.
pub fn render_link(text: &str) -> String {
    // Relative links (starting with /, ./, ../)
    if text.starts_with('/') || text.starts_with("./") || text.starts_with("../") {
        return format!("[{}]({})", text, text);
    }

    if contains_markdown_link(text) || contains_inline_link(text) {
        return text.to_string();
    }

    if text.contains("://") {
        return wrap_bare_urls(text);
    }

    format!("[{}](#{})", text, github_slug(text))
}

/// Index list item.
pub fn render_index_item(title: &str) -> String {
    format!("* {}", render_link(title))
}

/// GitHub heading anchor slug.
///
/// Lowercase, keep alphanumerics, spaces and hyphens, then spaces become
/// hyphens. Dots, underscores and `$` are dropped, so `this.max` → `thismax`.
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// `[text](target)`
fn contains_markdown_link(text: &str) -> bool {
    text.find('[')
        .and_then(|open| text[open..].find("](").map(|close| open + close))
        .is_some_and(|close| text[close..].contains(')'))
}

/// JSDoc `{@link target}`
fn contains_inline_link(text: &str) -> bool {
    text.contains("{@link")
}

/// Wrap every bare URL in markdown link syntax.
fn wrap_bare_urls(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if word.contains("://") {
                format!("[{}]({})", word, word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple() {
        assert_eq!(github_slug("hello world"), "hello-world");
    }

    #[test]
    fn slug_with_dots() {
        assert_eq!(github_slug("random.float"), "randomfloat");
        assert_eq!(github_slug("this.max"), "thismax");
        assert_eq!(github_slug("_private_helper"), "privatehelper");
    }

    #[test]
    fn slug_uppercase() {
        assert_eq!(github_slug("bytesToText"), "bytestotext");
    }

    #[test]
    fn link_to_name() {
        assert_eq!(render_link("random.float"), "[random.float](#randomfloat)");
    }

    #[test]
    fn link_relative() {
        assert_eq!(render_link("./other.md"), "[./other.md](./other.md)");
    }

    #[test]
    fn link_bare_url() {
        assert_eq!(
            render_link("http://example.com/foobar for details"),
            "[http://example.com/foobar](http://example.com/foobar) for details"
        );
    }

    #[test]
    fn link_existing_markdown() {
        assert_eq!(render_link("[docs](https://x.dev)"), "[docs](https://x.dev)");
        assert_eq!(render_link("{@link Foo}"), "{@link Foo}");
    }

    #[test]
    fn index_item() {
        assert_eq!(render_index_item("bytesToText"), "* [bytesToText](#bytestotext)");
    }
}
