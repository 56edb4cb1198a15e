//! Custom emoji substitution
//!
//! A `<:name:id>` token becomes an inline image; the image source is a
//! deterministic function of the numeric id, so no emoji metadata lookup
//! is needed at render time.

use regex::Regex;

use crate::escape::escape_html;

/// Rewrites custom-emoji tokens into inline image references.
pub struct EmojiRewriter {
    emoji_re: Regex,
}

impl Default for EmojiRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiRewriter {
    pub fn new() -> Self {
        Self {
            // TODO: animated emoji use an <a:name:id> form and a .gif asset
            emoji_re: Regex::new("<:([^:]+):([0-9]+)>").expect("static pattern"),
        }
    }

    /// Replace every emoji token with an `<img class="emoji">` element.
    pub fn rewrite(&self, text: &str) -> String {
        self.emoji_re
            .replace_all(text, |caps: &regex::Captures<'_>| {
                format!(
                    r#"<img class="emoji" title=":{name}:" src="emojis/{id}.png">"#,
                    name = escape_html(&caps[1]),
                    id = &caps[2],
                )
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_emoji_token() {
        let emoji = EmojiRewriter::new();
        assert_eq!(
            emoji.rewrite("hello <:wave:123> there"),
            r#"hello <img class="emoji" title=":wave:" src="emojis/123.png"> there"#
        );
    }

    #[test]
    fn test_name_is_escaped() {
        let emoji = EmojiRewriter::new();
        assert_eq!(
            emoji.rewrite("<:a&b:9>"),
            r#"<img class="emoji" title=":a&amp;b:" src="emojis/9.png">"#
        );
    }

    #[test]
    fn test_non_emoji_untouched() {
        let emoji = EmojiRewriter::new();
        assert_eq!(emoji.rewrite("plain <@10> text"), "plain <@10> text");
    }
}
