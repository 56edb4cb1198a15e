//! Restricted markup pipeline
//!
//! Converts message text to an HTML fragment through a fixed, statically
//! ordered list of stages. The supported surface is deliberately small:
//! inline code, bold/italic (including smart underscore variants),
//! strikethrough, autolinks and bare-URL detection, literal inline HTML
//! with entity escaping, fenced code blocks, and paragraph grouping by
//! blank-line runs. Headers, lists, block quotes, rules, indented code,
//! reference/inline links and images stay literal text.
//!
//! The output fragment carries no paragraph wrapper: single newlines
//! render as `<br />` and paragraph boundaries as `<br /><br />`, so the
//! caller's content container supplies the paragraph semantics.

use regex::{Captures, Regex};

use crate::escape::escape_html;

/// Characters a backslash may escape, matching the classic engine's list.
const ESCAPED_CHARS: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '>', '#', '+', '-', '.', '!',
];

/// Punctuation stripped from the tail of a detected bare URL.
const URL_TRAILERS: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Statically ordered markup stages; every pattern compiles once here.
pub struct MarkupPipeline {
    fence_re: Regex,
    blank_re: Regex,
    code2_re: Regex,
    code_re: Regex,
    escape_re: Regex,
    autolink_re: Regex,
    url_re: Regex,
    html_re: Regex,
    entity_re: Regex,
    strike_re: Regex,
    em_strong_re: Regex,
    strong_re: Regex,
    emphasis_re: Regex,
    smart_strong_re: Regex,
    smart_emphasis_re: Regex,
    placeholder_re: Regex,
}

impl Default for MarkupPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupPipeline {
    pub fn new() -> Self {
        Self {
            fence_re: Regex::new(r"(?s)```([-.+#A-Za-z]+\n)?(.*?)```").expect("static pattern"),
            blank_re: Regex::new(r"\n{2,}").expect("static pattern"),
            code2_re: Regex::new(r"``(.+?)``").expect("static pattern"),
            code_re: Regex::new(r"`([^`]+)`").expect("static pattern"),
            escape_re: Regex::new(r"\\(.)").expect("static pattern"),
            autolink_re: Regex::new(r"<(https?://[^<>]*)>").expect("static pattern"),
            url_re: Regex::new(r"https?://[^\s<>]+").expect("static pattern"),
            html_re: Regex::new(r"</?[A-Za-z][^<>]*>").expect("static pattern"),
            entity_re: Regex::new(r"&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);")
                .expect("static pattern"),
            strike_re: Regex::new(r"~~(.*?)~~").expect("static pattern"),
            em_strong_re: Regex::new(r"\*\*\*([^\s*](?:.*?[^\s*])?)\*\*\*").expect("static pattern"),
            strong_re: Regex::new(r"\*\*([^\s*](?:.*?[^\s*])?)\*\*").expect("static pattern"),
            emphasis_re: Regex::new(r"\*([^\s*](?:[^*]*?[^\s*])?)\*").expect("static pattern"),
            smart_strong_re: Regex::new(r"\b__([^\s_](?:.*?[^\s_])?)__\b").expect("static pattern"),
            smart_emphasis_re: Regex::new(r"\b_([^\s_](?:[^_]*?[^\s_])?)_\b")
                .expect("static pattern"),
            placeholder_re: Regex::new("\u{2}([0-9]+)\u{3}").expect("static pattern"),
        }
    }

    /// Render message text to an HTML fragment.
    pub fn to_html(&self, text: &str) -> String {
        let mut stash = Stash::default();
        let text = normalize(text);
        let text = self.stash_fences(&text, &mut stash);

        let rendered: Vec<String> = self
            .blank_re
            .split(&text)
            .filter(|block| !block.trim().is_empty())
            .map(|block| self.render_inline(block, &mut stash))
            .collect();

        // paragraph boundaries become an explicit double break
        stash.restore(&self.placeholder_re, &rendered.join("<br /><br />"))
    }

    /// Protect fenced code blocks before any other stage sees the text.
    fn stash_fences(&self, text: &str, stash: &mut Stash) -> String {
        self.fence_re
            .replace_all(text, |caps: &Captures<'_>| {
                let body = escape_html(&caps[2]);
                let html = match caps.get(1) {
                    Some(lang) => format!(
                        "<pre><code class=\"{}\">{body}</code></pre>",
                        escape_html(lang.as_str().trim_end_matches('\n'))
                    ),
                    None => format!("<pre><code>{body}</code></pre>"),
                };
                stash.add(html)
            })
            .into_owned()
    }

    /// Inline stages over one paragraph, in fixed priority order.
    fn render_inline(&self, block: &str, stash: &mut Stash) -> String {
        let mut text = block.trim().to_string();

        // code spans stash first so their contents render verbatim
        for re in [&self.code2_re, &self.code_re] {
            text = re
                .replace_all(&text, |caps: &Captures<'_>| {
                    stash.add(format!("<code>{}</code>", escape_html(caps[1].trim())))
                })
                .into_owned();
        }

        // backslash escapes suppress markup on the escaped character
        text = self
            .escape_re
            .replace_all(&text, |caps: &Captures<'_>| {
                let c = &caps[1];
                if c.chars().all(|c| ESCAPED_CHARS.contains(&c)) {
                    stash.add(escape_html(c))
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();

        // <scheme://...> autolinks, then bare URLs
        text = self
            .autolink_re
            .replace_all(&text, |caps: &Captures<'_>| stash.add(anchor(&caps[1])))
            .into_owned();
        text = self
            .url_re
            .replace_all(&text, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let url = whole.trim_end_matches(URL_TRAILERS);
                format!("{}{}", stash.add(anchor(url)), &whole[url.len()..])
            })
            .into_owned();

        // literal inline HTML and entities pass through untouched
        for re in [&self.html_re, &self.entity_re] {
            text = re
                .replace_all(&text, |caps: &Captures<'_>| stash.add(caps[0].to_string()))
                .into_owned();
        }

        // everything still exposed is plain text
        text = escape_text(&text);

        text = self.strike_re.replace_all(&text, "<s>$1</s>").into_owned();
        text = self
            .em_strong_re
            .replace_all(&text, "<strong><em>$1</em></strong>")
            .into_owned();
        text = self
            .strong_re
            .replace_all(&text, "<strong>$1</strong>")
            .into_owned();
        text = self
            .emphasis_re
            .replace_all(&text, "<em>$1</em>")
            .into_owned();
        text = self
            .smart_strong_re
            .replace_all(&text, "<strong>$1</strong>")
            .into_owned();
        text = self
            .smart_emphasis_re
            .replace_all(&text, "<em>$1</em>")
            .into_owned();

        // remaining single newlines are soft breaks
        text.replace('\n', "<br />\n")
    }
}

fn anchor(url: &str) -> String {
    let escaped = escape_html(url);
    format!("<a href=\"{escaped}\">{escaped}</a>")
}

/// Unify line endings and drop trailing whitespace per line.
fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape the text-node characters the target format reserves.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Placeholder store protecting rendered fragments from later stages.
#[derive(Default)]
struct Stash {
    items: Vec<String>,
}

impl Stash {
    /// Store `html`, returning the placeholder token to splice in its place
    fn add(&mut self, html: String) -> String {
        self.items.push(html);
        format!("\u{2}{}\u{3}", self.items.len() - 1)
    }

    /// Splice every stored fragment back over its placeholder
    fn restore(&self, placeholder_re: &Regex, text: &str) -> String {
        placeholder_re
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.items.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}
