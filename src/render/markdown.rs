//! Markdown-to-HTML conversion using pulldown-cmark.
//!
//! The event stream is rewritten before serialization to apply site policy:
//!
//! - raw HTML passes through only when `[markup] unsafe = true`, and is
//!   escaped to visible text otherwise
//! - math spans are wrapped for client-side rendering when `[markup] math`
//!   is enabled
//! - fenced code blocks gain copy-button markup when
//!   `[params] show_code_copy_buttons` is set
//!
//! Conversion is a pure function of (body, config): identical input yields
//! byte-identical HTML.

use super::escape_html;
use crate::config::SiteConfig;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// Render a markdown body to HTML under the configured policy.
///
/// Returns an error message for malformed markup (unterminated code fence).
pub fn render_markdown(body: &str, config: &SiteConfig) -> Result<String, String> {
    check_code_fences(body)?;

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    if config.markup.math {
        options.insert(Options::ENABLE_MATH);
    }

    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 2);
    html::push_html(&mut out, parser.flat_map(|event| transform(event, config)));
    Ok(out)
}

/// Apply site policy to one event.
fn transform<'a>(event: Event<'a>, config: &SiteConfig) -> Vec<Event<'a>> {
    match event {
        // Raw HTML becomes visible text unless passthrough is enabled;
        // push_html escapes Text events for us.
        Event::Html(raw) if !config.markup.unsafe_html => vec![Event::Text(raw)],
        Event::InlineHtml(raw) if !config.markup.unsafe_html => vec![Event::Text(raw)],

        Event::InlineMath(math) => vec![Event::Html(
            format!(
                r#"<span class="math inline">\({}\)</span>"#,
                escape_html(&math)
            )
            .into(),
        )],
        Event::DisplayMath(math) => vec![Event::Html(
            format!(
                r#"<span class="math display">\[{}\]</span>"#,
                escape_html(&math)
            )
            .into(),
        )],

        Event::Start(Tag::CodeBlock(kind)) if config.params.show_code_copy_buttons => vec![
            Event::Html(r#"<div class="highlight">"#.into()),
            Event::Start(Tag::CodeBlock(kind)),
        ],
        Event::End(TagEnd::CodeBlock) if config.params.show_code_copy_buttons => vec![
            Event::End(TagEnd::CodeBlock),
            Event::Html(r#"<button class="copy-code">copy</button></div>"#.into()),
        ],

        other => vec![other],
    }
}

/// Reject bodies with an unterminated fenced code block.
///
/// A fence opens with three or more backticks or tildes; it closes with a
/// line of at least as many of the same character and nothing else.
fn check_code_fences(body: &str) -> Result<(), String> {
    let mut open: Option<(char, usize, usize)> = None;

    for (i, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        let Some(fence_char @ ('`' | '~')) = trimmed.chars().next() else {
            continue;
        };
        let len = trimmed.chars().take_while(|&c| c == fence_char).count();
        if len < 3 {
            continue;
        }

        match open {
            None => open = Some((fence_char, len, i + 1)),
            Some((c, l, _))
                if c == fence_char
                    && len >= l
                    && trimmed.chars().skip(len).all(char::is_whitespace) =>
            {
                open = None;
            }
            Some(_) => {}
        }
    }

    match open {
        Some((_, _, line)) => Err(format!("unterminated code fence opened on line {line}")),
        None => Ok(()),
    }
}
