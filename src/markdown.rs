//! Instruction Markdown
//!
//! Renders job instructions with pulldown-cmark. Extensions:
//! - Color markers for crew callouts: %r%shut off gas first%r%
//! - Raw HTML in the source is shown as text, never injected
//! - Images are constrained to the panel width

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag};

/// Color codes and their hex values
const COLORS: &[(&str, &str)] = &[
    ("r", "#e74c3c"), // red
    ("g", "#27ae60"), // green
    ("b", "#3498db"), // blue
    ("o", "#e67e22"), // orange
];

/// Render markdown to HTML
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, options());
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

/// First line of the text as plain inline HTML (list previews)
pub fn render_markdown_inline(text: &str) -> String {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
    let html = render_markdown(first);

    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(|s| s.to_string())
        .unwrap_or(html)
}

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    // Depth of alt-text events being dropped after an image
    let mut in_image: Option<usize> = None;

    for event in parser {
        if let Some(depth) = in_image.as_mut() {
            match event {
                Event::Start(_) => *depth += 1,
                Event::End(_) if *depth == 0 => in_image = None,
                Event::End(_) => *depth -= 1,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::Start(Tag::Image { dest_url, .. }) => {
                let html = format!(
                    r#"<img src="{}" class="instruction-image" loading="lazy" />"#,
                    escape_html(&dest_url)
                );
                events.push(Event::Html(CowStr::from(html)));
                in_image = Some(0);
            }
            Event::Text(text) if contains_color_marker(&text) => events.extend(process_colors(&text)),
            other => events.push(other),
        }
    }
    events
}

fn contains_color_marker(text: &str) -> bool {
    COLORS.iter().any(|(code, _)| text.contains(&format!("%{}%", code)))
}

fn process_colors(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut remaining = text.to_string();

    loop {
        let earliest = COLORS
            .iter()
            .filter_map(|(code, color)| {
                let pattern = format!("%{}%", code);
                remaining.find(&pattern).map(|pos| (pos, pattern, *color))
            })
            .min_by_key(|(pos, _, _)| *pos);

        let Some((pos, pattern, color)) = earliest else {
            if !remaining.is_empty() {
                events.push(Event::Text(CowStr::from(remaining)));
            }
            break;
        };

        if pos > 0 {
            events.push(Event::Text(CowStr::from(remaining[..pos].to_string())));
        }
        remaining = remaining[pos + pattern.len()..].to_string();
        match remaining.find(&pattern) {
            Some(end) => {
                events.push(Event::Html(CowStr::from(format!("<span style=\"color: {}\">", color))));
                if end > 0 {
                    events.push(Event::Text(CowStr::from(remaining[..end].to_string())));
                }
                events.push(Event::Html(CowStr::from("</span>")));
                remaining = remaining[end + pattern.len()..].to_string();
            }
            // Unclosed marker stays literal
            None => events.push(Event::Text(CowStr::from(pattern))),
        }
    }
    events
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = render_markdown("**Turn off** the main valve");
        assert_eq!(html.trim(), "<p><strong>Turn off</strong> the main valve</p>");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("Gate code <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_color_marker() {
        let html = render_markdown("Note: %r%live wires%r% in attic");
        assert!(html.contains(r#"<span style="color: #e74c3c">live wires</span>"#));
    }

    #[test]
    fn test_unclosed_color_marker_is_literal() {
        let html = render_markdown("100%r% sure");
        assert!(html.contains("100%r% sure"));
    }

    #[test]
    fn test_image_drops_alt_text() {
        let html = render_markdown("![meter location](https://cdn.example/m.jpg)");
        assert!(html.contains(r#"<img src="https://cdn.example/m.jpg" class="instruction-image""#));
        assert!(!html.contains("meter location"));
    }

    #[test]
    fn test_inline_uses_first_line() {
        assert_eq!(render_markdown_inline("\n*Park* on street\nsecond"), "<em>Park</em> on street");
    }
}
