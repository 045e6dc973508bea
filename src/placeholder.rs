use crate::images::Dimensions;

const LINE_CHARS: usize = 40;
const MAX_LINES: usize = 6;

/// Renders `text` onto a plain gradient card and returns it as an
/// `image/svg+xml` data URL.
pub fn placeholder_data_url(text: &str, dimensions: Dimensions) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::encode(placeholder_svg(text, dimensions))
    )
}

pub fn placeholder_svg(text: &str, dimensions: Dimensions) -> String {
    let Dimensions { width, height } = dimensions;
    let lines = wrap(text, LINE_CHARS, MAX_LINES);
    let line_height = 44;
    let first_y =
        (height as usize / 2).saturating_sub(lines.len().saturating_sub(1) * line_height / 2);

    let mut tspans = String::new();
    for (i, line) in lines.iter().enumerate() {
        tspans.push_str(&format!(
            r#"<tspan x="50%" y="{}">{}</tspan>"#,
            first_y + i * line_height,
            escape_xml(line)
        ));
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">"#,
            r##"<stop offset="0%" stop-color="#1e1b4b"/><stop offset="100%" stop-color="#581c87"/>"##,
            r#"</linearGradient></defs>"#,
            r#"<rect width="100%" height="100%" fill="url(#bg)"/>"#,
            r#"<text font-family="sans-serif" font-size="32" fill="white" text-anchor="middle">{spans}</text>"#,
            r#"<text x="50%" y="{footer}" font-family="sans-serif" font-size="20" fill="white" fill-opacity="0.6" text-anchor="middle">Preview unavailable</text>"#,
            r#"</svg>"#
        ),
        w = width,
        h = height,
        spans = tspans,
        footer = height.saturating_sub(48),
    )
}

fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
