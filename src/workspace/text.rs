use crate::text_metrics;

pub(crate) fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics && text.is_ascii() {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

// Coarse per-character widths for the fast path, calibrated against a
// sans-serif stack at a 16px baseline.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' | '!' => 0.24,
        'f' | 't' | 'r' | 'I' | 'J' => 0.34,
        ' ' | '.' | ',' | ':' | ';' | '(' | ')' | '[' | ']' => 0.31,
        'm' | 'w' | 'M' | 'W' | '@' | '%' | '&' => 0.90,
        'A'..='Z' | '0'..='9' => 0.66,
        _ => 0.56,
    }
}

// Group names render on a single line inside a fixed-width box; anything
// wider is cut and finished with an ellipsis.
pub(crate) fn truncate_label(
    text: &str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
    fast_metrics: bool,
) -> String {
    if max_width <= 0.0 {
        return String::new();
    }
    if text_width(text, font_size, font_family, fast_metrics) <= max_width {
        return text.to_string();
    }

    let ellipsis = "\u{2026}";
    let budget = max_width - text_width(ellipsis, font_size, font_family, fast_metrics);
    if budget <= 0.0 {
        return ellipsis.to_string();
    }

    let mut kept = String::new();
    let mut width = 0.0f32;
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let ch_width = text_width(ch.encode_utf8(&mut buf), font_size, font_family, fast_metrics);
        if width + ch_width > budget {
            break;
        }
        kept.push(ch);
        width += ch_width;
    }
    format!("{}{}", kept.trim_end(), ellipsis)
}
