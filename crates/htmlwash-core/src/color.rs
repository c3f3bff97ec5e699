//! Color normalization to the canonical `#rrggbb` form.

use once_cell::sync::Lazy;
use regex::Regex;

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\(\s*([0-9]{0,3})\s*,\s*([0-9]{0,3})\s*,\s*([0-9]{0,3})\s*\)$")
        .expect("rgb() pattern is valid")
});

/// Normalize a color value so it can be looked up in a style-to-class table.
///
/// - `#abc` expands to `#aabbcc`
/// - `rgb(r, g, b)` converts to hex, one component at a time
/// - anything else is returned lower-cased
///
/// Never fails: unknown keywords and malformed values come back lower-cased
/// and will simply not match any mapping.
pub fn normalize(raw: &str) -> String {
    let color = raw.to_lowercase();

    if color.starts_with('#') && color.len() < 7 {
        return expand_short_hex(&color).unwrap_or(color);
    }

    if let Some(caps) = RGB_FUNCTION.captures(&color) {
        let mut hex = String::with_capacity(7);
        hex.push('#');
        for component in caps.iter().skip(1).flatten() {
            hex.push_str(&component_to_hex(component.as_str()));
        }
        return hex;
    }

    color
}

/// `#abc` -> `#aabbcc`; other short forms are left alone
fn expand_short_hex(color: &str) -> Option<String> {
    let digits = color.strip_prefix('#')?;
    if digits.len() != 3 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let mut expanded = String::with_capacity(7);
    expanded.push('#');
    for c in digits.chars() {
        expanded.push(c);
        expanded.push(c);
    }
    Some(expanded)
}

/// Decimal component to at-least-two-digit hex. An empty component reads as 0.
fn component_to_hex(component: &str) -> String {
    let value: u32 = component.parse().unwrap_or(0);
    format!("{:02x}", value)
}
