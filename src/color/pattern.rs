//! Markup pattern matchers: solid color tags, gradients, and rainbows.

use regex::{Captures, Regex};

use super::palette::{self, Rgb};
use super::{Capabilities, ColorCode};

/// One markup recognizer in the colorize pipeline.
///
/// Matchers run in a fixed order — solid, then gradient, then rainbow —
/// and each matcher only sees the markup still present after the matchers
/// before it ran. The order is part of the pipeline contract; reordering
/// changes which matcher claims ambiguous input.
pub trait PatternMatcher {
    /// Replace every occurrence of this matcher's markup in `input`.
    /// Anything unmatched, including malformed tags, is left untouched.
    fn expand(&self, input: &str, caps: &Capabilities) -> String;
}

/// The matcher stages, in contract order.
pub(super) fn pipeline() -> Vec<Box<dyn PatternMatcher + Send + Sync>> {
    vec![
        Box::new(SolidMatcher::new()),
        Box::new(GradientMatcher::new()),
        Box::new(RainbowMatcher::new()),
    ]
}

/// `<SOLID:RRGGBB>` or `<#RRGGBB>`: one color applied from the tag
/// position to the remainder of its scope.
struct SolidMatcher {
    regex: Regex,
}

impl SolidMatcher {
    fn new() -> Self {
        Self {
            regex: Regex::new(r"<SOLID:([0-9A-F]{6})>|<#([0-9A-F]{6})>")
                .expect("solid tag pattern is a valid regex"),
        }
    }
}

impl PatternMatcher for SolidMatcher {
    fn expand(&self, input: &str, caps: &Capabilities) -> String {
        self.regex
            .replace_all(input, |m: &Captures<'_>| {
                let hex = m.get(1).or_else(|| m.get(2));
                match hex.and_then(|g| Rgb::from_hex(g.as_str())) {
                    Some(color) => {
                        let mut out = String::new();
                        ColorCode::resolve(color, caps).write(&mut out);
                        out
                    }
                    None => m[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// `<GRADIENT:RRGGBB>text</GRADIENT:RRGGBB>`: the opening tag carries the
/// start color, the closing tag the end color.
struct GradientMatcher {
    regex: Regex,
}

impl GradientMatcher {
    fn new() -> Self {
        Self {
            regex: Regex::new(r"<GRADIENT:([0-9A-F]{6})>(.*?)</GRADIENT:([0-9A-F]{6})>")
                .expect("gradient tag pattern is a valid regex"),
        }
    }
}

impl PatternMatcher for GradientMatcher {
    fn expand(&self, input: &str, caps: &Capabilities) -> String {
        self.regex
            .replace_all(input, |m: &Captures<'_>| {
                let start = m.get(1).and_then(|g| Rgb::from_hex(g.as_str()));
                let end = m.get(3).and_then(|g| Rgb::from_hex(g.as_str()));
                let (Some(start), Some(end)) = (start, end) else {
                    return m[0].to_string();
                };
                let span = &m[2];
                let codes: Vec<ColorCode> = gradient_steps(start, end, visible_len(span))
                    .into_iter()
                    .map(|color| ColorCode::resolve(color, caps))
                    .collect();
                apply_codes(span, &codes)
            })
            .into_owned()
    }
}

/// `<RAINBOWn>text</RAINBOW>`: `n` is the saturation parameter.
struct RainbowMatcher {
    regex: Regex,
}

impl RainbowMatcher {
    fn new() -> Self {
        Self {
            regex: Regex::new(r"<RAINBOW([0-9]{1,3})>(.*?)</RAINBOW>")
                .expect("rainbow tag pattern is a valid regex"),
        }
    }
}

impl PatternMatcher for RainbowMatcher {
    fn expand(&self, input: &str, caps: &Capabilities) -> String {
        self.regex
            .replace_all(input, |m: &Captures<'_>| {
                let Ok(saturation) = m[1].parse::<f32>() else {
                    return m[0].to_string();
                };
                let span = &m[2];
                let codes: Vec<ColorCode> = rainbow_steps(visible_len(span), saturation)
                    .into_iter()
                    .map(|color| ColorCode::resolve(color, caps))
                    .collect();
                apply_codes(span, &codes)
            })
            .into_owned()
    }
}

/// Special-format codes contribute no visible character.
const SPECIAL_CODES: [&str; 10] = [
    "&l", "&n", "&o", "&k", "&m", "§l", "§n", "§o", "§k", "§m",
];

/// Count of characters in `span` that receive a color of their own.
pub(super) fn visible_len(span: &str) -> usize {
    let mut text = span.to_string();
    for code in SPECIAL_CODES {
        if text.contains(code) {
            text = text.replace(code, "");
        }
    }
    text.chars().count()
}

/// Linear per-channel interpolation from `start` to `end` over `steps`
/// colors. A single-character span has no room to interpolate and renders
/// solid at the start color; an empty span yields no colors.
pub(super) fn gradient_steps(start: Rgb, end: Rgb, steps: usize) -> Vec<Rgb> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..steps)
            .map(|i| {
                Rgb::new(
                    channel_at(start.r, end.r, steps, i),
                    channel_at(start.g, end.g, steps, i),
                    channel_at(start.b, end.b, steps, i),
                )
            })
            .collect(),
    }
}

fn channel_at(start: u8, end: u8, steps: usize, i: usize) -> u8 {
    let step = (start as i32 - end as i32).abs() / (steps as i32 - 1);
    let direction = if start < end { 1 } else { -1 };
    (start as i32 + step * i as i32 * direction).clamp(0, 255) as u8
}

/// One color per step, hue swept evenly over the full circle left to
/// right. Saturation and value both take the caller's parameter.
pub(super) fn rainbow_steps(steps: usize, saturation: f32) -> Vec<Rgb> {
    if steps == 0 {
        return Vec::new();
    }
    let hue_step = 1.0 / steps as f32;
    (0..steps)
        .map(|i| palette::hsv_to_rgb(hue_step * i as f32, saturation, saturation))
        .collect()
}

/// Emit `span` with one color code per visible character.
///
/// Per character: its color code, then any accumulated special-format
/// codes, then the character itself. `&`/`§` pairs accumulate until a
/// reset (`r`) clears the accumulator; a trailing lone introducer is a
/// plain character. Runs out of colors gracefully by emitting the rest
/// of the text uncolored.
pub(super) fn apply_codes(span: &str, codes: &[ColorCode]) -> String {
    let chars: Vec<char> = span.chars().collect();
    let mut specials = String::new();
    let mut out = String::new();
    let mut code_idx = 0;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if (ch == '&' || ch == '§') && i + 1 < chars.len() {
            let letter = chars[i + 1];
            if letter.eq_ignore_ascii_case(&'r') {
                specials.clear();
            } else {
                specials.push(ch);
                specials.push(letter);
            }
            i += 2;
            continue;
        }
        if let Some(code) = codes.get(code_idx) {
            code.write(&mut out);
        }
        code_idx += 1;
        out.push_str(&specials);
        out.push(ch);
        i += 1;
    }
    out
}
