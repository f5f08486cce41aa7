//! Chat colorization engine.
//!
//! Parses mixed-format chat strings — literal text, legacy 2-character
//! color codes, and pattern markup (solid/gradient/rainbow tags) — and
//! re-emits them with the host's native formatting codes. On hosts that
//! support 24-bit color the emitted codes are true RGB; older hosts get
//! the nearest legacy palette color instead.

pub mod palette;
mod pattern;

pub use palette::Rgb;
pub use pattern::PatternMatcher;

use regex::Regex;

/// The host's native code introducer.
pub const SECTION: char = '§';

/// Alternate introducer accepted in configuration and chat markup,
/// translated to [`SECTION`] as the final pipeline step.
pub const ALT: char = '&';

/// Minimum host version with 24-bit chat color support.
const TRUE_COLOR_MIN_VERSION: u32 = 16;

/// Code letters that form a valid legacy 2-character sequence.
const LEGACY_CODE_LETTERS: &str = "0123456789abcdefklmnorx";

/// Everything the colorize pipeline needs to know about the host.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub supports_true_color: bool,
}

/// A resolved per-character color, ready for emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    /// One of the sixteen palette codes (`0`-`9`, `a`-`f`).
    Legacy(char),
    /// A 24-bit color, emitted as `§x§r§r§g§g§b§b`.
    True(Rgb),
}

impl ColorCode {
    pub(crate) fn resolve(color: Rgb, caps: &Capabilities) -> Self {
        if caps.supports_true_color {
            Self::True(color)
        } else {
            Self::Legacy(palette::nearest_legacy(color))
        }
    }

    pub(crate) fn write(&self, out: &mut String) {
        match self {
            Self::Legacy(code) => {
                out.push(SECTION);
                out.push(*code);
            }
            Self::True(color) => {
                out.push(SECTION);
                out.push('x');
                let nibbles = [
                    color.r >> 4,
                    color.r & 0xF,
                    color.g >> 4,
                    color.g & 0xF,
                    color.b >> 4,
                    color.b & 0xF,
                ];
                for nibble in nibbles {
                    out.push(SECTION);
                    out.push(char::from_digit(nibble as u32, 16).unwrap_or('0'));
                }
            }
        }
    }
}

/// Markup recognized by [`Colorizer::strip`]: hex tags, legacy 2-char
/// codes (including `x`, the true-color introducer), and named pattern
/// tags with optional color and numeric suffix.
const STRIP_PATTERN: &str =
    r"<#[0-9A-F]{6}>|[&§][0-9A-Fa-fK-Ok-oRrXx]|</?[A-Z]{5,8}(:[0-9A-F]{6})?[0-9]*>";

/// The colorization engine. Constructed once per plugin lifetime; the
/// capability flag is fixed at construction. All per-call state is local
/// to a single invocation, so a shared instance is safe to use from any
/// number of callers.
pub struct Colorizer {
    caps: Capabilities,
    matchers: Vec<Box<dyn PatternMatcher + Send + Sync>>,
    strip_pattern: Regex,
}

impl Colorizer {
    pub fn new(host_version: u32) -> Self {
        Self {
            caps: Capabilities {
                supports_true_color: host_version >= TRUE_COLOR_MIN_VERSION,
            },
            matchers: pattern::pipeline(),
            strip_pattern: Regex::new(STRIP_PATTERN).expect("strip pattern is a valid regex"),
        }
    }

    pub fn supports_true_color(&self) -> bool {
        self.caps.supports_true_color
    }

    /// Colorize one string: run every pattern matcher in pipeline order,
    /// then translate the remaining legacy `&`-codes. Pure and
    /// deterministic; never fails, malformed markup stays literal.
    pub fn process(&self, input: &str) -> String {
        let mut text = input.to_string();
        for matcher in &self.matchers {
            text = matcher.expand(&text, &self.caps);
        }
        translate_alternate_codes(&text)
    }

    /// Colorize a batch, preserving input order. Each element is
    /// processed independently.
    pub fn process_all<I, S>(&self, inputs: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs
            .into_iter()
            .map(|input| self.process(input.as_ref()))
            .collect()
    }

    /// Remove all recognized color and format markup, leaving plain
    /// visible text. Idempotent: removal runs to a fixpoint so markup
    /// uncovered by a removal pass is removed as well.
    pub fn strip(&self, input: &str) -> String {
        let mut current = input.to_string();
        loop {
            let next = self.strip_pattern.replace_all(&current, "").into_owned();
            if next == current {
                return next;
            }
            current = next;
        }
    }
}

/// Translate every `&`-introduced legacy sequence with a recognized code
/// letter (case-insensitive) into the host's native `§` form, lowercasing
/// the letter. Unrecognized sequences and a trailing lone `&` pass
/// through untouched.
pub fn translate_alternate_codes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == ALT && i + 1 < chars.len() {
            let letter = chars[i + 1].to_ascii_lowercase();
            if LEGACY_CODE_LETTERS.contains(letter) {
                out.push(SECTION);
                out.push(letter);
                i += 2;
                continue;
            }
        }
        out.push(ch);
        i += 1;
    }
    out
}
