//! RGB primitives, the legacy 16-color reference palette, and the
//! reduction used when the host is too old for true-color chat.

/// A 24-bit color. Chat markup resolves to these before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 6-digit hex string (`RRGGBB`, no `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }
}

/// Reference colors for the legacy palette, bound to their code letters.
///
/// Iteration order is the tie-breaker for [`nearest_legacy`]: the first
/// minimum wins, so the table order is part of the contract.
pub const LEGACY_PALETTE: [(Rgb, char); 16] = [
    (Rgb::new(0x00, 0x00, 0x00), '0'),
    (Rgb::new(0x00, 0x00, 0xAA), '1'),
    (Rgb::new(0x00, 0xAA, 0x00), '2'),
    (Rgb::new(0x00, 0xAA, 0xAA), '3'),
    (Rgb::new(0xAA, 0x00, 0x00), '4'),
    (Rgb::new(0xAA, 0x00, 0xAA), '5'),
    (Rgb::new(0xFF, 0xAA, 0x00), '6'),
    (Rgb::new(0xAA, 0xAA, 0xAA), '7'),
    (Rgb::new(0x55, 0x55, 0x55), '8'),
    (Rgb::new(0x55, 0x55, 0xFF), '9'),
    (Rgb::new(0x55, 0xFF, 0x55), 'a'),
    (Rgb::new(0x55, 0xFF, 0xFF), 'b'),
    (Rgb::new(0xFF, 0x55, 0x55), 'c'),
    (Rgb::new(0xFF, 0x55, 0xFF), 'd'),
    (Rgb::new(0xFF, 0xFF, 0x55), 'e'),
    (Rgb::new(0xFF, 0xFF, 0xFF), 'f'),
];

/// Reduce an arbitrary color to the nearest legacy code by squared
/// Euclidean distance in RGB space. Deterministic for a given input.
pub fn nearest_legacy(color: Rgb) -> char {
    let mut best_code = LEGACY_PALETTE[0].1;
    let mut best_dist = u32::MAX;
    for (reference, code) in LEGACY_PALETTE {
        let dist = distance_sq(color, reference);
        if dist < best_dist {
            best_dist = dist;
            best_code = code;
        }
    }
    best_code
}

fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// HSV to RGB. `hue` wraps modulo 1.0; saturation and value clamp into
/// `[0, 1]`. Rounds to the nearest channel value.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);
    if s <= 0.0 {
        let gray = scale(v);
        return Rgb::new(gray, gray, gray);
    }

    let h = (hue - hue.floor()) * 6.0;
    let sector = (h as u32).min(5);
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(scale(r), scale(g), scale(b))
}

fn scale(channel: f32) -> u8 {
    (channel * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::from_hex("FF5555"), Some(Rgb::new(0xFF, 0x55, 0x55)));
        assert_eq!(Rgb::from_hex("ff5555"), Some(Rgb::new(0xFF, 0x55, 0x55)));
        assert_eq!(Rgb::from_hex("000000"), Some(Rgb::new(0, 0, 0)));
        assert_eq!(Rgb::from_hex("12345"), None);
        assert_eq!(Rgb::from_hex("12345G"), None);
    }

    #[test]
    fn palette_entries_reduce_to_their_own_code() {
        for (reference, code) in LEGACY_PALETTE {
            assert_eq!(nearest_legacy(reference), code);
        }
    }

    #[test]
    fn reduction_is_deterministic() {
        let color = Rgb::new(0x12, 0x84, 0xE0);
        let first = nearest_legacy(color);
        for _ in 0..8 {
            assert_eq!(nearest_legacy(color), first);
        }
    }

    #[test]
    fn reduction_picks_nearest_reference() {
        // Slightly off-white is still white, almost-black is black.
        assert_eq!(nearest_legacy(Rgb::new(0xFE, 0xFE, 0xF0)), 'f');
        assert_eq!(nearest_legacy(Rgb::new(0x02, 0x01, 0x03)), '0');
        // Strong red lands on the bright red entry.
        assert_eq!(nearest_legacy(Rgb::new(0xFF, 0x40, 0x40)), 'c');
    }

    #[test]
    fn hsv_primary_points() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb::new(0, 0, 255));
        // Zero saturation is gray at the value level.
        assert_eq!(hsv_to_rgb(0.42, 0.0, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn hsv_wraps_hue() {
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(1.25, 1.0, 1.0), hsv_to_rgb(0.25, 1.0, 1.0));
    }
}
