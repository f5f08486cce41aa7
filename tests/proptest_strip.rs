//! Property-based tests for the colorizer's stripper and pass-through
//! behavior.

use proptest::prelude::*;
use voxdrops::color::Colorizer;

/// Strings biased toward markup: legacy codes, hex tags, pattern tags,
/// loose introducers, and plain text, in any interleaving.
fn markup_heavy() -> impl Strategy<Value = String> {
    proptest::string::string_regex(
        "(?:[&§][0-9a-fk-orxA-FK-ORX]|<#[0-9A-F]{6}>|<SOLID:[0-9A-F]{6}>\
         |<GRADIENT:[0-9A-F]{6}>|</GRADIENT:[0-9A-F]{6}>|<RAINBOW[0-9]{1,3}>|</RAINBOW>\
         |[&§<>]|[ -~]){0,40}",
    )
    .expect("valid generator regex")
}

proptest! {
    /// Stripping twice is the same as stripping once, for any input.
    #[test]
    fn strip_is_idempotent(input in markup_heavy()) {
        let colorizer = Colorizer::new(16);
        let once = colorizer.strip(&input);
        prop_assert_eq!(colorizer.strip(&once), once);
    }

    /// Idempotence also holds for fully arbitrary unicode strings.
    #[test]
    fn strip_is_idempotent_on_arbitrary_strings(input in ".*") {
        let colorizer = Colorizer::new(16);
        let once = colorizer.strip(&input);
        prop_assert_eq!(colorizer.strip(&once), once);
    }

    /// Strings without any introducer or tag characters pass through
    /// `process` unchanged on every host version.
    #[test]
    fn plain_text_is_a_fixed_point(input in "[a-zA-Z0-9 .,!?]{0,40}") {
        for version in [8u32, 16] {
            let colorizer = Colorizer::new(version);
            prop_assert_eq!(colorizer.process(&input), input.clone());
        }
    }

    /// Processed output carries no `&`-introduced legacy codes; they are
    /// all translated to the native introducer.
    #[test]
    fn process_leaves_no_translatable_codes(input in markup_heavy()) {
        let colorizer = Colorizer::new(16);
        let out = colorizer.process(&input);
        let chars: Vec<char> = out.chars().collect();
        for window in chars.windows(2) {
            if window[0] == '&' {
                prop_assert!(
                    !"0123456789abcdefklmnorx".contains(window[1].to_ascii_lowercase()),
                    "untranslated code {:?} in {:?}", window, out
                );
            }
        }
    }

    /// Stripping processed output leaves only the visible characters.
    #[test]
    fn strip_after_process_removes_all_emitted_codes(text in "[a-z ]{0,20}") {
        let colorizer = Colorizer::new(16);
        let marked = format!("<GRADIENT:000000>{text}</GRADIENT:FFFFFF>");
        let processed = colorizer.process(&marked);
        prop_assert_eq!(colorizer.strip(&processed), text);
    }
}
