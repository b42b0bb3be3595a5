//! Note name parsing: converts "c4", "Eb", "f#3" to MIDI note numbers.

/// Octave assumed when a note name has none.
pub const DEFAULT_OCTAVE: i32 = 4;

/// Parse a note name string into a MIDI note number.
///
/// Format: `<letter><optional accidental><optional octave>`
/// - Letter: a–g, either case
/// - Accidental: `#` (sharp) or `b` (flat)
/// - Octave: signed integer, default [`DEFAULT_OCTAVE`] (c4 = middle C = 60)
///
/// The result is not clamped to the MIDI range.
pub fn parse_note_name(name: &str) -> Option<i32> {
    let mut chars = name.chars();

    let base = match chars.next()?.to_ascii_lowercase() {
        'c' => 0,
        'd' => 2,
        'e' => 4,
        'f' => 5,
        'g' => 7,
        'a' => 9,
        'b' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave_str) = if let Some(r) = rest.strip_prefix('#') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (-1, r)
    } else {
        (0, rest)
    };

    let octave = if octave_str.is_empty() {
        DEFAULT_OCTAVE
    } else {
        let digits = octave_str.strip_prefix('-').unwrap_or(octave_str);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        octave_str.parse::<i32>().ok()?
    };

    // MIDI note = (octave + 1) * 12 + base + accidental
    octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(base + accidental)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c() {
        assert_eq!(parse_note_name("c4"), Some(60));
        assert_eq!(parse_note_name("C4"), Some(60));
    }

    #[test]
    fn a4_concert() {
        assert_eq!(parse_note_name("a4"), Some(69));
    }

    #[test]
    fn missing_octave_defaults_to_four() {
        assert_eq!(parse_note_name("e"), Some(64));
        assert_eq!(parse_note_name("d"), Some(62));
    }

    #[test]
    fn c_minus_1() {
        assert_eq!(parse_note_name("c-1"), Some(0));
    }

    #[test]
    fn eb2() {
        assert_eq!(parse_note_name("eb2"), Some(39));
    }

    #[test]
    fn f_sharp_3() {
        assert_eq!(parse_note_name("f#3"), Some(54));
    }

    #[test]
    fn bare_b_is_a_note_not_a_flat() {
        assert_eq!(parse_note_name("b"), Some(71));
        assert_eq!(parse_note_name("bb"), Some(70));
        assert_eq!(parse_note_name("b3"), Some(59));
    }

    #[test]
    fn flat_c_crosses_octave_down() {
        assert_eq!(parse_note_name("cb4"), Some(59));
    }

    #[test]
    fn high_octaves_are_not_clamped() {
        assert_eq!(parse_note_name("c10"), Some(132));
    }

    #[test]
    fn invalid_empty() {
        assert_eq!(parse_note_name(""), None);
    }

    #[test]
    fn invalid_letter() {
        assert_eq!(parse_note_name("x4"), None);
        assert_eq!(parse_note_name("bd"), None);
    }

    #[test]
    fn invalid_octave() {
        assert_eq!(parse_note_name("c4x"), None);
        assert_eq!(parse_note_name("c-"), None);
        assert_eq!(parse_note_name("c+4"), None);
        assert_eq!(parse_note_name("c99999999999"), None);
    }

    #[test]
    fn all_naturals_octave_4() {
        assert_eq!(parse_note_name("c4"), Some(60));
        assert_eq!(parse_note_name("d4"), Some(62));
        assert_eq!(parse_note_name("e4"), Some(64));
        assert_eq!(parse_note_name("f4"), Some(65));
        assert_eq!(parse_note_name("g4"), Some(67));
        assert_eq!(parse_note_name("a4"), Some(69));
        assert_eq!(parse_note_name("b4"), Some(71));
    }
}
