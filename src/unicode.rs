//! Character-level classification for the Latin code stream.

use crate::codespace::ESCAPE_MARKER;

/// Uppercase ASCII letter: starts a code in a Latin stream.
pub fn is_code_head(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// Lowercase ASCII letter: continues a code.
pub fn is_code_tail(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// ASCII that may appear bare in Latin output: digits, punctuation, space
/// and line whitespace. Letters are excluded (a bare letter could start or
/// extend a code), and so is the escape marker.
pub fn is_bare_passthrough(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n') || c.is_ascii_digit() || c.is_ascii_punctuation()
}

/// Characters the encoder escapes literally rather than by code point:
/// ASCII letters and the escape marker itself.
pub fn needs_literal_escape(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ESCAPE_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(is_code_head('A'));
        assert!(!is_code_head('a'));
        assert!(is_code_tail('z'));
        assert!(!is_code_tail('Z'));
        assert!(is_bare_passthrough('7'));
        assert!(is_bare_passthrough('.'));
        assert!(is_bare_passthrough(' '));
        assert!(is_bare_passthrough('\n'));
        assert!(!is_bare_passthrough('x'));
        assert!(!is_bare_passthrough('་'));
        assert!(needs_literal_escape('Q'));
        assert!(needs_literal_escape('q'));
        assert!(needs_literal_escape(ESCAPE_MARKER));
        assert!(!needs_literal_escape('3'));
    }
}
