use serde::{Deserialize, Serialize};

/// Length and rolling hash of a piece of serialized content.
///
/// Only a cheap change oracle: two different texts may share a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Length in UTF-16 code units
    pub length: usize,
    pub hash: i32,
}

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        Self {
            length: text.encode_utf16().count(),
            hash: fingerprint(text),
        }
    }
}

/// 32-bit rolling hash over UTF-16 code units: `h = h * 31 + unit`, wrapping.
pub fn fingerprint(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_empty_is_zero() {
        assert_eq!(fingerprint(""), 0);
        assert_eq!(Fingerprint::of(""), Fingerprint { length: 0, hash: 0 });
    }

    #[test]
    fn test_fingerprint_known_values() {
        assert_eq!(fingerprint("a"), 97);
        assert_eq!(fingerprint("ab"), 97 * 31 + 98);
        assert_eq!(fingerprint("hello"), 99162322);
    }

    #[test]
    fn test_fingerprint_wraps_to_32_bits() {
        // Long enough to overflow many times; must not panic and must stay stable
        let text = "{\n  \"key\": \"value\"\n}".repeat(200);
        assert_eq!(fingerprint(&text), fingerprint(&text));
        assert_eq!(fingerprint("hello world, hello world"), 719808652);
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        assert_ne!(fingerprint("ab"), fingerprint("ba"));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        assert_eq!(Fingerprint::of("abc").length, 3);
        assert_eq!(Fingerprint::of("é").length, 1);
        // Outside the BMP: surrogate pair
        assert_eq!(Fingerprint::of("😀").length, 2);
    }
}
