//! Invite-code generation.
//!
//! Registration is gated by single-use codes that expire 15 minutes after
//! creation. Codes are short enough to read over the phone, so the
//! alphabet drops the characters that are ambiguous in most fonts
//! (0/O, 1/I/L).

use rand::Rng;

/// Number of characters in a generated invite code.
pub const INVITE_CODE_LENGTH: usize = 8;

/// Minutes until a freshly generated invite code expires.
pub const INVITE_CODE_TTL_MINS: i64 = 15;

/// Uppercase alphanumerics minus the ambiguous glyphs.
const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Generate a random invite code from the unambiguous alphabet.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..INVITE_CODE_ALPHABET.len());
            INVITE_CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length() {
        assert_eq!(generate_invite_code().len(), INVITE_CODE_LENGTH);
    }

    #[test]
    fn test_code_uses_unambiguous_alphabet() {
        for _ in 0..100 {
            let code = generate_invite_code();
            for c in code.chars() {
                assert!(
                    INVITE_CODE_ALPHABET.contains(&(c as u8)),
                    "unexpected character '{c}' in invite code"
                );
                assert!(!"0O1IL".contains(c), "ambiguous character '{c}'");
            }
        }
    }

    #[test]
    fn test_codes_are_not_constant() {
        let a = generate_invite_code();
        let b = generate_invite_code();
        let c = generate_invite_code();
        // Three identical 8-char draws would mean the RNG is broken.
        assert!(!(a == b && b == c), "codes should vary: {a} {b} {c}");
    }
}
