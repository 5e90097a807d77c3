use std::fmt;

use serde::Serialize;

const SERIAL_MODULUS: u32 = 100_000;

/// Decorative five-digit ticket code such as `#04217`. Not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SerialCode(String);

impl SerialCode {
    /// Seeds the hash with `full_name|email`.
    pub fn for_applicant(full_name: &str, email: &str) -> Self {
        Self(make_serial(&format!("{full_name}|{email}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash `seed` with the 32-bit `31 * h + c` recurrence over its UTF-16 code units and render
/// the magnitude modulo 100000 as `#NNNNN`.
pub fn make_serial(seed: &str) -> String {
    let code = magnitude(hash32(seed)) % SERIAL_MODULUS;
    format!("#{code:05}")
}

fn hash32(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

// i32::MIN has no positive i32 counterpart; its magnitude 2^31 is used as-is.
fn magnitude(h: i32) -> u32 {
    h.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_is_deterministic_and_six_characters() {
        let first = make_serial("Ada Lovelace|ada@example.com");
        let second = make_serial("Ada Lovelace|ada@example.com");
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
        assert!(first.starts_with('#'));
        assert!(first[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn serial_matches_reference_hash() {
        assert_eq!(make_serial("Ada Lovelace|ada@example.com"), "#76118");
        assert_eq!(make_serial("Grace Hopper|grace@navy.mil"), "#57056");
        assert_eq!(make_serial("a"), "#00097");
        assert_eq!(make_serial(""), "#00000");
    }

    #[test]
    fn negative_hashes_use_their_magnitude_and_pad() {
        assert!(hash32("Bob|bob@example.com") < 0);
        assert_eq!(make_serial("Bob|bob@example.com"), "#02357");
        assert_eq!(make_serial("Ada|ada@example.com"), "#50115");
    }

    #[test]
    fn hashes_utf16_code_units() {
        assert_eq!(make_serial("Zoë|z@x.io"), "#69432");
    }

    #[test]
    fn minimum_hash_keeps_full_magnitude() {
        assert_eq!(hash32("aabggclrg"), i32::MIN);
        assert_eq!(make_serial("aabggclrg"), "#83648");

        assert_eq!(magnitude(i32::MIN), 2_147_483_648);
        assert_eq!(magnitude(i32::MIN) % SERIAL_MODULUS, 83_648);
        assert_eq!(magnitude(-5), 5);
    }

    #[test]
    fn applicant_seed_joins_name_and_email() {
        assert_eq!(
            SerialCode::for_applicant("Grace Hopper", "grace@navy.mil").as_str(),
            "#57056"
        );
    }
}
