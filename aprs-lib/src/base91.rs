//! Base-91 coordinate codec used by compressed APRS positions.
//!
//! A coordinate is carried as an integer count of 1/105 second units, i.e., one
//! degree is 380926 units and one minute is 6351 units, written most significant
//! digit first using the characters of [ALPHABET].

/// Digit characters in value order. Only the first [BASE] characters are produced
/// by [encode].
pub const ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

pub const BASE: u64 = 91;

/// Minimum number of characters produced by [encode].
pub const WIDTH: usize = 4;

const UNITS_PER_DEGREE: u64 = 380_926;
const UNITS_PER_MINUTE: u64 = 6_351;
const UNITS_PER_SECOND: u64 = 105;

fn digit(c: u8) -> Option<u64> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u64)
}

/// Decode `s` to decimal degrees.
///
/// Returns `None` if `s` is empty, contains a character not in [ALPHABET], or is
/// too long to fit the accumulator.
#[must_use]
pub fn decode(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for c in s.bytes() {
        value = value.checked_mul(BASE)?.checked_add(digit(c)?)?;
    }

    let degrees = value / UNITS_PER_DEGREE;
    let minutes = (value % UNITS_PER_DEGREE) / UNITS_PER_MINUTE;
    let seconds = (value % UNITS_PER_MINUTE) as f64 / UNITS_PER_SECOND as f64;

    Some(degrees as f64 + minutes as f64 / 60.0 + seconds / 3600.0)
}

/// Encode decimal degrees, left padded to at least [WIDTH] characters.
///
/// Degrees, minutes and seconds are each truncated, so the result decodes to within
/// 1 second of `degrees`. Returns `None` for negative or non-finite values.
#[must_use]
pub fn encode(degrees: f64) -> Option<String> {
    if !degrees.is_finite() || degrees < 0.0 {
        return None;
    }
    let whole = degrees.trunc();
    let minutes = (degrees - whole) * 60.0;
    let seconds = (minutes - minutes.trunc()) * 60.0;

    let mut value = (whole as u64)
        .checked_mul(UNITS_PER_DEGREE)?
        .checked_add(minutes.trunc() as u64 * UNITS_PER_MINUTE)?
        .checked_add(seconds.trunc() as u64 * UNITS_PER_SECOND)?;

    let mut out: Vec<u8> = Vec::with_capacity(WIDTH);
    loop {
        out.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
        if value == 0 {
            break;
        }
    }
    while out.len() < WIDTH {
        out.push(ALPHABET[0]);
    }
    out.reverse();

    Some(out.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const TOLERANCE: f64 = 0.002;

    #[test]
    fn alphabet_is_unique() {
        for (i, c) in ALPHABET.iter().enumerate() {
            assert_eq!(digit(*c), Some(i as u64), "duplicate {}", char::from(*c));
        }
    }

    #[test_case(40000.0)]
    #[test_case(70000.0)]
    #[test_case(100000.0)]
    #[test_case(10284.36311)]
    #[test_case(12842.19420)]
    #[test_case(49.0583)]
    #[test_case(0.0)]
    fn round_trip(value: f64) {
        let encoded = encode(value).unwrap();
        let zult = decode(&encoded).unwrap();
        assert!(
            (zult - value).abs() < TOLERANCE,
            "{value} encoded as {encoded:?} decoded to {zult}"
        );
    }

    #[test]
    fn decode_then_encode() {
        for s in ["5L!!", "<*e7", "AAAA", "zzzz", "/5L!!"] {
            let value = decode(s).unwrap();
            let zult = decode(&encode(value).unwrap()).unwrap();
            assert!((zult - value).abs() < TOLERANCE, "{s}: {value} != {zult}");
        }
    }

    #[test]
    fn decode_known_values() {
        assert!((decode("/5L!!").unwrap() - 13794.68304).abs() < 0.0001);
        assert!((decode("<*e7>").unwrap() - 14362.8397).abs() < 0.0001);
        assert_eq!(decode("AAAA"), Some(0.0));
        assert_eq!(decode("AAAB"), Some(1.0 / 105.0 / 3600.0));
    }

    #[test]
    fn encode_pads_to_width() {
        assert_eq!(encode(0.0).unwrap(), "AAAA");
        assert_eq!(encode(1.0).unwrap().len(), WIDTH);
        assert_eq!(encode(100000.0).unwrap().len(), 6);
    }

    #[test]
    fn decode_rejects_invalid() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("AB C"), None);
        assert_eq!(decode("\u{e9}"), None);
    }

    #[test]
    fn encode_rejects_invalid() {
        assert_eq!(encode(-1.0), None);
        assert_eq!(encode(f64::NAN), None);
        assert_eq!(encode(f64::INFINITY), None);
    }
}
