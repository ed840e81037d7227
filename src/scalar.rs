//! Parsing of leaf values.
//!
//! Integers are read as 64-bit (128-bit for the wide types) base-10 numbers
//! and then narrowed with a range check. Floats are read as `f64`.

use crate::{Error, Result};

/// Parses the boolean literals `1 t T TRUE true True` and `0 f F FALSE false False`.
pub(crate) fn parse_bool(key: &str, s: &str) -> Result<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::conversion(key, s, "bool")),
    }
}

/// Parses a signed integer and narrows it to `T`.
pub(crate) fn parse_signed<T>(key: &str, s: &str, expected: &str) -> Result<T>
where
    T: TryFrom<i64>,
{
    s.parse::<i64>()
        .ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| Error::conversion(key, s, expected))
}

/// Parses an unsigned integer and narrows it to `T`.
pub(crate) fn parse_unsigned<T>(key: &str, s: &str, expected: &str) -> Result<T>
where
    T: TryFrom<u64>,
{
    s.parse::<u64>()
        .ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| Error::conversion(key, s, expected))
}

pub(crate) fn parse_i128(key: &str, s: &str) -> Result<i128> {
    s.parse().map_err(|_| Error::conversion(key, s, "i128"))
}

pub(crate) fn parse_u128(key: &str, s: &str) -> Result<u128> {
    s.parse().map_err(|_| Error::conversion(key, s, "u128"))
}

pub(crate) fn parse_f64(key: &str, s: &str) -> Result<f64> {
    s.parse().map_err(|_| Error::conversion(key, s, "f64"))
}

pub(crate) fn parse_f32(key: &str, s: &str) -> Result<f32> {
    s.parse::<f64>()
        .map(|v| v as f32)
        .map_err(|_| Error::conversion(key, s, "f32"))
}

pub(crate) fn parse_char(key: &str, s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::conversion(key, s, "char")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_literals() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool("k", s), Ok(true), "{}", s);
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool("k", s), Ok(false), "{}", s);
        }
        for s in ["yes", "no", "tRUE", "", " true"] {
            assert!(parse_bool("k", s).is_err(), "{}", s);
        }
    }

    #[test]
    fn test_checked_narrowing() {
        assert_eq!(parse_signed::<i8>("k", "-128", "i8"), Ok(-128));
        assert_eq!(
            parse_signed::<i8>("k", "128", "i8"),
            Err(Error::conversion("k", "128", "i8"))
        );
        assert_eq!(parse_unsigned::<u16>("k", "65535", "u16"), Ok(65535));
        assert!(parse_unsigned::<u16>("k", "65536", "u16").is_err());
        assert!(parse_unsigned::<u32>("k", "-1", "u32").is_err());
        assert_eq!(
            parse_unsigned::<u64>("k", "18446744073709551615", "u64"),
            Ok(u64::MAX)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse_f64("k", "2.7187"), Ok(2.7187));
        assert_eq!(parse_f32("k", "3.1415"), Ok(3.1415f32));
        assert_eq!(parse_f64("k", "1e3"), Ok(1000.0));
        assert!(parse_f64("k", "inf").map(f64::is_infinite).unwrap_or(false));
        assert!(parse_f64("k", "pi").is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(parse_char("k", "x"), Ok('x'));
        assert_eq!(parse_char("k", "é"), Ok('é'));
        assert!(parse_char("k", "").is_err());
        assert!(parse_char("k", "xy").is_err());
    }
}
