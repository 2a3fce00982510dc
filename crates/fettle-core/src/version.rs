//! Version comparison and minimum-version constraints.
//!
//! Versions are dot-separated sequences of non-negative integers of any
//! length. Shorter sequences are padded with trailing zeros, so `1.0` and
//! `1.0.0` compare equal, and segments compare numerically, so `1.9.0` sorts
//! before `1.10.0`.
//!
//! Constraints only express a lower bound (`>=`). Merging two constraints
//! keeps the stricter of the two.
//!
//! # Examples
//!
//! ```
//! use std::cmp::Ordering;
//! use fettle_core::version::{compare_versions, merge_constraints, satisfies};
//!
//! assert_eq!(compare_versions("1.9.0", "1.10.0"), Ordering::Less);
//! assert_eq!(merge_constraints(Some("1.0.0"), Some("2.0.0")), Some("2.0.0"));
//! assert!(satisfies("2.1", Some("2.0.0")));
//! assert!(satisfies("0.1.0", None));
//! ```

use std::cmp::Ordering;

/// Compare two version strings segment by segment.
///
/// Segments are interpreted by their leading integer. A segment without one
/// (`"abc"`, `""`) counts as `0` rather than being rejected, which means a
/// malformed marketplace version silently compares as a low version.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts = segments(a);
    let b_parts = segments(b);
    let len = a_parts.len().max(b_parts.len());

    (0..len)
        .map(|i| {
            let a_val = a_parts.get(i).copied().unwrap_or(0);
            let b_val = b_parts.get(i).copied().unwrap_or(0);
            a_val.cmp(&b_val)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Combine two optional lower bounds into the binding one.
///
/// `None` means "unconstrained" and is the identity. When both bounds are
/// numerically equal the existing one is kept.
pub fn merge_constraints<'a>(existing: Option<&'a str>, incoming: Option<&'a str>) -> Option<&'a str> {
    match (existing, incoming) {
        (None, other) | (other, None) => other,
        (Some(current), Some(candidate)) => {
            if compare_versions(candidate, current) == Ordering::Greater {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    }
}

/// Check whether an installed version meets an optional lower bound.
pub fn satisfies(version: &str, constraint: Option<&str>) -> bool {
    constraint.is_none_or(|minimum| compare_versions(version, minimum) != Ordering::Less)
}

/// Check that a version string is made of non-negative number segments.
///
/// Permissive in the same way as [`compare_versions`]: a segment is accepted
/// when it starts with a non-negative integer, so `1`, `1.0` and `1.0.0` are
/// valid while `1..0`, `abc` and `-1` are not.
pub fn is_valid_version(version: &str) -> bool {
    if version.trim().is_empty() {
        return false;
    }

    version
        .split('.')
        .all(|part| !part.is_empty() && leading_integer(part).is_some_and(|n| n >= 0))
}

fn segments(version: &str) -> Vec<i64> {
    version
        .split('.')
        .map(|part| leading_integer(part).unwrap_or(0))
        .collect()
}

/// Read the integer a segment starts with, ignoring leading whitespace and
/// anything after the digits. Returns `None` when there are no digits.
fn leading_integer(segment: &str) -> Option<i64> {
    let s = segment.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let value = rest[..end].bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'))
    });

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // --- compare_versions ---

    #[rstest]
    #[case("1.0.0", "1.0.0", Ordering::Equal)]
    #[case("2.1.3", "2.1.3", Ordering::Equal)]
    #[case("1.0.0", "2.0.0", Ordering::Less)]
    #[case("1.0.0", "1.1.0", Ordering::Less)]
    #[case("1.0.0", "1.0.1", Ordering::Less)]
    #[case("1.9.0", "1.10.0", Ordering::Less)]
    #[case("1.10.0", "1.9.0", Ordering::Greater)]
    #[case("2.0.0", "1.0.0", Ordering::Greater)]
    fn test_compare_same_length(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_versions(a, b), expected);
    }

    #[rstest]
    #[case("1.0", "1.0.0", Ordering::Equal)]
    #[case("1.0.0", "1.0", Ordering::Equal)]
    #[case("1", "1.0.0", Ordering::Equal)]
    #[case("1.0", "1.0.1", Ordering::Less)]
    #[case("1.0.1", "1.0", Ordering::Greater)]
    fn test_compare_pads_shorter_version(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_versions(a, b), expected);
    }

    #[test]
    fn test_compare_coerces_non_numeric_segments_to_zero() {
        assert_eq!(compare_versions("1.x.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("abc", "0"), Ordering::Equal);
        assert_eq!(compare_versions("1.2a", "1.2"), Ordering::Equal);
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        let pairs = [("1.2.3", "1.3"), ("0.9", "0.10"), ("3", "2.99.99")];
        for (a, b) in pairs {
            assert_eq!(compare_versions(a, b), compare_versions(b, a).reverse());
        }
    }

    // --- merge_constraints ---

    #[test]
    fn test_merge_none_is_identity() {
        assert_eq!(merge_constraints(None, Some("1.0.0")), Some("1.0.0"));
        assert_eq!(merge_constraints(Some("1.0.0"), None), Some("1.0.0"));
        assert_eq!(merge_constraints(None, None), None);
    }

    #[test]
    fn test_merge_keeps_higher_bound_regardless_of_order() {
        assert_eq!(merge_constraints(Some("1.0.0"), Some("2.0.0")), Some("2.0.0"));
        assert_eq!(merge_constraints(Some("2.0.0"), Some("1.0.0")), Some("2.0.0"));
        assert_eq!(merge_constraints(Some("1.9"), Some("1.10")), Some("1.10"));
    }

    #[test]
    fn test_merge_tie_keeps_existing() {
        assert_eq!(merge_constraints(Some("2.0"), Some("2.0.0")), Some("2.0"));
    }

    // --- satisfies ---

    #[rstest]
    #[case("1.0.0", None, true)]
    #[case("1.2.0", Some("1.2.0"), true)]
    #[case("1.2", Some("1.2.0"), true)]
    #[case("1.3.0", Some("1.2.0"), true)]
    #[case("1.1.9", Some("1.2.0"), false)]
    fn test_satisfies(#[case] version: &str, #[case] constraint: Option<&str>, #[case] expected: bool) {
        assert_eq!(satisfies(version, constraint), expected);
    }

    // --- is_valid_version ---

    #[rstest]
    #[case("1.0.0")]
    #[case("1.0")]
    #[case("2")]
    #[case("10.20.30.40")]
    fn test_valid_versions(#[case] version: &str) {
        assert!(is_valid_version(version), "{version} should be valid");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("1..0")]
    #[case("1.0.")]
    #[case(".1")]
    #[case("-1.0")]
    fn test_invalid_versions(#[case] version: &str) {
        assert!(!is_valid_version(version), "{version} should be invalid");
    }

    // --- leading_integer ---

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("42"), Some(42));
        assert_eq!(leading_integer(" 7"), Some(7));
        assert_eq!(leading_integer("3rc1"), Some(3));
        assert_eq!(leading_integer("-2"), Some(-2));
        assert_eq!(leading_integer("x1"), None);
        assert_eq!(leading_integer(""), None);
    }
}
