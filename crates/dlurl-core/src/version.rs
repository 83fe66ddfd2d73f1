//! Ordering of version tokens.
//!
//! The selector never compares versions itself; it asks a [`VersionOrder`].
//! [`DottedVersionOrder`] is the default and follows the classic
//! configuration-management `versioncmp` rules, which cope with tokens like
//! `0.9.5-1`, `1.3.0rc1` and `nightly` that are not valid semver.

use std::cmp::Ordering;

/// A total ordering over version-like strings.
pub trait VersionOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> VersionOrder for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Token-wise comparison of dotted versions.
///
/// Both strings are split into runs of `-`, `.`, digits and anything else.
/// Walking the pairs: `-` sorts lowest, then `.`; digit runs compare
/// numerically unless one has a leading zero, in which case they compare as
/// text; everything else compares case-insensitively. When one side runs out
/// of tokens first it sorts lower.
///
/// Tokens that differ only in case do not decide the order. Only when every
/// token pair ties and both sides end together are the raw strings compared
/// byte-wise, so the order is a lexicographic key and stays transitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DottedVersionOrder;

impl VersionOrder for DottedVersionOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let mut left = Tokens::new(a);
        let mut right = Tokens::new(b);

        loop {
            match (left.next(), right.next()) {
                (Some(l), Some(r)) => {
                    let ord = compare_tokens(l, r);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (None, None) => return a.cmp(b),
            }
        }
    }
}

fn compare_tokens(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (a, b) {
        ("-", _) => Ordering::Less,
        (_, "-") => Ordering::Greater,
        (".", _) => Ordering::Less,
        (_, ".") => Ordering::Greater,
        _ if is_digits(a) && is_digits(b) => {
            if a.starts_with('0') || b.starts_with('0') {
                compare_text(a, b)
            } else {
                // No leading zeros, so a longer run is a larger number.
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
        }
        _ => compare_text(a, b),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_uppercase().cmp(&b.to_uppercase())
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Separator,
    Digit,
    Other,
}

fn class_of(c: char) -> Class {
    match c {
        '-' | '.' => Class::Separator,
        c if c.is_ascii_digit() => Class::Digit,
        _ => Class::Other,
    }
}

/// Splits a version into `-`, `.`, digit runs and non-digit runs.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let class = class_of(first);
        let end = if class == Class::Separator {
            first.len_utf8()
        } else {
            self.rest
                .char_indices()
                .find(|&(_, c)| class_of(c) != class)
                .map_or(self.rest.len(), |(i, _)| i)
        };
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

/// Strict semver ordering where both sides parse, [`DottedVersionOrder`]
/// otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverOrder;

impl VersionOrder for SemverOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (semver::Version::parse(a), semver::Version::parse(b)) {
            (Ok(va), Ok(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
            _ => DottedVersionOrder.compare(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &str, b: &str) -> Ordering {
        DottedVersionOrder.compare(a, b)
    }

    #[test]
    fn test_tokens() {
        let tokens: Vec<&str> = Tokens::new("0.9.5-1rc2").collect();
        assert_eq!(tokens, ["0", ".", "9", ".", "5", "-", "1", "rc", "2"]);
        assert_eq!(Tokens::new("").count(), 0);
        let tokens: Vec<&str> = Tokens::new("1..2").collect();
        assert_eq!(tokens, ["1", ".", ".", "2"]);
    }

    #[test]
    fn test_numeric_segments() {
        assert_eq!(cmp("1.2.3", "1.2.4"), Ordering::Less);
        assert_eq!(cmp("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(cmp("1.1.0", "1.1.0"), Ordering::Equal);
        assert_eq!(cmp("0.13.0", "0.9.6"), Ordering::Greater);
    }

    #[test]
    fn test_leading_zero_compares_as_text() {
        assert_eq!(cmp("1.01", "1.1"), Ordering::Less);
        assert_eq!(cmp("1.09", "1.10"), Ordering::Less);
    }

    #[test]
    fn test_separators() {
        // `-` ranks below every other token, `.` below everything but `-`.
        assert_eq!(cmp("1.0-1", "1.0.1"), Ordering::Less);
        assert_eq!(cmp("1.0.1", "1.0rc1"), Ordering::Less);
    }

    #[test]
    fn test_shorter_sorts_lower() {
        assert_eq!(cmp("1.0", "1.0.0"), Ordering::Less);
        assert_eq!(cmp("1.2.0", "1.2"), Ordering::Greater);
        assert_eq!(cmp("", "1"), Ordering::Less);
        // A case-only tie does not hand the decision to the raw bytes.
        assert_eq!(cmp("1.0b", "1.0B1"), Ordering::Less);
    }

    #[test]
    fn test_text_is_case_insensitive_then_total() {
        assert_eq!(cmp("1.0rc1", "1.0RC2"), Ordering::Less);
        assert_eq!(cmp("1.0RC1", "1.0rc1"), "1.0RC1".cmp("1.0rc1"));
    }

    #[test]
    fn test_order_is_transitive_with_mixed_case() {
        let versions = [
            "1.0b", "1.0b0", "1.0B1", "1.0B", "1.0b1", "1.0", "1.0.0", "1.0-1", "1.0rc1",
            "1.0RC", "1.0Rc1a", "1.01", "1.1", "1.0b-1", "nightly", "NIGHTLY", "",
        ];

        for x in versions {
            assert_eq!(cmp(x, x), Ordering::Equal);
            for y in versions {
                assert_eq!(cmp(x, y), cmp(y, x).reverse(), "{x} vs {y}");
                for z in versions {
                    if cmp(x, y) != Ordering::Greater && cmp(y, z) != Ordering::Greater {
                        assert_ne!(cmp(x, z), Ordering::Greater, "{x} <= {y} <= {z}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_nightly_sorts_above_numbers() {
        assert_eq!(cmp("nightly", "1.1.0"), Ordering::Greater);
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        assert_eq!(
            cmp("1.99999999999999999999999", "1.100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_semver_order() {
        assert_eq!(SemverOrder.compare("1.2.0-rc1", "1.2.0"), Ordering::Less);
        assert_eq!(SemverOrder.compare("1.10.0", "1.9.0"), Ordering::Greater);
        // Non-semver tokens fall back to the dotted rules.
        assert_eq!(SemverOrder.compare("0.9.5-1", "0.9.6"), Ordering::Less);
    }

    #[test]
    fn test_closure_is_an_order() {
        let reversed = |a: &str, b: &str| b.cmp(a);
        assert_eq!(reversed.compare("1", "2"), Ordering::Greater);
    }
}
