//! Value parsers and the operator comparator.
//!
//! Wines keep every field as the raw string that came out of the sheet, so
//! coercion happens here, at query time. All parsers are total: malformed
//! input degrades to a fallback (`0` for numbers, the Unix epoch for dates)
//! instead of failing. A badly formed filter literal therefore matches
//! differently than intended rather than breaking the whole AND chain.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OPERATOR_PREFIX: Regex = Regex::new(r"^([><=]+)(.+)$").unwrap();
}

// ------------- Operator -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    // a run of operator characters that spells nothing, like ">>" or "=<"
    Unrecognized,
}

/// Splits a filter expression like `">90"` or `"<=2012"` into its operator
/// and literal. No recognized prefix means the whole string is the literal
/// and the operator is `=`.
pub fn parse_expression(expression: &str) -> (Operator, String) {
    match OPERATOR_PREFIX.captures(expression) {
        Some(captures) => {
            let operator = match &captures[1] {
                ">" => Operator::Greater,
                "<" => Operator::Less,
                ">=" => Operator::GreaterOrEqual,
                "<=" => Operator::LessOrEqual,
                "=" | "==" => Operator::Equal,
                _ => Operator::Unrecognized,
            };
            (operator, captures[2].trim().to_owned())
        }
        None => (Operator::Equal, expression.to_owned()),
    }
}

// ------------- Parsers -------------

/// `"$45.99"` → `45.99`. Strips currency symbols and thousands separators.
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse().unwrap_or(0.0)
}

/// Star-run ratings on a 0-5 scale in half-star steps: `"***"` → `3`,
/// `"*** 1/2"` → `3.5`. Strings without any stars or half marker fall back
/// to a plain numeric parse, which is how filter literals like `">4"` get
/// their expected value.
pub fn parse_rating(raw: &str) -> f64 {
    let stars = raw.matches('*').count() as f64;
    let half = if raw.contains("1/2") { 0.5 } else { 0.0 };
    if stars == 0.0 && half == 0.0 {
        return raw.trim().parse().unwrap_or(0.0);
    }
    stars + half
}

/// Vintage years are compared as plain integers.
pub fn parse_vintage(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// The sheet writes dates as `12/30/2014`; ISO dates are accepted as well.
/// Anything else becomes the Unix epoch.
pub fn parse_date(raw: &str) -> NaiveDateTime {
    let raw = raw.trim();
    for format in ["%m/%d/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_time(NaiveTime::MIN);
        }
    }
    epoch()
}

/// Date fields compare by instant (seconds since the epoch).
pub fn parse_instant(raw: &str) -> i64 {
    parse_date(raw).and_utc().timestamp()
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_time(NaiveTime::MIN)
}

// ------------- Comparator -------------

/// A value lifted out of its raw string encoding so the comparator can
/// dispatch without inspecting the field it came from.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Comparable {
    Number(f64),
    Instant(i64),
    Text(String),
}

fn ordered(ordering: Ordering, operator: Operator) -> bool {
    match operator {
        Operator::Greater => ordering == Ordering::Greater,
        Operator::Less => ordering == Ordering::Less,
        Operator::GreaterOrEqual => ordering != Ordering::Less,
        Operator::LessOrEqual => ordering != Ordering::Greater,
        Operator::Equal => ordering == Ordering::Equal,
        Operator::Unrecognized => false,
    }
}

/// Evaluates `actual <operator> expected`. Numbers and instants use their
/// natural ordering. Text equality deliberately diverges: `=` means
/// case-insensitive substring containment, and ordering operators on text
/// are always false. Mixed domains never match.
pub fn compare(actual: &Comparable, operator: Operator, expected: &Comparable) -> bool {
    match (actual, expected) {
        (Comparable::Number(a), Comparable::Number(b)) => a
            .partial_cmp(b)
            .map(|ordering| ordered(ordering, operator))
            .unwrap_or(false),
        (Comparable::Instant(a), Comparable::Instant(b)) => ordered(a.cmp(b), operator),
        (Comparable::Text(a), Comparable::Text(b)) => match operator {
            Operator::Equal => a.to_lowercase().contains(&b.to_lowercase()),
            _ => false,
        },
        (_, _) => false,
    }
}
