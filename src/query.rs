//! The three query operators and their shared sort.
//!
//! All operators are synchronous, pure functions over a borrowed slice of
//! records: they never touch the store and never fail. Matching anomalies
//! (malformed literals, unknown filter keys) are reflected in the result
//! content instead of being reported.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Deserialize;

use crate::record::{Field, Wine};
use crate::value::{self, Comparable};

pub const DEFAULT_LIMIT: usize = 20;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterParams {
    pub filters: HashMap<String, String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailParams {
    pub wine_name: String,
    #[serde(default)]
    pub exact_match: bool,
}

// ------------- Search -------------

/// Full-text search. Every whitespace-separated token of the query must be
/// found (case-insensitively) somewhere in the concatenation of name, brand,
/// review, AVA, region and varietal. An empty query matches everything.
pub fn search(wines: &[Wine], params: &SearchParams) -> Vec<Wine> {
    let query = params.query.to_lowercase();
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let mut results: Vec<Wine> = wines
        .iter()
        .filter(|wine| {
            let searchable = [
                wine.wine_name.as_str(),
                wine.brand_name.as_str(),
                wine.review.as_str(),
                wine.ava.as_str(),
                wine.region.as_str(),
                wine.main_varietal.as_str(),
            ]
            .join(" ")
            .to_lowercase();
            tokens.iter().all(|token| searchable.contains(token))
        })
        .cloned()
        .collect();
    if let Some(sort_by) = &params.sort_by {
        sort(&mut results, sort_by, params.sort_order);
    }
    results.truncate(params.limit);
    results
}

// ------------- Filter -------------

/// Structured filter. A record passes only if it satisfies every entry of
/// `filters` (AND). Keys outside the canonical vocabulary fail closed and
/// exclude everything.
pub fn filter(wines: &[Wine], params: &FilterParams) -> Vec<Wine> {
    let mut results: Vec<Wine> = wines
        .iter()
        .filter(|wine| {
            params
                .filters
                .iter()
                .all(|(key, expression)| matches(wine, key, expression))
        })
        .cloned()
        .collect();
    if let Some(sort_by) = &params.sort_by {
        sort(&mut results, sort_by, params.sort_order);
    }
    results.truncate(params.limit);
    results
}

fn matches(wine: &Wine, key: &str, expression: &str) -> bool {
    let Some(field) = Field::from_canonical(key) else {
        return false;
    };
    let raw = wine.value(field);
    let (operator, literal) = value::parse_expression(expression);
    let (actual, expected) = match field {
        Field::Price => (
            Comparable::Number(value::parse_price(raw)),
            Comparable::Number(value::parse_price(&literal)),
        ),
        Field::Rating => (
            Comparable::Number(value::parse_rating(raw)),
            Comparable::Number(value::parse_rating(&literal)),
        ),
        Field::Vintage => (
            Comparable::Number(value::parse_vintage(raw) as f64),
            Comparable::Number(value::parse_vintage(&literal) as f64),
        ),
        Field::TastingDate | Field::PublicationDate => (
            Comparable::Instant(value::parse_instant(raw)),
            Comparable::Instant(value::parse_instant(&literal)),
        ),
        _ => (
            Comparable::Text(raw.to_owned()),
            Comparable::Text(literal),
        ),
    };
    value::compare(&actual, operator, &expected)
}

// ------------- Detail lookup -------------

/// Finds wines by name, matching against both the bare wine name and
/// `"{brand} {name}"`. Partial matching is the default; duplicates are
/// returned as-is.
pub fn get_details(wines: &[Wine], params: &DetailParams) -> Vec<Wine> {
    let needle = params.wine_name.to_lowercase();
    wines
        .iter()
        .filter(|wine| {
            let name = wine.wine_name.to_lowercase();
            let full_name =
                format!("{} {}", wine.brand_name, wine.wine_name).to_lowercase();
            if params.exact_match {
                name == needle || full_name == needle
            } else {
                name.contains(&needle) || full_name.contains(&needle)
            }
        })
        .cloned()
        .collect()
}

// ------------- Shared sort -------------

/// Stable sort by a canonical field. Price and rating sort numerically,
/// vintage as an integer, the date fields by instant, everything else by
/// raw string. Ties keep their input order, and an unknown field leaves the
/// order untouched.
pub fn sort(wines: &mut [Wine], sort_by: &str, order: SortOrder) {
    let Some(field) = Field::from_canonical(sort_by) else {
        return;
    };
    wines.sort_by(|a, b| {
        let ordering = projected(a, field).partial_cmp(&projected(b, field));
        let ordering = ordering.unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn projected(wine: &Wine, field: Field) -> Comparable {
    let raw = wine.value(field);
    match field {
        Field::Price => Comparable::Number(value::parse_price(raw)),
        Field::Rating => Comparable::Number(value::parse_rating(raw)),
        Field::Vintage => Comparable::Number(value::parse_vintage(raw) as f64),
        Field::TastingDate | Field::PublicationDate => {
            Comparable::Instant(value::parse_instant(raw))
        }
        _ => Comparable::Text(raw.to_owned()),
    }
}
