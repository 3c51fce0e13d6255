//! Records and the record store.
//!
//! Raw sheet rows become [`Wine`] records through a [`FieldMapping`] built
//! from the header row. Every field is kept as the raw cell string; typed
//! interpretation is deferred to the `value` module at query time. The
//! [`Cellar`] owns the current [`Snapshot`] behind an `Arc` that is swapped
//! wholesale on refresh, so concurrent readers always see either the fully
//! old or the fully new collection.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use regex::Regex;
use seahash::SeaHasher;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CellariumError, Result};

pub type ColumnHasher = BuildHasherDefault<SeaHasher>;

// ------------- Field -------------

/// The closed vocabulary of canonical field names. Filtering and sorting
/// dispatch over this enumeration; a name outside it is "not a field" rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    BrandName,
    WineName,
    Ava,
    Vintage,
    Price,
    Rating,
    Review,
    Region,
    Type,
    MainVarietal,
    TastingDate,
    PublicationDate,
    Setting,
    PurchasedProvided,
    Temp,
    Hyperlink,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Id,
        Field::BrandName,
        Field::WineName,
        Field::Ava,
        Field::Vintage,
        Field::Price,
        Field::Rating,
        Field::Review,
        Field::Region,
        Field::Type,
        Field::MainVarietal,
        Field::TastingDate,
        Field::PublicationDate,
        Field::Setting,
        Field::PurchasedProvided,
        Field::Temp,
        Field::Hyperlink,
    ];

    pub fn canonical(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::BrandName => "brandName",
            Field::WineName => "wineName",
            Field::Ava => "ava",
            Field::Vintage => "vintage",
            Field::Price => "price",
            Field::Rating => "rating",
            Field::Review => "review",
            Field::Region => "region",
            Field::Type => "type",
            Field::MainVarietal => "mainVarietal",
            Field::TastingDate => "tastingDate",
            Field::PublicationDate => "publicationDate",
            Field::Setting => "setting",
            Field::PurchasedProvided => "purchasedProvided",
            Field::Temp => "temp",
            Field::Hyperlink => "hyperlink",
        }
    }

    pub fn from_canonical(name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.canonical() == name)
    }
}

// ------------- Header normalization -------------

lazy_static! {
    static ref PARENTHESIZED: Regex = Regex::new(r"\(.*?\)").unwrap();
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-zA-Z0-9\s]").unwrap();
    static ref CANONICAL: Regex = Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap();
}

/// Normalizes a raw header cell to its canonical camel-case name.
///
/// A handful of quirky sheet headers are mapped verbatim. Names already in
/// canonical form pass through untouched, which keeps normalization
/// idempotent. Everything else loses parenthesized content and punctuation
/// before being camel-cased word by word.
pub fn normalize_header(header: &str) -> String {
    match header {
        "ID" => return String::from("id"),
        "$" => return String::from("price"),
        "Purchased/ Provided" => return String::from("purchasedProvided"),
        "Temp (if not standard)" => return String::from("temp"),
        _ => (),
    }
    if CANONICAL.is_match(header) {
        return String::from(header);
    }
    let cleaned = PARENTHESIZED.replace_all(header, "");
    let cleaned = NON_ALPHANUMERIC.replace_all(&cleaned, "");
    let mut normalized = String::new();
    for (position, word) in cleaned.trim().split_whitespace().enumerate() {
        if position == 0 {
            normalized.push_str(&word.to_lowercase());
        } else {
            let mut characters = word.chars();
            if let Some(first) = characters.next() {
                normalized.extend(first.to_uppercase());
                normalized.push_str(&characters.as_str().to_lowercase());
            }
        }
    }
    normalized
}

// ------------- FieldMapping -------------

/// Ordered association from normalized header name to column index, built
/// once per refresh. When two columns normalize to the same name the later
/// column wins the index while the name keeps its first position in the
/// ordered list. That collision behavior is a documented quirk of the sheet
/// layout, not something to correct here.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    columns: HashMap<String, usize, ColumnHasher>,
    names: Vec<String>,
}

impl FieldMapping {
    pub fn from_header(header: &[String]) -> Self {
        let mut mapping = FieldMapping::default();
        for (index, raw) in header.iter().enumerate() {
            let name = normalize_header(raw);
            match mapping.columns.entry(name.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(index);
                    mapping.names.push(name);
                }
                Entry::Occupied(mut entry) => {
                    entry.insert(index);
                }
            }
        }
        mapping
    }
    /// The column index for a canonical name. `None` means the current
    /// header has no such column, which is distinct from an empty cell.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }
    /// Normalized names in header order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ------------- Wine -------------

/// One normalized wine entry. All fields are raw strings, including the
/// numeric- and date-looking ones; the `value` parsers coerce them when a
/// query needs to. Records are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wine {
    pub id: String,
    pub brand_name: String,
    pub wine_name: String,
    pub ava: String,
    pub vintage: String,
    pub price: String,
    pub rating: String,
    pub review: String,
    pub region: String,
    pub r#type: String,
    pub main_varietal: String,
    pub tasting_date: String,
    pub publication_date: String,
    pub setting: String,
    pub purchased_provided: String,
    pub temp: String,
    pub hyperlink: String,
}

impl Wine {
    /// Builds a record from a raw data row. Fields whose column is absent
    /// from the mapping, or whose row is too short, become empty strings.
    /// A blank price becomes the `"N/A"` sentinel.
    pub fn from_row(row: &[String], mapping: &FieldMapping) -> Self {
        let get = |field: Field| -> String {
            mapping
                .column(field.canonical())
                .and_then(|index| row.get(index))
                .cloned()
                .unwrap_or_default()
        };
        let price = get(Field::Price);
        let price = if price.trim().is_empty() {
            String::from("N/A")
        } else {
            price
        };
        Self {
            id: get(Field::Id),
            brand_name: get(Field::BrandName),
            wine_name: get(Field::WineName),
            ava: get(Field::Ava),
            vintage: get(Field::Vintage),
            price,
            rating: get(Field::Rating),
            review: get(Field::Review),
            region: get(Field::Region),
            r#type: get(Field::Type),
            main_varietal: get(Field::MainVarietal),
            tasting_date: get(Field::TastingDate),
            publication_date: get(Field::PublicationDate),
            setting: get(Field::Setting),
            purchased_provided: get(Field::PurchasedProvided),
            temp: get(Field::Temp),
            hyperlink: get(Field::Hyperlink),
        }
    }

    /// The raw string stored under a canonical field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::BrandName => &self.brand_name,
            Field::WineName => &self.wine_name,
            Field::Ava => &self.ava,
            Field::Vintage => &self.vintage,
            Field::Price => &self.price,
            Field::Rating => &self.rating,
            Field::Review => &self.review,
            Field::Region => &self.region,
            Field::Type => &self.r#type,
            Field::MainVarietal => &self.main_varietal,
            Field::TastingDate => &self.tasting_date,
            Field::PublicationDate => &self.publication_date,
            Field::Setting => &self.setting,
            Field::PurchasedProvided => &self.purchased_provided,
            Field::Temp => &self.temp,
            Field::Hyperlink => &self.hyperlink,
        }
    }
}

// ------------- Snapshot -------------

/// A fully built record collection plus the mapping it was built with.
#[derive(Debug, Default)]
pub struct Snapshot {
    wines: Vec<Wine>,
    mapping: FieldMapping,
}

impl Snapshot {
    /// Builds a snapshot from raw rows: the first row with any non-blank
    /// cell is the header, every following non-empty row becomes a record.
    pub fn from_rows(rows: &[Vec<String>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(CellariumError::EmptySheet);
        }
        let header_index = rows
            .iter()
            .position(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .ok_or(CellariumError::MissingHeader)?;
        let mapping = FieldMapping::from_header(&rows[header_index]);
        let wines = rows[header_index + 1..]
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| Wine::from_row(row, &mapping))
            .collect();
        Ok(Self { wines, mapping })
    }
    pub fn wines(&self) -> &[Wine] {
        &self.wines
    }
    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }
    pub fn len(&self) -> usize {
        self.wines.len()
    }
    pub fn is_empty(&self) -> bool {
        self.wines.is_empty()
    }
}

// ------------- Cellar -------------

/// The record store. Readers grab an `Arc` to the current snapshot and keep
/// working on it while refreshes build and swap in a replacement; the swap
/// is the only moment the store mutex is held. A separate mutex serializes
/// refreshes so two rebuilds cannot race on the swap.
#[derive(Debug)]
pub struct Cellar {
    current: Mutex<Arc<Snapshot>>,
    refreshing: Mutex<()>,
}

impl Cellar {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Arc::new(Snapshot::default())),
            refreshing: Mutex::new(()),
        }
    }
    /// The current snapshot. Cheap; callers hold it for as long as they like.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.lock().unwrap())
    }
    /// Builds a snapshot from raw rows and installs it. On error the
    /// previous snapshot stays in place untouched.
    pub fn install(&self, rows: Vec<Vec<String>>) -> Result<usize> {
        let _serialized = self.refreshing.lock().unwrap();
        let snapshot = Snapshot::from_rows(&rows)?;
        let count = snapshot.len();
        *self.current.lock().unwrap() = Arc::new(snapshot);
        info!(wines = count, "snapshot installed");
        Ok(count)
    }
}

impl Default for Cellar {
    fn default() -> Self {
        Self::new()
    }
}
