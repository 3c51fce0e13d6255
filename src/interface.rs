//! Interface for refreshing the cellar and submitting queries against it.
//!
//! This is the seam both outer surfaces share: the HTTP server and the
//! tool-calling agent go through [`QueryInterface`], which pins a snapshot
//! per call and keeps threading and caching concerns out of the query
//! operators themselves.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::{CellariumError, Result};
use crate::query::{
    self, DEFAULT_LIMIT, DetailParams, FilterParams, SearchParams, SortOrder,
};
use crate::record::{Cellar, Snapshot, Wine};
use crate::source::RowSource;

// Inner limit for the browse pipeline stages, wide enough to never clip the
// intermediate result before the final sort and limit are applied.
const WIDE_LIMIT: usize = 10_000;

/// Distinct values for the filter dropdowns, derived from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub varietals: Vec<String>,
    pub regions: Vec<String>,
    pub types: Vec<String>,
    #[serde(rename = "avaList")]
    pub ava_list: Vec<String>,
}

impl Metadata {
    fn derive(wines: &[Wine]) -> Self {
        Self {
            varietals: unique(wines.iter().map(|w| w.main_varietal.as_str())),
            regions: unique(wines.iter().map(|w| w.region.as_str())),
            types: unique(wines.iter().map(|w| w.r#type.as_str())),
            ava_list: unique(wines.iter().map(|w| w.ava.as_str())),
        }
    }
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: HashSet<String> = values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    let mut sorted: Vec<String> = distinct.into_iter().collect();
    sorted.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    sorted
}

/// Parameters for the combined browse operation: optional full-text query,
/// then filters, then sort, then limit.
#[derive(Debug, Clone)]
pub struct BrowseParams {
    pub query: Option<String>,
    pub filters: HashMap<String, String>,
    pub limit: usize,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl BrowseParams {
    /// Builds browse parameters from loose query-string pairs: `q`, `limit`,
    /// `sort_by` and `sort_order` are plucked out, every other non-empty
    /// pair becomes a filter.
    pub fn from_pairs(mut pairs: HashMap<String, String>) -> Self {
        let query = pairs.remove("q");
        let limit = pairs
            .remove("limit")
            .and_then(|l| l.parse().ok())
            .unwrap_or(DEFAULT_LIMIT);
        let sort_by = pairs
            .remove("sort_by")
            .unwrap_or_else(|| String::from("rating"));
        let sort_order = match pairs.remove("sort_order").as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        pairs.retain(|_, value| !value.trim().is_empty());
        Self {
            query,
            filters: pairs,
            limit,
            sort_by,
            sort_order,
        }
    }
}

// ------------- QueryInterface -------------

pub struct QueryInterface {
    cellar: Arc<Cellar>,
    source: Box<dyn RowSource>,
    // metadata derived lazily from the snapshot it is keyed to
    metadata: Mutex<Option<(Arc<Snapshot>, Arc<Metadata>)>>,
}

impl QueryInterface {
    pub fn new(cellar: Arc<Cellar>, source: Box<dyn RowSource>) -> Self {
        Self {
            cellar,
            source,
            metadata: Mutex::new(None),
        }
    }

    pub fn cellar(&self) -> Arc<Cellar> {
        Arc::clone(&self.cellar)
    }

    /// Fetches fresh rows from the source and installs them wholesale.
    /// On failure the previous snapshot keeps serving.
    pub fn refresh(&self) -> Result<usize> {
        let rows = self.source.fetch().inspect_err(|e| {
            warn!(error = %e, "refresh failed, keeping previous snapshot");
        })?;
        let count = self.cellar.install(rows)?;
        info!(wines = count, "refresh complete");
        Ok(count)
    }

    pub fn search(&self, params: &SearchParams) -> Vec<Wine> {
        query::search(self.cellar.snapshot().wines(), params)
    }

    pub fn filter(&self, params: &FilterParams) -> Vec<Wine> {
        query::filter(self.cellar.snapshot().wines(), params)
    }

    pub fn get_details(&self, params: &DetailParams) -> Vec<Wine> {
        query::get_details(self.cellar.snapshot().wines(), params)
    }

    /// Normalized column names of the current snapshot, in header order.
    pub fn columns(&self) -> Vec<String> {
        self.cellar.snapshot().mapping().names().to_vec()
    }

    /// The combined browse pipeline backing the web UI: full-text query
    /// first (when given), then filters, then sort, then the final limit.
    pub fn browse(&self, params: &BrowseParams) -> Vec<Wine> {
        let snapshot = self.cellar.snapshot();
        let mut results: Vec<Wine> = snapshot.wines().to_vec();
        if let Some(q) = &params.query {
            if !q.trim().is_empty() {
                results = query::search(
                    &results,
                    &SearchParams {
                        query: q.clone(),
                        limit: WIDE_LIMIT,
                        sort_by: None,
                        sort_order: SortOrder::Desc,
                    },
                );
            }
        }
        if !params.filters.is_empty() {
            results = query::filter(
                &results,
                &FilterParams {
                    filters: params.filters.clone(),
                    limit: WIDE_LIMIT,
                    sort_by: None,
                    sort_order: SortOrder::Desc,
                },
            );
        }
        query::sort(&mut results, &params.sort_by, params.sort_order);
        results.truncate(params.limit);
        results
    }

    /// Dropdown metadata for the current snapshot, computed on first use
    /// and cached until a new snapshot is installed.
    pub fn metadata(&self) -> Arc<Metadata> {
        let snapshot = self.cellar.snapshot();
        let mut cache = self.metadata.lock().unwrap();
        if let Some((cached_for, metadata)) = cache.as_ref() {
            if Arc::ptr_eq(cached_for, &snapshot) {
                return Arc::clone(metadata);
            }
        }
        let metadata = Arc::new(Metadata::derive(snapshot.wines()));
        *cache = Some((snapshot, Arc::clone(&metadata)));
        metadata
    }

    /// Dispatches a tool call by name with JSON arguments, the entry point
    /// the agent layer uses. Malformed arguments and unknown tool names are
    /// the only errors; queries themselves never fail.
    pub fn call_tool(&self, name: &str, arguments: Value) -> Result<Vec<Wine>> {
        let snapshot = self.cellar.snapshot();
        let wines = snapshot.wines();
        match name {
            "search_wines" => {
                let params: SearchParams = serde_json::from_value(arguments)
                    .map_err(|e| CellariumError::Parameters(e.to_string()))?;
                Ok(query::search(wines, &params))
            }
            "filter_wines" => {
                let params: FilterParams = serde_json::from_value(arguments)
                    .map_err(|e| CellariumError::Parameters(e.to_string()))?;
                Ok(query::filter(wines, &params))
            }
            "get_wine_details" => {
                let params: DetailParams = serde_json::from_value(arguments)
                    .map_err(|e| CellariumError::Parameters(e.to_string()))?;
                Ok(query::get_details(wines, &params))
            }
            other => Err(CellariumError::UnknownTool(String::from(other))),
        }
    }
}

/// Tool definitions in the shape tool-calling agents expect.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "search_wines",
            "description": "Search for wines using full-text search across wine names, brands, reviews, regions, AVAs, and varietals.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search terms (e.g., \"cherry oak\", \"Napa Valley\", \"Pinot Noir\")" },
                    "limit": { "type": "number", "description": "Maximum number of results to return (default: 20)" },
                    "sort_by": { "type": "string", "description": "Column to sort by (e.g., \"rating\", \"price\", \"vintage\", \"publicationDate\")" },
                    "sort_order": { "type": "string", "enum": ["asc", "desc"], "description": "Sort direction (default: \"desc\")" }
                },
                "required": ["query"]
            }
        },
        {
            "name": "filter_wines",
            "description": "Filter wines by specific criteria with operators. Supports combining multiple filters (AND logic). Use comparison operators for numeric/date fields (e.g., \">4\", \"<50\", \">=2012\"). String fields support partial matching.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "filters": {
                        "type": "object",
                        "description": "Filters as key-value pairs. Keys: mainVarietal, type, region, ava, brandName, price, rating, vintage, publicationDate, tastingDate.",
                        "additionalProperties": { "type": "string" }
                    },
                    "limit": { "type": "number", "description": "Maximum number of results (default: 20)" },
                    "sort_by": { "type": "string", "description": "Column to sort by" },
                    "sort_order": { "type": "string", "enum": ["asc", "desc"], "description": "Sort direction (default: \"desc\")" }
                },
                "required": ["filters"]
            }
        },
        {
            "name": "get_wine_details",
            "description": "Get detailed information about a specific wine by name. Returns complete wine information including review, ratings, pricing, and links.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "wine_name": { "type": "string", "description": "Name or partial name of the wine" },
                    "exact_match": { "type": "boolean", "description": "If true, requires exact match. If false (default), allows partial matches" }
                },
                "required": ["wine_name"]
            }
        }
    ])
}
