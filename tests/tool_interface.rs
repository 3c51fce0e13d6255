use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use cellarium::error::CellariumError;
use cellarium::interface::{BrowseParams, QueryInterface, tool_definitions};
use cellarium::query::SortOrder;
use cellarium::record::Cellar;
use cellarium::source::StaticSource;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn rows() -> Vec<Vec<String>> {
    vec![
        row(&[
            "ID", "Brand Name", "Wine Name", "AVA", "Vintage", "$", "Rating",
            "Review", "Region", "Type", "Main Varietal",
        ]),
        row(&[
            "1", "Acme", "Estate Cuvee", "Willamette Valley", "2012", "$45",
            "**** 1/2", "Bright cherry and oak", "Oregon", "Red", "Pinot Noir",
        ]),
        row(&[
            "2", "Beacon", "Hilltop", "Napa Valley", "2015", "$80", "***",
            "Dense cassis", "California", "Red", "Cabernet Sauvignon",
        ]),
        row(&[
            "3", "Acme", "River White", "", "2018", "$18", "** 1/2",
            "Crisp and floral", "Oregon", "White", "Pinot Gris",
        ]),
    ]
}

fn setup() -> QueryInterface {
    let cellar = Arc::new(Cellar::new());
    let interface = QueryInterface::new(cellar, Box::new(StaticSource::new(rows())));
    interface.refresh().unwrap();
    interface
}

#[test]
fn search_tool_dispatch() {
    let interface = setup();
    let wines = interface
        .call_tool("search_wines", json!({ "query": "cherry oak" }))
        .unwrap();
    assert_eq!(wines.len(), 1);
    assert_eq!(wines[0].id, "1");
}

#[test]
fn filter_tool_dispatch() {
    let interface = setup();
    let wines = interface
        .call_tool(
            "filter_wines",
            json!({ "filters": { "type": "Red", "price": "<50" } }),
        )
        .unwrap();
    assert_eq!(wines.len(), 1);
    assert_eq!(wines[0].id, "1");
}

#[test]
fn details_tool_dispatch() {
    let interface = setup();
    let wines = interface
        .call_tool(
            "get_wine_details",
            json!({ "wine_name": "Acme Estate Cuvee", "exact_match": true }),
        )
        .unwrap();
    assert_eq!(wines.len(), 1);
}

#[test]
fn limit_defaults_through_json_arguments() {
    let cellar = Arc::new(Cellar::new());
    let mut many = vec![row(&["ID", "Wine Name", "Review"])];
    for i in 0..30 {
        many.push(row(&[&i.to_string(), "Blend", "smooth"]));
    }
    let interface = QueryInterface::new(cellar, Box::new(StaticSource::new(many)));
    interface.refresh().unwrap();
    let wines = interface
        .call_tool("search_wines", json!({ "query": "smooth" }))
        .unwrap();
    assert_eq!(wines.len(), 20);
}

#[test]
fn unknown_tool_is_an_error() {
    let interface = setup();
    let err = interface
        .call_tool("pour_wine", json!({}))
        .unwrap_err();
    assert!(matches!(err, CellariumError::UnknownTool(_)));
    assert!(format!("{err}").contains("pour_wine"));
}

#[test]
fn malformed_arguments_are_an_error() {
    let interface = setup();
    let err = interface
        .call_tool("search_wines", json!({ "limit": 5 }))
        .unwrap_err();
    assert!(matches!(err, CellariumError::Parameters(_)));
}

#[test]
fn tool_definitions_cover_all_three_tools() {
    let definitions = tool_definitions();
    let names: Vec<&str> = definitions
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["search_wines", "filter_wines", "get_wine_details"]);
}

#[test]
fn columns_follow_the_header_order() {
    let interface = setup();
    assert_eq!(
        interface.columns(),
        [
            "id", "brandName", "wineName", "ava", "vintage", "price", "rating",
            "review", "region", "type", "mainVarietal",
        ]
    );
}

#[test]
fn metadata_is_cached_per_snapshot() {
    let interface = setup();
    let first = interface.metadata();
    assert_eq!(first.varietals, ["Cabernet Sauvignon", "Pinot Gris", "Pinot Noir"]);
    assert_eq!(first.regions, ["California", "Oregon"]);
    assert_eq!(first.types, ["Red", "White"]);
    // blank AVAs are dropped
    assert_eq!(first.ava_list, ["Napa Valley", "Willamette Valley"]);

    let again = interface.metadata();
    assert!(Arc::ptr_eq(&first, &again));

    // a refresh installs a new snapshot and invalidates the cache
    interface.refresh().unwrap();
    let rebuilt = interface.metadata();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(rebuilt.varietals, first.varietals);
}

#[test]
fn browse_runs_query_filters_sort_and_limit() {
    let interface = setup();
    let params = BrowseParams::from_pairs(HashMap::from([
        (String::from("q"), String::from("oregon")),
        (String::from("type"), String::from("White")),
    ]));
    assert_eq!(params.sort_by, "rating");
    assert_eq!(params.sort_order, SortOrder::Desc);
    assert_eq!(params.limit, 20);
    let wines = interface.browse(&params);
    assert_eq!(wines.len(), 1);
    assert_eq!(wines[0].id, "3");
}

#[test]
fn browse_sorts_by_rating_by_default() {
    let interface = setup();
    let wines = interface.browse(&BrowseParams::from_pairs(HashMap::new()));
    let ids: Vec<&str> = wines.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
fn browse_drops_blank_filter_values() {
    let interface = setup();
    let params = BrowseParams::from_pairs(HashMap::from([
        (String::from("type"), String::from("  ")),
        (String::from("limit"), String::from("2")),
    ]));
    assert!(params.filters.is_empty());
    assert_eq!(params.limit, 2);
    assert_eq!(interface.browse(&params).len(), 2);
}
