use cellarium::query::{self, DetailParams};
use cellarium::record::{Cellar, Wine};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn setup() -> Vec<Wine> {
    let cellar = Cellar::new();
    cellar
        .install(vec![
            row(&["ID", "Brand Name", "Wine Name"]),
            row(&["1", "Acme", "Estate Pinot Noir"]),
            row(&["2", "Beacon", "Estate Pinot Noir"]),
            row(&["3", "Acme", "River White"]),
        ])
        .unwrap();
    cellar.snapshot().wines().to_vec()
}

fn lookup(wines: &[Wine], name: &str, exact: bool) -> Vec<Wine> {
    query::get_details(
        wines,
        &DetailParams {
            wine_name: name.to_string(),
            exact_match: exact,
        },
    )
}

#[test]
fn partial_match_is_the_default() {
    let wines = setup();
    let results = lookup(&wines, "pinot", false);
    assert_eq!(results.len(), 2);
}

#[test]
fn exact_match_requires_the_full_name() {
    let wines = setup();
    assert!(lookup(&wines, "pinot", true).is_empty());
    let results = lookup(&wines, "Estate Pinot Noir", true);
    assert_eq!(results.len(), 2);
}

#[test]
fn brand_qualified_name_matches_exactly() {
    let wines = setup();
    let results = lookup(&wines, "Acme Estate Pinot Noir", true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "1");
}

#[test]
fn lookup_is_case_insensitive() {
    let wines = setup();
    let results = lookup(&wines, "acme estate pinot noir", true);
    assert_eq!(results.len(), 1);
    assert_eq!(lookup(&wines, "RIVER", false).len(), 1);
}

#[test]
fn duplicate_names_are_not_deduplicated() {
    let wines = setup();
    let results = lookup(&wines, "estate pinot noir", false);
    assert_eq!(results.len(), 2);
    assert_ne!(results[0].brand_name, results[1].brand_name);
}
