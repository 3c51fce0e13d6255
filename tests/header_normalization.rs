use cellarium::record::{FieldMapping, normalize_header};

fn header(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[test]
fn special_case_headers() {
    assert_eq!(normalize_header("ID"), "id");
    assert_eq!(normalize_header("$"), "price");
    assert_eq!(normalize_header("Purchased/ Provided"), "purchasedProvided");
    assert_eq!(normalize_header("Temp (if not standard)"), "temp");
}

#[test]
fn camel_casing() {
    assert_eq!(normalize_header("Brand Name"), "brandName");
    assert_eq!(normalize_header("Wine Name"), "wineName");
    assert_eq!(normalize_header("Main Varietal"), "mainVarietal");
    assert_eq!(normalize_header("Rating"), "rating");
    assert_eq!(normalize_header("AVA"), "ava");
}

#[test]
fn parenthesized_content_is_stripped() {
    assert_eq!(normalize_header("Setting (dinner, tasting)"), "setting");
    assert_eq!(normalize_header("Publication (web) Date"), "publicationDate");
}

#[test]
fn punctuation_is_stripped() {
    assert_eq!(normalize_header("Tasting-Date!"), "tastingdate");
    assert_eq!(normalize_header("Wine  Name"), "wineName");
    assert_eq!(normalize_header("  Region  "), "region");
}

#[test]
fn normalization_is_idempotent() {
    for name in ["brandName", "mainVarietal", "publicationDate", "vintage", "id"] {
        assert_eq!(normalize_header(name), name);
        assert_eq!(normalize_header(&normalize_header(name)), name);
    }
    let once = normalize_header("Brand Name");
    assert_eq!(normalize_header(&once), once);
}

#[test]
fn mapping_resolves_columns() {
    let mapping = FieldMapping::from_header(&header(&["ID", "Brand Name", "$"]));
    assert_eq!(mapping.column("id"), Some(0));
    assert_eq!(mapping.column("brandName"), Some(1));
    assert_eq!(mapping.column("price"), Some(2));
    // not present at all, as opposed to present but empty
    assert_eq!(mapping.column("rating"), None);
}

#[test]
fn duplicate_headers_last_column_wins() {
    let mapping = FieldMapping::from_header(&header(&["Rating", "Brand Name", "Rating"]));
    assert_eq!(mapping.column("rating"), Some(2));
    // the ordered name list keeps the first occurrence's position
    assert_eq!(mapping.names(), &["rating", "brandName"]);
    assert_eq!(mapping.len(), 2);
}
