//! Cellarium – an in-memory search engine for a spreadsheet of wine reviews.
//!
//! The sheet keeps everything as text: prices like `"$30"`, ratings like
//! `"*** 1/2"`, free-form dates, and free-text reviews. Cellarium loads the
//! raw rows, normalizes the header into canonical camel-case field names,
//! and answers three kinds of questions over the in-memory collection:
//!
//! * full-text search ([`query::search`]) — every query token must appear
//!   somewhere across the searchable fields;
//! * structured filter ([`query::filter`]) — AND-combined expressions like
//!   `rating > "***"` written as `{"rating": ">4"}`, with type-aware
//!   comparison per field;
//! * detail lookup ([`query::get_details`]) — exact or partial name match.
//!
//! ## Modules
//! * [`record`] – canonical fields, header normalization, the [`record::Wine`]
//!   record, and the snapshot-swapped [`record::Cellar`] store.
//! * [`value`] – total parsers for the sheet's textual encodings and the
//!   operator comparator.
//! * [`query`] – the three query operators and their shared stable sort.
//! * [`source`] – the [`source::RowSource`] seam the excluded spreadsheet
//!   fetcher plugs into, plus file/static implementations.
//! * [`interface`] – [`interface::QueryInterface`]: refresh orchestration,
//!   tool-call dispatch, the combined browse pipeline, dropdown metadata.
//! * [`settings`] – configuration via the `config` crate.
//! * [`server`] – the axum HTTP surface.
//!
//! ## Snapshot discipline
//! Queries run against an `Arc<Snapshot>` cloned out of the store; refreshes
//! build a complete replacement before swapping it in, and a failed refresh
//! leaves the old snapshot serving. Readers never lock anything for longer
//! than the pointer clone.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use cellarium::record::Cellar;
//! use cellarium::query::{self, SearchParams, SortOrder};
//!
//! let cellar = Cellar::new();
//! cellar.install(vec![
//!     vec!["ID".into(), "Brand".into(), "Wine Name".into(), "$".into(), "Rating".into()],
//!     vec!["1".into(), "Acme".into(), "Red Blend".into(), "$30".into(), "***".into()],
//! ]).unwrap();
//! let snapshot = cellar.snapshot();
//! let hits = query::search(snapshot.wines(), &SearchParams {
//!     query: "red".into(),
//!     limit: 20,
//!     sort_by: None,
//!     sort_order: SortOrder::Desc,
//! });
//! assert_eq!(hits.len(), 1);
//! ```

pub mod error;
pub mod interface;
pub mod query;
pub mod record;
pub mod server;
pub mod settings;
pub mod source;
pub mod value;
