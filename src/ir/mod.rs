//! Intermediate Representation (IR) shared by every format.
//!
//! Every conversion is routed through this tree:
//!
//!     source → format parser → raw IR → [`normalize`] → canonical IR → format serializer → target
//!
//! # Design Philosophy
//!
//! - **Closed**: two tagged variant families, [`Block`] and [`Inline`], nothing else.
//! - **Owned**: a document owns its whole subtree, there is no sharing and no cycles.
//! - **Immutable passes**: normalization builds a new tree, so intermediate trees can be
//!   compared and inspected in tests.
//! - **Lossy by design**: fonts, spacing and format specific extensions are not represented.
//!
//! # Invariants
//!
//! The parsers are allowed to emit adjacent or empty `Text` runs and empty list items or
//! table cells. Those are only removed by [`normalize`], which is the single point that
//! gives two trees a comparable shape. Every public `parse_*` entry point returns an
//! already normalized tree.
//!
//! # Untyped input
//!
//! Trees arriving as JSON (from the CLI or any other untyped source) should go through
//! [`validate_document`] or [`IrDocument::from_json`] before being serialized.
//!
//! # Modules
//!
//! - [`nodes`]: the data model and its serde representation
//! - [`normalize`]: canonicalization pass
//! - [`validate`]: structural validation of untyped trees

pub mod nodes;
pub mod normalize;
pub mod validate;

pub use nodes::{Block, Inline, IrDocument, ListItem, TableAlignment, TableCell, TableRow};
pub use normalize::normalize;
pub use validate::{validate_document, Violation};
