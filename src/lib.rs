//! Topology-preserving simplification of adjacent polygon sets.
//!
//! Shared borders between neighboring polygons are extracted once, simplified
//! once, and the simplified fragments are reassembled into polygons, so
//! neighbors stay gap- and overlap-free after simplification.

pub mod borders;
pub mod check;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod rebuild;
pub mod simplify;

pub use dataset::{Dataset, Feature, Field, FieldKind, FieldValue};
pub use error::{GeneralizeError, Result};
pub use pipeline::Generalizer;
