//! # Domain Layer - View Assembly
//!
//! Pure derivations, typed views and the visibility rule. Nothing here
//! performs I/O.

pub mod criteria;
pub mod derivations;
pub mod errors;
pub mod outcome;
pub mod views;
pub mod visibility;

pub use criteria::ListingCriteria;
pub use derivations::*;
pub use errors::ProjectionError;
pub use outcome::QueryOutcome;
pub use views::*;
pub use visibility::{apply_visibility, is_visible, Viewer};
