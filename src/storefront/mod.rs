//! Storefront setup: the region/category catalog and the draft submitted to
//! create a store.

pub mod catalog;
pub mod draft;

pub use draft::{PLACEHOLDER_NAME, StoreDraft};
