//! Navigation logic for webfm.
//!
//! This module contains the current-path model with its breadcrumb
//! ([`path_model::PathModel`]), the listing-scoped multi-select set
//! ([`selection::SelectionModel`]), and entry [`filter`]ing.

pub mod filter;
pub mod path_model;
pub mod selection;
