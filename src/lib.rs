//! Fetches superhero records from a public REST API and lays them out into a paginated PDF.
//!
//! The pipeline has three stages: [`fetcher`] collects heroes from one publisher, [`grouping`]
//! partitions them by occupation and [`layout`] places them on pages through a [`canvas::Canvas`].
//! [`builder::ReportBuilder`] runs the last two stages against the `printpdf` backend in [`pdf`].

pub mod builder;
pub mod canvas;
pub mod client;
pub mod elements;
pub mod error;
pub mod fetcher;
pub mod fonts;
pub mod grouping;
pub mod layout;
pub mod logging;
pub mod model;
pub mod paragraph;
pub mod pdf;
pub mod richtext;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;
