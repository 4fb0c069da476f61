#![doc = include_str!("../README.md")]

mod error;

pub mod ax25;
pub mod base91;
pub mod kiss;
pub mod payload;
pub mod pipeline;
mod summary;

pub use error::{Error, Result};
pub use summary::{StationSummary, Summary};
