pub mod credits;
pub mod csvio;
pub mod dedupe;
pub mod error;
pub mod model;
pub mod normalization;
pub mod pipeline;
pub mod providers;
pub mod reconcile;
pub mod tracing;

pub mod util {
    pub mod env;
}

pub use error::EtlError;
