//! Utility functions shared across layers.
//!
//! - [`url_format`] - Local long URL well-formedness checks

pub mod url_format;
