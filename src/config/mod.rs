//! Service configuration.
//!
//! `raw` holds the serde TOML shapes, `types` the resolved public structs,
//! `load` the file/env resolution logic.

mod load;
mod raw;
mod types;

pub use load::load;
pub use types::*;
