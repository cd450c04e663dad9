//! Output generation for the job board.
//!
//! # Submodules
//!
//! - [`json`]: Loads and writes the [`JobStore`](crate::models::JobStore) file
//!   the front-end reads
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── jobs.json   # { "meta": { ... }, "jobs": [ ... ] }
//! ```

pub mod json;
