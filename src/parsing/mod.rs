//! Pure text-parsing helpers shared by every scraper.
//!
//! Nothing in here touches the network or the file system, which keeps the
//! tricky regex precedence rules easy to test in isolation.
//!
//! # Submodules
//!
//! - [`salary`]: Pay ranges and single figures from free-form listing text
//! - [`employment`]: Full-time / part-time / contract / ... keywords
//! - [`text`]: Whitespace cleanup, HTML stripping, excerpts and date normalization

pub mod employment;
pub mod salary;
pub mod text;

pub use employment::parse_employment_type;
pub use salary::parse_salary;
