//! Pipeline entry points for the command line.
//!
//! - `run_search`: Search an author's books, optionally by year
//! - `run_health`: Probe the upstream APIs
//! - `run_validate`: Check configuration

pub mod health;
pub mod search;
pub mod validate;

pub use health::run_health;
pub use search::run_search;
pub use validate::run_validate;
