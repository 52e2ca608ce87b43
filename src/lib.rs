// src/lib.rs

//! nybooks: bestseller search by author, enriched with publication years

pub mod cache;
pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod utils;
