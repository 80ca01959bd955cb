// src/lib.rs

pub mod db;
pub mod repositories;
pub mod services;
pub mod http;
pub mod test_utils;

pub use db::Database;
pub use vouchervote_common::error::Error;
