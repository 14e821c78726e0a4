//! Core domain types and logic.

pub mod compare;
pub mod config_validation;
pub mod error;
pub mod fundamentals;
pub mod indicator;
pub mod normalize;
pub mod price;
pub mod report;
pub mod score;
pub mod universe;
