//! Command handlers

pub mod category;
pub mod config;
pub mod product;
pub mod status;
pub mod tree;
