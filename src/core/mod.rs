//! Core orchestration module

pub mod client;
pub mod config;
pub mod engines;
pub mod errors;
pub mod language;
pub mod models;
pub mod picker;
pub mod translator;
