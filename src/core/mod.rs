//! Core functionality for the document model, its persistence, and configuration

pub mod asset;
pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod store;
