//! spo-page-export
//!
//! Exports SharePoint Online client-side pages into reusable
//! provisioning-template XML documents, optionally persisting
//! referenced branding assets next to the output file.
//!
//! This crate provides the core implementation for the
//! `spo-page-export` CLI tool.

pub mod client;
pub mod commands;
pub mod config;
pub mod connectors;
pub mod extract;
pub mod template;
pub mod utils;
