//! cript-ingest: upload polymer materials into CRIPT
//!
//! Reads diblock simulation records from a CSV file and writes one material
//! per row into a CRIPT inventory, creating or updating everything by name.

pub mod cli;
pub mod core;
pub mod entities;
pub mod ingest;
pub mod yaml;
