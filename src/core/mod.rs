//! Core module - configuration and repository access

pub mod client;
pub mod config;
pub mod repository;

pub use client::{ClientError, HttpClient};
pub use config::{resolve, ConfigError, InputProvider, NoInput, PartialConfig, Settings};
pub use repository::{
    get, save, Filter, MemoryRepository, Node, NodeKind, Repository, RepositoryCall, SaveOutcome,
};
