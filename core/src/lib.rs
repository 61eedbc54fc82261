//! Root of the `gobundle-core` library.
//!
//! Walks a Go project, minifies every source file with `gobundle-ast` and
//! assembles the single-file bundle with its metadata line.

pub mod bundle;
pub mod config;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod pipeline;
pub mod walker;

pub use bundle::Bundle;
pub use config::BundleConfig;
pub use error::CoreError;
pub use error::Result;
pub use manifest::ManifestError;
pub use manifest::parse_go_mod;
pub use manifest::read_go_mod;
pub use metadata::FileRecord;
pub use metadata::MetadataCollector;
pub use metadata::ProjectMetadata;
pub use pipeline::BundleReport;
pub use pipeline::Bundler;
pub use pipeline::SkippedFile;
pub use walker::SourceFile;
pub use walker::collect_sources;

pub use gobundle_ast::MinifyLevel;
