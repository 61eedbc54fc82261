//! Go source minification
//!
//! Parses a Go file with tree-sitter, rewrites the tree according to a
//! [`MinifyLevel`], prints it back with explicit statement terminators and
//! compacts the whitespace. [`extract_header`] reads the package and imports
//! back out of the result.

pub mod compactor;
pub mod error;
pub mod header;
pub mod parser;
pub mod printer;
pub mod shorten;
pub mod transform;
pub mod types;

pub use compactor::compact;
pub use error::AstError;
pub use error::AstResult;
pub use header::FileHeader;
pub use header::HeaderError;
pub use header::extract_header;
pub use parser::parse;
pub use printer::print;
pub use transform::transform;
pub use types::MinifyLevel;
pub use types::Node;
pub use types::SyntaxTree;
pub use types::Token;

use tracing::instrument;
use tracing::trace;

/// Minifies Go files at a fixed level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minifier {
    level: MinifyLevel,
}

impl Minifier {
    pub const fn new(level: MinifyLevel) -> Self {
        Self { level }
    }

    pub const fn level(&self) -> MinifyLevel {
        self.level
    }

    /// Parse, transform, print and compact one file
    #[instrument(level = "trace", skip_all, fields(level = %self.level, bytes = source.len()))]
    pub fn minify(&self, source: &str) -> AstResult<String> {
        let tree = parse(source)?;
        let tree = transform(tree, self.level);
        let printed = print(&tree);
        let compacted = compact(&printed);
        trace!(
            before = source.len(),
            after = compacted.len(),
            "file minified"
        );
        Ok(compacted)
    }
}

/// Shorthand for `Minifier::new(level).minify(source)`
pub fn minify(source: &str, level: MinifyLevel) -> AstResult<String> {
    Minifier::new(level).minify(source)
}
