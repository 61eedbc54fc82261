//! Bundle text layout: one JSON metadata line, then one marked section per
//! file.

use crate::error::Result;
use crate::metadata::FileRecord;
use crate::metadata::ProjectMetadata;

pub const FILE_MARKER_PREFIX: &str = "###FILE:";
pub const FILE_MARKER_SUFFIX: &str = "###";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub metadata: ProjectMetadata,
    /// In traversal order
    pub files: Vec<FileRecord>,
}

impl Bundle {
    pub const fn new(metadata: ProjectMetadata, files: Vec<FileRecord>) -> Self {
        Self { metadata, files }
    }

    pub fn render(&self) -> Result<String> {
        let header = serde_json::to_string(&self.metadata)?;
        let body: usize = self
            .files
            .iter()
            .map(|file| file.path.len() + file.text.len() + 16)
            .sum();

        let mut out = String::with_capacity(header.len() + 1 + body);
        out.push_str(&header);
        out.push('\n');
        for file in &self.files {
            out.push_str(FILE_MARKER_PREFIX);
            out.push_str(&file.path);
            out.push_str(FILE_MARKER_SUFFIX);
            out.push('\n');
            out.push_str(&file.text);
            out.push_str("\n\n");
        }
        Ok(out)
    }
}
