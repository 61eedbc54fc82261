//! Project summary written as the first line of a bundle

use gobundle_ast::FileHeader;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// One minified file, keyed by its `/`-separated path relative to the
/// project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub text: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// `module@version` from `go.mod`, verbatim
    #[serde(rename = "d", default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Distinct import paths across all files, first-seen order
    #[serde(rename = "i", default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,

    /// Package name → files declaring it
    #[serde(rename = "s", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub structure: BTreeMap<String, Vec<String>>,
}

/// Accumulates [`ProjectMetadata`] one file header at a time
#[derive(Debug, Default)]
pub struct MetadataCollector {
    metadata: ProjectMetadata,
    seen_imports: HashSet<String>,
    include_structure: bool,
}

impl MetadataCollector {
    pub fn new(dependencies: Vec<String>, include_structure: bool) -> Self {
        Self {
            metadata: ProjectMetadata {
                dependencies,
                ..ProjectMetadata::default()
            },
            seen_imports: HashSet::new(),
            include_structure,
        }
    }

    pub fn add(&mut self, path: &str, header: FileHeader) {
        for import in header.imports {
            if self.seen_imports.insert(import.clone()) {
                self.metadata.imports.push(import);
            }
        }
        if self.include_structure {
            self.metadata
                .structure
                .entry(header.package)
                .or_default()
                .push(path.to_string());
        }
    }

    pub fn finish(self) -> ProjectMetadata {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header(package: &str, imports: &[&str]) -> FileHeader {
        FileHeader {
            package: package.to_string(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_imports_deduplicated_in_order() {
        let mut collector = MetadataCollector::new(Vec::new(), true);
        collector.add("a.go", header("p", &["m1", "m1"]));
        collector.add("b.go", header("p", &["m2", "m1"]));
        collector.add("cmd/main.go", header("main", &[]));
        let metadata = collector.finish();
        assert_eq!(metadata.imports, vec!["m1", "m2"]);
        assert_eq!(metadata.structure["p"], vec!["a.go", "b.go"]);
        assert_eq!(metadata.structure["main"], vec!["cmd/main.go"]);
    }

    #[test]
    fn test_structure_only_when_enabled() {
        let mut collector = MetadataCollector::new(vec!["x@v1".to_string()], false);
        collector.add("a.go", header("p", &["fmt"]));
        let metadata = collector.finish();
        assert!(metadata.structure.is_empty());
        assert_eq!(
            serde_json::to_string(&metadata).unwrap(),
            r#"{"d":["x@v1"],"i":["fmt"]}"#
        );
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        assert_eq!(
            serde_json::to_string(&ProjectMetadata::default()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_structure_keys_sorted() {
        let mut collector = MetadataCollector::new(Vec::new(), true);
        collector.add("z.go", header("zeta", &[]));
        collector.add("a.go", header("alpha", &[]));
        let json = serde_json::to_string(&collector.finish()).unwrap();
        assert_eq!(json, r#"{"s":{"alpha":["a.go"],"zeta":["z.go"]}}"#);
    }
}
