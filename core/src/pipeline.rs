//! End-to-end bundling of one project

use crate::bundle::Bundle;
use crate::config::BundleConfig;
use crate::error::CoreError;
use crate::error::Result;
use crate::manifest::read_go_mod;
use crate::metadata::FileRecord;
use crate::metadata::MetadataCollector;
use crate::walker::SourceFile;
use crate::walker::collect_sources;
use gobundle_ast::AstError;
use gobundle_ast::Minifier;
use gobundle_ast::extract_header;
use rayon::prelude::*;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

/// A file left out of the bundle because it did not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub error: AstError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub bundle: Bundle,
    /// `bundle` rendered
    pub text: String,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone)]
pub struct Bundler {
    config: BundleConfig,
    minifier: Minifier,
}

impl Bundler {
    pub fn new(config: BundleConfig) -> Self {
        let minifier = Minifier::new(config.level);
        Self { config, minifier }
    }

    pub const fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Read `go.mod`, walk the project and bundle every source file. A
    /// manifest error aborts before any file is read.
    #[instrument(skip(self), fields(dir = %self.config.project_dir.display()))]
    pub fn run(&self) -> Result<BundleReport> {
        let dependencies = read_go_mod(&self.config.manifest_path())?;
        let sources = collect_sources(&self.config.project_dir, &self.config.exclude)?;
        info!(
            files = sources.len(),
            dependencies = dependencies.len(),
            level = %self.config.level,
            "bundling project"
        );
        self.bundle_sources(dependencies, sources)
    }

    /// Minify `sources` (in parallel, order kept) and assemble the bundle
    #[instrument(level = "debug", skip_all, fields(files = sources.len()))]
    pub fn bundle_sources(
        &self,
        dependencies: Vec<String>,
        sources: Vec<SourceFile>,
    ) -> Result<BundleReport> {
        let results: Vec<(String, std::result::Result<String, AstError>)> = sources
            .into_par_iter()
            .map(|source| {
                let minified = self.minifier.minify(&source.text);
                (source.path, minified)
            })
            .collect();

        let mut files = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (path, minified) in results {
            match minified {
                Ok(text) => {
                    debug!(%path, bytes = text.len(), "minified");
                    files.push(FileRecord::new(path, text));
                }
                Err(error) if self.config.keep_going => {
                    warn!(%path, %error, "skipping file that failed to parse");
                    skipped.push(SkippedFile { path, error });
                }
                Err(source) => return Err(CoreError::Parse { path, source }),
            }
        }

        let mut collector = MetadataCollector::new(dependencies, self.config.include_meta);
        for file in &files {
            match extract_header(&file.text) {
                Ok(header) => collector.add(&file.path, header),
                Err(error) => {
                    warn!(path = %file.path, %error, "no package header; leaving file out of metadata");
                }
            }
        }

        let bundle = Bundle::new(collector.finish(), files);
        let text = bundle.render()?;
        info!(
            files = bundle.files.len(),
            skipped = skipped.len(),
            bytes = text.len(),
            "bundle assembled"
        );
        Ok(BundleReport {
            bundle,
            text,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobundle_ast::MinifyLevel;
    use pretty_assertions::assert_eq;

    fn source(path: &str, text: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_bundle_sources_keeps_order() {
        let bundler = Bundler::new(BundleConfig::default());
        let sources = (0..20)
            .map(|i| source(&format!("f{i:02}.go"), &format!("package p\n\nvar V{i} = {i}\n")))
            .collect();
        let report = bundler.bundle_sources(Vec::new(), sources).unwrap();
        let paths: Vec<&str> = report
            .bundle
            .files
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        let expected: Vec<String> = (0..20).map(|i| format!("f{i:02}.go")).collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_parse_error_is_fatal_by_default() {
        let bundler = Bundler::new(BundleConfig::default());
        let err = bundler
            .bundle_sources(
                Vec::new(),
                vec![
                    source("ok.go", "package p\n"),
                    source("bad.go", "package p\nfunc {\n"),
                ],
            )
            .unwrap_err();
        match err {
            CoreError::Parse { path, .. } => assert_eq!(path, "bad.go"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_keep_going_skips_bad_files() {
        let bundler = Bundler::new(BundleConfig::default().keep_going(true));
        let report = bundler
            .bundle_sources(
                Vec::new(),
                vec![
                    source("ok.go", "package p\n\nimport \"fmt\"\n"),
                    source("bad.go", "package p\nfunc {\n"),
                ],
            )
            .unwrap();
        assert_eq!(report.bundle.files.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "bad.go");
        assert_eq!(report.bundle.metadata.imports, vec!["fmt"]);
        assert!(!report.text.contains("bad.go"));
    }

    #[test]
    fn test_two_file_metadata() {
        let config = BundleConfig::default()
            .include_meta(true)
            .with_level(MinifyLevel::Declarations);
        let report = Bundler::new(config)
            .bundle_sources(
                vec!["example.com/dep@v1.2.3".to_string()],
                vec![
                    source("a.go", "package p\n\nimport \"m1\"\nimport \"m1\"\n"),
                    source("b.go", "package p\n\nimport \"m2\"\n"),
                ],
            )
            .unwrap();
        let first_line = report.text.lines().next().unwrap();
        assert_eq!(
            first_line,
            r#"{"d":["example.com/dep@v1.2.3"],"i":["m1","m2"],"s":{"p":["a.go","b.go"]}}"#
        );
    }

    #[test]
    fn test_file_without_header_stays_out_of_metadata() {
        let config = BundleConfig::default().include_meta(true);
        let report = Bundler::new(config)
            .bundle_sources(
                Vec::new(),
                vec![
                    source("a.go", "package p\nimport \"m\"\n"),
                    source("b.go", "func f() {}\n"),
                ],
            )
            .unwrap();
        assert!(report.skipped.is_empty());
        assert!(report.text.contains("###FILE:a.go###\n"));
        assert!(report.text.contains("###FILE:b.go###\nfunc f(){};\n\n"));
        assert_eq!(report.bundle.metadata.imports, vec!["m"]);
        assert_eq!(report.bundle.metadata.structure.len(), 1);
        assert_eq!(report.bundle.metadata.structure["p"], vec!["a.go"]);
        assert!(report.text.starts_with(r#"{"i":["m"],"s":{"p":["a.go"]}}"#));
    }

    #[test]
    fn test_no_imports_no_structure() {
        let report = Bundler::new(BundleConfig::default())
            .bundle_sources(Vec::new(), vec![source("a.go", "package p\n")])
            .unwrap();
        assert_eq!(report.text, "{}\n###FILE:a.go###\npackage p;\n\n");
    }
}
