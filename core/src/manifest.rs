//! `go.mod` reading. Only `require` directives matter for the bundle.

use crate::error::CoreError;
use crate::error::Result;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("line {line}: expected `<module> <version>`, found {text:?}")]
    MalformedRequire { line: usize, text: String },

    #[error("line {line}: unterminated require block")]
    UnterminatedBlock { line: usize },

    #[error("line {line}: unterminated quoted module path")]
    UnterminatedQuote { line: usize },
}

/// Read `path` and return its requirements as `module@version`
pub fn read_go_mod(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let dependencies = parse_go_mod(&text).map_err(|source| CoreError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(count = dependencies.len(), "read go.mod requirements");
    Ok(dependencies)
}

/// Every `require` entry as `module@version`, in file order, duplicates kept
pub fn parse_go_mod(text: &str) -> std::result::Result<Vec<String>, ManifestError> {
    let mut dependencies = Vec::new();
    let mut block_start: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }

        if block_start.is_some() {
            if content == ")" {
                block_start = None;
            } else {
                dependencies.push(requirement(content, line)?);
            }
            continue;
        }

        let Some(rest) = content.strip_prefix("require") else {
            continue;
        };
        // `requirements` or similar is not the directive
        if !rest.is_empty() && !rest.starts_with([' ', '\t', '(']) {
            continue;
        }
        let rest = rest.trim();
        if rest == "(" {
            block_start = Some(line);
        } else if let Some(single) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            // `require ( a v1 )` on one line
            let single = single.trim();
            if !single.is_empty() {
                dependencies.push(requirement(single, line)?);
            }
        } else {
            dependencies.push(requirement(rest, line)?);
        }
    }

    if let Some(line) = block_start {
        return Err(ManifestError::UnterminatedBlock { line });
    }
    Ok(dependencies)
}

fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '/' if !in_quote && line[i..].starts_with("//") => return &line[..i],
            _ => {}
        }
    }
    line
}

fn requirement(spec: &str, line: usize) -> std::result::Result<String, ManifestError> {
    let malformed = || ManifestError::MalformedRequire {
        line,
        text: spec.to_string(),
    };

    let (module, rest) = if let Some(quoted) = spec.strip_prefix('"') {
        let end = quoted
            .find('"')
            .ok_or(ManifestError::UnterminatedQuote { line })?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        spec.split_once(char::is_whitespace).ok_or_else(malformed)?
    };

    let mut fields = rest.split_whitespace();
    let version = fields.next().ok_or_else(malformed)?;
    if module.is_empty() || fields.next().is_some() {
        return Err(malformed());
    }
    Ok(format!("{module}@{version}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_and_block_requires() {
        let text = r#"module example.com/app

go 1.22

require github.com/pkg/errors v0.9.1

require (
	golang.org/x/sync v0.7.0 // indirect
	// a comment line
	"example.com/quoted path" v1.0.0

	golang.org/x/text v0.14.0
)

replace golang.org/x/text => ../text
"#;
        assert_eq!(
            parse_go_mod(text).unwrap(),
            vec![
                "github.com/pkg/errors@v0.9.1",
                "golang.org/x/sync@v0.7.0",
                "example.com/quoted path@v1.0.0",
                "golang.org/x/text@v0.14.0",
            ]
        );
    }

    #[test]
    fn test_no_requires() {
        assert_eq!(
            parse_go_mod("module m\n\ngo 1.21\n").unwrap(),
            Vec::<String>::new()
        );
        assert_eq!(parse_go_mod("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let text = "module m\nrequire a v1\nrequire a v1\nrequire (b v2)\n";
        assert_eq!(parse_go_mod(text).unwrap(), vec!["a@v1", "a@v1", "b@v2"]);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            parse_go_mod("module m\nrequire onlymodule\n"),
            Err(ManifestError::MalformedRequire {
                line: 2,
                text: "onlymodule".to_string()
            })
        );
        assert_eq!(
            parse_go_mod("module m\nrequire (\n\ta v1\n"),
            Err(ManifestError::UnterminatedBlock { line: 2 })
        );
        assert_eq!(
            parse_go_mod("require \"a v1\n"),
            Err(ManifestError::UnterminatedQuote { line: 1 })
        );
        assert!(parse_go_mod("require a v1 extra\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_go_mod(&dir.path().join("go.mod")).unwrap_err();
        assert!(matches!(err, CoreError::ManifestRead { .. }));
    }
}
