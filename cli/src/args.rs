use crate::error::Result;
use clap::Parser;
use gobundle_core::BundleConfig;
use gobundle_core::MinifyLevel;
use std::path::PathBuf;

/// gobundle - minify a Go project into one LLM-friendly text file
#[derive(Parser, Debug, Default)]
#[command(name = "gobundle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Go project directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Bundle path (default: <project name>_bundle.txt)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Include the package to file structure in the metadata line
    #[arg(long)]
    pub meta: bool,

    /// Minification level: 1 comments, 2 declarations and imports, 3 identifiers
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub minify: Option<u8>,

    /// Comma-separated path prefixes to skip (default: vendor,testdata)
    #[arg(long, value_name = "PATHS", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Leave files that fail to parse out of the bundle instead of failing
    #[arg(long)]
    pub keep_going: bool,

    /// TOML file with defaults; flags given here take precedence
    #[arg(long, value_name = "FILE", env = "GOBUNDLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Merge the flags over the config file (or the defaults)
    pub fn into_config(self) -> Result<BundleConfig> {
        let mut config = match &self.config {
            Some(path) => BundleConfig::from_toml_file(path)?,
            None => BundleConfig::default(),
        };
        if let Some(dir) = self.dir {
            config.project_dir = dir;
        }
        if let Some(out) = self.out {
            config.output_file = Some(out);
        }
        if let Some(exclude) = self.exclude {
            config.exclude = exclude;
        }
        if let Some(level) = self.minify {
            config.level = MinifyLevel::try_from(level)?;
        }
        config.include_meta |= self.meta;
        config.keep_going |= self.keep_going;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gobundle").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_parsing() {
        use clap::CommandFactory;

        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config, BundleConfig::default());
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "--dir",
            "proj",
            "--out",
            "b.txt",
            "--meta",
            "--minify",
            "3",
            "--exclude",
            "gen,third_party",
            "--keep-going",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.project_dir, PathBuf::from("proj"));
        assert_eq!(config.output_file, Some(PathBuf::from("b.txt")));
        assert_eq!(config.exclude, vec!["gen", "third_party"]);
        assert_eq!(config.level, MinifyLevel::Identifiers);
        assert!(config.include_meta);
        assert!(config.keep_going);
    }

    #[test]
    fn test_minify_out_of_range() {
        let args = ["gobundle", "--minify", "4"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["gobundle", "--minify", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gobundle.toml");
        std::fs::write(&path, "level = 2\ninclude_meta = true\nexclude = [\"gen\"]\n").unwrap();

        let cli = Cli {
            config: Some(path),
            minify: Some(3),
            ..Cli::default()
        };
        let config = cli.into_config().unwrap();
        assert_eq!(config.level, MinifyLevel::Identifiers);
        assert!(config.include_meta);
        assert_eq!(config.exclude, vec!["gen"]);
    }
}
