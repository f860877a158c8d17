//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Merge, format and check Vue components.
#[derive(Debug, Parser)]
#[command(name = "vue-kit")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding vuekit.config.json
    #[arg(long, global = true, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Log debug events (same as VUE_KIT_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge a fragment component into a host component
    Merge(MergeArgs),
    /// Reparse and regenerate components
    Format(FormatArgs),
    /// Parse every component under the workspace
    Check(CheckArgs),
}

/// Arguments of `merge`.
#[derive(Debug, ClapArgs)]
pub struct MergeArgs {
    /// The component receiving the fragment
    pub host: Utf8PathBuf,

    /// The component to merge in
    pub fragment: Utf8PathBuf,

    /// Template route to insert at, e.g. `/0/2` or `/1/`
    #[arg(long, conflicts_with = "position")]
    pub at: Option<String>,

    /// Cursor position to insert at, as `LINE:CHAR`
    #[arg(long)]
    pub position: Option<String>,

    /// Print the merged host instead of saving it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,
}

impl MergeArgs {
    /// The target as given, route or position. Defaults to the root.
    pub fn target(&self) -> &str {
        self.at
            .as_deref()
            .or(self.position.as_deref())
            .unwrap_or_default()
    }
}

/// Arguments of `format`.
#[derive(Debug, ClapArgs)]
pub struct FormatArgs {
    /// Components to format
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Report components that would change without writing them
    #[arg(long)]
    pub check: bool,
}

/// Arguments of `check`.
#[derive(Debug, ClapArgs)]
pub struct CheckArgs {
    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_args() {
        let args = Args::parse_from(["vue-kit", "merge", "a.vue", "b.vue", "--at", "/0/1"]);
        let Command::Merge(merge) = args.command else {
            panic!("expected merge");
        };
        assert_eq!(merge.host.as_str(), "a.vue");
        assert_eq!(merge.target(), "/0/1");
        assert!(!merge.dry_run);
        assert_eq!(merge.output, OutputFormat::Human);
    }

    #[test]
    fn test_merge_position_and_route_conflict() {
        let result = Args::try_parse_from([
            "vue-kit", "merge", "a.vue", "b.vue", "--at", "/0", "--position", "3:4",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_target_is_root() {
        let args = Args::parse_from(["vue-kit", "merge", "a.vue", "b.vue", "--dry-run"]);
        let Command::Merge(merge) = args.command else {
            panic!("expected merge");
        };
        assert_eq!(merge.target(), "");
        assert!(merge.dry_run);
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["vue-kit", "check", "--verbose", "--workspace", "/tmp/w"]);
        assert!(args.verbose);
        assert_eq!(args.workspace.as_str(), "/tmp/w");
        assert!(matches!(args.command, Command::Check(_)));
    }

    #[test]
    fn test_format_requires_paths() {
        assert!(Args::try_parse_from(["vue-kit", "format"]).is_err());
        let args = Args::parse_from(["vue-kit", "format", "a.vue", "b.vue", "--check"]);
        let Command::Format(format) = args.command else {
            panic!("expected format");
        };
        assert_eq!(format.paths.len(), 2);
        assert!(format.check);
    }
}
