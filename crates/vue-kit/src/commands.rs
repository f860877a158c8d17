//! Subcommand runners.

use crate::cli::{Args, CheckArgs, Command, FormatArgs, MergeArgs};
use crate::config::KitConfig;
use crate::output::{CheckFailure, CheckSummary, Formatter, MergeReport};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSetBuilder};
use rayon::prelude::*;
use thiserror::Error;
use tokio::runtime::Handle;
use vue_file::{ComponentFile, FileError, MergeTarget, SectionKind};
use walkdir::WalkDir;

/// Patterns `check` never descends into.
const DEFAULT_IGNORES: [&str; 3] = ["**/node_modules/**", "**/dist/**", "**/.git/**"];

/// Sections `format` compares before and after regenerating.
const FORMATTED_SECTIONS: [SectionKind; 4] = [
    SectionKind::Template,
    SectionKind::Script,
    SectionKind::Style,
    SectionKind::Definition,
];

/// Command errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Loading, parsing, merging or saving a component failed.
    #[error("{path}: {source}")]
    Component {
        /// The component path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: FileError,
    },

    /// A merge target that is neither a route nor a position.
    #[error(transparent)]
    Target(FileError),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// The parallel check task panicked or was cancelled.
    #[error("check task failed: {0}")]
    Task(String),
}

impl CommandError {
    fn component(path: &Utf8Path) -> impl FnOnce(FileError) -> Self + '_ {
        move |source| Self::Component {
            path: path.to_owned(),
            source,
        }
    }
}

/// Runs the selected subcommand. Returns false when the run should exit
/// with a failure code without being an error.
pub async fn run(args: Args) -> Result<bool, CommandError> {
    let workspace = resolve_workspace(&args.workspace);
    let config = KitConfig::load(&workspace);
    tracing::debug!(%workspace, ?config, "loaded configuration");

    match &args.command {
        Command::Merge(merge_args) => merge(merge_args, &config).await,
        Command::Format(format_args) => format(format_args, &config).await,
        Command::Check(check_args) => check(check_args, &workspace, &config).await,
    }
}

fn resolve_workspace(workspace: &Utf8Path) -> Utf8PathBuf {
    if workspace.is_relative() {
        std::env::current_dir()
            .map(|p| Utf8PathBuf::try_from(p).unwrap_or_default())
            .unwrap_or_default()
            .join(workspace)
    } else {
        workspace.to_owned()
    }
}

async fn open(path: &Utf8Path, config: &KitConfig) -> Result<ComponentFile, CommandError> {
    let mut file = ComponentFile::new(path).map_err(CommandError::component(path))?;
    file.set_tab_length(config.tab_length);
    file.open().await.map_err(CommandError::component(path))?;
    Ok(file)
}

async fn merge(args: &MergeArgs, config: &KitConfig) -> Result<bool, CommandError> {
    let target: MergeTarget = args.target().parse().map_err(CommandError::Target)?;
    let mut host = open(&args.host, config).await?;
    let fragment = open(&args.fragment, config).await?;

    let outcome = host
        .merge(fragment, &target)
        .map_err(CommandError::component(&args.host))?;

    let report = MergeReport {
        host: args.host.clone(),
        fragment: args.fragment.clone(),
        renames: outcome.renames,
        warnings: outcome.warnings,
    };
    let text = Formatter::new(args.output).format_merge(&report);
    if args.dry_run {
        print!("{}", host.generate());
        eprint!("{}", text);
    } else {
        host.save()
            .await
            .map_err(CommandError::component(&args.host))?;
        print!("{}", text);
    }
    Ok(true)
}

fn formatted_sections(file: &ComponentFile) -> Vec<Option<String>> {
    FORMATTED_SECTIONS
        .iter()
        .map(|kind| {
            file.section(*kind)
                .filter(|text| !text.trim().is_empty())
                .map(str::to_owned)
        })
        .collect()
}

async fn format(args: &FormatArgs, config: &KitConfig) -> Result<bool, CommandError> {
    let mut unchanged = true;
    for path in &args.paths {
        let mut file = open(path, config).await?;
        let before = formatted_sections(&file);
        file.parse_all().map_err(CommandError::component(path))?;
        file.generate();
        if formatted_sections(&file) == before {
            tracing::debug!(%path, "already formatted");
            continue;
        }

        if args.check {
            println!("Would reformat {}", path);
            unchanged = false;
        } else {
            file.save().await.map_err(CommandError::component(path))?;
            println!("Formatted {}", path);
        }
    }
    Ok(unchanged)
}

/// Collects component files and directories under `workspace`.
pub fn collect_components(
    workspace: &Utf8Path,
    config: &KitConfig,
    extra_ignores: &[String],
) -> Result<Vec<Utf8PathBuf>, CommandError> {
    let mut ignore_builder = GlobSetBuilder::new();
    for pattern in config.ignore.iter().chain(extra_ignores) {
        let glob = Glob::new(pattern).map_err(|e| CommandError::InvalidGlob(e.to_string()))?;
        ignore_builder.add(glob);
    }
    for pattern in DEFAULT_IGNORES {
        if let Ok(glob) = Glob::new(pattern) {
            ignore_builder.add(glob);
        }
    }
    let ignore_set = ignore_builder
        .build()
        .map_err(|e| CommandError::InvalidGlob(e.to_string()))?;

    let mut components: Vec<Utf8PathBuf> = WalkDir::new(workspace)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| config.is_component_name(p.file_name().unwrap_or("")))
        .filter(|p| !is_composed_index(p, config))
        .filter(|p| {
            let relative = p.strip_prefix(workspace).unwrap_or(p);
            !ignore_set.is_match(relative.as_str())
        })
        .collect();
    components.sort();
    Ok(components)
}

/// `index.vue` inside a component directory belongs to that directory.
fn is_composed_index(path: &Utf8Path, config: &KitConfig) -> bool {
    path.file_name() == Some("index.vue")
        && path
            .parent()
            .and_then(Utf8Path::file_name)
            .is_some_and(|name| config.is_component_name(name))
}

async fn check(
    args: &CheckArgs,
    workspace: &Utf8Path,
    config: &KitConfig,
) -> Result<bool, CommandError> {
    let components = collect_components(workspace, config, &args.ignore)?;
    tracing::debug!(count = components.len(), "collected components");

    let handle = Handle::current();
    let config = config.clone();
    let checked = components.clone();
    let failures: Vec<CheckFailure> = tokio::task::spawn_blocking(move || {
        checked
            .par_iter()
            .filter_map(|path| {
                let result = handle.block_on(async {
                    let mut file = open(path, &config).await?;
                    file.parse_all().map_err(CommandError::component(path))
                });
                result.err().map(|error| CheckFailure {
                    filename: path.clone(),
                    message: match error {
                        CommandError::Component { source, .. } => source.to_string(),
                        other => other.to_string(),
                    },
                })
            })
            .collect()
    })
    .await
    .map_err(|e| CommandError::Task(e.to_string()))?;

    let summary = CheckSummary {
        file_count: components.len(),
        error_count: failures.len(),
    };
    let formatter = Formatter::new(args.output);
    if !failures.is_empty() || args.output == crate::cli::OutputFormat::Json {
        print!("{}", formatter.format_failures(&failures));
    }
    if args.output == crate::cli::OutputFormat::Human {
        println!("{}", summary.format());
    }
    Ok(!summary.has_errors())
}
