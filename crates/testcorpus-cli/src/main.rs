// crates/testcorpus-cli/src/main.rs
// ============================================================================
// Module: Test Corpus CLI Entry Point
// Description: Command dispatcher for corpus statistics and variant workflows.
// Purpose: Provide a safe, localized CLI over the corpus engine.
// Dependencies: clap, serde, serde_json, testcorpus-config, testcorpus-core, thiserror.
// ============================================================================

//! ## Overview
//! The `testcorpus` CLI loads configuration, builds the engine values it
//! describes, and runs one workflow per command: statistics, report updates,
//! and variant reorganize/consolidate. All user-facing strings are routed
//! through the i18n catalog. Results go through an output sink chosen once
//! from `--format`; structured events go to `--event-log`, or to stderr in
//! human mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use testcorpus_cli::i18n::Locale;
use testcorpus_cli::i18n::set_locale;
use testcorpus_cli::output::NO_COLOR_ENV;
use testcorpus_cli::output::OutputMode;
use testcorpus_cli::output::OutputSink;
use testcorpus_cli::output::Style;
use testcorpus_cli::output::stdout_sink;
use testcorpus_cli::output::stdout_supports_color;
use testcorpus_cli::t;
use testcorpus_config::CorpusConfig;
use testcorpus_config::Strategy;
use testcorpus_config::config_toml_example;
use testcorpus_core::Aggregator;
use testcorpus_core::Classifier;
use testcorpus_core::EventSink;
use testcorpus_core::LoadPolicy;
use testcorpus_core::PatchChange;
use testcorpus_core::PatchField;
use testcorpus_core::RecordStoreReader;
use testcorpus_core::ReportPatcher;
use testcorpus_core::Summary;
use testcorpus_core::runtime::CommitReport;
use testcorpus_core::runtime::CorpusRoot;
use testcorpus_core::runtime::FileEventSink;
use testcorpus_core::runtime::NoopEventSink;
use testcorpus_core::runtime::PlanManifest;
use testcorpus_core::runtime::RepartitionPlan;
use testcorpus_core::runtime::StderrEventSink;
use testcorpus_core::runtime::plan_consolidate;
use testcorpus_core::runtime::plan_reorganize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the CLI language.
const LANG_ENV: &str = "TESTCORPUS_LANG";
/// Maximum report file size accepted by `update-report`.
const MAX_REPORT_BYTES: u64 = 4 * 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "testcorpus", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `TESTCORPUS_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Configuration file (overrides `TESTCORPUS_CONFIG` and `testcorpus.toml`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Append JSON-lines events to this file.
    #[arg(long, value_name = "PATH", global = true)]
    event_log: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate corpus statistics.
    Stats(StatsCommand),
    /// Patch the counts embedded in the report file.
    UpdateReport(UpdateReportCommand),
    /// Move tagged records between source and variant directories.
    Variants {
        /// Selected variants subcommand.
        #[command(subcommand)]
        command: VariantsCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Variant subcommands.
#[derive(Subcommand, Debug)]
enum VariantsCommand {
    /// Extract tagged records from the source directory into tag directories.
    Reorganize(VariantsArgs),
    /// Merge tag directories into consolidated files in the source directory.
    Consolidate(VariantsArgs),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print the annotated example configuration.
    Example,
}

/// Output format selection.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    format: FormatArg,
}

/// Arguments for `stats`.
#[derive(Args, Debug)]
struct StatsCommand {
    /// Corpus root (overrides `corpus.root`).
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Classification strategy (overrides `classifier.strategy`).
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Output options.
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for `update-report`.
#[derive(Args, Debug)]
struct UpdateReportCommand {
    /// Corpus root (overrides `corpus.root`).
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Classification strategy (overrides `classifier.strategy`).
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Report file (overrides `report.path`).
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Fail instead of writing when the report is stale.
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,
    /// Output options.
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for variant workflows.
#[derive(Args, Debug)]
struct VariantsArgs {
    /// Variants root (overrides `variants.root`).
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Print the plan manifest without changing files.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Output options.
    #[command(flatten)]
    output: OutputArgs,
}

/// Output format arguments.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum FormatArg {
    /// Styled human-readable output.
    Human,
    /// JSON document on stdout.
    Json,
    /// No stdout output.
    Silent,
}

impl From<FormatArg> for OutputMode {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Human => Self::Human,
            FormatArg::Json => Self::Json,
            FormatArg::Silent => Self::Silent,
        }
    }
}

/// Classification strategy arguments.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum StrategyArg {
    /// File name and description keywords.
    Keyword,
    /// First-record metadata field.
    Feature,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Keyword => Self::Keyword,
            StrategyArg::Feature => Self::Feature,
        }
    }
}

/// Language selection arguments.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    let context = Context {
        config_path: cli.config,
        event_log: cli.event_log,
    };

    match command {
        Commands::Stats(command) => command_stats(&context, &command),
        Commands::UpdateReport(command) => command_update_report(&context, &command),
        Commands::Variants {
            command,
        } => match command {
            VariantsCommand::Reorganize(args) => command_variants(&context, &args, Workflow::Split),
            VariantsCommand::Consolidate(args) => {
                command_variants(&context, &args, Workflow::Merge)
            }
        },
        Commands::Config {
            command,
        } => command_config(&context, &command),
    }
}

/// Global options shared by every command.
struct Context {
    /// Explicit configuration path.
    config_path: Option<PathBuf>,
    /// Event log destination.
    event_log: Option<PathBuf>,
}

impl Context {
    /// Loads the configuration, applying a strategy override.
    fn load_config(&self, strategy: Option<StrategyArg>) -> CliResult<CorpusConfig> {
        let mut config = CorpusConfig::load(self.config_path.as_deref())
            .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
        if let Some(strategy) = strategy {
            config.classifier.strategy = strategy.into();
            config
                .validate()
                .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
        }
        Ok(config)
    }

    /// Builds the event sink for a mode.
    fn event_sink(&self, mode: OutputMode) -> CliResult<Box<dyn EventSink>> {
        if let Some(path) = &self.event_log {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(t!("events.open_failed", path = path.display(), error = err))
            })?;
            return Ok(Box::new(sink));
        }
        match mode {
            OutputMode::Human => Ok(Box::new(StderrEventSink)),
            OutputMode::Json | OutputMode::Silent => Ok(Box::new(NoopEventSink)),
        }
    }
}

/// Shows the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Resolves the CLI locale from the flag or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Statistics Commands
// ============================================================================

/// Summary computed for `stats` and `update-report`.
struct StatsRun {
    /// Aggregated summary.
    summary: Summary,
    /// Containers skipped under the skip policy.
    skipped: usize,
    /// Active classifier.
    classifier: Box<dyn Classifier>,
}

/// Loads the corpus and aggregates it.
fn collect_stats(
    config: &CorpusConfig,
    root: Option<&Path>,
    events: &dyn EventSink,
) -> CliResult<StatsRun> {
    let classifier = config
        .classifier
        .build()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let root = root.map_or_else(|| config.corpus_root(), Path::to_path_buf);
    let reader = RecordStoreReader::open(&root, config.corpus.reader_options()).map_err(|err| {
        CliError::new(t!("corpus.open_failed", path = root.display(), error = err))
    })?;
    let loaded = reader
        .load_all(LoadPolicy::SkipInvalid, events)
        .map_err(|err| CliError::new(t!("corpus.load_failed", error = err)))?;
    let summary = Aggregator::new(classifier.as_ref(), events).aggregate(&loaded.containers);
    Ok(StatsRun {
        summary,
        skipped: loaded.skipped.len(),
        classifier,
    })
}

/// Executes `stats`.
fn command_stats(context: &Context, command: &StatsCommand) -> CliResult<ExitCode> {
    let mode = OutputMode::from(command.output.format);
    let config = context.load_config(command.strategy)?;
    let events = context.event_sink(mode)?;
    let run = collect_stats(&config, command.root.as_deref(), events.as_ref())?;
    let mut sink = stdout_sink(mode, color_enabled());

    let bytes = run
        .summary
        .to_json_bytes()
        .map_err(|err| CliError::new(t!("output.render_failed", error = err)))?;
    write_summary_lines(sink.as_mut(), &run)?;
    emit_json(sink.as_mut(), mode, &bytes)?;
    Ok(ExitCode::SUCCESS)
}

/// Writes the human summary.
fn write_summary_lines(sink: &mut dyn OutputSink, run: &StatsRun) -> CliResult<()> {
    let summary = &run.summary;
    emit(sink, Style::Heading, &t!("stats.header", structure = summary.structure))?;
    for (_, tally) in summary.categories() {
        emit(
            sink,
            Style::Plain,
            &t!(
                "stats.category",
                label = tally.label,
                tests = tally.total,
                files = tally.files.len()
            ),
        )?;
    }
    emit(
        sink,
        Style::Success,
        &t!("stats.total", tests = summary.total_tests, files = summary.total_files),
    )?;
    if run.skipped > 0 {
        emit(sink, Style::Warning, &t!("stats.skipped", count = run.skipped))?;
    }
    let digest = summary
        .digest()
        .map_err(|err| CliError::new(t!("output.render_failed", error = err)))?;
    emit(sink, Style::Plain, &t!("stats.digest", digest = digest.value))
}

/// JSON result of `update-report`.
#[derive(Serialize)]
struct ReportUpdateOutput<'a> {
    /// Report path.
    report: String,
    /// Whether any field differed.
    changed: bool,
    /// Whether the file was rewritten.
    written: bool,
    /// Applied changes.
    changes: &'a [PatchChange],
    /// Fields whose pattern was not found.
    unmatched: &'a [PatchField],
    /// Summary totals.
    total_tests: usize,
    /// Contributing container count.
    total_files: usize,
}

/// Executes `update-report`.
fn command_update_report(context: &Context, command: &UpdateReportCommand) -> CliResult<ExitCode> {
    let mode = OutputMode::from(command.output.format);
    let config = context.load_config(command.strategy)?;
    let events = context.event_sink(mode)?;
    let run = collect_stats(&config, command.root.as_deref(), events.as_ref())?;
    let report_path = command.report.clone().unwrap_or_else(|| config.report_path());
    let text = read_report(&report_path)?;
    let patcher = config
        .report
        .patcher(run.classifier.as_ref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let outcome = patcher
        .patch(&text, &run.summary)
        .map_err(|err| CliError::new(t!("report.patch_failed", error = err)))?;

    let written = outcome.changed() && !command.check;
    if written {
        write_report(&report_path, outcome.text.as_bytes())?;
    }

    let mut sink = stdout_sink(mode, color_enabled());
    for change in &outcome.changes {
        emit(
            sink.as_mut(),
            Style::Plain,
            &t!(
                "report.change",
                field = change.field,
                previous = change.previous,
                current = change.current
            ),
        )?;
    }
    for field in &outcome.unmatched {
        emit(sink.as_mut(), Style::Warning, &t!("report.unmatched", field = field))?;
    }
    let path_label = report_path.display().to_string();
    let status = if !outcome.changed() {
        t!("report.up_to_date", path = path_label)
    } else if written {
        t!("report.updated", path = path_label, count = outcome.changes.len())
    } else {
        t!("report.stale", path = path_label, count = outcome.changes.len())
    };
    let style = if outcome.changed() && !written { Style::Warning } else { Style::Success };
    emit(sink.as_mut(), style, &status)?;

    let document = ReportUpdateOutput {
        report: path_label,
        changed: outcome.changed(),
        written,
        changes: &outcome.changes,
        unmatched: &outcome.unmatched,
        total_tests: run.summary.total_tests,
        total_files: run.summary.total_files,
    };
    emit_json(sink.as_mut(), mode, &render_json(&document)?)?;

    if command.check && outcome.changed() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Reads the report file with a size limit.
fn read_report(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path).map_err(|err| {
        CliError::new(t!("report.read_failed", path = path.display(), error = err))
    })?;
    if metadata.len() > MAX_REPORT_BYTES {
        return Err(CliError::new(t!(
            "input.read_too_large",
            path = path.display(),
            size = metadata.len(),
            limit = MAX_REPORT_BYTES
        )));
    }
    fs::read_to_string(path).map_err(|err| {
        CliError::new(t!("report.read_failed", path = path.display(), error = err))
    })
}

/// Atomically replaces the report file.
fn write_report(path: &Path, bytes: &[u8]) -> CliResult<()> {
    let failed = |error: String| {
        CliError::new(t!("report.write_failed", path = path.display(), error = error))
    };
    let file_name = path.file_name().ok_or_else(|| failed(t!("report.missing_file_name")))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let root = CorpusRoot::open(parent).map_err(|err| failed(err.to_string()))?;
    root.write_atomic(Path::new(file_name), bytes).map_err(|err| failed(err.to_string()))
}

// ============================================================================
// SECTION: Variant Commands
// ============================================================================

/// Variant workflow selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Workflow {
    /// Reorganize (extract tagged records).
    Split,
    /// Consolidate (merge tag directories).
    Merge,
}

/// JSON result of a variant workflow.
#[derive(Serialize)]
struct VariantsOutput {
    /// Whether the plan was only printed.
    dry_run: bool,
    /// Planned changes.
    plan: PlanManifest,
    /// Commit outcome when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    committed: Option<CommitReport>,
}

/// Executes `variants reorganize` or `variants consolidate`.
fn command_variants(
    context: &Context,
    args: &VariantsArgs,
    workflow: Workflow,
) -> CliResult<ExitCode> {
    let mode = OutputMode::from(args.output.format);
    let config = context.load_config(None)?;
    let events = context.event_sink(mode)?;
    let layout = config
        .variants
        .layout()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let root = args.root.clone().unwrap_or_else(|| config.variants_root());
    let reader = RecordStoreReader::open(&root, config.corpus.reader_options()).map_err(|err| {
        CliError::new(t!("corpus.open_failed", path = root.display(), error = err))
    })?;
    let plan = match workflow {
        Workflow::Split => plan_reorganize(&reader, &layout, events.as_ref()),
        Workflow::Merge => plan_consolidate(&reader, &layout, events.as_ref()),
    }
    .map_err(|err| CliError::new(t!("variants.plan_failed", error = err)))?;

    let mut sink = stdout_sink(mode, color_enabled());
    write_plan_lines(sink.as_mut(), &plan)?;
    if args.dry_run {
        emit(sink.as_mut(), Style::Heading, &t!("variants.dry_run"))?;
        let manifest = plan
            .manifest_json_bytes()
            .map_err(|err| CliError::new(t!("output.render_failed", error = err)))?;
        sink.json(&manifest).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let committed = if plan.is_empty() {
        emit(sink.as_mut(), Style::Success, &t!("variants.nothing_to_do"))?;
        None
    } else {
        let report = plan
            .commit(reader.root(), events.as_ref())
            .map_err(|err| CliError::new(t!("variants.commit_failed", error = err)))?;
        for dir in &report.retained_dirs {
            emit(sink.as_mut(), Style::Warning, &t!("variants.retained", path = dir))?;
        }
        emit(
            sink.as_mut(),
            Style::Success,
            &t!(
                "variants.committed",
                written = report.written,
                files = report.removed_files,
                dirs = report.removed_dirs
            ),
        )?;
        Some(report)
    };
    let document = VariantsOutput {
        dry_run: false,
        plan: plan.manifest(),
        committed,
    };
    emit_json(sink.as_mut(), mode, &render_json(&document)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Writes one line per planned change.
fn write_plan_lines(sink: &mut dyn OutputSink, plan: &RepartitionPlan) -> CliResult<()> {
    for write in &plan.writes {
        emit(
            sink,
            Style::Plain,
            &t!("variants.write", path = write.path.display(), records = write.records),
        )?;
    }
    for removal in &plan.removals {
        emit(sink, Style::Plain, &t!("variants.remove", path = removal.path.display()))?;
    }
    for dropped in &plan.dropped {
        emit(
            sink,
            Style::Warning,
            &t!("variants.dropped", container = dropped.container, count = dropped.positions.len()),
        )?;
    }
    for mismatch in &plan.schema_mismatches {
        emit(
            sink,
            Style::Warning,
            &t!(
                "variants.schema_mismatch",
                container = mismatch.container,
                expected = mismatch.expected,
                found = mismatch.found
            ),
        )?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes config subcommands.
fn command_config(context: &Context, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            let config = context.load_config(None)?;
            let message = config.source.as_ref().map_or_else(
                || t!("config.validate.defaults"),
                |path| t!("config.validate.ok", path = path.display()),
            );
            write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes the JSON document when the mode is JSON.
fn emit_json(sink: &mut dyn OutputSink, mode: OutputMode, bytes: &[u8]) -> CliResult<()> {
    if mode != OutputMode::Json {
        return Ok(());
    }
    sink.json(bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a styled line through a sink.
fn emit(sink: &mut dyn OutputSink, style: Style, text: &str) -> CliResult<()> {
    sink.line(style, text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Renders a JSON document with a trailing newline.
fn render_json<T: Serialize>(value: &T) -> CliResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| CliError::new(t!("output.render_failed", error = err)))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Returns true when stdout styling is enabled.
fn color_enabled() -> bool {
    let no_color = std::env::var(NO_COLOR_ENV).ok();
    stdout_supports_color(no_color.as_deref())
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
