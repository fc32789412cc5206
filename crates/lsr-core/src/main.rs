//! Lymphoid Synoptic Reporter - command line front end
//!
//! Reads structured findings (a findings document and/or `--set`
//! assignments), classifies the DLBCL markers, composes the synoptic report
//! for the selected diagnosis branch, and prints or exports it.

use clap::{Args, CommandFactory, Parser, Subcommand};
use lsr_common::{
    format_error_human, Error, FieldId, FindingsDocument, FindingsSet, OutputFormat,
    StructuredError, SCHEMA_VERSION,
};
use lsr_core::config::{
    load_config, load_settings_from_file, ConfigError, ConfigOptions, ResolvedConfig,
};
use lsr_core::exit_codes::ExitCode;
use lsr_core::log_event;
use lsr_core::logging::{
    event_names, generate_run_id, init_logging, verbosity_level, LogConfig, LogContext, LogFormat,
    Stage,
};
use lsr_core::output::{render_classification, render_fields, render_report, OutputContext};
use lsr_core::schema::{available_schemas, format_schema, generate_all_schemas, generate_schema};
use lsr_core::{classify, FormSession, ReportComposer};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Lymphoid Synoptic Reporter - structured findings to synoptic pathology reports
#[derive(Parser)]
#[command(name = "lsr-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to reporter.json (overrides LSR_CONFIG and the XDG/system lookup)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the synoptic report from findings
    Generate(GenerateArgs),

    /// Classify DLBCL markers (Hans, BCL2/MYC co-expression, hit status)
    Classify(ClassifyArgs),

    /// List the recognized form field keys
    Fields,

    /// Print JSON Schema for input and output documents
    Schema(SchemaArgs),

    /// Settings management
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Generate(_) => "generate",
            Commands::Classify(_) => "classify",
            Commands::Fields => "fields",
            Commands::Schema(_) => "schema",
            Commands::Config(_) => "config",
            Commands::Completions { .. } => "completions",
            Commands::Version => "version",
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Findings document (JSON); "-" reads stdin
    #[arg(long, short = 'i', value_name = "FILE")]
    findings: Option<PathBuf>,

    /// Set a field (key=value or key=value|display text); repeatable
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Export the report to a file (or into a directory)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Findings document (JSON); "-" reads stdin
    #[arg(long, short = 'i', value_name = "FILE")]
    findings: Option<PathBuf>,

    /// CD10 result (positive, negative)
    #[arg(long)]
    cd10: Option<String>,

    /// BCL6 result
    #[arg(long)]
    bcl6: Option<String>,

    /// MUM1 result
    #[arg(long)]
    mum1: Option<String>,

    /// BCL2 result
    #[arg(long)]
    bcl2: Option<String>,

    /// MYC result
    #[arg(long)]
    myc: Option<String>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name (default: FindingsDocument)
    name: Option<String>,

    /// List available schema types
    #[arg(long, conflicts_with_all = ["name", "all"])]
    list: bool,

    /// Print every schema
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved settings and where they came from
    Show,
    /// Validate a settings file (default: the resolved one)
    Validate {
        /// Settings file to validate
        path: Option<PathBuf>,
    },
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    // JSON payloads on stdout pair with JSONL logs on stderr
    let default_log_format = if cli.global.format.is_machine() {
        LogFormat::Jsonl
    } else {
        LogFormat::Human
    };
    let log_config = LogConfig::resolve(
        verbosity_level(cli.global.verbose, cli.global.quiet),
        default_log_format,
    );
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    let span = ctx.run_span();
    let _guard = span.enter();

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "lsr-core started",
        command = cli.command.name()
    );

    let exit_code = match &cli.command {
        Commands::Generate(args) => run_generate(&cli.global, &ctx, args),
        Commands::Classify(args) => run_classify(&cli.global, &ctx, args),
        Commands::Fields => {
            print_payload(render_fields(cli.global.format));
            ExitCode::Clean
        }
        Commands::Schema(args) => run_schema(args),
        Commands::Config(args) => run_config(&cli.global, &ctx, args),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "lsr-core", &mut std::io::stdout());
            ExitCode::Clean
        }
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "lsr-core finished",
        exit_code = exit_code.as_i32() as i64
    );

    std::process::exit(exit_code.as_i32());
}

fn print_payload(payload: Option<String>) {
    if let Some(text) = payload.filter(|t| !t.is_empty()) {
        println!("{}", text);
    }
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_generate(global: &GlobalOpts, ctx: &LogContext, args: &GenerateArgs) -> ExitCode {
    let config = match load_settings(global, ctx) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let findings = match &args.findings {
        Some(path) => match read_findings(path) {
            Ok(findings) => findings,
            Err(e) => return output_error(global, ctx, &e),
        },
        None => FindingsSet::new(),
    };
    log_event!(
        ctx,
        INFO,
        event_names::FINDINGS_LOADED,
        Stage::Load,
        "findings loaded",
        selected = findings.selected_count() as u64,
        assignments = args.set.len() as u64
    );

    let composer = ReportComposer::new(&config.settings);
    let mut session = match FormSession::with_overrides(findings, &args.set, composer) {
        Ok(session) => session.with_export_file_name(config.settings.export.file_name.clone()),
        Err(e) => return output_error(global, ctx, &e),
    };

    let report = match session.generate() {
        Ok(report) => report.clone(),
        Err(e) => return output_error(global, ctx, &e),
    };

    let mut exported_to = None;
    if let Some(target) = &args.output {
        if report.is_empty() {
            log_event!(
                ctx,
                WARN,
                event_names::EXPORT_FAILED,
                Stage::Export,
                "report body is empty; nothing exported"
            );
        } else {
            match session.export(target) {
                Ok(path) => exported_to = Some(path),
                Err(e) => return output_error(global, ctx, &e),
            }
        }
    }

    let out_ctx = OutputContext::new(ctx.run_id.clone(), config.snapshot);
    print_payload(render_report(
        &report,
        exported_to.as_deref(),
        global.format,
        &out_ctx,
    ));

    if report.branch.is_none() {
        ExitCode::IncompleteSelection
    } else {
        ExitCode::Clean
    }
}

fn run_classify(global: &GlobalOpts, ctx: &LogContext, args: &ClassifyArgs) -> ExitCode {
    let mut findings = match &args.findings {
        Some(path) => match read_findings(path) {
            Ok(findings) => findings,
            Err(e) => return output_error(global, ctx, &e),
        },
        None => FindingsSet::new(),
    };

    let overrides = [
        (FieldId::HansCd10, &args.cd10),
        (FieldId::HansBcl6, &args.bcl6),
        (FieldId::HansMum1, &args.mum1),
        (FieldId::Bcl2Status, &args.bcl2),
        (FieldId::MycStatus, &args.myc),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            findings.insert(field, value.as_str());
        }
    }

    let result = classify(&findings);
    log_event!(
        ctx,
        DEBUG,
        event_names::CLASSIFICATION_REFRESHED,
        Stage::Classify,
        "markers classified",
        hit_status = result.hit_status.token()
    );

    let out_ctx = OutputContext::new(ctx.run_id.clone(), lsr_config::ConfigSnapshot::defaults_only());
    print_payload(render_classification(&result, global.format, &out_ctx));
    ExitCode::Clean
}

fn run_schema(args: &SchemaArgs) -> ExitCode {
    if args.list {
        for (name, desc) in available_schemas() {
            println!("{:<22} {}", name, desc);
        }
        return ExitCode::Clean;
    }

    if args.all {
        let all = generate_all_schemas();
        let value = serde_json::to_value(all).unwrap_or_default();
        println!("{}", format_schema(&value));
        return ExitCode::Clean;
    }

    let name = args
        .name
        .as_deref()
        .unwrap_or(lsr_core::schema::DEFAULT_SCHEMA);
    match generate_schema(name) {
        Some(schema) => {
            println!("{}", format_schema(&schema));
            ExitCode::Clean
        }
        None => {
            eprintln!("Unknown schema type: {}", name);
            eprintln!("Use 'lsr-core schema --list' to see available types");
            ExitCode::ArgsError
        }
    }
}

fn run_config(global: &GlobalOpts, ctx: &LogContext, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => {
            let config = match load_settings(global, ctx) {
                Ok(config) => config,
                Err(code) => return code,
            };
            output_config_show(global, &config);
            ExitCode::Clean
        }
        ConfigCommands::Validate { path } => {
            let result = match path {
                Some(path) => load_settings_from_file(path).map(|_| path.display().to_string()),
                None => load_config(&ConfigOptions {
                    settings_path: global.config.clone(),
                })
                .map(|config| describe_source(&config)),
            };
            match result {
                Ok(source) => {
                    match global.format {
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::json!({
                                "schema_version": SCHEMA_VERSION,
                                "status": "valid",
                                "settings": source,
                            })
                        ),
                        OutputFormat::Exitcode => {}
                        _ => println!("Settings valid: {}", source),
                    }
                    ExitCode::Clean
                }
                Err(e) => output_config_error(global, ctx, &e),
            }
        }
    }
}

fn describe_source(config: &ResolvedConfig) -> String {
    match &config.paths.settings {
        Some(path) => format!("{} ({})", path.display(), config.paths.settings_source),
        None => config.paths.settings_source.to_string(),
    }
}

fn output_config_show(global: &GlobalOpts, config: &ResolvedConfig) {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "settings": config.settings,
                "snapshot": config.snapshot,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_default()
            );
        }
        OutputFormat::Summary => {
            println!(
                "settings: {} [{}]",
                describe_source(config),
                config.snapshot.short_id()
            );
        }
        OutputFormat::Exitcode => {}
        _ => {
            println!("# Reporter Settings");
            println!("Source: {}", describe_source(config));
            println!();
            println!("{}", config.settings.to_json().unwrap_or_default());
        }
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "lsr_core_version": env!("CARGO_PKG_VERSION"),
        "config_schema_version": lsr_config::CONFIG_SCHEMA_VERSION,
    });

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&version_info).unwrap_or_default()
            );
        }
        OutputFormat::Exitcode => {}
        _ => {
            println!("lsr-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Read a findings document from a file, or stdin for "-".
fn read_findings(path: &Path) -> Result<FindingsSet, Error> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };

    let doc = FindingsDocument::from_json(&content)?;
    if let Some(version) = doc.schema_version.as_deref().filter(|v| *v != SCHEMA_VERSION) {
        tracing::warn!(
            target: event_names::FINDINGS_LOADED,
            version,
            expected = SCHEMA_VERSION,
            "findings document schema version differs"
        );
    }
    Ok(doc.into_findings())
}

fn load_settings(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, ExitCode> {
    let options = ConfigOptions {
        settings_path: global.config.clone(),
    };
    match load_config(&options) {
        Ok(config) => {
            if config.from_default() {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "no reporter.json found; using built-in settings"
                );
            } else {
                log_event!(
                    ctx,
                    INFO,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "settings loaded",
                    source = %config.paths.settings_source,
                    settings_hash = config.snapshot.short_id()
                );
            }
            Ok(config)
        }
        Err(e) => Err(output_config_error(global, ctx, &e)),
    }
}

fn output_config_error(global: &GlobalOpts, ctx: &LogContext, error: &ConfigError) -> ExitCode {
    log_event!(
        ctx,
        ERROR,
        event_names::CONFIG_ERROR,
        Stage::Init,
        "settings could not be loaded",
        error = %error
    );
    output_error(global, ctx, &Error::from(error))
}

/// Report an error on stderr in the selected format.
fn output_error(global: &GlobalOpts, ctx: &LogContext, error: &Error) -> ExitCode {
    let exit_code = ExitCode::from(error);

    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(error).with_context("exit_code", exit_code.code_name());
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": structured,
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| structured.to_json())
            );
        }
        OutputFormat::Summary => {
            eprintln!("[{}] error: {}", ctx.run_id, error);
        }
        OutputFormat::Exitcode => {}
        _ => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(error, use_color));
        }
    }

    exit_code
}
