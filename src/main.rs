// SPDX-License-Identifier: PMPL-1.0-or-later

//! tslingo: inspect, check, merge and query Qt Linguist TS catalogs
//!
//! A command-line companion to lupdate/lrelease for projects that ship
//! TS files: completion statistics, Linguist-style consistency checks,
//! template merges, normalisation and runtime-equivalent lookups.

use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tslingo::check::{self, CheckReport};
use tslingo::config::Config;
use tslingo::locale::{group_separator, is_valid_iso639_1, native_name, LanguageTag};
use tslingo::merge::{self, MergeOptions};
use tslingo::placeholder::{self, Arg};
use tslingo::plural::PluralRule;
use tslingo::report::{self, sarif, ReportFormatter, ReportOutputFormat};
use tslingo::sweep::{self, SweepConfig};
use tslingo::translator::{Translator, TranslatorOptions, TranslatorStack};
use tslingo::ts;
use tslingo::types::{Catalog, Severity};

const LOG_ENV: &str = "TSLINGO_LOG";

#[derive(Parser)]
#[command(name = "tslingo")]
#[command(version)]
#[command(about = "Inspect, check, merge and query Qt Linguist TS catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (default: $TSLINGO_CONFIG, then ./tslingo.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Completion statistics for one catalog
    Stats {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Output format (default from config, or the output file extension)
        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run consistency checks
    Check {
        #[arg(value_name = "CATALOG", required = true)]
        catalogs: Vec<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Emit SARIF 2.1.0 instead of the regular report
        #[arg(long)]
        sarif: bool,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Lowest severity that makes the command fail
        #[arg(long, value_enum)]
        fail_on: Option<SeverityArg>,

        /// Also report unfinished translations as notes
        #[arg(long)]
        unfinished: bool,
    },

    /// Translate one message the way the application would
    Lookup {
        /// Source text as written in the code
        #[arg(value_name = "SOURCE", required_unless_present = "id")]
        source: Option<String>,

        /// Catalogs to install, later ones taking precedence
        #[arg(short = 'f', long = "catalog", value_name = "CATALOG")]
        catalogs: Vec<PathBuf>,

        /// Directory to search for PREFIX_<locale>.ts
        #[arg(long, requires_all = ["prefix", "locale"])]
        dir: Option<PathBuf>,

        #[arg(long)]
        prefix: Option<String>,

        #[arg(long)]
        locale: Option<String>,

        #[arg(short, long, default_value = "")]
        context: String,

        /// Disambiguation comment
        #[arg(short = 'm', long)]
        comment: Option<String>,

        /// Message id instead of context and source
        #[arg(long, conflicts_with = "source")]
        id: Option<String>,

        /// Count for numerus messages
        #[arg(short, long = "count", allow_hyphen_values = true)]
        n: Option<i64>,

        /// Values for %1, %2, ... (integers get digit grouping with %L1)
        #[arg(short, long = "arg", value_name = "VALUE")]
        args: Vec<String>,

        /// Ignore unfinished translations
        #[arg(long)]
        strict: bool,
    },

    /// Update a translated catalog from a freshly extracted template
    Merge {
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Existing translation; created when it does not exist
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Write here instead of updating CATALOG in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Language for a newly created catalog
        #[arg(short, long)]
        language: Option<String>,

        /// Remove messages that left the template
        #[arg(long)]
        drop_obsolete: bool,

        /// Do not reuse translations of identical source texts
        #[arg(long)]
        no_same_text: bool,
    },

    /// Rewrite a catalog in lupdate's layout
    Normalize {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Write here instead of rewriting in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan a directory tree for catalogs
    Scan {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Only list catalogs that are not fully translated
        #[arg(long)]
        incomplete: bool,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print the summary table
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show what tslingo knows about a locale
    Locale {
        #[arg(value_name = "TAG")]
        tag: String,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SeverityArg {
    Note,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Note => Severity::Note,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tslingo=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("tslingo=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, config_path) = Config::load(cli.config.as_deref())?;
    if let Some(path) = &config_path {
        debug!(path = %path.display(), "using configuration");
    }

    match cli.command {
        Commands::Stats {
            catalog,
            format,
            output,
        } => {
            let parsed = ts::read_file(&catalog)
                .with_context(|| format!("reading {}", catalog.display()))?;
            let findings = check::check_catalog(&parsed, &config.checks);
            let report = report::generate(&catalog, &parsed, findings);
            let format = resolve_format(format, output.as_deref(), &config);

            match (format, output) {
                (ReportOutputFormat::Text, None) => report::print_report(&report),
                (ReportOutputFormat::Text, Some(path)) => {
                    bail!("text reports cannot be saved; pick json or yaml for {}", path.display())
                }
                (format, Some(path)) => {
                    report::save_report(&report, &path, format)?;
                    println!("Report saved to: {}", path.display());
                }
                (format, None) => println!("{}", format.serialize(&report)?),
            }
        }

        Commands::Check {
            catalogs,
            format,
            sarif: as_sarif,
            output,
            fail_on,
            unfinished,
        } => {
            let mut checks = config.checks.clone();
            checks.unfinished |= unfinished;
            let fail_on: Severity = fail_on.map(Into::into).unwrap_or(config.fail_on);

            let reports = catalogs
                .iter()
                .map(|path| check::check_file(path, &checks))
                .collect::<Result<Vec<CheckReport>>>()?;

            if as_sarif {
                let json = sarif::to_sarif_json(&reports)?;
                emit(json, output.as_deref())?;
            } else {
                match resolve_format(format, output.as_deref(), &config) {
                    ReportOutputFormat::Text if output.is_some() => {
                        bail!("text reports cannot be saved; pick json, yaml or --sarif")
                    }
                    ReportOutputFormat::Text => {
                        let formatter = ReportFormatter::new();
                        for report in &reports {
                            formatter.print_check(report);
                        }
                    }
                    format => emit(format.serialize(&reports)?, output.as_deref())?,
                }
            }

            let failed = reports
                .iter()
                .filter_map(CheckReport::worst)
                .any(|worst| worst >= fail_on);
            if failed {
                info!(threshold = %fail_on, "findings reached the failure threshold");
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Lookup {
            source,
            catalogs,
            dir,
            prefix,
            locale,
            context,
            comment,
            id,
            n,
            args,
            strict,
        } => {
            let options = TranslatorOptions {
                include_unfinished: config.include_unfinished && !strict,
            };
            let mut stack = TranslatorStack::new();

            if let (Some(dir), Some(prefix), Some(locale)) = (&dir, &prefix, &locale) {
                let tag = LanguageTag::parse(locale).map_err(|e| anyhow!(e))?;
                let (translator, path) = Translator::load_for_locale(dir, prefix, &tag, options)?;
                debug!(path = %path.display(), "locale catalog selected");
                stack.install(translator);
            }
            for path in &catalogs {
                stack.install(Translator::load(path, options)?);
            }
            if stack.is_empty() {
                bail!("no catalog given; pass CATALOG or --dir/--prefix/--locale");
            }

            let text = match (&id, &source) {
                (Some(id), _) => stack
                    .translate_id(id, n)
                    .ok_or_else(|| anyhow!("no translation for id {:?}", id))?,
                (None, Some(source)) => stack.translate(&context, source, comment.as_deref(), n),
                (None, None) => bail!("either SOURCE or --id is required"),
            };

            if args.is_empty() {
                println!("{}", text);
            } else {
                let answered = match (&id, &source) {
                    (Some(id), _) => stack.language_for_id(id, n),
                    (None, Some(source)) => {
                        stack.language_for(&context, source, comment.as_deref(), n)
                    }
                    (None, None) => None,
                };
                let language = answered
                    .cloned()
                    .or_else(|| locale.as_deref().and_then(|l| LanguageTag::parse(l).ok()));
                let values: Vec<Arg> = args.iter().map(|a| parse_arg(a)).collect();
                println!(
                    "{}",
                    placeholder::substitute(&text, &values, group_separator(language.as_ref()))
                );
            }
        }

        Commands::Merge {
            template,
            catalog,
            output,
            language,
            drop_obsolete,
            no_same_text,
        } => {
            let template_catalog = ts::read_file(&template)
                .with_context(|| format!("reading template {}", template.display()))?;
            let existing = if catalog.exists() {
                ts::read_file(&catalog)
                    .with_context(|| format!("reading {}", catalog.display()))?
            } else {
                info!(path = %catalog.display(), "creating new catalog");
                Catalog {
                    language,
                    ..Catalog::default()
                }
            };

            let options = MergeOptions {
                drop_obsolete,
                same_text: !no_same_text,
            };
            let (merged, summary) = merge::merge(&template_catalog, &existing, options);
            let destination = output.unwrap_or(catalog);
            ts::write_file(&merged, &destination)
                .with_context(|| format!("writing {}", destination.display()))?;
            ReportFormatter::new().print_merge(&destination, &summary);
        }

        Commands::Normalize { catalog, output } => {
            let parsed = ts::read_file(&catalog)
                .with_context(|| format!("reading {}", catalog.display()))?;
            let destination = output.unwrap_or(catalog);
            ts::write_file(&parsed, &destination)
                .with_context(|| format!("writing {}", destination.display()))?;
            println!(
                "Normalized {} messages into {}",
                parsed.message_count(),
                destination.display()
            );
        }

        Commands::Scan {
            directory,
            incomplete,
            output,
            quiet,
        } => {
            let sweep_config = SweepConfig {
                directory,
                incomplete_only: incomplete,
                exclude: config.scan.exclude.clone(),
                checks: config.checks.clone(),
            };
            let report = sweep::run(&sweep_config)?;
            sweep::print_summary(&report, quiet);
            if let Some(path) = output {
                sweep::write_report(&report, &path)?;
                println!("Report saved to: {}", path.display());
            }
        }

        Commands::Locale { tag } => {
            let parsed = LanguageTag::parse(&tag).map_err(|e| anyhow!(e))?;
            if is_valid_iso639_1(&parsed.language) {
                println!("Tag: {}", parsed);
            } else {
                println!("Tag: {} ({:?} is not an ISO 639-1 code)", parsed, parsed.language);
            }
            println!("Name: {}", parsed.display_name());
            if let Some(native) = native_name(&parsed.language) {
                println!("Native name: {}", native);
            }
            println!("Catalog suffixes: {}", parsed.fallback_chain().join(", "));
            println!(
                "Digit grouping: {}",
                placeholder::group_digits(1234567, group_separator(Some(&parsed)))
            );
            match PluralRule::for_language(&parsed) {
                Some(rule) => {
                    println!("Plural rule: {:?} ({} forms)", rule, rule.form_count());
                    for (index, name) in rule.form_names().iter().enumerate() {
                        match rule.sample_for_form(index) {
                            Some(sample) => println!("  {}. {} (e.g. n = {})", index + 1, name, sample),
                            None => println!("  {}. {}", index + 1, name),
                        }
                    }
                }
                None => println!("Plural rule: unknown (English rules are used)"),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Explicit flag, then the output file's extension, then the config.
fn resolve_format(
    explicit: Option<ReportOutputFormat>,
    output: Option<&Path>,
    config: &Config,
) -> ReportOutputFormat {
    explicit
        .or_else(|| output.and_then(ReportOutputFormat::from_path))
        .unwrap_or(config.format)
}

fn parse_arg(value: &str) -> Arg {
    match value.parse::<i64>() {
        Ok(number) => Arg::Int(number),
        Err(_) => Arg::Text(value.to_string()),
    }
}

fn emit(body: String, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, body)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        None => println!("{}", body),
    }
    Ok(())
}
