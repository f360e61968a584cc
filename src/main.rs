// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use sheetlate::app_config::{self, Config, TranslationProvider};
use sheetlate::app_controller::{Controller, TranslateRequest};
use sheetlate::language_utils;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    #[value(name = "libretranslate", alias = "libre")]
    LibreTranslate,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::LibreTranslate => TranslationProvider::LibreTranslate,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate one column of a spreadsheet into one or more languages
    Translate(TranslateArgs),

    /// Write the example workbook
    Template {
        /// Output file (.xlsx or .csv)
        #[arg(value_name = "OUTPUT", default_value = "template.xlsx")]
        output: PathBuf,
    },

    /// Show the columns and first rows of a spreadsheet
    Columns {
        /// Spreadsheet to inspect
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value_t = 5)]
        rows: usize,
    },

    /// Generate shell completions for sheetlate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Spreadsheet to translate (.csv, .xlsx, .xls, .ods)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Column holding the text to translate
    #[arg(short = 'c', long)]
    column: Option<String>,

    /// Comma separated target languages (e.g. 'es,fr,pt-BR')
    #[arg(short = 't', long)]
    languages: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Output file (default: Translated_<input name> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rows translated concurrently per language
    #[arg(long)]
    concurrency: Option<usize>,

    /// Check that the provider answers before translating
    #[arg(long)]
    check: bool,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// sheetlate - resumable column translation for spreadsheets
#[derive(Parser, Debug)]
#[command(name = "sheetlate")]
#[command(version)]
#[command(about = "Translate spreadsheet columns into several languages")]
#[command(long_about = "sheetlate reads a CSV or Excel file, translates one column into each target
language and writes the result as new columns named <column>_<language>.

Cells that already hold a translation are never touched. Cells that failed are
marked with ERROR_TRANSLATION_FAILED and retried the next time the output file
is translated again.

EXAMPLES:
    sheetlate translate products.xlsx -c description -t es,fr,pt-BR
    sheetlate translate Translated_products.xlsx -c description -t es,fr,pt-BR   # retry failures
    sheetlate translate data.csv -c text -p libretranslate --check
    sheetlate columns products.xlsx
    sheetlate template example.xlsx
    sheetlate completions bash > sheetlate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    google         - Public Google Translate endpoint (default)
    libretranslate - LibreTranslate server (default: http://localhost:5000)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The filter is raised or lowered once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sheetlate", &mut std::io::stdout());
            Ok(())
        }
        Commands::Template { output } => Controller::write_template(&output),
        Commands::Columns { input, rows } => {
            let preview = Controller::preview(&input, rows)?;
            print!("{}", preview);
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

/// Load the config file, creating it with defaults when missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(concurrency) = options.concurrency {
        config.translation.common.concurrent_requests = concurrency;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    // An explicit but blank `-t` is kept so the controller can reject it
    let languages = options.languages.as_deref().map(language_utils::parse_language_list);
    if let Some(languages) = languages.as_ref().filter(|languages| !languages.is_empty()) {
        config.target_languages = languages.clone();
    }

    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    let cancel = controller.cancellation_flag();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if cancel.interrupt() {
                error!("Interrupted again, exiting without saving");
                std::process::exit(130);
            }
            warn!("Interrupted, finishing the current row before saving (press Ctrl-C again to quit)...");
        }
    });

    let report = controller
        .run(TranslateRequest {
            input: options.input,
            source_column: options.column,
            languages,
            output: options.output,
            check_connection: options.check,
        })
        .await?;

    if report.summary.cancelled {
        info!(
            "Partial result saved to {}; run again on it to continue",
            report.output_path.display()
        );
    }
    Ok(())
}
