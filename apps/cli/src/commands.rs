//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use deckwright_analysis::{analyze_document, suggest_card_count};
use deckwright_core::{
    CourseOptions, DEFAULT_MAX_CARDS, JsonExportSink, ProgressReporter, QcmOptions,
    StaticCatalog, TextOptions, build_notes, generate_cloze_cards, generate_course_cards,
    generate_qcm_cards, generate_text_cards, submit_cards,
};
use deckwright_render::check_payload;
use deckwright_shared::{
    AppConfig, CardKind, CardPayload, Language, init_config, load_config, load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Deckwright: turn documents into flashcards.
#[derive(Parser)]
#[command(
    name = "deckwright",
    version,
    about = "Generate flashcards from multiple-choice quizzes and course material.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.deckwright/deckwright.toml.
    #[arg(long, global = true, env = "DECKWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Options shared by the card-generating subcommands.
#[derive(clap::Args)]
pub(crate) struct OutputArgs {
    /// Target deck (defaults to the configured deck).
    #[arg(short, long)]
    pub deck: Option<String>,

    /// Extra tags, comma-separated.
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Write store-ready notes to this JSON file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Turn a multiple-choice quiz into basic cards.
    Qcm {
        /// Text file holding the extracted quiz.
        file: PathBuf,

        /// Language of the answer lines: fr, en, or es.
        #[arg(short, long)]
        language: Option<Language>,

        /// Keep only the first N questions.
        #[arg(long)]
        max_questions: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Turn course material into basic and cloze cards.
    Course {
        /// Text file holding the extracted course.
        file: PathBuf,

        /// Let the advisor pick the number of cards.
        #[arg(long)]
        auto_count: bool,

        /// Number of cards when not auto-counting.
        #[arg(long)]
        max_cards: Option<usize>,

        /// Use the preferred kind instead of mixing basic and cloze.
        #[arg(long)]
        no_mix: bool,

        /// Preferred card kind: basic or cloze.
        #[arg(long)]
        preferred_kind: Option<CardKind>,

        /// Page count reported by the text extractor.
        #[arg(long)]
        pages: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Suggest cards sentence by sentence from free prose.
    Text {
        /// Text file to read.
        file: PathBuf,

        /// Card kind: basic or cloze.
        #[arg(short, long, default_value = "basic")]
        kind: CardKind,

        /// Maximum number of cards.
        #[arg(long, default_value_t = DEFAULT_MAX_CARDS)]
        max_cards: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Hide chosen terms as cloze deletions, one card per term.
    Cloze {
        /// Text file to read.
        file: PathBuf,

        /// Terms to hide, comma-separated. Detected from the text when omitted.
        #[arg(long, value_delimiter = ',')]
        hints: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the document analysis and the suggested card count.
    Analyze {
        /// Text file to analyze.
        file: PathBuf,

        /// Page count reported by the text extractor.
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "deckwright=info",
        1 => "deckwright=debug",
        _ => "deckwright=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Qcm {
            file,
            language,
            max_questions,
            output,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_qcm(&config, &file, language, max_questions, &output).await
        }
        Command::Course {
            file,
            auto_count,
            max_cards,
            no_mix,
            preferred_kind,
            pages,
            output,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            let options = CourseOptions {
                auto_count: auto_count || config.course.auto_count,
                max_cards: Some(max_cards.unwrap_or(config.course.max_cards)),
                mix_types: !no_mix && config.defaults.mix_types,
                preferred_kind: preferred_kind.unwrap_or(config.defaults.preferred_kind),
                max_concepts: config.defaults.max_concepts,
                estimated_page_count: pages,
            };
            cmd_course(&config, &file, &options, &output).await
        }
        Command::Text {
            file,
            kind,
            max_cards,
            output,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            let options = TextOptions { kind, max_cards };
            cmd_text(&config, &file, &options, &output).await
        }
        Command::Cloze {
            file,
            hints,
            output,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_cloze(&config, &file, &hints, &output).await
        }
        Command::Analyze { file, pages } => cmd_analyze(&file, pages).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path.as_deref()).await,
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn read_source(file: &Path) -> Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .wrap_err_with(|| format!("failed to read '{}'", file.display()))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_qcm(
    config: &AppConfig,
    file: &Path,
    language: Option<Language>,
    max_questions: Option<usize>,
    output: &OutputArgs,
) -> Result<()> {
    let text = read_source(file).await?;
    let options = QcmOptions {
        language: language.unwrap_or(config.defaults.language),
        max_questions: max_questions.or(config.qcm.max_questions),
    };
    info!(file = %file.display(), language = %options.language, "generating QCM cards");

    let reporter = CliProgress::new();
    let run = generate_qcm_cards(&text, &options, &reporter)?;

    let cards: Vec<CardPayload> = run.cards.iter().map(|q| q.card.clone()).collect();
    let exported = export_cards(
        config,
        &text,
        &cards,
        output,
        [config.qcm.tag.clone()],
    )?;

    let rendered: Vec<serde_json::Value> = run
        .cards
        .iter()
        .map(|q| {
            json!({
                "number": q.number,
                "correct_answers": q.correct_answers,
                "card": q.card,
                "quality": check_payload(&q.card),
            })
        })
        .collect();

    print_json(&json!({
        "questions_found": run.questions_found,
        "cards_created": rendered.len(),
        "cards": rendered,
        "export": exported,
    }))
}

async fn cmd_course(
    config: &AppConfig,
    file: &Path,
    options: &CourseOptions,
    output: &OutputArgs,
) -> Result<()> {
    let text = read_source(file).await?;
    info!(
        file = %file.display(),
        auto_count = options.auto_count,
        mix_types = options.mix_types,
        "generating course cards"
    );

    let reporter = CliProgress::new();
    let run = generate_course_cards(&text, options, &reporter)?;

    let exported = export_cards(
        config,
        &text,
        &run.cards,
        output,
        config.course.tags.iter().cloned(),
    )?;

    let rendered: Vec<serde_json::Value> = run
        .cards
        .iter()
        .map(|card| json!({ "card": card, "quality": check_payload(card) }))
        .collect();

    print_json(&json!({
        "analysis": run.analysis,
        "suggestion": run.suggestion,
        "cards_created": rendered.len(),
        "cards": rendered,
        "export": exported,
    }))
}

async fn cmd_text(
    config: &AppConfig,
    file: &Path,
    options: &TextOptions,
    output: &OutputArgs,
) -> Result<()> {
    let text = read_source(file).await?;
    info!(file = %file.display(), kind = %options.kind, "suggesting cards from text");

    let reporter = CliProgress::new();
    let suggested = generate_text_cards(&text, options, &reporter)?;

    let cards: Vec<CardPayload> = suggested.iter().map(|s| s.card.clone()).collect();
    let exported = export_cards(config, &text, &cards, output, std::iter::empty())?;

    let rendered: Vec<serde_json::Value> = suggested
        .iter()
        .map(|s| {
            json!({
                "card": s.card,
                "source": s.source,
                "quality": check_payload(&s.card),
            })
        })
        .collect();

    print_json(&json!({
        "cards_created": rendered.len(),
        "cards": rendered,
        "export": exported,
    }))
}

async fn cmd_cloze(
    config: &AppConfig,
    file: &Path,
    hints: &[String],
    output: &OutputArgs,
) -> Result<()> {
    let text = read_source(file).await?;
    info!(file = %file.display(), hints = hints.len(), "building cloze cards");

    let reporter = CliProgress::new();
    let hidden = generate_cloze_cards(&text, hints, &reporter)?;

    let cards: Vec<CardPayload> = hidden.iter().map(|h| h.card.clone()).collect();
    let exported = export_cards(config, &text, &cards, output, std::iter::empty())?;

    let rendered: Vec<serde_json::Value> = hidden
        .iter()
        .map(|h| {
            json!({
                "card": h.card,
                "hidden_term": h.hidden_term,
                "quality": check_payload(&h.card),
            })
        })
        .collect();

    print_json(&json!({
        "cards_created": rendered.len(),
        "cards": rendered,
        "export": exported,
    }))
}

async fn cmd_analyze(file: &Path, pages: Option<usize>) -> Result<()> {
    let text = read_source(file).await?;
    let analysis = analyze_document(&text, pages);
    let suggestion = suggest_card_count(&analysis);

    print_json(&json!({
        "analysis": analysis,
        "suggestion": suggestion,
    }))
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Validate and write notes when `--export` was given.
fn export_cards(
    config: &AppConfig,
    source_text: &str,
    cards: &[CardPayload],
    output: &OutputArgs,
    mode_tags: impl IntoIterator<Item = String>,
) -> Result<Option<serde_json::Value>> {
    let Some(path) = &output.export else {
        return Ok(None);
    };

    let deck = output.deck.as_deref().unwrap_or(&config.defaults.deck);
    let mut tags: Vec<String> = Vec::new();
    for tag in config
        .defaults
        .tags
        .iter()
        .cloned()
        .chain(mode_tags)
        .chain(output.tags.iter().cloned())
    {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let notes = build_notes(cards, deck, &tags, &config.models);
    let catalog = StaticCatalog::from_models(deck, &config.models);
    let mut sink = JsonExportSink::new(path, deck, source_text);
    let summary = submit_cards(&mut sink, &catalog, &notes, deck)?;

    info!(path = %path.display(), created = summary.created, "notes exported");
    Ok(Some(json!({
        "path": path,
        "deck": deck,
        "summary": summary,
    })))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn card_rendered(&self, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering cards [{current}/{total}]"));
    }

    fn done(&self, _cards: usize) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Error paths never reach `done`.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
