//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use esgtracker_extractor::{ExtractProgress, extract_batch, merge_metrics};
use esgtracker_ontology::{NewOntologyEntry, build_entry, suggest, topic_options};
use esgtracker_shared::{
    AppConfig, Category, Framework, MetricRecord, OntologyEntry, TablePaths, TaxonomyEntry,
    init_config, load_config, phrase_list, retain_matching,
};
use esgtracker_taxonomy::{TaxonomyOverride, apply_override, reconcile, retain_category};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// EsgTracker — track ESG disclosures across reporting frameworks.
#[derive(Parser)]
#[command(
    name = "esgtracker",
    version,
    about = "Extract ESG disclosures from reports into a metrics table, curate a taxonomy, and build a cross-framework ontology.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Directory holding the CSV tables (overrides the configured data_dir).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Output format for list/view commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract disclosures from report files into the metrics table.
    Extract {
        /// Report files to process (.pdf, .txt), in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Metrics table operations.
    Metrics {
        #[command(subcommand)]
        action: MetricsAction,
    },

    /// Taxonomy operations.
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Ontology operations.
    Ontology {
        #[command(subcommand)]
        action: OntologyAction,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Metrics subcommands.
#[derive(Subcommand)]
pub(crate) enum MetricsAction {
    /// List the persisted metrics table.
    List {
        /// Filter by framework id prefix (GRI, BRSR, or SASB).
        #[arg(long)]
        framework: Option<Framework>,

        /// Keep only rows containing this keyword (case-insensitive).
        #[arg(short, long)]
        keyword: Option<String>,

        /// Output format.
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Delete the metrics table file. Irreversible; taxonomy is not touched.
    Delete,
}

/// Taxonomy subcommands.
#[derive(Subcommand)]
pub(crate) enum TaxonomyAction {
    /// Recompute and display the taxonomy without saving it.
    View {
        /// Keep only rows whose effective category matches exactly.
        #[arg(long)]
        category: Option<Category>,

        /// Keep only rows containing this keyword (case-insensitive).
        #[arg(short, long)]
        keyword: Option<String>,

        /// Output format.
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Recompute the taxonomy and rewrite its file.
    Save,

    /// Set or clear a manual category override on taxonomy rows.
    Override {
        /// Metric id to override (all matching rows unless --description).
        #[arg(long)]
        metric_id: String,

        /// Narrow the override to one (metric id, description) pair.
        #[arg(long)]
        description: Option<String>,

        /// Manual category to set.
        #[arg(long)]
        category: Option<Category>,

        /// Manual subcategory to set (requires --category).
        #[arg(long)]
        subcategory: Option<String>,

        /// Remove the manual override instead of setting one.
        #[arg(long, conflicts_with_all = ["category", "subcategory"])]
        clear: bool,
    },

    /// Delete the taxonomy table file. Irreversible.
    Delete,
}

/// Ontology subcommands.
#[derive(Subcommand)]
pub(crate) enum OntologyAction {
    /// Append one entry to the ontology table and save it.
    Add {
        /// Canonical topic: a taxonomy subcategory when any exist, free text
        /// otherwise.
        topic: String,

        /// Synonym for the topic (repeatable).
        #[arg(long = "synonym")]
        synonyms: Vec<String>,

        /// Related phrase (repeatable).
        #[arg(long = "related")]
        related_phrases: Vec<String>,

        /// GRI metric id cross-reference.
        #[arg(long)]
        gri_id: Option<String>,

        /// BRSR metric id cross-reference.
        #[arg(long)]
        brsr_id: Option<String>,

        /// SASB metric id cross-reference.
        #[arg(long)]
        sasb_id: Option<String>,
    },

    /// List the persisted ontology table.
    List {
        /// Keep only rows containing this keyword (case-insensitive).
        #[arg(short, long)]
        keyword: Option<String>,

        /// Output format.
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// List the canonical topic options (taxonomy subcategories).
    Topics,

    /// Show synonym suggestions and matching metrics for a topic.
    Suggest {
        /// Topic to look up in the metrics table.
        topic: String,
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

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "esgtracker=info",
        1 => "esgtracker=debug",
        _ => "esgtracker=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let paths = TablePaths::resolve(&config, cli.data_dir.as_deref());

    match cli.command {
        Command::Extract { files } => cmd_extract(&paths, &files),
        Command::Metrics { action } => match action {
            MetricsAction::List {
                framework,
                keyword,
                format,
            } => cmd_metrics_list(&paths, &config, framework, keyword.as_deref(), format),
            MetricsAction::Delete => cmd_delete(&paths.metrics, "metrics"),
        },
        Command::Taxonomy { action } => match action {
            TaxonomyAction::View {
                category,
                keyword,
                format,
            } => cmd_taxonomy_view(&paths, &config, category, keyword.as_deref(), format),
            TaxonomyAction::Save => cmd_taxonomy_save(&paths),
            TaxonomyAction::Override {
                metric_id,
                description,
                category,
                subcategory,
                clear,
            } => cmd_taxonomy_override(
                &paths,
                &metric_id,
                description.as_deref(),
                category,
                subcategory,
                clear,
            ),
            TaxonomyAction::Delete => cmd_delete(&paths.taxonomy, "taxonomy"),
        },
        Command::Ontology { action } => match action {
            OntologyAction::Add {
                topic,
                synonyms,
                related_phrases,
                gri_id,
                brsr_id,
                sasb_id,
            } => cmd_ontology_add(
                &paths,
                NewOntologyEntry {
                    canonical_topic: topic,
                    synonyms,
                    related_phrases,
                    gri_id,
                    brsr_id,
                    sasb_id,
                },
            ),
            OntologyAction::List { keyword, format } => {
                cmd_ontology_list(&paths, &config, keyword.as_deref(), format)
            }
            OntologyAction::Topics => cmd_ontology_topics(&paths),
            OntologyAction::Suggest { topic } => cmd_ontology_suggest(&paths, &topic),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Pick the output format: flag wins, then the configured default.
fn resolve_format(flag: Option<OutputFormat>, config: &AppConfig) -> OutputFormat {
    flag.unwrap_or(match config.defaults.format.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        _ => OutputFormat::Table,
    })
}

// ---------------------------------------------------------------------------
// Extract
// ---------------------------------------------------------------------------

fn cmd_extract(paths: &TablePaths, files: &[PathBuf]) -> Result<()> {
    info!(files = files.len(), "extracting disclosures");

    let reporter = CliProgress::new();
    let outcome = extract_batch(files, &reporter);
    reporter.finish();

    for failure in &outcome.failures {
        println!("  Warning: failed to read {}: {}", failure.file, failure.reason);
    }

    if outcome.records.is_empty() {
        println!("  No ESG metrics found in the supplied documents.");
        return Ok(());
    }

    let existing = esgtracker_store::load_metrics(&paths.metrics)?;
    let before = existing.len();
    let merged = merge_metrics(existing, outcome.records);
    esgtracker_store::save_metrics(&paths.metrics, &merged)?;

    println!();
    println!("  Metrics extracted and saved.");
    println!("  Documents: {}", files.len());
    println!("  New rows:  {}", merged.len() - before);
    println!("  Total:     {}", merged.len());
    println!("  Table:     {}", paths.metrics.display());
    println!();

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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ExtractProgress for CliProgress {
    fn document_started(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Scanning [{current}/{total}] {name}"));
    }

    fn document_finished(&self, name: &str, records: usize) {
        self.spinner
            .set_message(format!("Scanned {name}: {records} disclosures"));
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

fn cmd_metrics_list(
    paths: &TablePaths,
    config: &AppConfig,
    framework: Option<Framework>,
    keyword: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let mut rows = esgtracker_store::load_metrics(&paths.metrics)?;
    let total = rows.len();

    if let Some(framework) = framework {
        rows.retain(|r| r.metric_id.starts_with(framework.prefix()));
    }
    if let Some(keyword) = keyword {
        retain_matching(&mut rows, keyword);
    }

    match resolve_format(format, config) {
        OutputFormat::Table => {
            println!("  Total extracted metrics: {total}");
            print_table(
                &esgtracker_store::METRICS_HEADER,
                rows.iter().map(metric_cells).collect(),
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            print_csv(&esgtracker_store::METRICS_HEADER, &rows)?;
        }
    }

    Ok(())
}

fn metric_cells(record: &MetricRecord) -> Vec<String> {
    vec![
        record.metric_id.clone(),
        record.description.clone(),
        record.unit.clone(),
        record.sector_applicability.clone(),
        record.source.clone(),
    ]
}

fn cmd_delete(path: &std::path::Path, table: &str) -> Result<()> {
    let existed = path.exists();
    esgtracker_store::delete_table(path)?;
    if existed {
        println!("  Deleted {table} table: {}", path.display());
    } else {
        println!("  No {table} table at {}; nothing to delete.", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Load and reconcile the taxonomy against the current metrics table.
fn reconciled_taxonomy(paths: &TablePaths) -> Result<Vec<TaxonomyEntry>> {
    let metrics = esgtracker_store::load_metrics(&paths.metrics)?;
    let previous = esgtracker_store::load_taxonomy(&paths.taxonomy)?;
    Ok(reconcile(&metrics, &previous))
}

fn cmd_taxonomy_view(
    paths: &TablePaths,
    config: &AppConfig,
    category: Option<Category>,
    keyword: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let mut rows = reconciled_taxonomy(paths)?;

    if rows.is_empty() {
        println!("  No metrics available. Extract reports first.");
        return Ok(());
    }

    if let Some(category) = category {
        retain_category(&mut rows, category);
    }
    if let Some(keyword) = keyword {
        retain_matching(&mut rows, keyword);
    }

    match resolve_format(format, config) {
        OutputFormat::Table => {
            // The table shows effective values; manual overrides win.
            print_table(
                &["Metric ID", "Description", "Category", "Subcategory"],
                rows.iter()
                    .map(|e| {
                        vec![
                            e.metric_id.clone(),
                            e.description.clone(),
                            e.effective_category().to_string(),
                            e.effective_subcategory().to_string(),
                        ]
                    })
                    .collect(),
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            print_csv(&esgtracker_store::TAXONOMY_HEADER, &rows)?;
        }
    }

    Ok(())
}

fn cmd_taxonomy_save(paths: &TablePaths) -> Result<()> {
    let rows = reconciled_taxonomy(paths)?;
    esgtracker_store::save_taxonomy(&paths.taxonomy, &rows)?;
    println!("  Taxonomy saved: {} rows -> {}", rows.len(), paths.taxonomy.display());
    Ok(())
}

fn cmd_taxonomy_override(
    paths: &TablePaths,
    metric_id: &str,
    description: Option<&str>,
    category: Option<Category>,
    subcategory: Option<String>,
    clear: bool,
) -> Result<()> {
    let action = if clear {
        TaxonomyOverride::Clear
    } else {
        let category =
            category.ok_or_else(|| eyre!("pass --category <CATEGORY> or --clear"))?;
        TaxonomyOverride::Set {
            category,
            subcategory,
        }
    };

    let mut rows = reconciled_taxonomy(paths)?;
    let changed = apply_override(&mut rows, metric_id, description, &action)?;
    esgtracker_store::save_taxonomy(&paths.taxonomy, &rows)?;

    println!("  Override applied to {changed} row(s); taxonomy saved.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Ontology
// ---------------------------------------------------------------------------

fn cmd_ontology_add(paths: &TablePaths, input: NewOntologyEntry) -> Result<()> {
    let taxonomy = esgtracker_store::load_taxonomy(&paths.taxonomy)?;
    let topics = topic_options(&taxonomy);

    let entry = build_entry(input, &topics)?;

    // Advisory suggestions; they never gate the entry.
    let metrics = esgtracker_store::load_metrics(&paths.metrics)?;
    let suggestions = suggest(&metrics, &entry.canonical_topic);
    if !suggestions.synonyms.is_empty() {
        println!("  Suggested synonyms/related phrases:");
        for synonym in &suggestions.synonyms {
            println!("    - {synonym}");
        }
        println!("  Matching metric ids:");
        for record in &suggestions.matches {
            println!("    - {} -> {}", record.metric_id, record.description);
        }
    }

    let mut table = esgtracker_store::load_ontology(&paths.ontology)?;
    esgtracker_ontology::append(&mut table, entry);
    esgtracker_store::save_ontology(&paths.ontology, &table)?;

    println!("  Ontology entry added ({} total).", table.len());
    Ok(())
}

fn cmd_ontology_list(
    paths: &TablePaths,
    config: &AppConfig,
    keyword: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let mut rows = esgtracker_store::load_ontology(&paths.ontology)?;

    if let Some(keyword) = keyword {
        retain_matching(&mut rows, keyword);
    }

    match resolve_format(format, config) {
        OutputFormat::Table => {
            print_table(
                &esgtracker_store::ONTOLOGY_HEADER,
                rows.iter().map(ontology_cells).collect(),
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            print_csv(&esgtracker_store::ONTOLOGY_HEADER, &rows)?;
        }
    }

    Ok(())
}

fn ontology_cells(entry: &OntologyEntry) -> Vec<String> {
    vec![
        entry.canonical_topic.clone(),
        phrase_list::join(&entry.synonyms),
        phrase_list::join(&entry.related_phrases),
        entry.gri_id.clone().unwrap_or_default(),
        entry.brsr_id.clone().unwrap_or_default(),
        entry.sasb_id.clone().unwrap_or_default(),
    ]
}

fn cmd_ontology_topics(paths: &TablePaths) -> Result<()> {
    let taxonomy = esgtracker_store::load_taxonomy(&paths.taxonomy)?;
    let topics = topic_options(&taxonomy);

    if topics.is_empty() {
        println!("  No taxonomy topics yet; canonical topics are free text.");
        return Ok(());
    }

    for topic in topics {
        println!("  {topic}");
    }
    Ok(())
}

fn cmd_ontology_suggest(paths: &TablePaths, topic: &str) -> Result<()> {
    let metrics = esgtracker_store::load_metrics(&paths.metrics)?;
    let suggestions = suggest(&metrics, topic);

    if suggestions.matches.is_empty() {
        println!("  No metric descriptions match '{topic}'.");
        return Ok(());
    }

    println!("  Suggested synonyms/related phrases:");
    for synonym in &suggestions.synonyms {
        println!("    - {synonym}");
    }
    println!("  Matching metric ids:");
    for record in &suggestions.matches {
        println!("    - {} -> {} ({})", record.metric_id, record.description, record.source);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Print rows as an aligned text table.
fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("  (no rows)");
        return;
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let print_row = |cells: &[String]| {
        let line = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {}", line.trim_end());
    };

    print_row(&header.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    print_row(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>());
    for row in &rows {
        print_row(row);
    }
}

/// Print rows as CSV on stdout, header first.
fn print_csv<T: serde::Serialize>(header: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(std::io::stdout());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
