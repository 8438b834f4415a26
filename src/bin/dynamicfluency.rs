use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use dynamicfluency_rs::aeneas::{aeneas_tier_from_json, is_sync_map, DEFAULT_AENEAS_TIER_NAME};
use dynamicfluency_rs::lexicon::{
    column_names, frequency_tiers, import_dictionary, IfExists, DEFAULT_KEY_COLUMN,
};
use dynamicfluency_rs::{
    load_textgrid, save_textgrid, AnyTier, FluencyConfig, FluencyPipeline, FluencyPipelineBuilder,
    IntervalTier, SqliteLexicon, TextGridDocument,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

const ALIGNMENT_SUFFIX: &str = ".alignment.TextGrid";
const POS_TAGS_SUFFIX: &str = ".pos_tags.TextGrid";
const SYNTAX_SUFFIX: &str = ".syntax.TextGrid";
const REPETITIONS_SUFFIX: &str = ".repetitions.TextGrid";
const FREQUENCIES_SUFFIX: &str = ".frequencies.TextGrid";
const AENEAS_SUFFIX: &str = ".json";
const COLUMN_NAMES_FILE: &str = "column_names.csv";

/// Aligner that produced the `*.alignment.TextGrid` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlignmentKind {
    Maus,
    Aeneas,
    Whisper,
}

impl AlignmentKind {
    fn word_tier_name(self) -> &'static str {
        match self {
            Self::Maus => "ORT-MAU",
            Self::Aeneas => DEFAULT_AENEAS_TIER_NAME,
            Self::Whisper => "words_text",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "dynamicfluency")]
#[command(about = "Generate POS, syntax, repetition and frequency tiers from aligned TextGrids")]
struct Args {
    /// JSON file with `FluencyConfig` fields; flags below override it.
    #[arg(long, env = "DYNAMICFLUENCY_CONFIG")]
    config: Option<PathBuf>,
    #[arg(short, long, env = "DYNAMICFLUENCY_LANGUAGE")]
    language: Option<String>,
    /// Words that get no score, separated by commas.
    #[arg(short = 'i', long, env = "DYNAMICFLUENCY_TO_IGNORE", value_delimiter = ',')]
    to_ignore: Vec<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct DirectoryArgs {
    /// Directory searched for input files; outputs are written next to them.
    #[arg(short, long, env = "DYNAMICFLUENCY_DIRECTORY", default_value = "output")]
    directory: PathBuf,
}

#[derive(Debug, clap::Args)]
struct TableArgs {
    #[arg(
        short = 'b',
        long,
        env = "DYNAMICFLUENCY_DATABASE",
        default_value = "databases/main.db"
    )]
    database: PathBuf,
    #[arg(short, long)]
    table_name: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tag `*.alignment.TextGrid` word tiers into `*.pos_tags.TextGrid`.
    PosTags {
        #[command(flatten)]
        dir: DirectoryArgs,
        #[arg(short, long, value_enum)]
        alignment: AlignmentKind,
        /// JSON `{"word": "TAG"}` lexicon for the built-in tagger.
        #[arg(long, env = "DYNAMICFLUENCY_LEXICON")]
        lexicon: Option<PathBuf>,
    },
    /// Clause and phrase markers from `*.pos_tags.TextGrid`.
    Syntax {
        #[command(flatten)]
        dir: DirectoryArgs,
    },
    /// Repetition and frequency-distribution tiers from `*.pos_tags.TextGrid`.
    Repetitions {
        #[command(flatten)]
        dir: DirectoryArgs,
        #[arg(long, env = "DYNAMICFLUENCY_MAX_CACHE")]
        max_cache: Option<usize>,
    },
    /// Dictionary tiers from alignment grids, or from POS grids when no
    /// alignment kind is given.
    Frequencies {
        #[command(flatten)]
        dir: DirectoryArgs,
        #[command(flatten)]
        table: TableArgs,
        #[arg(short, long, value_enum)]
        alignment: Option<AlignmentKind>,
        /// Columns to read, separated by commas; all when omitted.
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Write the table's column names to `column_names.csv`.
    Columns {
        #[command(flatten)]
        dir: DirectoryArgs,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Import a delimited dictionary file with a `WordForm` column.
    AddDictionary {
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        table: TableArgs,
        #[arg(short, long, default_value_t = ',')]
        separator: char,
        /// Replace the table if it already exists.
        #[arg(long, default_value_t = false)]
        replace: bool,
    },
    /// Convert aeneas `*.json` sync maps into `*.alignment.TextGrid`.
    Aeneas {
        #[command(flatten)]
        dir: DirectoryArgs,
        /// Keep fragments as written instead of repairing overlaps.
        #[arg(long, default_value_t = false)]
        keep_invalid: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => FluencyConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => FluencyConfig::default(),
    };
    if let Some(language) = &args.language {
        config.language = language.clone();
    }
    if !args.to_ignore.is_empty() {
        config.to_ignore = args.to_ignore.clone();
    }

    match args.command {
        Command::PosTags {
            dir,
            alignment,
            lexicon,
        } => {
            if let Some(lexicon) = lexicon {
                config.lexicon_path = Some(lexicon.to_string_lossy().to_string());
            }
            let pipeline = build_pipeline(config, None)?;
            let word_tier = alignment.word_tier_name();
            for_each_file(&dir.directory, ALIGNMENT_SUFFIX, POS_TAGS_SUFFIX, |input, output| {
                let grid = read_grid(input)?;
                let words = interval_tier(&grid, word_tier, input)?;
                let pos = pipeline
                    .pos_tier(words)
                    .map_err(|err| format!("Failed to tag '{}': {err}", input.display()))?;
                write_grid(output, &TextGridDocument::from_interval_tiers(vec![pos]))
            })
        }
        Command::Syntax { dir } => {
            let pipeline = build_pipeline(config, None)?;
            for_each_file(&dir.directory, POS_TAGS_SUFFIX, SYNTAX_SUFFIX, |input, output| {
                let grid = read_grid(input)?;
                let pos = interval_tier(&grid, &pipeline.config().pos_tier_name, input)?;
                let (clauses, phrases) = pipeline
                    .syntax_tiers(pos)
                    .map_err(|err| format!("Failed to mark syntax in '{}': {err}", input.display()))?;
                let mut document = TextGridDocument::new(grid.min_timestamp, grid.max_timestamp);
                document.push(AnyTier::Point(clauses));
                document.push(AnyTier::Point(phrases));
                write_grid(output, &document)
            })
        }
        Command::Repetitions { dir, max_cache } => {
            if let Some(max_cache) = max_cache {
                config.max_cache = max_cache;
            }
            let pipeline = build_pipeline(config, None)?;
            for_each_file(&dir.directory, POS_TAGS_SUFFIX, REPETITIONS_SUFFIX, |input, output| {
                let grid = read_grid(input)?;
                let pos = interval_tier(&grid, &pipeline.config().pos_tier_name, input)?;
                let tiers = vec![pipeline.repetitions_tier(pos), pipeline.freqdist_tier(pos)];
                write_grid(output, &TextGridDocument::from_interval_tiers(tiers))
            })
        }
        Command::Frequencies {
            dir,
            table,
            alignment,
            columns,
        } => {
            let columns = (!columns.is_empty()).then_some(columns);
            match alignment {
                Some(kind) => {
                    let lexicon = open_lexicon(&table)?;
                    let ignore = config.ignore_set();
                    for_each_file(&dir.directory, ALIGNMENT_SUFFIX, FREQUENCIES_SUFFIX, |input, output| {
                        let grid = read_grid(input)?;
                        let words = interval_tier(&grid, kind.word_tier_name(), input)?;
                        let tiers = frequency_tiers(words, &lexicon, &ignore, columns.as_deref())
                            .map_err(|err| format!("Failed to look up '{}': {err}", input.display()))?;
                        write_grid(output, &TextGridDocument::from_interval_tiers(tiers))
                    })
                }
                None => {
                    let lexicon = open_lexicon(&table)?;
                    let pipeline = build_pipeline(config, Some(lexicon))?;
                    for_each_file(&dir.directory, POS_TAGS_SUFFIX, FREQUENCIES_SUFFIX, |input, output| {
                        let grid = read_grid(input)?;
                        let pos = interval_tier(&grid, &pipeline.config().pos_tier_name, input)?;
                        let tiers = pipeline
                            .frequency_tiers(pos, columns.as_deref())
                            .map_err(|err| format!("Failed to look up '{}': {err}", input.display()))?;
                        write_grid(output, &TextGridDocument::from_interval_tiers(tiers))
                    })
                }
            }
        }
        Command::Columns { dir, table } => write_column_names(&dir.directory, &table),
        Command::AddDictionary {
            file,
            table,
            separator,
            replace,
        } => {
            let separator = u8::try_from(separator)
                .map_err(|_| format!("Separator '{separator}' must be a single-byte character."))?;
            let if_exists = if replace { IfExists::Replace } else { IfExists::Fail };
            let rows = import_dictionary(&file, &table.database, &table.table_name, separator, if_exists)
                .map_err(|err| format!("Failed to import '{}': {err}", file.display()))?;
            println!(
                "imported {rows} rows into '{}' ({})",
                table.table_name,
                table.database.display()
            );
            Ok(())
        }
        Command::Aeneas { dir, keep_invalid } => {
            for_each_file(&dir.directory, AENEAS_SUFFIX, ALIGNMENT_SUFFIX, |input, output| {
                let json = fs::read_to_string(input)
                    .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?;
                if !is_sync_map(&json) {
                    tracing::debug!(path = %input.display(), "skipping non-sync-map JSON");
                    return Ok(());
                }
                let tier = aeneas_tier_from_json(&json, DEFAULT_AENEAS_TIER_NAME, !keep_invalid)
                    .map_err(|err| format!("Failed to convert '{}': {err}", input.display()))?;
                write_grid(output, &TextGridDocument::from_interval_tiers(vec![tier]))
            })
        }
    }
}

fn build_pipeline(
    config: FluencyConfig,
    lexicon: Option<SqliteLexicon>,
) -> Result<FluencyPipeline, String> {
    let mut builder = FluencyPipelineBuilder::new(config);
    if let Some(lexicon) = lexicon {
        builder = builder.with_frequency_lookup(Box::new(lexicon));
    }
    builder
        .build()
        .map_err(|err| format!("Failed to set up pipeline: {err}"))
}

fn open_lexicon(table: &TableArgs) -> Result<SqliteLexicon, String> {
    SqliteLexicon::open(&table.database, &table.table_name, DEFAULT_KEY_COLUMN).map_err(|err| {
        format!(
            "Failed to open table '{}' in '{}': {err}",
            table.table_name,
            table.database.display()
        )
    })
}

fn write_column_names(directory: &Path, table: &TableArgs) -> Result<(), String> {
    require_path_exists(directory, "Output directory does not exist.")?;
    let path = directory.join(COLUMN_NAMES_FILE);
    if path.exists() {
        return Err(format!("'{}' already exists; not overwriting.", path.display()));
    }
    let lexicon = open_lexicon(table)?;
    let names = column_names(&lexicon);

    let mut writer = csv::Writer::from_path(&path)
        .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
    writer
        .write_record(&names)
        .and_then(|_| writer.flush().map_err(csv::Error::from))
        .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
    println!("wrote {} column names to '{}'", names.len(), path.display());
    Ok(())
}

/// Run `process(input, output)` for every file under `directory` ending in
/// `input_suffix`, with `output` the same path ending in `output_suffix`.
fn for_each_file<F>(
    directory: &Path,
    input_suffix: &str,
    output_suffix: &str,
    mut process: F,
) -> Result<(), String>
where
    F: FnMut(&Path, &Path) -> Result<(), String>,
{
    require_path_exists(directory, "Input directory does not exist.")?;
    let mut files = Vec::new();
    collect_files_with_suffix(directory, input_suffix, &mut files)?;
    files.sort();
    if files.is_empty() {
        tracing::warn!(
            directory = %directory.display(),
            suffix = input_suffix,
            "no input files found"
        );
        return Ok(());
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut failures = 0usize;
    for input in &files {
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        progress.set_message(file_name);
        let output = replace_suffix(input, input_suffix, output_suffix);
        if let Err(err) = process(input, &output) {
            progress.suspend(|| eprintln!("{err}"));
            failures += 1;
        }
        progress.inc(1);
    }
    progress.finish_with_message("done");

    if failures > 0 {
        return Err(format!("{failures} of {} files failed.", files.len()));
    }
    Ok(())
}

fn collect_files_with_suffix(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read directory '{}': {err}", dir.display()))?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            format!(
                "Failed to read directory entry in '{}': {err}",
                dir.display()
            )
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_files_with_suffix(&path, suffix, out)?;
            continue;
        }
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix) && name.len() > suffix.len())
        {
            out.push(path);
        }
    }
    Ok(())
}

fn replace_suffix(path: &Path, from: &str, to: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = name.strip_suffix(from).unwrap_or(&name);
    path.with_file_name(format!("{stem}{to}"))
}

fn read_grid(path: &Path) -> Result<TextGridDocument, String> {
    load_textgrid(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn write_grid(path: &Path, document: &TextGridDocument) -> Result<(), String> {
    save_textgrid(path, document).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

fn interval_tier<'a>(
    grid: &'a TextGridDocument,
    name: &str,
    path: &Path,
) -> Result<&'a IntervalTier, String> {
    grid.interval_tier(name)
        .map_err(|err| format!("Cannot read '{}': {err}", path.display()))
}

fn require_path_exists(path: &Path, context: &str) -> Result<(), String> {
    if path.exists() {
        Ok(())
    } else {
        Err(format!("{context} Path: '{}'", path.display()))
    }
}
