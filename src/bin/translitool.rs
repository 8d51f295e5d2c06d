use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use unicode_width::UnicodeWidthChar;

use translit_engine::codespace::{self, MAX_CODE_LENGTH_LIMIT};
use translit_engine::stats::{CompressionReport, CoverageStats};
use translit_engine::{
    build_mapping, BuildConfig, CharFrequency, FrequencyAccumulator, MappingTable, Strategy,
    Transliterator,
};

#[derive(Parser)]
#[command(name = "translitool", about = "Mapping-table build and codec diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count character frequencies in corpus files and write a ranking
    Analyze {
        /// UTF-8 corpus files
        #[arg(required = true)]
        corpus: Vec<String>,
        /// Output ranking file
        #[arg(short, long)]
        output: String,
        /// Drop characters seen fewer times than this
        #[arg(long, default_value = "1")]
        min_frequency: u64,
        /// Write a tab-separated listing instead of the JSON ranking
        #[arg(long)]
        tsv: bool,
        /// Number of top characters to show in the summary
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Build a mapping artifact from a JSON ranking
    Build {
        /// Ranking produced by `analyze`
        ranking_file: String,
        /// Output artifact path
        output_file: String,
        /// Assignment strategy: basic, tokenizer-optimized, hybrid
        #[arg(long, default_value = "basic")]
        strategy: String,
        /// Tokenizer vocabulary file, one token per line
        #[arg(long)]
        vocab: Option<String>,
        /// Build configuration TOML (defaults are embedded)
        #[arg(long)]
        config: Option<String>,
        /// Write the JSON interchange form instead of the binary artifact
        #[arg(long)]
        json: bool,
    },

    /// Show statistics for a mapping artifact
    Info {
        /// Artifact path (.tlm, or .json interchange form)
        artifact: String,
    },

    /// Encode source text to its Latin form
    Encode {
        artifact: String,
        /// Input file (stdin when omitted)
        input: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Decode a Latin form back to source text
    Decode {
        artifact: String,
        /// Input file (stdin when omitted)
        input: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Round-trip corpus files and report coverage and compression
    Verify {
        artifact: String,
        #[arg(required = true)]
        corpus: Vec<String>,
    },

    /// Print the code-space capacity schedule
    Capacity {
        #[arg(long, default_value = "4")]
        max_length: usize,
    },
}

fn main() {
    translit_engine::trace_init::init_tracing(&std::env::temp_dir());

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Analyze {
            corpus,
            output,
            min_frequency,
            tsv,
            top,
        } => analyze(&corpus, &output, min_frequency, tsv, top),
        Command::Build {
            ranking_file,
            output_file,
            strategy,
            vocab,
            config,
            json,
        } => build(
            &ranking_file,
            &output_file,
            &strategy,
            vocab.as_deref(),
            config.as_deref(),
            json,
        ),
        Command::Info { artifact } => info(&artifact),
        Command::Encode {
            artifact,
            input,
            output,
        } => codec(&artifact, input.as_deref(), output.as_deref(), true),
        Command::Decode {
            artifact,
            input,
            output,
        } => codec(&artifact, input.as_deref(), output.as_deref(), false),
        Command::Verify { artifact, corpus } => verify(&artifact, &corpus),
        Command::Capacity { max_length } => capacity(max_length),
    }
}

/// Load an artifact, accepting either the binary or the JSON interchange form.
fn open_artifact(path: &str) -> Result<MappingTable, Box<dyn Error>> {
    if path.ends_with(".json") {
        Ok(MappingTable::from_json(&fs::read_to_string(path)?)?)
    } else {
        Ok(MappingTable::open(Path::new(path))?)
    }
}

/// Render a character for terminal output, padded to a fixed column width.
fn show_char(ch: char) -> String {
    if ch.is_whitespace() || ch.is_control() {
        format!("{}", ch.escape_unicode())
    } else {
        let width = ch.width().unwrap_or(1);
        format!("{}{}", ch, " ".repeat(2_usize.saturating_sub(width)))
    }
}

fn analyze(
    corpus: &[String],
    output: &str,
    min_frequency: u64,
    tsv: bool,
    top: usize,
) -> Result<(), Box<dyn Error>> {
    let mut acc = FrequencyAccumulator::new();
    for path in corpus {
        eprintln!("Analyzing {path}...");
        acc.count_file(Path::new(path))?;
    }

    let ranking = acc.ranking(min_frequency);

    eprintln!("Total characters analyzed: {}", acc.total_chars());
    eprintln!("Unique characters found:   {}", acc.unique_chars());
    eprintln!();
    eprintln!("Top {} most frequent characters:", top.min(ranking.len()));
    for (i, entry) in ranking.iter().take(top).enumerate() {
        let percentage = entry.count as f64 / acc.total_chars().max(1) as f64 * 100.0;
        eprintln!(
            "{:>3}. {} U+{:04X}  {:>10}  ({percentage:.2}%)",
            i + 1,
            show_char(entry.character),
            entry.character as u32,
            entry.count,
        );
    }

    let serialized = if tsv {
        let mut buf = String::new();
        for entry in &ranking {
            buf.push_str(&format!(
                "{}\tU+{:04X}\t{}\n",
                entry.character, entry.character as u32, entry.count
            ));
        }
        buf
    } else {
        serde_json::to_string_pretty(&ranking)?
    };
    fs::write(output, serialized)?;

    eprintln!();
    eprintln!("Wrote {} entries to {output}", ranking.len());
    Ok(())
}

fn build(
    ranking_file: &str,
    output_file: &str,
    strategy_name: &str,
    vocab_file: Option<&str>,
    config_file: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let strategy = Strategy::from_name(strategy_name).ok_or_else(|| {
        format!("unknown strategy '{strategy_name}' (available: basic, tokenizer-optimized, hybrid)")
    })?;

    let config = match config_file {
        Some(path) => BuildConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => BuildConfig::default(),
    };

    let vocabulary: Option<HashSet<String>> = match vocab_file {
        Some(path) => {
            let tokens: HashSet<String> = fs::read_to_string(path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            eprintln!("Loaded {} vocabulary tokens", tokens.len());
            Some(tokens)
        }
        None => None,
    };

    let ranking: Vec<CharFrequency> = serde_json::from_str(&fs::read_to_string(ranking_file)?)?;
    eprintln!("Strategy: {strategy}");
    eprintln!(
        "Assigning codes to {} ranked characters (max length {})...",
        ranking.len(),
        config.max_code_length
    );

    let table = build_mapping(&ranking, strategy, &config, vocabulary.as_ref())?;
    if json {
        fs::write(output_file, table.to_json()?)?;
    } else {
        table.save(Path::new(output_file))?;
    }

    let file_size = fs::metadata(output_file).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "Wrote {output_file} ({:.1} KB, {} records)",
        file_size as f64 / 1024.0,
        table.len()
    );
    Ok(())
}

fn info(artifact: &str) -> Result<(), Box<dyn Error>> {
    let table = open_artifact(artifact)?;

    let file_size = fs::metadata(artifact).map(|m| m.len()).unwrap_or(0);
    println!("Artifact:        {artifact}");
    println!("File size:       {:.1} KB", file_size as f64 / 1024.0);
    println!("Records:         {}", table.len());
    println!("Max code length: {}", table.max_code_length());

    let mut by_length: BTreeMap<usize, usize> = BTreeMap::new();
    for record in table.records() {
        *by_length.entry(record.code.len()).or_insert(0) += 1;
    }
    println!();
    println!("Codes by length:");
    for (len, count) in &by_length {
        println!("  {len}: {count}");
    }

    println!();
    println!("Sample mappings:");
    for record in table.records().iter().take(10) {
        println!(
            "  {} U+{:04X}  rank {:>4}  → {}",
            show_char(record.character),
            record.character as u32,
            record.frequency_rank,
            record.code
        );
    }
    Ok(())
}

fn codec(
    artifact: &str,
    input: Option<&str>,
    output: Option<&str>,
    encode: bool,
) -> Result<(), Box<dyn Error>> {
    let engine = Transliterator::new(open_artifact(artifact)?);

    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = if encode {
        engine.to_latin(&text)?
    } else {
        engine.from_latin(&text)?
    };

    match output {
        Some(path) => fs::write(path, result)?,
        None => print!("{result}"),
    }
    Ok(())
}

fn verify(artifact: &str, corpus: &[String]) -> Result<(), Box<dyn Error>> {
    let engine = Transliterator::new(open_artifact(artifact)?);

    let mut report = CompressionReport::default();
    let mut coverage = CoverageStats::default();
    let mut failed_lines = 0usize;

    for path in corpus {
        eprintln!("Verifying {path}...");
        let text = fs::read_to_string(path)?;

        for (line_no, line) in text.lines().enumerate() {
            if !engine.is_lossless(line) {
                failed_lines += 1;
                if failed_lines <= 5 {
                    eprintln!("  round-trip mismatch at {path}:{}", line_no + 1);
                }
            }
        }

        let latin = engine.to_latin(&text)?;
        report.accumulate(&CompressionReport::compare(&text, &latin));

        let file_coverage = engine.coverage(&text);
        coverage.mapped += file_coverage.mapped;
        coverage.unmapped += file_coverage.unmapped;
        coverage.total += file_coverage.total;
    }

    println!("Mapping coverage:  {:.2}%", coverage.ratio() * 100.0);
    println!(
        "Bytes:             {} → {} ({:.2}x)",
        report.original_bytes,
        report.latin_bytes,
        report.byte_ratio()
    );
    println!(
        "Chars:             {} → {} ({:.2}x)",
        report.original_chars,
        report.latin_chars,
        report.char_ratio()
    );

    if failed_lines > 0 {
        return Err(format!("{failed_lines} lines failed the round-trip check").into());
    }
    println!("Round trip:        OK");
    Ok(())
}

fn capacity(max_length: usize) -> Result<(), Box<dyn Error>> {
    if max_length == 0 || max_length > MAX_CODE_LENGTH_LIMIT {
        return Err(format!("max length must be in 1..={MAX_CODE_LENGTH_LIMIT}").into());
    }

    println!("{:<8} {:<16} {:>14} {:>14}", "Length", "Pattern", "Capacity", "Cumulative");
    for len in 1..=max_length {
        let first = format!("A{}", "a".repeat(len - 1));
        let last = format!("Z{}", "z".repeat(len - 1));
        println!(
            "{len:<8} {:<16} {:>14} {:>14}",
            format!("{first}..{last}"),
            codespace::block_size(len),
            codespace::capacity(len)
        );
    }
    Ok(())
}
