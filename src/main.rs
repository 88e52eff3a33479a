//! genobase-importer CLI entry point
//!
//! Prepares a Genobase database from public human genomics reference data.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use genobase_importer::core::{Cancellation, Reference};
use genobase_importer::import::{
    import_alleles, import_chain_file, import_variants, ImportOptions, ImportStats,
    DEFAULT_MINIMUM_FREQUENCY,
};
use genobase_importer::store::SqliteStore;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Instant;

/// Log verbosity (CLI enum)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "genobase-importer")]
#[command(about = "Prepare a Genobase DB from public human genomics reference data")]
#[command(version)]
struct Cli {
    /// Genobase DB path
    #[arg(long, global = true, default_value = "genobase.db")]
    db: PathBuf,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(short = 'l', long = "log-level", global = true, default_value = "info")]
    log_level: LogLevelArg,

    /// Show progress bars
    #[arg(short = 'p', long = "show-progress", global = true, action = ArgAction::SetTrue)]
    show_progress: bool,

    /// Hide progress bars
    #[arg(long = "no-progress", global = true, action = ArgAction::SetTrue)]
    no_progress: bool,

    /// Don't sync the database to disk after each write (unsafe)
    #[arg(long = "no-sync", global = true)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Progress bars are on unless disabled; an explicit `-p` wins
    fn progress(&self) -> bool {
        self.show_progress || !self.no_progress
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Import dbSNP variants
    Variants {
        /// dbSNP VCF file (plain, gzip or bzip2)
        vcf: PathBuf,
    },
    /// Import gnomAD allele frequencies
    Alleles {
        /// Minimum allele frequency to include
        #[arg(short = 'm', long = "minimum-frequency", default_value_t = DEFAULT_MINIMUM_FREQUENCY)]
        minimum_frequency: f64,
        /// gnomAD VCF file (plain, gzip or bzip2)
        vcf: PathBuf,
    },
    /// Import a liftOver chain file
    ChainFile {
        /// Reference the chain lifts over from (e.g. GRCh37)
        #[arg(short = 'f', long = "from")]
        from: Reference,
        /// Chain file (plain, gzip or bzip2)
        chain: PathBuf,
    },
}

fn init_logging(level: LogLevelArg) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.into());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn print_stats(stats: &ImportStats, start: Instant) {
    eprintln!("\n=== Import Statistics ===");
    eprintln!("Total records:   {}", stats.records);
    eprintln!("Kept:            {}", stats.kept);
    eprintln!("Dropped:         {}", stats.total_dropped());
    for (reason, count) in &stats.dropped {
        eprintln!("  {:<24} {}", format!("{}:", reason), count);
    }
    eprintln!("Rows stored:     {}", stats.stored);
    eprintln!("Batches:         {}", stats.batches);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    let start = Instant::now();

    let mut store = SqliteStore::open(&cli.db, cli.no_sync)
        .with_context(|| format!("Could not open database {}", cli.db.display()))?;
    let cancel = Cancellation::new();
    let options = ImportOptions {
        show_progress: cli.progress(),
        ..ImportOptions::default()
    };

    match &cli.command {
        Commands::Variants { vcf } => {
            let stats = import_variants(&mut store, &cancel, vcf, &options)
                .with_context(|| format!("Could not import dbSNP variants from {}", vcf.display()))?;
            print_stats(&stats, start);
        }

        Commands::Alleles {
            minimum_frequency,
            vcf,
        } => {
            let options = ImportOptions {
                minimum_frequency: *minimum_frequency,
                ..options
            };
            let stats = import_alleles(&mut store, &cancel, vcf, &options)
                .with_context(|| format!("Could not import gnomAD alleles from {}", vcf.display()))?;
            print_stats(&stats, start);
        }

        Commands::ChainFile { from, chain } => {
            let chain_file = import_chain_file(&mut store, &cancel, *from, chain, options.show_progress)
                .with_context(|| format!("Could not import chain file {}", chain.display()))?;

            eprintln!("\n=== Import Statistics ===");
            eprintln!("Chains:          {}", chain_file.chains.len());
            eprintln!("Blocks:          {}", chain_file.block_count());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_flags() {
        let cli = Cli::parse_from(["genobase-importer", "variants", "dbsnp.vcf.gz"]);
        assert!(cli.progress());

        let cli = Cli::parse_from(["genobase-importer", "--no-progress", "variants", "x.vcf"]);
        assert!(!cli.progress());
        assert_eq!(cli.db, PathBuf::from("genobase.db"));
    }

    #[test]
    fn test_alleles_defaults() {
        let cli = Cli::parse_from(["genobase-importer", "alleles", "gnomad.vcf.bgz"]);
        match cli.command {
            Commands::Alleles { minimum_frequency, .. } => assert_eq!(minimum_frequency, 0.001),
            _ => panic!("expected alleles command"),
        }
    }

    #[test]
    fn test_chain_file_reference() {
        let cli = Cli::parse_from([
            "genobase-importer",
            "--db",
            "/tmp/g.db",
            "chain-file",
            "-f",
            "hg19",
            "hg19ToHg38.over.chain.gz",
        ]);
        assert!(matches!(
            cli.command,
            Commands::ChainFile { from: Reference::GRCh37, .. }
        ));

        let bad = Cli::try_parse_from(["genobase-importer", "chain-file", "-f", "hg17", "x.chain"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
