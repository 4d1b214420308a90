use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "iforge",
    about = "InChI identifiers, keys and structures from the command line",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate an identifier from a structure (SDF)
    #[command(visible_alias = "i")]
    Inchi(InchiArgs),

    /// Re-generate identifiers with different options
    Convert(BatchArgs),

    /// Rebuild a structure (SDF) from an identifier
    #[command(visible_alias = "s")]
    Structure(StructureArgs),

    /// Derive keys for a list of identifiers
    #[command(visible_alias = "k")]
    Key(BatchArgs),

    /// Validate a list of keys
    CheckKey(BatchArgs),

    /// Validate a list of identifiers
    Check(BatchArgs),
}

impl Command {
    pub fn io(&self) -> &IoOptions {
        match self {
            Command::Inchi(args) => &args.io,
            Command::Structure(args) => &args.io,
            Command::Convert(args)
            | Command::Key(args)
            | Command::CheckKey(args)
            | Command::Check(args) => &args.io,
        }
    }
}

/// I/O options shared by all commands.
#[derive(Args)]
pub struct IoOptions {
    /// Input file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Library options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Library Options")]
pub struct EngineOptions {
    /// Engine configuration (TOML file)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Library switches, e.g. "-FixedH -RecMet"
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Use the standard-identifier entry points
    #[arg(long)]
    pub standard: bool,

    /// Request hash extensions when deriving keys
    #[arg(long)]
    pub extensions: bool,

    /// Check identifiers in strict mode
    #[arg(long)]
    pub strict: bool,

    /// Run one library call at a time (for libraries older than 1.04)
    #[arg(long)]
    pub serialize: bool,
}

#[derive(Args)]
pub struct InchiArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub engine: EngineOptions,

    /// Also print the auxiliary information line
    #[arg(long)]
    pub aux: bool,

    /// Also print the key of the generated identifier
    #[arg(long)]
    pub key: bool,
}

#[derive(Args)]
pub struct StructureArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub engine: EngineOptions,

    /// Identifier to rebuild (read from the input if omitted)
    #[arg(value_name = "INCHI")]
    pub identifier: Option<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub engine: EngineOptions,

    /// Entries to process (read one per line from the input if omitted)
    #[arg(value_name = "ENTRY")]
    pub entries: Vec<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_options_with_leading_dash() {
        let cli = Cli::try_parse_from(["iforge", "key", "--options", "-FixedH", "InChI=1/Cl"])
            .unwrap();
        let Command::Key(args) = cli.command else {
            panic!("expected key command");
        };
        assert_eq!(args.engine.options.as_deref(), Some("-FixedH"));
        assert_eq!(args.entries, vec!["InChI=1/Cl"]);
    }
}
