//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "externals",
    bin_name = "externals",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Issue and verify unique codes with check digits",
    long_about = "Externals issues random codes that are unique per entity and \
                  property, optionally ending in a Luhn mod N check character, \
                  and remembers every issued code in a registry file.",
    after_help = "EXAMPLES:\n\
        \x20 externals generate -n 5\n\
        \x20 externals generate --entity voucher --length 12 --format json\n\
        \x20 externals verify K7MQ2XH9A\n\
        \x20 externals completions bash > /usr/share/bash-completion/completions/externals",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Issue new unique codes.
    #[command(
        visible_alias = "g",
        about = "Issue new unique codes",
        after_help = "EXAMPLES:\n\
            \x20 externals generate\n\
            \x20 externals generate -n 100 --entity ticket --property reference\n\
            \x20 externals generate --length 8 --no-check-digit --seed 42"
    )]
    Generate(GenerateArgs),

    /// Validate the trailing check character of a code.
    #[command(
        about = "Verify a code's check digit",
        after_help = "EXAMPLES:\n\
            \x20 externals verify K7MQ2XH9A"
    )]
    Verify(VerifyArgs),

    /// Run registry health checks.
    #[command(
        about = "Check registry health",
        after_help = "EXAMPLES:\n\
            \x20 externals health\n\
            \x20 externals health --format json"
    )]
    Health(HealthArgs),

    /// Initialise an Externals configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 externals init                  # default location\n\
            \x20 externals -c ./externals.toml init\n\
            \x20 externals init --force          # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 externals completions bash > ~/.local/share/bash-completion/completions/externals\n\
            \x20 externals completions zsh  > ~/.zfunc/_externals\n\
            \x20 externals completions fish > ~/.config/fish/completions/externals.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Externals configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 externals config get generator.length\n\
            \x20 externals config list\n\
            \x20 externals config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Upper bound for `generate --count`.
pub const MAX_COUNT: u32 = 1_000_000;

/// Arguments for `externals generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of codes to issue.
    #[arg(
        short = 'n',
        long = "count",
        value_name = "COUNT",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=MAX_COUNT as i64),
        help = "Number of codes to issue"
    )]
    pub count: u32,

    /// Total code length, check digit included.
    #[arg(
        short = 'l',
        long = "length",
        value_name = "N",
        help = "Total length including the check digit [default: from config]"
    )]
    pub length: Option<usize>,

    /// Append a check character.
    #[arg(
        long = "check-digit",
        overrides_with = "no_check_digit",
        help = "Append a Luhn mod N check character"
    )]
    pub check_digit: bool,

    /// Do not append a check character.
    #[arg(
        long = "no-check-digit",
        overrides_with = "check_digit",
        help = "Do not append a check character"
    )]
    pub no_check_digit: bool,

    /// Entity the codes belong to; uniqueness is per entity and property.
    #[arg(short = 'e', long = "entity", value_name = "ENTITY")]
    pub entity: Option<String>,

    /// Property name the codes are stored under.
    #[arg(short = 'p', long = "property", value_name = "PROPERTY")]
    pub property: Option<String>,

    /// Seed the random source for reproducible output.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Registry file of previously issued codes.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, help = "Output format [default: from config]")]
    pub format: Option<CodeFormat>,
}

impl GenerateArgs {
    /// Tri-state check-digit flag: `None` defers to configuration.
    pub fn check_digit_override(&self) -> Option<bool> {
        match (self.check_digit, self.no_check_digit) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Output format for issued codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodeFormat {
    /// Human-readable table.
    Table,
    /// One code per line.
    List,
    /// JSON array.
    Json,
}

// ── verify ────────────────────────────────────────────────────────────────────

/// Arguments for `externals verify`.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Code to check, check character last.
    #[arg(value_name = "CODE")]
    pub code: String,
}

// ── health ────────────────────────────────────────────────────────────────────

/// Arguments for `externals health`.
#[derive(Debug, Args)]
pub struct HealthArgs {
    /// Registry file to check.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: HealthFormat,
}

/// Output format for the health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HealthFormat {
    Table,
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `externals init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `externals completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `externals config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generator.length`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_defaults() {
        let cli = Cli::parse_from(["externals", "generate"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.count, 1);
        assert_eq!(args.length, None);
        assert_eq!(args.check_digit_override(), None);
        assert_eq!(args.format, None);
    }

    #[test]
    fn parse_generate_full() {
        let cli = Cli::parse_from([
            "externals",
            "generate",
            "-n",
            "3",
            "--length",
            "12",
            "--no-check-digit",
            "--entity",
            "voucher",
            "--seed",
            "7",
            "--format",
            "json",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.count, 3);
        assert_eq!(args.length, Some(12));
        assert_eq!(args.check_digit_override(), Some(false));
        assert_eq!(args.entity.as_deref(), Some("voucher"));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.format, Some(CodeFormat::Json));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(Cli::try_parse_from(["externals", "generate", "-n", "0"]).is_err());
    }

    #[test]
    fn count_is_capped() {
        let max = MAX_COUNT.to_string();
        let over = (MAX_COUNT + 1).to_string();

        assert!(Cli::try_parse_from(["externals", "generate", "-n", max.as_str()]).is_ok());
        assert!(Cli::try_parse_from(["externals", "generate", "-n", over.as_str()]).is_err());
        assert!(Cli::try_parse_from(["externals", "generate", "-n", "4294967295"]).is_err());
    }

    #[test]
    fn no_color_flag_takes_no_value() {
        let cli = Cli::parse_from(["externals", "--no-color", "health"]);
        assert!(cli.global.no_color);
    }

    #[test]
    fn generate_alias() {
        let cli = Cli::parse_from(["externals", "g"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn parse_verify() {
        let cli = Cli::parse_from(["externals", "verify", "ABC3"]);
        let Commands::Verify(args) = cli.command else {
            panic!("expected Verify command");
        };
        assert_eq!(args.code, "ABC3");
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["externals", "--quiet", "--verbose", "health"]);
        assert!(result.is_err());
    }
}
