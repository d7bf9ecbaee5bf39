use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short = 's', long = "silent", global = true)]
    pub quiet: bool,

    /// Output logs as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration to stdout
    Config,

    /// Generate the default config file
    #[clap(name = "defconfig")]
    DefConfig,

    /// List stored bundles
    #[clap(name = "ls", visible_alias = "list")]
    List {
        /// Only show bundle IDs
        #[arg(required = false, short, long)]
        quiet: bool,

        /// Show digests
        #[arg(required = false, long)]
        digests: bool,
    },

    /// Show a stored bundle
    #[command(arg_required_else_help = true)]
    #[clap(name = "inspect")]
    Inspect {
        /// Bundle reference or ID
        #[arg(required = true)]
        bundle: String,

        /// Show a summary table instead of the raw bundle
        #[arg(required = false, long)]
        pretty: bool,
    },

    /// Remove stored bundles
    #[command(arg_required_else_help = true)]
    #[clap(name = "rm", visible_alias = "remove")]
    Remove {
        /// Bundle references or IDs to remove
        #[arg(required = true)]
        bundles: Vec<String>,
    },

    /// Store an existing bundle under another reference
    #[command(arg_required_else_help = true)]
    #[clap(name = "tag")]
    Tag {
        /// Bundle reference or ID to tag
        #[arg(required = true)]
        source: String,

        /// New reference
        #[arg(required = true)]
        target: String,
    },

    /// Store a bundle file under a reference
    #[command(arg_required_else_help = true)]
    #[clap(name = "import")]
    Import {
        /// Path to the bundle JSON file
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        file: String,

        /// Reference to store the bundle under
        #[arg(required = true)]
        reference: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_list_flags() {
        let args = Args::parse_from(["stowage", "-vv", "ls", "--quiet", "--digests"]);
        assert_eq!(args.verbose, 2);
        assert!(matches!(
            args.command,
            Commands::List {
                quiet: true,
                digests: true
            }
        ));
        assert!(!args.quiet);

        let args = Args::parse_from(["stowage", "--silent", "ls", "-q"]);
        assert!(args.quiet);
        assert!(matches!(args.command, Commands::List { quiet: true, .. }));
    }

    #[test]
    fn test_parse_remove_many() {
        let args = Args::parse_from(["stowage", "rm", "foo:1", "3f825b"]);
        match args.command {
            Commands::Remove { bundles } => assert_eq!(bundles, ["foo:1", "3f825b"]),
            _ => panic!("expected rm"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "stowage",
            "inspect",
            "foo:1",
            "--no-color",
            "-c",
            "/tmp/c.toml",
        ]);
        assert!(args.no_color);
        assert_eq!(args.config.as_deref(), Some("/tmp/c.toml"));
    }
}
