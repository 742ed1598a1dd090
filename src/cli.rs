use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ts2js")]
#[command(version = "0.1.0")]
#[command(about = "Rename TypeScript sources to JavaScript and drop TypeScript configs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file with the default rules
    Init {
        #[arg(short, long, default_value = "ts2js.config.ts")]
        output: String,
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Rename sources and remove config files
    #[command(visible_alias = "c")]
    Convert {
        #[arg(short, long, default_value = "ts2js.config.ts")]
        config: String,
        #[arg(short, long, default_value = ".")]
        root: String,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
        jobs: u16,
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Show what convert would do (equivalent to: ts2js convert --dry-run)
    #[command(visible_alias = "p")]
    Plan {
        #[arg(short, long, default_value = "ts2js.config.ts")]
        config: String,
        #[arg(short, long, default_value = ".")]
        root: String,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Init { .. } => false,
            Commands::Convert { verbose, .. } | Commands::Plan { verbose, .. } => *verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn convert_defaults() {
        let cli = Cli::try_parse_from(["ts2js", "convert"]).unwrap();
        match cli.command {
            Commands::Convert {
                config,
                root,
                dry_run,
                jobs,
                ..
            } => {
                assert_eq!(config, "ts2js.config.ts");
                assert_eq!(root, ".");
                assert!(!dry_run);
                assert_eq!(jobs, 8);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn aliases_resolve() {
        let cli = Cli::try_parse_from(["ts2js", "p", "--root", "web"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan { ref root, .. } if root == "web"));

        let cli = Cli::try_parse_from(["ts2js", "c", "--verbose"]).unwrap();
        assert!(cli.command.verbose());
    }

    #[test]
    fn zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["ts2js", "convert", "-j", "0"]).is_err());
    }
}
