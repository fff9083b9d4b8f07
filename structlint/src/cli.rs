use crate::PluginRegistry;
use anyhow::Result;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Arg, ArgAction, ArgMatches, Command};
use structlint_core::RuntimeConfig;
use structlint_fix::FixError;
use structlint_rules::CheckFailed;

/// Process exit code for a lint or fix run that found problems.
pub const EXIT_FAILED: i32 = 1;
/// Process exit code for usage, configuration and I/O errors.
pub const EXIT_ERROR: i32 = 2;

pub struct StructlintCli {
    registry: PluginRegistry,
}

impl StructlintCli {
    pub fn new() -> Self {
        Self {
            registry: PluginRegistry::new(),
        }
    }

    pub fn build_app(&self) -> Command {
        let styles = Styles::styled()
            .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
            .usage(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
            .literal(AnsiColor::BrightWhite.on_default())
            .placeholder(AnsiColor::BrightYellow.on_default())
            .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
            .valid(AnsiColor::BrightGreen.on_default())
            .invalid(AnsiColor::BrightRed.on_default());

        let app = Command::new("structlint")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Lint a project's directory structure and scaffold what is missing")
            .author("Structlint Contributors")
            .styles(styles)
            .disable_help_subcommand(true);

        self.registry
            .build_cli(app)
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .action(ArgAction::SetTrue)
                    .help("Show debug output")
                    .global(true),
            )
            .arg(
                Arg::new("quiet")
                    .long("quiet")
                    .short('q')
                    .action(ArgAction::SetTrue)
                    .help("Only print errors")
                    .conflicts_with("verbose")
                    .global(true),
            )
            .arg(
                Arg::new("no-color")
                    .long("no-color")
                    .action(ArgAction::SetTrue)
                    .help("Disable colored output")
                    .global(true),
            )
    }

    pub fn run(&self, args: Vec<String>) -> Result<()> {
        let matches = self.build_app().try_get_matches_from(args)?;
        let config = runtime_config(&matches)?;

        init_logging(&config);
        if !config.color {
            colored::control::set_override(false);
        }

        match matches.subcommand() {
            Some((command_name, sub_matches)) => {
                tracing::debug!("Running {} in {}", command_name, config.working_dir.display());
                self.registry.handle_command(command_name, sub_matches, &config)
            }
            None => {
                self.build_app().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}

impl Default for StructlintCli {
    fn default() -> Self {
        Self::new()
    }
}

fn runtime_config(matches: &ArgMatches) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::new(std::env::current_dir()?);
    config.verbose = matches.get_flag("verbose");
    config.quiet = matches.get_flag("quiet");
    config.color = !matches.get_flag("no-color") && std::env::var_os("NO_COLOR").is_none();
    Ok(config)
}

fn init_logging(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if config.verbose {
        EnvFilter::new("structlint=debug")
    } else if config.quiet {
        EnvFilter::new("structlint=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("structlint=info"))
    };

    // A subscriber may already be installed when running several commands in one process.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Maps a command error to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<CheckFailed>().is_some() {
        return EXIT_FAILED;
    }
    if let Some(FixError::Incomplete { .. }) = err.downcast_ref::<FixError>() {
        return EXIT_FAILED;
    }
    if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
        return clap_err.exit_code();
    }
    EXIT_ERROR
}
