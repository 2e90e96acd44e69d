use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use focusbeam_core::SessionType;

mod commands;
mod logging;
mod tui;

#[derive(Parser)]
#[command(name = "focusbeam", version, about = "FocusBeam interval timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive timer screen
    Run {
        /// Session type selected on launch (defaults to timer.start_type)
        #[arg(long = "type")]
        session: Option<SessionType>,
    },
    /// Run one countdown without the interactive screen
    Timer(commands::timer::TimerArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { session } => {
            logging::init_file();
            tui::run(session).await
        }
        Commands::Timer(args) => {
            logging::init_stderr();
            commands::timer::run(args).await
        }
        Commands::Config { action } => {
            logging::init_stderr();
            commands::config::run(action)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "focusbeam", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
