mod commands;
mod terminal;

use commands::{CommandLine, Commands, generalize, prune, run, windows};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.quiet);

    let cfg = commands.load_config()?;

    match commands.command {
        Commands::Run => {
            print::header("starting full aggregation run");
            run::run(&cfg).await
        }
        Commands::Windows => {
            print::header("rebuilding window artifacts");
            windows::windows(&cfg)
        }
        Commands::Generalize => {
            print::header("generalizing subnets");
            generalize::generalize(&cfg)
        }
        Commands::Prune => {
            print::header("pruning old snapshots");
            prune::prune(&cfg)
        }
    }
}
