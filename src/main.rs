use clap::Parser;
use color_print::ceprintln;

use wtm::commands::{self, AddOptions, RemoveOptions};

mod cli;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List => commands::handle_list(),
        Commands::Add {
            name_or_path,
            branch,
            new_branch,
            track,
            force,
            no_hooks,
        } => commands::handle_add(AddOptions {
            name_or_path,
            branch,
            new_branch,
            track,
            force,
            no_hooks,
        }),
        Commands::Remove {
            name_or_path,
            all,
            force,
            no_hooks,
        } => commands::handle_remove(RemoveOptions {
            name_or_path,
            all,
            force,
            no_hooks,
        }),
        Commands::Jump { name } => commands::handle_jump(name),
        Commands::Reset { force } => commands::handle_reset(force),
        Commands::Init { force } => commands::handle_init(force),
        Commands::Version => {
            println!("wtm {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(err) = result {
        ceprintln!("<red>Error:</> {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}
