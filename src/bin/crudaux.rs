use crudaux::cli::{self, Command};
use crudaux::{logging, CrudAux};
use tracing::info;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = cli::parse_args(&args);

    match &invocation.command {
        Command::Help => {
            println!("{}", cli::USAGE);
            return;
        }
        Command::Unknown(message) => {
            eprintln!("{}\n\n{}", message, cli::USAGE);
            std::process::exit(2);
        }
        _ => {}
    }

    let config = match cli::resolve_config(&invocation) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize the logging system using tracing subscriber
    logging::init(config.logging.level.as_deref());
    info!(database = %config.database.path, "Starting crudaux...");

    let crud = CrudAux::from_config(&config);
    let output = cli::execute(&crud, &invocation.command);
    println!("{}", output.text);
    if !output.success {
        std::process::exit(1);
    }
}
