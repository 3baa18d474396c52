use std::path::Path;
use std::process;
use log::{error, LevelFilter};

use tif2image::commands::{build_cli, CommandFactory, Tif2ImageCommandFactory, DEFAULT_LOG_FILE};
use tif2image::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = matches
        .get_one::<String>("log-file")
        .map(String::as_str)
        .unwrap_or(DEFAULT_LOG_FILE);

    let logger = match Logger::init_global_logger(Path::new(log_file), level) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error setting up logger: {}", e);
            process::exit(1);
        }
    };

    let factory = Tif2ImageCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            process::exit(1);
        }
    };
}
