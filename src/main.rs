use clap::{Arg, Command as ClapCommand, ArgAction};
use log::{error, LevelFilter};
use std::path::Path;
use std::process;

use tiffregion::commands::{CommandFactory, TiffRegionCommandFactory};
use tiffregion::config::Settings;
use tiffregion::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("tiffregion")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode a region of a TIFF page into raw RGBA bytes")
        .arg(
            Arg::new("input")
                .help("Input TIFF file or file:// URI")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .help("List the pages of the input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("page")
                .short('p')
                .long("page")
                .help("Zero-based page index")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("sample-size")
                .short('s')
                .long("sample-size")
                .help("Keep every N-th pixel in each direction")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("region")
                .short('r')
                .long("region")
                .help("Region to decode as 'left,top,width,height' (default: whole page)")
                .value_name("L,T,W,H")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file for the decoded pixels")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format (raw or png); guessed from the output extension")
                .value_name("FORMAT")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let settings = match matches.get_one::<String>("config") {
        Some(path) => match Settings::load(Path::new(path)) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => Settings::default(),
    };

    // RUST_LOG takes over from the configured logger
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    } else {
        let level = if matches.get_flag("verbose") {
            LevelFilter::Debug
        } else {
            settings.logging.level
        };
        if let Err(e) = Logger::init_global_logger(settings.logging.file.as_deref(), level) {
            eprintln!("Error setting up logger: {}", e);
            process::exit(1);
        }
    }

    let factory = TiffRegionCommandFactory::new();

    let command = match factory.create_command(&matches, &settings) {
        Ok(command) => command,
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = command.execute() {
        error!("Command execution error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
