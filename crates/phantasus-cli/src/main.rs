use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use phantasus_cli::commands::load::run_load;
use phantasus_cli::config::CliConfig;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("PHANTASUS_LOG", "error,phantasus=info"))
        .init();

    let matches = Command::new("phantasus")
        .version(clap::crate_version!())
        .about("Load GEO expression datasets into annotated matrices")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("load")
                .about("Fetch a GEO series and report (or export) its matrices")
                .arg(
                    Arg::new("identifier")
                        .help("GEO series accession, e.g. GSE53986 or GSE53986-GPL1261")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .help("Write each matrix as <name>.tsv into this directory")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("base_url")
                        .long("base-url")
                        .help("Root of the GEO series tree. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Url),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help("Request timeout in seconds. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(Command::new("config").about("Print the default configuration as JSON"))
        .get_matches();

    match matches.subcommand() {
        Some(("load", sub_m)) => handle_load(sub_m),
        Some(("config", _)) => {
            println!("{}", serde_json::to_string_pretty(&CliConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_load(matches: &ArgMatches) -> Result<()> {
    let identifier = matches
        .get_one::<String>("identifier")
        .map(String::as_str)
        .unwrap_or_default();
    let config = CliConfig::from_arguments(matches)?;
    log::info!("[Phantasus] Loading {identifier} from {}", config.loader.base_url);

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(run_load(identifier, &config)) {
        Ok(summaries) => {
            for s in &summaries {
                println!(
                    "{}\t{} rows\t{} columns\t{}",
                    s.name,
                    s.rows,
                    s.columns,
                    s.platform.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Load failed: {:#}", e);
            eprintln!("error: {:#}", e);
            std::process::exit(1)
        }
    }
}
