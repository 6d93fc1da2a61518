// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Global argument: config directory override
fn config_dir_arg() -> Arg {
    Arg::new("config_dir")
        .long("config-dir")
        .value_name("DIR")
        .global(true)
        .help("Directory for server.conf and client.conf [env: METRONOTES_CONFIG_DIR]")
}

/// Global argument: data directory override
fn data_dir_arg() -> Arg {
    Arg::new("data_dir")
        .long("data-dir")
        .value_name("DIR")
        .global(true)
        .help("Directory for the databases [env: METRONOTES_DATA_DIR]")
}

fn build_cli() -> Command {
    Command::new("metronotes-setup")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Metronotes Contributors")
        .about("First-run setup for a Metronotes node")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(config_dir_arg())
        .arg(data_dir_arg())
        .arg(
            Arg::new("bitcoin_conf")
                .long("bitcoin-conf")
                .value_name("PATH")
                .global(true)
                .help("Wallet daemon config to probe"),
        )
        .arg(
            Arg::new("legacy_conf")
                .long("legacy-conf")
                .value_name("PATH")
                .global(true)
                .help("Config of a previous metronotesd installation"),
        )
        .subcommand(
            Command::new("config")
                .about("Config file discovery and generation")
                .subcommand(
                    Command::new("generate")
                        .about("Write server.conf and client.conf if they do not exist yet")
                        .arg(
                            Arg::new("overwrite")
                                .long("overwrite")
                                .action(ArgAction::SetTrue)
                                .help("Regenerate both files, including a new RPC password"),
                        ),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show the settings discovered in bitcoin.conf and the legacy config")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue)
                                .help("Print as JSON"),
                        ),
                ),
        )
        .subcommand(
            Command::new("bootstrap")
                .about("Download and install the mainnet and testnet databases")
                .arg(
                    Arg::new("no_overwrite")
                        .long("no-overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Keep an existing mainnet database instead of replacing it"),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Do not ask for confirmation"),
                )
                .arg(
                    Arg::new("source_dir")
                        .long("source-dir")
                        .value_name("DIR")
                        .help("Install from archives already downloaded into this directory"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("metronotes-setup.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
