use std::env;
use std::process;
use structlint::{exit_code, StructlintCli};

fn main() {
    let args: Vec<String> = env::args().collect();
    let cli = StructlintCli::new();

    if let Err(e) = cli.run(args) {
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("Error: {:#}", e);
        process::exit(exit_code(&e));
    }
}
