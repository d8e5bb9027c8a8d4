//! `recordstore` entry point: parse arguments, run the server, report fatal
//! startup errors on stderr with a non-zero exit.

use clap::Parser;
use recordstore_server::{run, Args};

#[tokio::main]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("recordstore: {err}");
        std::process::exit(1);
    }
}
