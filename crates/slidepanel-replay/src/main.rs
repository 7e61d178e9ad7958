#![forbid(unsafe_code)]

use clap::Parser;
use slidepanel_replay::cli::Cli;

fn main() {
    let cli = Cli::parse();
    slidepanel_replay::logging::init(cli.log.as_deref());
    let json_errors = cli.json_errors;
    if let Err(error) = slidepanel_replay::run(cli) {
        if json_errors {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
