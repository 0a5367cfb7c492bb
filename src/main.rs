// src/main.rs

use cookcheck::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("cookcheck error: {err:?}");
        std::process::exit(1);
    }

    match run(args).await {
        Ok(outcome) => {
            println!("{outcome}");
            std::process::exit(outcome.exit_code());
        }
        Err(err) => {
            eprintln!("cookcheck error: {err:?}");
            std::process::exit(1);
        }
    }
}
