use std::process;

use adflow::{query_from_args, AppConfig, AppError};

fn main() {
    env_logger::init();

    if let Err(e) = ctrlc::set_handler(|| {
                        println!("\nExecution interrupted by user.");
                        process::exit(1);
                    })
    {
        log::warn!("could not install Ctrl-C handler: {e}");
    }

    let query = match query_from_args(std::env::args().skip(1)) {
        Ok(q) => q,
        Err(_) => {
            println!("Usage: adflow \"<query>\"");
            println!("Example: adflow \"Analyze ROAS drop\"");
            process::exit(1);
        }
    };

    println!("\n=== Starting Agentic Ad Performance Analyst ===\n");
    match AppConfig::load().map_err(AppError::from)
                           .and_then(|config| adflow::run(&config, &query))
    {
        Ok(outcome) if outcome.is_completed() => println!("\n=== Execution Completed Successfully ===\n"),
        Ok(_) => println!("\n=== Execution Finished With A Failed Stage ===\n"),
        Err(e) => {
            eprintln!("\nError initializing environment: {e}");
            process::exit(1);
        }
    }
}
