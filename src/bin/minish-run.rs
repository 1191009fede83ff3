//! Runs a single command in the foreground and reports how it ended.

use minish::process::{ExitOutcome, Launch, ProcessLauncher};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("minish-run");
        eprintln!("Usage: {} command [args...]", program);
        process::exit(1);
    }

    let mut launcher = ProcessLauncher::new(None);
    match launcher.launch(&args[1..], false) {
        Ok(Launch::Foreground { outcome, .. }) => {
            if let ExitOutcome::Exited(code) = outcome {
                println!("Child exited with status {}", code);
            } else if let Some(signal) = outcome.signal() {
                println!("Child terminated by signal {}", signal);
            }
        }
        Ok(Launch::Background(pid)) => log::warn!("{} unexpectedly left running", pid),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
