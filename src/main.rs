use minish::core::config::Config;
use minish::error::ShellError;
use minish::flags::Flags;
use minish::shell::Shell;
use std::env;
use std::process;

fn run(flags: &Flags) -> Result<(), ShellError> {
    let config = Config::load(flags)?;
    let mut shell = Shell::new(config)?;
    shell.run()
}

fn main() {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = flags.parse(&args) {
        eprintln!("minish: {}", e);
        flags.print_help();
        process::exit(1);
    }

    if flags.is_set("help") {
        flags.print_help();
        return;
    }

    if flags.is_set("version") {
        println!("minish {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let default_filter = if flags.is_set("debug") { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&flags) {
        eprintln!("minish: {}", e);
        process::exit(1);
    }
}
