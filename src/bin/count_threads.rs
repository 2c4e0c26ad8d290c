use colored::Colorize;
use shared_counter::{
    run, ConsoleObserver, IncrementObserver, Result, RunConfig, SharedCounter, SilentObserver,
};
use std::env;
use std::path::Path;
use std::process;

fn load_config() -> Result<RunConfig> {
    let config = match env::args().nth(1) {
        Some(path) => RunConfig::load(Path::new(&path))?,
        None => RunConfig::default(),
    };
    config.with_env_overrides()
}

fn run_counter() -> Result<i64> {
    let config = load_config()?;
    let console = ConsoleObserver::new(config.color);
    let observer: &dyn IncrementObserver = if config.echo { &console } else { &SilentObserver };

    let counter = SharedCounter::new();
    let report = run(&counter, &config, observer)?;
    if !report.is_consistent() {
        log::error!(
            "lost updates: expected {}, counted {}",
            report.expected,
            report.final_count
        );
    }
    Ok(report.final_count)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run_counter() {
        Ok(total) => println!("Final count = {}", total),
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            process::exit(1);
        }
    }
}
