use flowsim_runner::{LadderSimulation, SimulationConfig, SimulationRunner};
use std::time::Duration;

fn print_help() {
    eprintln!(
        r#"Flowsim - synthetic order flow against a simulated AMM pool

USAGE:
    flowsim [OPTIONS]

OPTIONS:
    --config <PATH>         Load configuration from JSON file
    --seed <N>              RNG seed (overrides the config file)
    --duration-secs <N>     Stop after N seconds (default: run until Ctrl-C)
    --help                  Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Log level filter (default: info)

EXAMPLES:
    # Run with defaults until Ctrl-C
    flowsim

    # Reproducible 30 second run
    flowsim --config flowsim.json --seed 42 --duration-secs 30
"#
    );
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let Some(raw) = args.get(i) else {
        eprintln!("Error: {} requires a value", flag);
        std::process::exit(1);
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Error: {} expects a number, got '{}'", flag, raw);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut duration: Option<Duration> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_number(&args, i, "--seed"));
            }
            "--duration-secs" => {
                i += 1;
                duration = Some(Duration::from_secs(parse_number(&args, i, "--duration-secs")));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            SimulationConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            SimulationConfig::default()
        }
    };
    if seed.is_some() {
        config.seed = seed;
    }

    let sim = match LadderSimulation::from_config(&config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to set up simulation: {}", e);
            std::process::exit(1);
        }
    };

    let (handle, task) = SimulationRunner::spawn(sim, config.pacing.clone());

    // Log every published snapshot
    let mut snapshots = handle.subscribe();
    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            if let Some(snapshot) = snapshots.borrow_and_update().as_ref() {
                log::info!("{}", snapshot);
            }
        }
    });

    match duration {
        Some(duration) => {
            log::info!("Running for {}s", duration.as_secs());
            tokio::time::sleep(duration).await;
        }
        None => {
            log::info!("Running. Press Ctrl+C to stop.");
            tokio::signal::ctrl_c().await?;
        }
    }

    // The driver may already have exited on a fatal error
    let _ = handle.stop().await;
    drop(handle);

    let outcome = task.await?;
    printer.abort();

    match outcome {
        Ok(summary) => {
            log::info!(
                "Done: {} trades, {} days completed",
                summary.trades,
                summary.days_completed
            );
            log::info!("Final: {}", summary.final_snapshot);
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
