//! APEX Pipeline Simulator CLI.
//!
//! The main executable for the simulator. It handles command-line argument
//! parsing, program loading, and the main simulation loop.
//!
//! # Usage
//!
//! ```text
//! apex-sim programs/arith_chain.asm --mode display --cycles 100
//! apex-sim programs/load_store.asm --forwarding true --json
//! ```
//!
//! Settings may also come from a TOML file via `--config`; explicit flags
//! override file values.

use std::{fs, process};

use clap::Parser;

use apex_sim::common::error::SimError;
use apex_sim::config::{Config, SimMode};
use apex_sim::core::Cpu;
use apex_sim::sim::loader;
use apex_sim::sim::report::FinalState;

/// Command-line arguments for the APEX pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "APEX cycle-accurate pipeline simulator")]
struct Args {
    /// Assembled program file, one instruction per line (e.g. `MOVC,R1,#5`).
    file: String,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Trace emission mode.
    #[arg(long, value_enum)]
    mode: Option<SimMode>,

    /// Cycle budget override.
    #[arg(long)]
    cycles: Option<u64>,

    /// Enable or disable the forwarding network.
    #[arg(long)]
    forwarding: Option<bool>,

    /// Emit the final architectural state as JSON instead of the table.
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("[!] FATAL: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&text).map_err(|source| SimError::ConfigParse {
                path: path.clone(),
                source,
            })?
        }
        None => Config::default(),
    };
    if let Some(mode) = args.mode {
        config.general.mode = mode;
    }
    if let Some(cycles) = args.cycles {
        config.pipeline.cycle_limit = cycles;
    }
    if let Some(forwarding) = args.forwarding {
        config.pipeline.forwarding = forwarding;
    }

    let program = loader::load_program(&args.file)?;

    println!("Global Configuration");
    println!("--------------------");
    println!("General:");
    println!("  Program:      {}", args.file);
    println!(
        "  Mode:         {}",
        match config.general.mode {
            SimMode::Display => "display",
            SimMode::Silent => "silent",
        }
    );
    println!("Pipeline:");
    println!(
        "  Forwarding:   {}",
        if config.pipeline.forwarding {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Cycle limit:  {}", config.pipeline.cycle_limit);
    println!("--------------------");
    loader::print_listing(&program);

    let mut cpu = Cpu::new(program, &config);
    let reason = cpu.run();

    let state = FinalState::capture(&cpu);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        state.print();
    }
    cpu.stats.print();
    println!("\n(apex) >> Simulation Complete: {}", reason);
    Ok(())
}
