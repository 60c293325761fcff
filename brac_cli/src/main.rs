use brac_core::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brac")]
#[command(about = "Blood and breath alcohol concentration simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print a summary
    Simulate {
        /// Scenario file (TOML); replaces the config file's values
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Built-in intake pattern (see `brac presets`)
        #[arg(long)]
        preset: Option<String>,

        /// Simulated time in hours
        #[arg(long)]
        duration: Option<f64>,

        /// Integration step in hours
        #[arg(long)]
        step: Option<f64>,

        /// Elimination law (saturable, constant-rate, proportional)
        #[arg(long)]
        mode: Option<String>,

        /// Write the time series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List the beverage catalog
    Beverages,

    /// List the built-in presets
    Presets,
}

fn main() -> Result<()> {
    // Initialize logging
    brac_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Simulate {
            scenario,
            preset,
            duration,
            step,
            mode,
            csv,
        } => cmd_simulate(config, scenario, preset, duration, step, mode, csv),
        Commands::Beverages => cmd_beverages(&config),
        Commands::Presets => cmd_presets(),
    }
}

fn cmd_simulate(
    config: Config,
    scenario: Option<PathBuf>,
    preset: Option<String>,
    duration: Option<f64>,
    step: Option<f64>,
    mode: Option<String>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let mut config = match scenario {
        Some(path) => Config::load_from(&path)?,
        None => config,
    };

    if let Some(name) = preset {
        let preset = find_preset(&name)
            .ok_or_else(|| Error::Config(format!("Unknown preset: {}", name)))?;
        preset.apply(&mut config.model);
        config.intakes = preset.intakes;
    }

    if let Some(duration) = duration {
        config.simulation.duration_h = duration;
    }
    if let Some(step) = step {
        config.simulation.step_h = step;
    }
    if let Some(mode) = mode {
        config.model.elimination_mode = mode.parse()?;
    }

    if config.intakes.is_empty() {
        tracing::warn!("No intakes given; concentration stays at zero");
    }

    let errors = config.validate();
    if !errors.is_empty() {
        eprintln!("Scenario validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid scenario".into()));
    }

    let output = config.simulate()?;
    let summary = Summary::from_output(&output, &config.limits);

    display_summary(&config, &output, &summary);

    if let Some(path) = csv {
        let count = write_csv(&path, &output)?;
        println!("✓ Wrote {} samples to {}", count, path.display());
    }

    Ok(())
}

fn cmd_beverages(config: &Config) -> Result<()> {
    let catalog = config.catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid beverage catalog".into()));
    }

    for (name, abv) in catalog.iter() {
        println!("  {:<12} {:>5.1}%", name, abv * 100.0);
    }
    Ok(())
}

fn cmd_presets() -> Result<()> {
    for preset in list_presets() {
        println!("  {:<16} {}", preset.name, preset.description);
    }
    Ok(())
}

fn display_summary(config: &Config, output: &SimulationOutput, summary: &Summary) {
    let subject = &config.subject;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  ALCOHOL SIMULATION");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Subject: {:?}, {} kg, {} cm, {} y (Vd {:.1} L)",
        subject.sex,
        subject.weight_kg,
        subject.height_cm,
        subject.age_years,
        output.volume_of_distribution
    );
    println!(
        "  Intakes: {}   Elimination: {:?}   BBR: {:.0}",
        config.intakes.len(),
        config.model.elimination_mode,
        output.effective_bbr
    );
    println!(
        "  Horizon: {} h at {} h steps ({} samples)",
        config.simulation.duration_h,
        config.simulation.step_h,
        output.len()
    );
    println!();

    match &summary.peak {
        Some(peak) => {
            println!("  Peak BrAC:   {:.3} mg/L", peak.brac_mg_per_l);
            println!("  t(peak):     {:.2} h", peak.time_h);
            println!("  BAC at peak: {:.3} g/L", peak.bac_g_per_l);
        }
        None => println!("  No samples"),
    }

    println!();
    println!(
        "  Above BrAC limit ({:.2} mg/L): {:.2} h",
        summary.limits.brac_mg_per_l, summary.hours_above_brac_limit
    );
    println!(
        "  Above BAC limit ({:.2} g/L):   {:.2} h",
        summary.limits.bac_g_per_l, summary.hours_above_bac_limit
    );
    if summary.brac_over_limit_at_end {
        println!(
            "  BrAC still above limit at {:.2} h (end of run)",
            config.simulation.duration_h
        );
    } else if let Some(t) = summary.brac_clear_after_h {
        println!("  BrAC below limit after:     {:.2} h", t);
    }

    println!();
    println!("  ℹ Estimate only. Not a substitute for an official test.");
    println!();
}
