//! vortex-init CLI - shallow-water initial-condition generator.
//!
//! Builds a random field of balanced vortices plus a tracer-particle lattice
//! and writes it as `initial_conditions.nc`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use vortex_init::config::SimulationConfig;
use vortex_init::error::ConfigError;
use vortex_init::export::{export_initial_state, DEFAULT_FILE_NAME};
use vortex_init::particles::lattice_side;
use vortex_init::pipeline::Pipeline;
use vortex_init::state::InitialState;

/// Shallow-water initial-condition generator.
#[derive(Parser)]
#[command(name = "vortex-init")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an initial-conditions file.
    Generate {
        #[command(flatten)]
        params: ConfigArgs,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file path.
        #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
        output: PathBuf,
    },

    /// Display derived grid, vortex and particle parameters.
    Info {
        #[command(flatten)]
        params: ConfigArgs,

        /// Print the resolved configuration as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Configuration sources shared by all subcommands.
#[derive(Args)]
struct ConfigArgs {
    /// JSON configuration file; the flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid cells along x.
    #[arg(long)]
    nx: Option<usize>,

    /// Grid cells along y.
    #[arg(long)]
    ny: Option<usize>,

    /// Domain length along x (m).
    #[arg(long)]
    lx: Option<f64>,

    /// Domain length along y (m).
    #[arg(long)]
    ly: Option<f64>,

    /// Gravitational acceleration (m/s^2).
    #[arg(long)]
    g: Option<f64>,

    /// Reference depth (m).
    #[arg(long)]
    h0: Option<f64>,

    /// Coriolis parameter (1/s).
    #[arg(long, allow_hyphen_values = true)]
    f0: Option<f64>,

    /// Number of vortices.
    #[arg(long)]
    vortices: Option<usize>,

    /// Rossby number driving the vortex velocity scale.
    #[arg(long)]
    rossby: Option<f64>,

    /// Number of tracer particles (must be a perfect square).
    #[arg(long)]
    particles: Option<usize>,

    /// Minimum inter-particle distance passed to the solver.
    #[arg(long)]
    particle_spacing: Option<f64>,

    /// Output index the solver starts from.
    #[arg(long)]
    output_index: Option<i64>,

    /// Initial simulation time.
    #[arg(long)]
    start_time: Option<f64>,

    /// Final simulation time.
    #[arg(long)]
    final_time: Option<f64>,

    /// Interval between solver outputs.
    #[arg(long)]
    plot_interval: Option<f64>,
}

impl ConfigArgs {
    /// Loads the config file (or the reference run) and applies overrides.
    fn resolve(&self) -> Result<SimulationConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::reference(),
        };

        if let Some(v) = self.nx {
            config.nx = v;
        }
        if let Some(v) = self.ny {
            config.ny = v;
        }
        if let Some(v) = self.lx {
            config.lx = v;
        }
        if let Some(v) = self.ly {
            config.ly = v;
        }
        if let Some(v) = self.g {
            config.g = v;
        }
        if let Some(v) = self.h0 {
            config.h0 = v;
        }
        if let Some(v) = self.f0 {
            config.f0 = v;
        }
        if let Some(v) = self.vortices {
            config.vortices.count = v;
        }
        if let Some(v) = self.rossby {
            config.vortices.rossby = v;
        }
        if let Some(v) = self.particles {
            config.particles.count = v;
        }
        if let Some(v) = self.particle_spacing {
            config.particles.min_spacing = v;
        }
        if let Some(v) = self.output_index {
            config.time.output = v;
        }
        if let Some(v) = self.start_time {
            config.time.time = v;
        }
        if let Some(v) = self.final_time {
            config.time.final_time = v;
        }
        if let Some(v) = self.plot_interval {
            config.time.plot_interval = v;
        }

        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            params,
            seed,
            output,
        } => {
            run_generate(&params, seed, output);
        }
        Commands::Info { params, json } => {
            run_info(&params, json);
        }
    }
}

fn resolve_or_exit(params: &ConfigArgs) -> SimulationConfig {
    params.resolve().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn run_generate(params: &ConfigArgs, seed: Option<u64>, output: PathBuf) {
    let config = resolve_or_exit(params);

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    println!("vortex-init - Shallow-Water Initial Conditions");
    println!("==============================================");
    println!("Grid: {}x{} over {} x {} m", config.nx, config.ny, config.lx, config.ly);
    println!("Vortices: {} (Ro = {})", config.vortices.count, config.vortices.rossby);
    println!("Particles: {}", config.particles.count);
    println!("Seed: {}", seed);
    println!("Output: {}", output.display());

    let start = Instant::now();

    println!("\nRunning generation pipeline...");
    let mut state = InitialState::new(config, seed);
    Pipeline::standard()
        .run_with_callbacks(
            &mut state,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        });

    println!("Generation completed in {:.2?}", start.elapsed());
    if let Some(fields) = &state.fields {
        println!("Max |eta|: {:.4e} m", fields.max_abs_eta());
        println!("Max speed: {:.4e} m/s", fields.max_speed());
    }

    println!("\nWriting {}...", output.display());
    let export_start = Instant::now();
    export_initial_state(&state, &output).unwrap_or_else(|e| {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    });
    println!("Export completed in {:.2?}", export_start.elapsed());
}

fn run_info(params: &ConfigArgs, json: bool) {
    let config = resolve_or_exit(params);

    if json {
        match serde_json::to_string_pretty(&config) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let (dx, dy) = config.spacing();
    let stats = config.vortices.stats(config.lx, config.f0);

    println!("Initial Condition Configuration");
    println!("===============================");
    println!("Grid: {} x {} cells", config.nx, config.ny);
    println!("Domain: {} x {} m", config.lx, config.ly);
    println!("Spacing: dx = {:.6} m, dy = {:.6} m", dx, dy);
    println!("g = {}, H0 = {} m, f0 = {} 1/s", config.g, config.h0, config.f0);
    println!();
    println!("Vortices: {}", config.vortices.count);
    println!("  Width: mean {:.5} m, std {:.5} m", stats.mean_width, stats.std_width);
    println!(
        "  Velocity: mean {:.5} m/s, std {:.5} m/s",
        stats.mean_velocity, stats.std_velocity
    );
    println!(
        "  Resolution: {:.1} cells per mean width",
        stats.mean_width / dx.max(dy)
    );
    println!();
    match lattice_side(config.particles.count) {
        Ok(side) => println!(
            "Particles: {} ({} x {} lattice)",
            config.particles.count, side, side
        ),
        Err(e) => println!("Particles: {} (invalid: {})", config.particles.count, e),
    }
    println!(
        "Time: {} -> {}, output every {}",
        config.time.time, config.time.final_time, config.time.plot_interval
    );

    if let Err(e) = config.validate() {
        println!("\nConfiguration is invalid: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse_params(args: &[&str]) -> ConfigArgs {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Generate { params, .. } | Commands::Info { params, .. } => params,
        }
    }

    #[test]
    fn test_no_flags_gives_reference_run() {
        let config = parse_params(&["vortex-init", "info"]).resolve().unwrap();
        assert_eq!(config, SimulationConfig::reference());
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["vortex-init", "generate"]).unwrap();
        match cli.command {
            Commands::Generate { seed, output, .. } => {
                assert_eq!(seed, None);
                assert_eq!(output, PathBuf::from(DEFAULT_FILE_NAME));
            }
            Commands::Info { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nx": 64, "ny": 48, "f0": 0.5, "vortices": {{"count": 7, "rossby": 0.2}}}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = parse_params(&[
            "vortex-init",
            "generate",
            "--config",
            path,
            "--nx",
            "32",
            "--f0",
            "-0.5",
            "--particles",
            "16",
            "--final-time",
            "50",
        ])
        .resolve()
        .unwrap();

        // Flags win over the file.
        assert_eq!(config.nx, 32);
        assert_eq!(config.f0, -0.5);
        assert_eq!(config.particles.count, 16);
        assert_eq!(config.time.final_time, 50.0);
        // File wins over the defaults.
        assert_eq!(config.ny, 48);
        assert_eq!(config.vortices.count, 7);
        assert_eq!(config.vortices.rossby, 0.2);
        // Untouched values keep the reference run.
        assert_eq!(config.lx, 10.0);
        assert_eq!(config.g, 9.81);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let params = parse_params(&["vortex-init", "info", "-c", path.to_str().unwrap()]);
        assert!(matches!(params.resolve(), Err(ConfigError::Read(_))));
    }
}
