//! Layout of the `initial_conditions` container read by the solver.
//!
//! Variable names, dimension names and units here are the compatibility
//! contract with the downstream solver and must not change.

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::sink::{ExportError, StateSink};
use crate::state::InitialState;

/// Container-level `description` attribute.
pub const DESCRIPTION: &str = "Initial conditions for simulation";

/// Conventional output file name.
pub const DEFAULT_FILE_NAME: &str = "initial_conditions.nc";

pub const DIM_X: &str = "x";
pub const DIM_Y: &str = "y";
pub const DIM_TRAJECTORY: &str = "trajectory";
pub const DIM_CONST: &str = "const";

/// Dimensions of every 2D field, outermost first.
pub const FIELD_DIMS: [&str; 2] = [DIM_Y, DIM_X];

/// 2D fields and their units, in write order.
pub const FIELD_VARIABLES: [(&str, &str); 7] = [
    ("u", "m/s"),
    ("v", "m/s"),
    ("eta", "m"),
    ("tracer", "n/a"),
    ("H", "m"),
    ("b1", "m/s"),
    ("b2", "m/s"),
];

/// Particle position variables over the `trajectory` dimension.
pub const PARTICLE_VARIABLES: [&str; 2] = ["particle_x_position", "particle_y_position"];

/// Integer scalars over the `const` dimension.
pub const INT_SCALARS: [&str; 4] = ["Nx", "Ny", "output", "num_particles"];

/// Real scalars over the `const` dimension.
pub const REAL_SCALARS: [&str; 9] = [
    "Lx",
    "Ly",
    "par_int",
    "g",
    "Hmax",
    "f",
    "time",
    "Tf",
    "plot_interval",
];

/// Added to the master seed for the tracer placeholder draws.
const TRACER_SEED_OFFSET: u64 = 0x7472_6163_6572;

/// Fields the solver expects that carry no physics from this generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaPlaceholders {
    /// Uniform `[0, 1)` passive tracer.
    pub tracer: Array2<f64>,
    /// Constant bathymetry `H = H0`.
    pub bathymetry: Array2<f64>,
    pub b1: Array2<f64>,
    pub b2: Array2<f64>,
}

impl SchemaPlaceholders {
    /// Generates placeholders of `shape` for depth `h0`.
    ///
    /// The tracer is drawn from a generator derived from `seed`, so it is
    /// reproducible and independent of the vortex draws.
    pub fn generate(shape: (usize, usize), h0: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(TRACER_SEED_OFFSET));
        Self {
            tracer: Array2::from_shape_simple_fn(shape, || rng.random::<f64>()),
            bathymetry: Array2::from_elem(shape, h0),
            b1: Array2::zeros(shape),
            b2: Array2::zeros(shape),
        }
    }
}

/// Writes a completed initial state into `sink` using the solver schema.
///
/// # Errors
/// [`ExportError::Incomplete`] if a stage output is missing, otherwise any
/// error raised by the sink.
pub fn write_initial_state<S: StateSink + ?Sized>(
    state: &InitialState,
    sink: &mut S,
) -> Result<(), ExportError> {
    let config = &state.config;
    let grid = state.grid.as_ref().ok_or(ExportError::Incomplete("grid"))?;
    let fields = state.fields.as_ref().ok_or(ExportError::Incomplete("vortex fields"))?;
    let particles = state.particles.as_ref().ok_or(ExportError::Incomplete("particles"))?;

    let placeholders = SchemaPlaceholders::generate(grid.shape(), config.h0, state.seed);

    let [u, v, eta, tracer, bathymetry, b1, b2] = FIELD_VARIABLES;
    let [nx, ny, output, num_particles] = INT_SCALARS;
    let [lx, ly, par_int, g, hmax, f, time, tf, plot_interval] = REAL_SCALARS;
    let [particle_x, particle_y] = PARTICLE_VARIABLES;

    sink.set_description(DESCRIPTION)?;

    sink.add_dimension(DIM_X, grid.nx)?;
    sink.add_dimension(DIM_Y, grid.ny)?;
    sink.add_dimension(DIM_TRAJECTORY, particles.len())?;
    sink.add_dimension(DIM_CONST, 1)?;

    sink.put_field(u.0, FIELD_DIMS, &fields.u, u.1)?;
    sink.put_field(v.0, FIELD_DIMS, &fields.v, v.1)?;
    sink.put_field(eta.0, FIELD_DIMS, &fields.eta, eta.1)?;
    sink.put_field(tracer.0, FIELD_DIMS, &placeholders.tracer, tracer.1)?;

    sink.put_int(nx, DIM_CONST, grid.nx as i64)?;
    sink.put_int(ny, DIM_CONST, grid.ny as i64)?;
    sink.put_int(output, DIM_CONST, config.time.output)?;

    sink.put_real(lx, DIM_CONST, grid.lx)?;
    sink.put_real(ly, DIM_CONST, grid.ly)?;
    sink.put_real(par_int, DIM_CONST, config.particles.min_spacing)?;
    sink.put_real(g, DIM_CONST, config.g)?;

    sink.put_field(bathymetry.0, FIELD_DIMS, &placeholders.bathymetry, bathymetry.1)?;
    sink.put_real(hmax, DIM_CONST, config.h0)?;
    sink.put_field(b1.0, FIELD_DIMS, &placeholders.b1, b1.1)?;
    sink.put_field(b2.0, FIELD_DIMS, &placeholders.b2, b2.1)?;

    sink.put_real(f, DIM_CONST, config.f0)?;
    sink.put_real(time, DIM_CONST, config.time.time)?;
    sink.put_real(tf, DIM_CONST, config.time.final_time)?;
    sink.put_real(plot_interval, DIM_CONST, config.time.plot_interval)?;
    sink.put_int(num_particles, DIM_CONST, particles.len() as i64)?;

    sink.put_series(particle_x, DIM_TRAJECTORY, &particles.x, None)?;
    sink.put_series(particle_y, DIM_TRAJECTORY, &particles.y, None)?;

    Ok(())
}
