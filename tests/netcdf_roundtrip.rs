#![cfg(feature = "netcdf")]

use vortex_init::export::{
    export_initial_state, read_initial_conditions, to_memory, ExportError, DEFAULT_FILE_NAME,
    DESCRIPTION,
};
use vortex_init::{generate, InitialState, SimulationConfig};

fn leftover_partials(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
        .count()
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_FILE_NAME);

    let mut config = SimulationConfig::small(12, 5);
    config.ny = 8;
    config.particles.count = 25;
    let state = generate(config, 99).unwrap();

    export_initial_state(&state, &path).unwrap();
    assert!(path.exists());
    assert_eq!(leftover_partials(dir.path()), 0);

    let read = read_initial_conditions(&path).unwrap();
    let expected = to_memory(&state).unwrap();

    assert_eq!(read.description(), Some(DESCRIPTION));
    for name in expected.variable_names() {
        let a = expected.variable(name).unwrap();
        let b = read.variable(name).unwrap();
        assert_eq!(a.dims, b.dims, "{}", name);
        assert_eq!(a.shape, b.shape, "{}", name);
        assert_eq!(a.units, b.units, "{}", name);
        assert_eq!(a.values, b.values, "{}", name);
    }

    assert_eq!(read.int_scalar("Nx"), Some(12));
    assert_eq!(read.int_scalar("Ny"), Some(8));
    assert_eq!(read.int_scalar("num_particles"), Some(25));
    assert_eq!(read.real_scalar("f"), Some(0.25));
}

#[test]
fn test_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_FILE_NAME);
    std::fs::write(&path, b"stale").unwrap();

    let state = generate(SimulationConfig::small(6, 1), 3).unwrap();
    export_initial_state(&state, &path).unwrap();

    let read = read_initial_conditions(&path).unwrap();
    assert_eq!(read.int_scalar("Nx"), Some(6));
}

#[test]
fn test_incomplete_state_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_FILE_NAME);

    let state = InitialState::new(SimulationConfig::small(6, 1), 3);
    assert!(matches!(
        export_initial_state(&state, &path),
        Err(ExportError::Incomplete(_))
    ));
    assert!(!path.exists());
    assert_eq!(leftover_partials(dir.path()), 0);
}

#[test]
fn test_reading_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_initial_conditions(&dir.path().join("absent.nc")).is_err());
}
