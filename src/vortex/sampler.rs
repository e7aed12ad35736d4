//! Random draws of individual vortex parameters.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::config::VortexStats;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, SamplingError};

/// Fraction of each domain extent that vortex centers may occupy.
pub const CENTER_FRACTION: f64 = 0.8;

/// Parameters of a single Gaussian vortex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexParameters {
    /// Center x coordinate (origin at domain center).
    pub xc: f64,
    /// Center y coordinate (origin at domain center).
    pub yc: f64,
    /// Gaussian e-folding width (> 0).
    pub width: f64,
    /// Signed velocity scale; the sign sets the sense of rotation.
    pub velocity: f64,
}

impl VortexParameters {
    /// Peak free-surface displacement in geostrophic balance:
    /// `f0 * veloc * width * sqrt(e/2) / g`.
    pub fn eta_amplitude(&self, f0: f64, g: f64) -> f64 {
        f0 * self.velocity * self.width * (std::f64::consts::E / 2.0).sqrt() / g
    }

    /// Velocity prefactor `veloc * sqrt(2e)`.
    pub fn velocity_amplitude(&self) -> f64 {
        self.velocity * (2.0 * std::f64::consts::E).sqrt()
    }
}

/// Draws vortex parameters from the configured distributions.
///
/// Each call to [`VortexSampler::sample`] consumes random numbers in a fixed
/// order: center x, center y, width (one or more draws), velocity, sign.
#[derive(Debug, Clone)]
pub struct VortexSampler {
    lx: f64,
    ly: f64,
    width: Normal<f64>,
    velocity: Normal<f64>,
    max_width_draws: u32,
}

impl VortexSampler {
    /// Creates a sampler for the given configuration.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let stats = config.vortices.stats(config.lx, config.f0);
        Self::with_stats(config.lx, config.ly, stats, config.vortices.max_width_draws)
    }

    /// Creates a sampler from explicit statistics.
    pub fn with_stats(
        lx: f64,
        ly: f64,
        stats: VortexStats,
        max_width_draws: u32,
    ) -> Result<Self, ConfigError> {
        let width = Normal::new(stats.mean_width, stats.std_width).map_err(|e| {
            ConfigError::Distribution { name: "vortex width", reason: e.to_string() }
        })?;
        let velocity = Normal::new(stats.mean_velocity, stats.std_velocity).map_err(|e| {
            ConfigError::Distribution { name: "vortex velocity", reason: e.to_string() }
        })?;

        Ok(Self {
            lx,
            ly,
            width,
            velocity,
            max_width_draws,
        })
    }

    /// Samples the parameters of vortex number `index`.
    ///
    /// # Errors
    /// Returns [`SamplingError::WidthExhausted`] if no positive width is drawn
    /// within the configured number of attempts.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
    ) -> Result<VortexParameters, SamplingError> {
        let xc = CENTER_FRACTION * (rng.random::<f64>() - 0.5) * self.lx;
        let yc = CENTER_FRACTION * (rng.random::<f64>() - 0.5) * self.ly;

        let width = sample_positive(&self.width, self.max_width_draws, rng)
            .ok_or(SamplingError::WidthExhausted {
                vortex: index,
                attempts: self.max_width_draws,
            })?;

        let mut velocity = self.velocity.sample(rng);
        if rng.random::<f64>() > 0.5 {
            velocity = -velocity;
        }

        Ok(VortexParameters { xc, yc, width, velocity })
    }
}

/// Draws from `dist` until a strictly positive value appears, at most
/// `max_draws` times.
pub fn sample_positive<D, R>(dist: &D, max_draws: u32, rng: &mut R) -> Option<f64>
where
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    (0..max_draws).map(|_| dist.sample(rng)).find(|&value| value > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vortex::VortexConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn reference_sampler() -> VortexSampler {
        VortexSampler::new(&SimulationConfig::reference()).unwrap()
    }

    #[test]
    fn test_centers_within_bounds() {
        let sampler = reference_sampler();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for i in 0..500 {
            let p = sampler.sample(i, &mut rng).unwrap();
            assert!(p.xc.abs() <= 0.4 * 10.0);
            assert!(p.yc.abs() <= 0.4 * 10.0);
            assert!(p.width > 0.0);
        }
    }

    #[test]
    fn test_both_rotation_senses_occur() {
        let sampler = reference_sampler();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let velocities: Vec<f64> = (0..200)
            .map(|i| sampler.sample(i, &mut rng).unwrap().velocity)
            .collect();
        assert!(velocities.iter().any(|&v| v > 0.0));
        assert!(velocities.iter().any(|&v| v < 0.0));
        // Magnitudes cluster around the mean velocity of 0.03.
        assert!(velocities.iter().all(|v| (v.abs() - 0.03).abs() < 0.01));
    }

    #[test]
    fn test_zero_std_returns_mean_width() {
        let mut config = SimulationConfig::reference();
        config.vortices = VortexConfig {
            width_std_ratio: 0.0,
            ..Default::default()
        };
        let sampler = VortexSampler::new(&config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for i in 0..100 {
            let p = sampler.sample(i, &mut rng).unwrap();
            assert_eq!(p.width, 0.03 * 10.0);
        }
    }

    #[test]
    fn test_sample_positive_exhausts() {
        let dist = Normal::new(-1.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(sample_positive(&dist, 50, &mut rng), None);
    }

    #[test]
    fn test_width_exhaustion_reports_vortex() {
        let stats = VortexStats {
            mean_width: -1.0,
            std_width: 0.0,
            mean_velocity: 0.03,
            std_velocity: 0.0,
        };
        let sampler = VortexSampler::with_stats(10.0, 10.0, stats, 25).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        match sampler.sample(4, &mut rng) {
            Err(SamplingError::WidthExhausted { vortex, attempts }) => {
                assert_eq!(vortex, 4);
                assert_eq!(attempts, 25);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let sampler = reference_sampler();
        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);

        for i in 0..20 {
            assert_eq!(
                sampler.sample(i, &mut rng1).unwrap(),
                sampler.sample(i, &mut rng2).unwrap()
            );
        }
    }

    #[test]
    fn test_balance_amplitudes() {
        let p = VortexParameters { xc: 0.0, yc: 0.0, width: 0.3, velocity: 0.03 };
        let e = std::f64::consts::E;
        let expected_eta = 0.25 * 0.03 * 0.3 * (e / 2.0).sqrt() / 9.81;
        assert!((p.eta_amplitude(0.25, 9.81) - expected_eta).abs() < 1e-15);
        assert!((p.velocity_amplitude() - 0.03 * (2.0 * e).sqrt()).abs() < 1e-15);
    }
}
