//! Synthetic prompt traffic with a time-of-day load pattern.
//!
//! [`TrafficGenerator::sample`] produces one [`Prompt`] per call as a pure
//! function of the supplied RNG stream — never its own global randomness —
//! so a fixed seed reproduces an identical episode.  The sequence is lazy
//! and effectively infinite; restart by re-seeding the stream.
//!
//! Feature distributions:
//! - **length** ~ Beta(2, 3), clipped to `[0, 1]`.
//! - **complexity** ~ Beta(2, 5) — right-skewed, mostly easy prompts with an
//!   occasional hard one — shifted upward during high-load hours and clipped.
//! - **required_quality** — monotone non-decreasing in complexity plus
//!   bounded Gaussian noise, clipped.  Harder prompts demand higher quality;
//!   peak-hour traffic shifts requirements upward.
//!
//! All sampling consumes the single caller-supplied stream and nothing
//! else, so an identical call sequence against an identically seeded stream
//! replays the exact same prompts.

use rand::rngs::StdRng;
use rand_distr::{Beta, Distribution, Normal};

use crate::EnvError;

/// A single incoming prompt.
///
/// Created per step and consumed immediately by the environment; not
/// persisted beyond one step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prompt {
    /// Normalized length in `[0, 1]`.
    pub length: f64,
    /// Complexity in `[0, 1]` (beta distributed, right-skewed).
    pub complexity: f64,
    /// Minimum acceptable quality for this prompt, in `[0, 1]`.
    pub required_quality: f64,
}

/// Shape parameters for the traffic distributions.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficConfig {
    /// Beta alpha for complexity (must be > 0).
    pub complexity_alpha: f64,
    /// Beta beta for complexity (must be > 0).
    pub complexity_beta: f64,
    /// Beta alpha for length (must be > 0).
    pub length_alpha: f64,
    /// Beta beta for length (must be > 0).
    pub length_beta: f64,
    /// Std dev of the noise added to required_quality (must be ≥ 0).
    pub quality_noise_std: f64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            complexity_alpha: 2.0,
            complexity_beta: 5.0,
            length_alpha: 2.0,
            length_beta: 3.0,
            quality_noise_std: 0.05,
        }
    }
}

impl TrafficConfig {
    /// Reject non-positive shapes and negative noise.
    pub fn validate(&self) -> Result<(), EnvError> {
        for (name, v) in [
            ("complexity_alpha", self.complexity_alpha),
            ("complexity_beta", self.complexity_beta),
            ("length_alpha", self.length_alpha),
            ("length_beta", self.length_beta),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(EnvError::InvalidConfig(format!(
                    "traffic: {name} must be > 0, got {v}"
                )));
            }
        }
        if !(self.quality_noise_std.is_finite() && self.quality_noise_std >= 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "traffic: quality_noise_std must be >= 0, got {}",
                self.quality_noise_std
            )));
        }
        Ok(())
    }
}

/// Prompt source for the environment.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    cfg: TrafficConfig,
}

impl TrafficGenerator {
    pub fn new(cfg: TrafficConfig) -> Result<Self, EnvError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Load factor at the given time of day, in `[0.1, 1.0]`.
    ///
    /// A deterministic sinusoid peaking at business hours (t ≈ 0.375 ≈ 9am)
    /// and bottoming out at t ≈ 0.875 (9pm).  Stochasticity is deliberately
    /// kept out of this method: it never consumes from the RNG stream.
    pub fn load_factor(&self, time_of_day: f64) -> f64 {
        let base = 0.5 + 0.4 * (2.0 * std::f64::consts::PI * (time_of_day - 0.125)).sin();
        base.clamp(0.1, 1.0)
    }

    /// Sample one prompt at the given time of day.
    ///
    /// `time_of_day` is normalized `[0, 1)` (0 = midnight, 0.5 = noon).
    /// High-load hours produce slightly harder prompts and higher quality
    /// requirements.
    pub fn sample(&self, time_of_day: f64, rng: &mut StdRng) -> Prompt {
        let load = self.load_factor(time_of_day);

        let complexity_raw = sample_beta(self.cfg.complexity_alpha, self.cfg.complexity_beta, rng);
        let complexity = (complexity_raw + (load - 0.5) * 0.2).clamp(0.0, 1.0);

        let length = sample_beta(self.cfg.length_alpha, self.cfg.length_beta, rng);

        let quality_base = 0.5 + 0.4 * complexity + 0.1 * (load - 0.5);
        let quality_noise = sample_normal(0.0, self.cfg.quality_noise_std, rng);
        let required_quality = (quality_base + quality_noise).clamp(0.0, 1.0);

        Prompt {
            length,
            complexity,
            required_quality,
        }
    }
}

impl Default for TrafficGenerator {
    fn default() -> Self {
        // Default shapes are valid by construction.
        Self {
            cfg: TrafficConfig::default(),
        }
    }
}

fn sample_beta(alpha: f64, beta: f64, rng: &mut StdRng) -> f64 {
    match Beta::new(alpha, beta) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.5, // unreachable for validated configs
    }
}

fn sample_normal(mean: f64, std: f64, rng: &mut StdRng) -> f64 {
    match Normal::new(mean, std) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn mean_of<F: FnMut() -> f64>(n: usize, mut f: F) -> f64 {
        (0..n).map(|_| f()).sum::<f64>() / n as f64
    }

    #[test]
    fn load_factor_stays_in_range() {
        let gen = TrafficGenerator::default();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let lf = gen.load_factor(t);
            assert!((0.1..=1.0).contains(&lf), "load_factor({t}) = {lf}");
        }
    }

    #[test]
    fn load_peaks_at_business_hours() {
        let gen = TrafficGenerator::default();
        // 9am (0.375) vs 3am (0.125, the zero-crossing).
        assert!(gen.load_factor(0.375) > gen.load_factor(0.125));
    }

    #[test]
    fn sampled_prompts_are_bounded() {
        let gen = TrafficGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            let t = (i % 100) as f64 / 100.0;
            let p = gen.sample(t, &mut rng);
            assert!((0.0..=1.0).contains(&p.length));
            assert!((0.0..=1.0).contains(&p.complexity));
            assert!((0.0..=1.0).contains(&p.required_quality));
        }
    }

    #[test]
    fn complexity_higher_at_peak_than_off_peak() {
        let gen = TrafficGenerator::default();
        let mut rng_peak = StdRng::seed_from_u64(0);
        let mut rng_off = StdRng::seed_from_u64(0);
        let peak = mean_of(500, || gen.sample(0.375, &mut rng_peak).complexity);
        let off = mean_of(500, || gen.sample(0.125, &mut rng_off).complexity);
        assert!(peak > off, "peak {peak:.3} <= off-peak {off:.3}");
    }

    #[test]
    fn required_quality_higher_at_peak_than_off_peak() {
        let gen = TrafficGenerator::default();
        let mut rng_peak = StdRng::seed_from_u64(1);
        let mut rng_off = StdRng::seed_from_u64(1);
        let peak = mean_of(500, || gen.sample(0.375, &mut rng_peak).required_quality);
        let off = mean_of(500, || gen.sample(0.125, &mut rng_off).required_quality);
        assert!(peak > off, "peak {peak:.3} <= off-peak {off:.3}");
    }

    #[test]
    fn same_seed_reproduces_the_stream() {
        let gen = TrafficGenerator::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for i in 0..50 {
            let t = i as f64 / 50.0;
            assert_eq!(gen.sample(t, &mut a), gen.sample(t, &mut b));
        }
    }

    #[test]
    fn invalid_shapes_rejected() {
        let bad = TrafficConfig {
            complexity_alpha: 0.0,
            ..TrafficConfig::default()
        };
        assert!(TrafficGenerator::new(bad).is_err());
    }
}
