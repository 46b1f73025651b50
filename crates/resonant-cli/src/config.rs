//! TOML configuration deserialisation for dispersive-medium runs.

use resonant_geometry::Dimensionality;
use resonant_materials::RegionProfile;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub grid: GridConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub excitation: ExcitationConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid shape and resolution.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// "1d", "2d", "3d" or "cylindrical".
    pub dimensionality: Dimensionality,
    #[serde(default)]
    pub nx: usize,
    #[serde(default)]
    pub ny: usize,
    #[serde(default)]
    pub nr: usize,
    #[serde(default)]
    pub nz: usize,
    /// Grid points per unit length (default: 10).
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

fn default_resolution() -> f64 {
    10.0
}

/// Background permittivity and Lorentz oscillators.
#[derive(Debug, Deserialize)]
pub struct MaterialConfig {
    /// Uniform background permittivity (default: 1).
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Spatially varying permittivity; overrides `epsilon` where given.
    #[serde(default)]
    pub epsilon_profile: Option<RegionProfile>,
    #[serde(default)]
    pub oscillator: Vec<OscillatorConfig>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            epsilon_profile: None,
            oscillator: Vec::new(),
        }
    }
}

fn default_epsilon() -> f64 {
    1.0
}

/// One Lorentz resonance, frequencies in units of c/a0.
#[derive(Debug, Deserialize)]
pub struct OscillatorConfig {
    pub omega: f64,
    #[serde(default)]
    pub gamma: f64,
    pub delta_epsilon: f64,
    /// Spatial shape of the oscillator (default: uniform, strength 1).
    #[serde(default)]
    pub profile: Option<RegionProfile>,
}

/// Initial electric field.
#[derive(Debug, Deserialize)]
pub struct ExcitationConfig {
    #[serde(default)]
    pub shape: ExcitationShape,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Phase in radians; only meaningful for complex runs.
    #[serde(default)]
    pub phase: f64,
    /// Gaussian centre as (r | x, z).
    #[serde(default)]
    pub centre: [f64; 2],
    /// Gaussian 1/e half-width.
    #[serde(default = "default_width")]
    pub width: f64,
}

impl Default for ExcitationConfig {
    fn default() -> Self {
        Self {
            shape: ExcitationShape::default(),
            amplitude: default_amplitude(),
            phase: 0.0,
            centre: [0.0; 2],
            width: default_width(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcitationShape {
    #[default]
    Uniform,
    Gaussian,
}

fn default_amplitude() -> f64 {
    1.0
}
fn default_width() -> f64 {
    1.0
}

/// Stepping and probing.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Number of polarization steps (default: 100).
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Grid point index recorded every step (default: 0).
    #[serde(default)]
    pub probe: usize,
    /// Use complex (time-harmonic) fields (default: false).
    #[serde(default)]
    pub complex: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            probe: 0,
            complex: false,
        }
    }
}

fn default_steps() -> usize {
    100
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the probe trace as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save the probe trace as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonant_geometry::Region;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let job: JobConfig = toml::from_str(
            r#"
            [grid]
            dimensionality = "1d"
            nz = 20
            "#,
        )
        .unwrap();
        assert_eq!(job.grid.dimensionality, Dimensionality::D1);
        assert_eq!(job.grid.resolution, 10.0);
        assert_eq!(job.material.epsilon, 1.0);
        assert!(job.material.oscillator.is_empty());
        assert_eq!(job.excitation.shape, ExcitationShape::Uniform);
        assert_eq!(job.run.steps, 100);
        assert!(!job.run.complex);
        assert!(job.output.save_csv);
        assert!(!job.output.save_json);
    }

    #[test]
    fn test_full_config() {
        let job: JobConfig = toml::from_str(
            r#"
            [grid]
            dimensionality = "cylindrical"
            nr = 8
            nz = 16
            resolution = 4.0

            [material]
            epsilon = 2.25

            [[material.oscillator]]
            omega = 0.8
            gamma = 0.02
            delta_epsilon = 3.0

            [[material.oscillator]]
            omega = 1.5
            delta_epsilon = 0.5
            [material.oscillator.profile]
            value = 2.0
            [material.oscillator.profile.region]
            type = "disk"
            radius = 1.0

            [excitation]
            shape = "gaussian"
            centre = [0.0, 2.0]
            width = 0.5
            phase = 1.57

            [run]
            steps = 250
            probe = 12
            complex = true

            [output]
            directory = "runs/disk"
            save_json = true
            "#,
        )
        .unwrap();

        assert_eq!(job.grid.dimensionality, Dimensionality::Cylindrical);
        assert_eq!(job.material.oscillator.len(), 2);
        assert!(job.material.oscillator[0].profile.is_none());
        assert_eq!(job.material.oscillator[1].gamma, 0.0);

        let profile = job.material.oscillator[1].profile.as_ref().unwrap();
        assert_eq!(profile.value, 2.0);
        assert!(matches!(profile.region, Region::Disk(_)));

        assert_eq!(job.excitation.shape, ExcitationShape::Gaussian);
        assert_eq!(job.excitation.centre, [0.0, 2.0]);
        assert_eq!(job.run.probe, 12);
        assert!(job.run.complex);
        assert_eq!(job.output.directory, "runs/disk");
    }

    #[test]
    fn test_missing_grid_is_rejected() {
        let result: Result<JobConfig, _> = toml::from_str("[run]\nsteps = 3\n");
        assert!(result.is_err());
    }
}
