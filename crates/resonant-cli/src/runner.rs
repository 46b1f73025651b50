//! Run driver: builds the grid, material and fields, then steps the
//! oscillators and records a probe trace.

use std::path::Path;

use anyhow::{Context, Result};
use num_complex::Complex64;
use serde::Serialize;

use resonant_core::{FieldScalar, Fields};
use resonant_geometry::{Dimensionality, Volume};
use resonant_materials::{Material, Uniform};

use crate::config::{ExcitationConfig, ExcitationShape, GridConfig, JobConfig, MaterialConfig};

/// Probe trace of a run.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub dimensionality: Dimensionality,
    pub complex: bool,
    pub probe: usize,
    /// Electric components present in the grid, in column order.
    pub components: Vec<String>,
    pub num_terms: usize,
    pub samples: Vec<ProbeSample>,
}

/// Values at the probe point after `step` polarization steps.
#[derive(Debug, Serialize)]
pub struct ProbeSample {
    pub step: usize,
    /// `[re, im]` of E for each component.
    pub field: Vec<[f64; 2]>,
    /// `[re, im]` of P, indexed by term then component.
    pub polarization: Vec<Vec<[f64; 2]>>,
}

/// Construct the grid volume described by `[grid]`.
pub fn build_volume(grid: &GridConfig) -> Result<Volume> {
    let a = grid.resolution;
    let volume = match grid.dimensionality {
        Dimensionality::D1 => Volume::d1(grid.nz, a),
        Dimensionality::D2 => Volume::d2(grid.nx, grid.ny, a),
        Dimensionality::D3 => Volume::d3(grid.nx, grid.ny, grid.nz, a),
        Dimensionality::Cylindrical => Volume::cylindrical(grid.nr, grid.nz, a),
    };
    volume.with_context(|| format!("Invalid {} grid", grid.dimensionality))
}

/// Construct the material described by `[material]` over `volume`.
pub fn build_material(volume: Volume, config: &MaterialConfig) -> Result<Material> {
    let mut material = Material::with_epsilon(volume, config.epsilon)
        .context("Invalid background permittivity")?;
    if let Some(profile) = &config.epsilon_profile {
        material
            .set_epsilon(profile)
            .context("Invalid permittivity profile")?;
    }

    for (k, osc) in config.oscillator.iter().enumerate() {
        let added = match &osc.profile {
            Some(profile) => {
                material.add_polarizability(profile, osc.omega, osc.gamma, osc.delta_epsilon)
            }
            None => material.add_polarizability(
                &Uniform(1.0),
                osc.omega,
                osc.gamma,
                osc.delta_epsilon,
            ),
        };
        added.with_context(|| format!("Failed to add oscillator {k}"))?;
    }
    Ok(material)
}

/// Run a job from a parsed configuration.
pub fn run_simulation(job: &JobConfig) -> Result<RunOutput> {
    let volume = build_volume(&job.grid)?;
    println!(
        "Grid: {} with {} points (a = {})",
        volume.dim,
        volume.ntot(),
        volume.a()
    );
    if job.run.probe >= volume.ntot() {
        anyhow::bail!(
            "Probe index {} is outside the grid ({} points)",
            job.run.probe,
            volume.ntot()
        );
    }

    let material = build_material(volume, &job.material)?;
    println!("Oscillators: {}", material.chain().len());

    if job.run.complex {
        run_with::<Complex64>(job, material)
    } else {
        run_with::<f64>(job, material)
    }
}

fn run_with<T: FieldScalar + FromPhasor>(job: &JobConfig, material: Material) -> Result<RunOutput> {
    let mut fields: Fields<T> = Fields::new(material)?;
    let excitation = &job.excitation;
    fields.set_field(|_, x| T::from_phasor(excitation_value(excitation, x)));
    fields.initialize_polarizations()?;

    let probe = job.run.probe;
    let components: Vec<_> = fields.volume().electric_components().collect();
    let mut samples = Vec::with_capacity(job.run.steps + 1);
    samples.push(sample(&fields, &components, probe, 0)?);

    for step in 1..=job.run.steps {
        fields.step_polarizations()?;
        samples.push(sample(&fields, &components, probe, step)?);
    }
    log::info!("Completed {} steps", job.run.steps);

    Ok(RunOutput {
        dimensionality: fields.volume().dim,
        complex: T::IS_COMPLEX,
        probe,
        components: components.iter().map(|c| c.to_string()).collect(),
        num_terms: fields.num_polarization_terms(),
        samples,
    })
}

fn sample<T: FieldScalar>(
    fields: &Fields<T>,
    components: &[resonant_geometry::Component],
    probe: usize,
    step: usize,
) -> Result<ProbeSample> {
    let field = components
        .iter()
        .map(|&c| fields.field_at(c, probe).map(T::parts))
        .collect::<Result<Vec<_>, _>>()?;
    let polarization = (0..fields.num_polarization_terms())
        .map(|k| {
            components
                .iter()
                .map(|&c| fields.polarization_at(k, c, probe).map(T::parts))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProbeSample {
        step,
        field,
        polarization,
    })
}

/// Initial field at a staggered position, as a phasor.
fn excitation_value(excitation: &ExcitationConfig, x: &[f64; 3]) -> Complex64 {
    let envelope = match excitation.shape {
        ExcitationShape::Uniform => 1.0,
        ExcitationShape::Gaussian => {
            let dr = x[0] - excitation.centre[0];
            let dz = x[2] - excitation.centre[1];
            (-(dr * dr + dz * dz) / (excitation.width * excitation.width)).exp()
        }
    };
    Complex64::from_polar(excitation.amplitude * envelope, excitation.phase)
}

/// Conversion of an excitation phasor into a field value.
trait FromPhasor {
    fn from_phasor(z: Complex64) -> Self;
}

impl FromPhasor for f64 {
    fn from_phasor(z: Complex64) -> Self {
        z.re
    }
}

impl FromPhasor for Complex64 {
    fn from_phasor(z: Complex64) -> Self {
        z
    }
}

/// Write the probe trace to a CSV file.
pub fn write_trace_csv(output: &RunOutput, path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    writeln!(file, "# Resonant Lorentz-medium probe trace")?;
    writeln!(
        file,
        "# grid: {} resolution={} probe={}",
        output.dimensionality, job.grid.resolution, output.probe
    )?;
    // Terms are prepended on registration, so P0 is the last oscillator listed
    for (k, osc) in job.material.oscillator.iter().rev().enumerate() {
        writeln!(
            file,
            "# term {}: omega={} gamma={} delta_epsilon={}",
            k, osc.omega, osc.gamma, osc.delta_epsilon
        )?;
    }
    writeln!(file, "#")?;

    let mut header = vec!["step".to_string()];
    let mut columns = |name: String| {
        if output.complex {
            header.push(format!("{name}_re"));
            header.push(format!("{name}_im"));
        } else {
            header.push(name);
        }
    };
    for c in &output.components {
        columns(c.clone());
    }
    for k in 0..output.num_terms {
        for c in &output.components {
            columns(format!("P{k}_{c}"));
        }
    }
    writeln!(file, "{}", header.join(","))?;

    for s in &output.samples {
        let mut row = vec![s.step.to_string()];
        for value in s.field.iter().chain(s.polarization.iter().flatten()) {
            row.push(format!("{:.9e}", value[0]));
            if output.complex {
                row.push(format!("{:.9e}", value[1]));
            }
        }
        writeln!(file, "{}", row.join(","))?;
    }

    println!("Probe trace written to: {}", path.display());
    Ok(())
}

/// Write the probe trace to a JSON file.
pub fn write_trace_json(output: &RunOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(output)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Probe trace (JSON) written to: {}", path.display());
    Ok(())
}
