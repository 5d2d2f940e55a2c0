use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

const PIXELS: usize = 512;
const POSITIONS: usize = 60;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// One delay-stage trace: a ground-state bleach that recovers with delay and
/// an excited-state band that grows in, plus detector noise.
fn generate_trace(position: usize, noise: &mut DetectorNoise) -> Vec<f64> {
    let t = position as f64;
    let decay = (-t / 18.0).exp();
    let rise = 1.0 - (-t / 6.0).exp();
    (0..PIXELS)
        .map(|px| {
            let x = px as f64;
            let bleach = gaussian(x, 180.0, 25.0, 40.0 * decay);
            let band = gaussian(x, 330.0 + 0.4 * t, 40.0, 25.0 * rise * decay.sqrt());
            10.0 + bleach + band + noise.sample()
        })
        .collect()
}

/// Seeded detector noise: splitmix64 uniforms fed through Box-Muller.
struct DetectorNoise {
    state: u64,
    sigma: f64,
}

impl DetectorNoise {
    fn new(seed: u64, sigma: f64) -> Self {
        DetectorNoise { state: seed, sigma }
    }

    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    fn sample(&mut self) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        self.sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

fn main() -> Result<()> {
    let folder = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_trial"));
    std::fs::create_dir_all(&folder)
        .with_context(|| format!("creating {}", folder.display()))?;

    let mut noise = DetectorNoise::new(42, 0.4);

    // Header-only positions table: p0, p1, ...
    let header: Vec<String> = (0..POSITIONS).map(|p| format!("p{p}")).collect();
    let positions_path = folder.join("positions");
    std::fs::write(&positions_path, header.join("\t") + "\n")
        .with_context(|| format!("writing {}", positions_path.display()))?;

    // One line per position, pixels along the line.
    let mut spectrum = String::new();
    for position in 0..POSITIONS {
        let trace = generate_trace(position, &mut noise);
        let line: Vec<String> = trace.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(spectrum, "{}", line.join("\t"))?;
    }
    let spectrum_path = folder.join("spectrum");
    std::fs::write(&spectrum_path, spectrum)
        .with_context(|| format!("writing {}", spectrum_path.display()))?;

    println!(
        "Wrote {POSITIONS} positions ({PIXELS} pixels each) to {}",
        folder.display()
    );
    Ok(())
}
