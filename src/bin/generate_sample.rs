use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use rusty_fast5::data::tree::TreeNode;
use rusty_fast5::ScaleFactors;

const SAMPLE_RATE: f64 = 10_000.0;
const CALIBRATION: ScaleFactors = ScaleFactors {
    offset: 13.0,
    range: 1402.882,
    digitisation: 8192.0,
};

/// Open-pore level followed by blockades: (current in pA, duration in samples).
const LEVELS: [(f64, usize); 7] = [
    (220.0, 4000),
    (95.0, 1200),
    (220.0, 2500),
    (60.0, 800),
    (140.0, 600),
    (220.0, 3000),
    (30.0, 1500),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Quantised ADC counts whose calibrated current follows `LEVELS` plus noise.
fn generate_signal(rng: &mut SimpleRng) -> Vec<f64> {
    let counts_per_pa = CALIBRATION.digitisation / CALIBRATION.range;
    LEVELS
        .iter()
        .flat_map(|&(level, n)| std::iter::repeat(level).take(n))
        .map(|pa| (rng.gauss(pa, 2.5) * counts_per_pa - CALIBRATION.offset).round())
        .collect()
}

fn calibration_group() -> TreeNode {
    TreeNode::group()
        .with_attr("offset", CALIBRATION.offset)
        .with_attr("range", CALIBRATION.range)
        .with_attr("digitisation", CALIBRATION.digitisation)
}

/// Bulk-style file: `Raw/Channel_161/{Signal,Meta}`, rate on `/Meta`.
fn channel_file(signal: Vec<f64>) -> TreeNode {
    TreeNode::group()
        .with_child("Meta", TreeNode::group().with_attr("sample_rate", SAMPLE_RATE))
        .with_child(
            "Raw",
            TreeNode::group().with_child(
                "Channel_161",
                TreeNode::group()
                    .with_child("Signal", TreeNode::dataset(signal))
                    .with_child("Meta", calibration_group()),
            ),
        )
}

/// Single-read file: `Raw/Reads/Read_804/Signal`, calibration and rate under
/// `UniqueGlobalKey`. The rate is stored as text, as MinKNOW does.
fn read_file(signal: Vec<f64>) -> TreeNode {
    let rate = format!("{}", SAMPLE_RATE as i64);
    TreeNode::group()
        .with_child(
            "Raw",
            TreeNode::group().with_child(
                "Reads",
                TreeNode::group().with_child(
                    "Read_804",
                    TreeNode::group().with_child("Signal", TreeNode::dataset(signal)),
                ),
            ),
        )
        .with_child(
            "UniqueGlobalKey",
            TreeNode::group()
                .with_child("channel_id", calibration_group())
                .with_child(
                    "context_tags",
                    TreeNode::group().with_attr("sample_frequency", rate.as_str()),
                ),
        )
}

fn write(tree: &TreeNode, dir: &Path, name: &str) -> Result<()> {
    let path = dir.join(name);
    tree.to_json_file(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let signal = generate_signal(&mut rng);
    let n = signal.len();

    write(&channel_file(signal.clone()), &out_dir, "sample_channel.json")?;
    write(&read_file(signal), &out_dir, "sample_read.json")?;

    println!(
        "Wrote {n} samples at {SAMPLE_RATE} Hz to {}",
        out_dir.display()
    );
    Ok(())
}
