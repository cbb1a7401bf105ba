//! Lane parity checker.
//!
//! Draws seeded random lane blocks and runs every [`LaneOps`] operation
//! through both the dispatched path and [`lanes::scalar`], comparing the
//! results bit for bit. It also checks the two Vector3 guarantees built on
//! top of the lanes: the fixed-order dot product and the zero padding lane.
//!
//! With the `simd` feature off both sides are the same code and every case
//! passes trivially; [`ParityReport::simd_enabled`] records which path ran.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigError, ParityConfig};
use crate::lanes::{self, scalar, LaneOps, Lanes};
use crate::scalar::Real;
use crate::vector3::Vector3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Passed,
    Failed,
}

/// Outcome of one operation on one element type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParityCase {
    /// Operation name, e.g. `add` or `vector3_dot`.
    pub op: String,
    /// `f32` or `f64`.
    pub element: String,
    pub status: CaseStatus,
    pub samples: u32,
    pub mismatches: u32,
    /// Inputs and both outputs of the first mismatch.
    pub first_mismatch: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParityStats {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub total_duration: Duration,
}

impl ParityStats {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }

    pub fn add_case(&mut self, case: &ParityCase) {
        self.total += 1;
        self.total_duration += case.duration;
        match case.status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParityReport {
    pub seed: u64,
    pub samples: u32,
    /// Whether the SSE2 bodies were compiled in for this run.
    pub simd_enabled: bool,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub cases: Vec<ParityCase>,
}

impl ParityReport {
    pub fn overall_stats(&self) -> ParityStats {
        let mut stats = ParityStats::default();
        for case in &self.cases {
            stats.add_case(case);
        }
        stats
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.status == CaseStatus::Passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ParityCase> {
        self.cases.iter().filter(|c| c.status == CaseStatus::Failed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Float element the checker knows how to draw and compare.
trait Sample: Real {
    const NAME: &'static str;

    fn from_sample(v: f64) -> Self;

    /// Bit equality, with any NaN matching any NaN.
    fn same_bits(a: Self, b: Self) -> bool;
}

impl Sample for f32 {
    const NAME: &'static str = "f32";

    fn from_sample(v: f64) -> Self {
        v as f32
    }

    fn same_bits(a: Self, b: Self) -> bool {
        a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
    }
}

impl Sample for f64 {
    const NAME: &'static str = "f64";

    fn from_sample(v: f64) -> Self {
        v
    }

    fn same_bits(a: Self, b: Self) -> bool {
        a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
    }
}

/// Values uniform sampling practically never hits but where min/max and
/// division behave differently.
const SPECIALS: [f64; 7] = [
    0.0,
    -0.0,
    1.0,
    -1.0,
    f64::INFINITY,
    f64::NEG_INFINITY,
    f64::MIN_POSITIVE,
];

fn sample_value<T: Sample>(rng: &mut StdRng, magnitude: f64) -> T {
    if rng.gen_ratio(1, 16) {
        T::from_sample(SPECIALS[rng.gen_range(0..SPECIALS.len())])
    } else {
        T::from_sample(rng.gen_range(-magnitude..=magnitude))
    }
}

fn sample_lanes<T: Sample>(rng: &mut StdRng, magnitude: f64) -> Lanes<T> {
    Lanes(std::array::from_fn(|_| sample_value(rng, magnitude)))
}

fn sample_vec3<T: Sample>(rng: &mut StdRng, magnitude: f64) -> Vector3<T> {
    Vector3::new(
        sample_value(rng, magnitude),
        sample_value(rng, magnitude),
        sample_value(rng, magnitude),
    )
}

fn lanes_match<T: Sample>(a: &Lanes<T>, b: &Lanes<T>) -> bool {
    a.0.iter().zip(b.0.iter()).all(|(&x, &y)| T::same_bits(x, y))
}

fn run_case(
    op: &str,
    element: &str,
    samples: u32,
    mut trial: impl FnMut() -> Option<String>,
) -> ParityCase {
    let start = Instant::now();
    let mut mismatches = 0;
    let mut first_mismatch = None;
    for _ in 0..samples {
        if let Some(detail) = trial() {
            mismatches += 1;
            if first_mismatch.is_none() {
                first_mismatch = Some(detail);
            }
        }
    }

    let status = if mismatches == 0 {
        debug!(op, element, samples, "lane parity ok");
        CaseStatus::Passed
    } else {
        warn!(op, element, mismatches, samples, "lane parity mismatch");
        CaseStatus::Failed
    };

    ParityCase {
        op: op.to_string(),
        element: element.to_string(),
        status,
        samples,
        mismatches,
        first_mismatch,
        duration: start.elapsed(),
    }
}

type BinaryOp<T> = fn(&Lanes<T>, &Lanes<T>) -> Lanes<T>;
type BroadcastOp<T> = fn(&Lanes<T>, T) -> Lanes<T>;

fn check_element<T: Sample>(rng: &mut StdRng, cfg: &ParityConfig, cases: &mut Vec<ParityCase>) {
    let (n, m) = (cfg.samples, cfg.magnitude);

    let binary: [(&str, BinaryOp<T>, BinaryOp<T>); 6] = [
        ("add", T::add_lanes, scalar::add::<T>),
        ("sub", T::sub_lanes, scalar::sub::<T>),
        ("mul", T::mul_lanes, scalar::mul::<T>),
        ("div", T::div_lanes, scalar::div::<T>),
        ("min", T::min_lanes, scalar::min::<T>),
        ("max", T::max_lanes, scalar::max::<T>),
    ];
    for (op, dispatched, reference) in binary {
        cases.push(run_case(op, T::NAME, n, || {
            let a = sample_lanes::<T>(rng, m);
            let b = sample_lanes::<T>(rng, m);
            let (got, want) = (dispatched(&a, &b), reference(&a, &b));
            (!lanes_match(&got, &want)).then(|| {
                format!("a={:?} b={:?} dispatched={:?} scalar={:?}", a.0, b.0, got.0, want.0)
            })
        }));
    }

    let broadcast: [(&str, BroadcastOp<T>, BroadcastOp<T>); 2] = [
        ("scale", T::scale_lanes, scalar::scale::<T>),
        ("div_scalar", T::div_scalar_lanes, scalar::div_scalar::<T>),
    ];
    for (op, dispatched, reference) in broadcast {
        cases.push(run_case(op, T::NAME, n, || {
            let a = sample_lanes::<T>(rng, m);
            let s = sample_value::<T>(rng, m);
            let (got, want) = (dispatched(&a, s), reference(&a, s));
            (!lanes_match(&got, &want)).then(|| {
                format!("a={:?} s={:?} dispatched={:?} scalar={:?}", a.0, s, got.0, want.0)
            })
        }));
    }

    cases.push(run_case("vector3_dot", T::NAME, n, || {
        let a = sample_vec3::<T>(rng, m);
        let b = sample_vec3::<T>(rng, m);
        let got = a.dot(b);
        let want = a.x() * b.x() + a.y() * b.y() + a.z() * b.z();
        (!T::same_bits(got, want)).then(|| format!("a={a:?} b={b:?} dot={got:?} scalar={want:?}"))
    }));

    cases.push(run_case("vector3_padding", T::NAME, n, || {
        let a = sample_vec3::<T>(rng, m);
        let b = sample_vec3::<T>(rng, m);
        let results = [
            a + b,
            a - b,
            a * b,
            a / b,
            a.min(b),
            a.max(b),
            a * b.x(),
            a / b.y(),
        ];
        results
            .iter()
            .position(|v| !T::same_bits(v.lanes().0[3], T::ZERO))
            .map(|i| format!("result #{i} wrote the padding lane for a={a:?} b={b:?}"))
    }));
}

/// Runs every parity case for `f32` and `f64`.
///
/// Fails only when `cfg` does not validate.
pub fn run(cfg: &ParityConfig) -> Result<ParityReport, ConfigError> {
    cfg.validate()?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut cases = Vec::new();
    check_element::<f32>(&mut rng, cfg, &mut cases);
    check_element::<f64>(&mut rng, cfg, &mut cases);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(ParityReport {
        seed: cfg.seed,
        samples: cfg.samples,
        simd_enabled: lanes::SIMD_ENABLED,
        timestamp,
        cases,
    })
}
