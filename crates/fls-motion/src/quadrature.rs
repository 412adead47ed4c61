//! Globally adaptive Gauss–Kronrod quadrature.
//!
//! Each interval is integrated with the 15-point Kronrod rule; the embedded
//! 7-point Gauss rule gives the error estimate.  While the summed error is
//! above tolerance, the interval with the largest error is bisected.  Error
//! scaling follows QUADPACK's `qk15`, which keeps rounding noise in smooth
//! integrands from being mistaken for discretisation error.

use fls_core::SwarmConfig;

use crate::{MotionError, MotionResult};

/// Kronrod abscissae on `[-1, 1]`, descending; odd indices are the Gauss
/// nodes, index 7 is the centre.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_2,
    0.140_653_259_715_525_9,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_8,
];

/// Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]`, and the centre.
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Convergence criteria for [`integrate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerance {
    pub abs: f64,
    pub rel: f64,
    /// Maximum number of intervals the range may be split into.
    pub max_subdivisions: usize,
}

impl Tolerance {
    pub fn from_config(config: &SwarmConfig) -> Self {
        Self {
            abs:              config.abs_tolerance,
            rel:              config.rel_tolerance,
            max_subdivisions: config.max_subdivisions,
        }
    }

    fn target(&self, value: f64) -> f64 {
        self.abs.max(self.rel * value.abs())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::from_config(&SwarmConfig::default())
    }
}

/// A converged integral.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Estimate {
    pub value: f64,
    /// Estimated absolute error.
    pub error: f64,
    /// Number of intervals in the final partition.
    pub subdivisions: usize,
}

#[derive(Copy, Clone, Debug)]
struct Piece {
    a:     f64,
    b:     f64,
    value: f64,
    error: f64,
}

/// Integrate `f` over `[a, b]` (`a < b`).
///
/// `f` is fallible so that curve evaluation errors surface unchanged.
///
/// # Errors
///
/// [`MotionError::Integration`] with the best estimate so far if the
/// tolerance is not met within `tol.max_subdivisions` intervals.
pub fn integrate<F>(mut f: F, a: f64, b: f64, tol: &Tolerance) -> MotionResult<Estimate>
where
    F: FnMut(f64) -> MotionResult<f64>,
{
    let mut pieces = vec![kronrod15(&mut f, a, b)?];

    loop {
        let value: f64 = pieces.iter().map(|p| p.value).sum();
        let error: f64 = pieces.iter().map(|p| p.error).sum();

        if error <= tol.target(value) {
            return Ok(Estimate { value, error, subdivisions: pieces.len() });
        }
        if pieces.len() >= tol.max_subdivisions {
            return Err(MotionError::Integration {
                a,
                b,
                estimate: value,
                error,
                subdivisions: pieces.len(),
            });
        }

        let worst = pieces
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let Piece { a: lo, b: hi, .. } = pieces.swap_remove(worst);
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            // The interval cannot be split further in f64.
            return Err(MotionError::Integration {
                a,
                b,
                estimate: value,
                error,
                subdivisions: pieces.len() + 1,
            });
        }
        pieces.push(kronrod15(&mut f, lo, mid)?);
        pieces.push(kronrod15(&mut f, mid, hi)?);
    }
}

/// One 15-point Kronrod step with QUADPACK error scaling.
fn kronrod15<F>(f: &mut F, a: f64, b: f64) -> MotionResult<Piece>
where
    F: FnMut(f64) -> MotionResult<f64>,
{
    let centre = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let abs_half = half.abs();

    let fc = f(centre)?;
    let mut res_g = fc * WG[3];
    let mut res_k = fc * WGK[7];
    let mut res_abs = res_k.abs();
    let mut fv1 = [0.0; 7];
    let mut fv2 = [0.0; 7];

    for j in 0..3 {
        let k = 2 * j + 1;
        let dx = half * XGK[k];
        let (f1, f2) = (f(centre - dx)?, f(centre + dx)?);
        fv1[k] = f1;
        fv2[k] = f2;
        res_g += WG[j] * (f1 + f2);
        res_k += WGK[k] * (f1 + f2);
        res_abs += WGK[k] * (f1.abs() + f2.abs());
    }
    for j in 0..4 {
        let k = 2 * j;
        let dx = half * XGK[k];
        let (f1, f2) = (f(centre - dx)?, f(centre + dx)?);
        fv1[k] = f1;
        fv2[k] = f2;
        res_k += WGK[k] * (f1 + f2);
        res_abs += WGK[k] * (f1.abs() + f2.abs());
    }

    let mean = 0.5 * res_k;
    let mut res_asc = WGK[7] * (fc - mean).abs();
    for k in 0..7 {
        res_asc += WGK[k] * ((fv1[k] - mean).abs() + (fv2[k] - mean).abs());
    }

    let value = res_k * half;
    res_abs *= abs_half;
    res_asc *= abs_half;
    let mut error = ((res_k - res_g) * half).abs();
    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }

    Ok(Piece { a, b, value, error })
}
