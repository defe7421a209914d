//! Piecewise-linear chaotic maps and bit extraction.
//!
//! Two maps drive the channel:
//! - **Skew Bernoulli**: two linear branches split at `c`. Thresholding its
//!   orbit at `t = c` gives an i.i.d. Bernoulli bit sequence with
//!   `P(1) = 1 - c`, because the invariant density is uniform.
//! - **plm3**: three linear branches whose symbolic dynamics around `t`
//!   reproduce a two-state Markov chain with transition probabilities
//!   `P(0 -> 1) = p1` and `P(1 -> 0) = p2`.
//!
//! The logistic map `4x(1 - x)` completes the family.
//!
//! # Domain
//!
//! Every map is closed over [0, 1]. Parameters are checked when a map is
//! constructed; after that, stepping a map only verifies that the incoming
//! state is a number inside the unit interval and reports
//! [`MapError::DomainViolation`] otherwise.

use crate::error::{MapError, Result};

/// A one-dimensional map of the unit interval with a natural bit threshold.
pub trait ChaoticMap {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Apply the map without checking the domain.
    fn apply(&self, x: f64) -> f64;

    /// Threshold at which the orbit's symbolic dynamics carry the target statistics.
    fn threshold(&self) -> Threshold;

    /// Apply the map to a state that must lie in [0, 1].
    ///
    /// # Errors
    /// Returns `MapError::DomainViolation` if `x` is NaN or outside [0, 1].
    fn step(&self, x: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&x) {
            return Err(MapError::DomainViolation {
                map: self.name(),
                state: x,
            }
            .into());
        }
        Ok(self.apply(x))
    }
}

/// Return 0 if `x < t`, else 1.
#[inline]
pub fn threshold(x: f64, t: f64) -> u8 {
    if x < t {
        0
    } else {
        1
    }
}

/// A validated bit threshold in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    /// # Errors
    /// Returns `MapError::InvalidParameter` if `t` is not in [0, 1].
    pub fn new(t: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&t) {
            return Err(MapError::invalid("t", t, "threshold must lie in [0, 1]").into());
        }
        Ok(Self(t))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn bit(&self, x: f64) -> u8 {
        threshold(x, self.0)
    }
}

/// Skew Bernoulli map: `x / c` below the breakpoint, `(x - c) / (1 - c)` above.
#[inline]
pub fn skew_bernoulli(x: f64, c: f64) -> f64 {
    if x < c {
        x / c
    } else {
        (x - c) / (1.0 - c)
    }
}

/// Logistic map at full chaos (`r = 4`).
#[inline]
pub fn logistic(x: f64) -> f64 {
    4.0 * x * (1.0 - x)
}

/// Skew Bernoulli map with a validated breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewBernoulli {
    c: f64,
}

impl SkewBernoulli {
    /// # Errors
    /// Returns `MapError::InvalidParameter` unless `0 < c < 1`.
    pub fn new(c: f64) -> Result<Self> {
        if !(c > 0.0 && c < 1.0) {
            return Err(
                MapError::invalid("c", c, "breakpoint must lie strictly inside (0, 1)").into(),
            );
        }
        Ok(Self { c })
    }

    pub fn breakpoint(&self) -> f64 {
        self.c
    }
}

impl ChaoticMap for SkewBernoulli {
    fn name(&self) -> &'static str {
        "skew Bernoulli"
    }

    #[inline]
    fn apply(&self, x: f64) -> f64 {
        skew_bernoulli(x, self.c)
    }

    fn threshold(&self) -> Threshold {
        Threshold(self.c)
    }
}

/// The logistic map `4x(1 - x)`, thresholded at its critical point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Logistic;

impl ChaoticMap for Logistic {
    fn name(&self) -> &'static str {
        "logistic"
    }

    #[inline]
    fn apply(&self, x: f64) -> f64 {
        logistic(x)
    }

    fn threshold(&self) -> Threshold {
        Threshold(0.5)
    }
}

/// Geometry of the three-piece Markov map, derived from a target chain.
///
/// Built only through [`MarkovParams::derive`], so every value satisfies
/// `0 < c1 < c2 < 1`, and the middle slope `a` is greater than 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkovParams {
    p1: f64,
    p2: f64,
    t: f64,
    a: f64,
    a_positive: bool,
    c1: f64,
    c2: f64,
    a1: f64,
    a2: f64,
}

impl MarkovParams {
    /// Derive the plm3 geometry for transition probabilities
    /// `p1 = P(0 -> 1)` and `p2 = P(1 -> 0)`.
    ///
    /// ```text
    /// t = p2 / (p1 + p2)        a = 1 / (1 - p1 - p2)
    /// c1 = t (1 - 1/a)          c2 = t + (1 - t) / a
    /// a1 = 1 / c1               a2 = 1 / (1 - c2)
    /// ```
    ///
    /// # Errors
    /// Returns `MapError::InvalidParameter` unless `p1 > 0`, `p2 > 0` and
    /// `p1 + p2 < 1`, or if the derived breakpoints are out of order.
    ///
    /// With `p1 + p2 < 1` the middle slope is `a > 1`. Chains with
    /// `p1 + p2 > 1` would need a decreasing middle branch and are rejected.
    pub fn derive(p1: f64, p2: f64) -> Result<Self> {
        const OPEN_UNIT: &str = "transition probability must lie in (0, 1)";
        if !(p1 > 0.0 && p1 < 1.0) {
            return Err(MapError::invalid("p1", p1, OPEN_UNIT).into());
        }
        if !(p2 > 0.0 && p2 < 1.0) {
            return Err(MapError::invalid("p2", p2, OPEN_UNIT).into());
        }
        let sum = p1 + p2;
        if sum >= 1.0 {
            return Err(MapError::invalid(
                "p1 + p2",
                sum,
                "sum of transition probabilities must be below 1",
            )
            .into());
        }

        let t = p2 / sum;
        let a = 1.0 / (1.0 - sum);
        let a_positive = a > 0.0;
        if !a_positive {
            return Err(MapError::invalid("a", a, "middle slope must be positive").into());
        }
        let c1 = t * (1.0 - 1.0 / a);
        let c2 = t + (1.0 - t) / a;

        if !(0.0 < c1 && c1 < c2 && c2 < 1.0) {
            return Err(MapError::invalid(
                "c1",
                c1,
                "derived breakpoints must satisfy 0 < c1 < c2 < 1",
            )
            .into());
        }

        let params = Self {
            p1,
            p2,
            t,
            a,
            a_positive,
            c1,
            c2,
            a1: 1.0 / c1,
            a2: 1.0 / (1.0 - c2),
        };
        tracing::debug!(
            p1,
            p2,
            t,
            a,
            a_positive,
            c1,
            c2,
            a1 = params.a1,
            a2 = params.a2,
            "derived plm3 parameters"
        );
        Ok(params)
    }

    pub fn p1(&self) -> f64 {
        self.p1
    }

    pub fn p2(&self) -> f64 {
        self.p2
    }

    /// Threshold separating state 0 from state 1.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Slope of the middle branch.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Whether the middle branch is increasing; checked by `derive`, so always true.
    pub fn a_positive(&self) -> bool {
        self.a_positive
    }

    pub fn c1(&self) -> f64 {
        self.c1
    }

    pub fn c2(&self) -> f64 {
        self.c2
    }

    pub fn a1(&self) -> f64 {
        self.a1
    }

    pub fn a2(&self) -> f64 {
        self.a2
    }

    /// Stationary probability of state 1, `p1 / (p1 + p2)`.
    pub fn stationary_one(&self) -> f64 {
        self.p1 / (self.p1 + self.p2)
    }
}

/// Three-piece linear Markov map.
#[inline]
pub fn plm3(x: f64, params: &MarkovParams) -> f64 {
    let y = if x < params.c1 {
        params.a1 * x
    } else if x < params.c2 {
        // derive admits only a > 1: the middle branch rises from 0 at c1
        params.a * (x - params.c1)
    } else {
        params.a2 * (x - params.c2)
    };
    // Rounding at the right end of a branch can land one ulp past 1.
    y.min(1.0)
}

impl ChaoticMap for MarkovParams {
    fn name(&self) -> &'static str {
        "plm3"
    }

    #[inline]
    fn apply(&self, x: f64) -> f64 {
        plm3(x, self)
    }

    fn threshold(&self) -> Threshold {
        Threshold(self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn is_invalid_parameter(err: &Error, expected: &str) -> bool {
        matches!(err, Error::Map(MapError::InvalidParameter { name, .. }) if *name == expected)
    }

    #[test]
    fn test_threshold() {
        assert_eq!(threshold(0.2, 0.5), 0);
        assert_eq!(threshold(0.5, 0.5), 1);
        assert_eq!(threshold(0.9, 0.5), 1);
        assert_eq!(threshold(0.0, 0.0), 1);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(is_invalid_parameter(&Threshold::new(1.5).unwrap_err(), "t"));
        assert!(is_invalid_parameter(&Threshold::new(f64::NAN).unwrap_err(), "t"));
    }

    #[test]
    fn test_skew_bernoulli_branches() {
        assert_relative_eq!(skew_bernoulli(0.1, 0.4), 0.25);
        assert_relative_eq!(skew_bernoulli(0.7, 0.4), 0.5);
        assert_eq!(skew_bernoulli(0.0, 0.4), 0.0);
    }

    #[test]
    fn test_skew_bernoulli_rejects_degenerate_breakpoint() {
        for c in [0.0, 1.0, -0.3, 1.2, f64::NAN] {
            let err = SkewBernoulli::new(c).unwrap_err();
            assert!(is_invalid_parameter(&err, "c"), "c = {c} accepted");
        }
    }

    #[test]
    fn test_skew_bernoulli_stays_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let c: f64 = rng.gen_range(0.01..0.99);
            let map = SkewBernoulli::new(c).unwrap();
            for _ in 0..200 {
                let x: f64 = rng.gen_range(0.0..1.0);
                let y = map.step(x).unwrap();
                assert!((0.0..1.0).contains(&y), "c={c} x={x} -> {y}");
            }
        }
    }

    #[test]
    fn test_logistic() {
        assert_relative_eq!(logistic(0.5), 1.0);
        assert_eq!(logistic(0.0), 0.0);
        assert_eq!(logistic(1.0), 0.0);
        assert_eq!(Logistic.threshold().value(), 0.5);
    }

    #[test]
    fn test_derive_known_geometry() {
        let params = MarkovParams::derive(0.4, 0.2).unwrap();

        assert_relative_eq!(params.t(), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(params.a(), 2.5, epsilon = 1e-12);
        assert!(params.a_positive());
        // c1 collapses to p2 and 1 - c2 to p1
        assert_relative_eq!(params.c1(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(params.c2(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(params.a1(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(params.a2(), 2.5, epsilon = 1e-9);
        assert_relative_eq!(params.stationary_one(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derive_rejects_invalid_probabilities() {
        assert!(is_invalid_parameter(&MarkovParams::derive(0.0, 0.3).unwrap_err(), "p1"));
        assert!(is_invalid_parameter(&MarkovParams::derive(0.3, -0.1).unwrap_err(), "p2"));
        assert!(is_invalid_parameter(&MarkovParams::derive(0.6, 0.4).unwrap_err(), "p1 + p2"));
        assert!(is_invalid_parameter(&MarkovParams::derive(0.9, 0.9).unwrap_err(), "p1 + p2"));
        assert!(is_invalid_parameter(&MarkovParams::derive(f64::NAN, 0.1).unwrap_err(), "p1"));
    }

    #[test]
    fn test_plm3_fixed_points() {
        let params = MarkovParams::derive(0.1, 0.3).unwrap();

        assert_eq!(plm3(0.0, &params), 0.0);
        assert_relative_eq!(plm3(1.0, &params), 1.0, epsilon = 1e-12);
        // t is the fixed point of the middle branch
        assert_relative_eq!(plm3(params.t(), &params), params.t(), epsilon = 1e-12);
    }

    #[test]
    fn test_plm3_stays_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let p1: f64 = rng.gen_range(0.01..0.49);
            let p2: f64 = rng.gen_range(0.01..0.49);
            let params = MarkovParams::derive(p1, p2).unwrap();
            assert!(0.0 < params.c1() && params.c1() < params.c2() && params.c2() < 1.0);
            assert!(params.a() > 1.0);

            for _ in 0..200 {
                let x: f64 = rng.gen_range(0.0..=1.0);
                let y = params.step(x).unwrap();
                assert!((0.0..=1.0).contains(&y), "p1={p1} p2={p2} x={x} -> {y}");
            }
        }
    }

    #[test]
    fn test_step_rejects_states_outside_unit_interval() {
        let params = MarkovParams::derive(0.2, 0.2).unwrap();
        for x in [-0.01, 1.0001, f64::NAN, f64::INFINITY] {
            let err = params.step(x).unwrap_err();
            assert!(
                matches!(err, Error::Map(MapError::DomainViolation { map: "plm3", .. })),
                "x = {x} accepted"
            );
        }

        let bernoulli = SkewBernoulli::new(0.3).unwrap();
        assert!(bernoulli.step(2.0).is_err());
    }
}
