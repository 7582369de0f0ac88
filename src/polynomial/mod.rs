//! Scalar polynomial arithmetic
//!
//! The leaf layer under the piecewise trajectory: every matrix entry of
//! every segment is a [`Polynomial`], expressed in that segment's local
//! time variable.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign};

use approx::AbsDiffEq;
use num_traits::{One, Zero};

/// A univariate polynomial with `f64` coefficients in ascending powers.
///
/// `3 - 2t + t^2` is `Polynomial::new(&[3.0, -2.0, 1.0])`. The coefficient
/// list is never empty (the zero polynomial stores a single `0.0`) and
/// trailing zeros are kept as given, so [`Polynomial::degree`] reports the
/// degree of the stored representation rather than of the reduced
/// polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from ascending-power coefficients.
    ///
    /// An empty slice yields the zero polynomial.
    pub fn new(coefficients: &[f64]) -> Self {
        if coefficients.is_empty() {
            return Self::constant(0.0);
        }
        Polynomial {
            coefficients: coefficients.to_vec(),
        }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: f64) -> Self {
        Polynomial {
            coefficients: vec![c],
        }
    }

    /// The stored coefficients, ascending by power.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// One less than the stored coefficient count.
    ///
    /// Trailing zero coefficients are not trimmed, so this is a positional
    /// degree: `new(&[1.0, 0.0])` reports degree 1.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient of `t^idx`, zero beyond the stored length.
    fn coeff(&self, idx: usize) -> f64 {
        self.coefficients.get(idx).copied().unwrap_or(0.0)
    }

    /// Evaluate at `t` by Horner's rule.
    pub fn evaluate(&self, t: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// The `order`-th derivative.
    ///
    /// Order 0 returns the polynomial unchanged; an order exceeding the
    /// degree collapses to the zero polynomial.
    pub fn derivative(&self, order: usize) -> Self {
        let mut out = self.clone();
        for _ in 0..order {
            if out.coefficients.len() == 1 {
                out.coefficients[0] = 0.0;
                break;
            }
            out.coefficients = out
                .coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, &c)| c * power as f64)
                .collect();
        }
        out
    }

    /// Single antiderivative with `constant` as the new constant term.
    pub fn antiderivative(&self, constant: f64) -> Self {
        let mut coefficients = Vec::with_capacity(self.coefficients.len() + 1);
        coefficients.push(constant);
        for (power, &c) in self.coefficients.iter().enumerate() {
            coefficients.push(c / (power + 1) as f64);
        }
        Polynomial { coefficients }
    }

    /// The `order`-th antiderivative.
    ///
    /// `constant` becomes the constant term of the first integration step;
    /// later steps integrate with a zero constant.
    pub fn integral(&self, order: usize, constant: f64) -> Self {
        let mut out = self.clone();
        let mut constant = constant;
        for _ in 0..order {
            out = out.antiderivative(constant);
            constant = 0.0;
        }
        out
    }

    /// The same function with its argument shifted: returns `q` such that
    /// `q(t) == p(t + delta)` for all `t`.
    ///
    /// Used when a segment polynomial has to be re-expressed relative to a
    /// later local origin. Horner's rule over polynomial arithmetic keeps
    /// the coefficient count unchanged.
    pub fn translated(&self, delta: f64) -> Self {
        if delta == 0.0 {
            return self.clone();
        }
        let shift = Polynomial::new(&[delta, 1.0]);
        let mut out = Polynomial::constant(self.coefficients[self.coefficients.len() - 1]);
        for &c in self.coefficients.iter().rev().skip(1) {
            out = out * shift.clone() + Polynomial::constant(c);
        }
        out
    }

    /// Coefficient-wise approximate equality within absolute tolerance
    /// `tol`, zero-padding the shorter coefficient list.
    pub fn is_approx(&self, other: &Self, tol: f64) -> bool {
        self.abs_diff_eq(other, tol)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: Polynomial) -> Polynomial {
        self += rhs;
        self
    }
}

impl AddAssign for Polynomial {
    fn add_assign(&mut self, rhs: Polynomial) {
        if rhs.coefficients.len() > self.coefficients.len() {
            self.coefficients.resize(rhs.coefficients.len(), 0.0);
        }
        for (power, &c) in rhs.coefficients.iter().enumerate() {
            self.coefficients[power] += c;
        }
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    /// Convolution of the coefficient lists; degrees add.
    fn mul(self, rhs: Polynomial) -> Polynomial {
        let mut coefficients = vec![0.0; self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in rhs.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Polynomial { coefficients }
    }
}

impl MulAssign for Polynomial {
    fn mul_assign(&mut self, rhs: Polynomial) {
        *self = self.clone() * rhs;
    }
}

impl Zero for Polynomial {
    fn zero() -> Self {
        Polynomial::constant(0.0)
    }

    fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0.0)
    }
}

impl One for Polynomial {
    fn one() -> Self {
        Polynomial::constant(1.0)
    }
}

impl AbsDiffEq for Polynomial {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let len = self.coefficients.len().max(other.coefficients.len());
        (0..len).all(|i| (self.coeff(i) - other.coeff(i)).abs() <= epsilon)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (power, &c) in self.coefficients.iter().enumerate() {
            if c == 0.0 && self.coefficients.len() > 1 {
                continue;
            }
            if wrote {
                write!(f, " {} ", if c < 0.0 { "-" } else { "+" })?;
            } else if c < 0.0 {
                write!(f, "-")?;
            }
            match power {
                0 => write!(f, "{}", c.abs())?,
                1 => write!(f, "{}*t", c.abs())?,
                _ => write!(f, "{}*t^{}", c.abs(), power)?,
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}
