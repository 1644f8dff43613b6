use std::fmt;
use std::str::FromStr;

#[cfg(any(feature = "use_serde", feature = "python_bindings"))]
use serde::{Deserialize, Serialize};

use crate::DarbouxError;

/// A function that can be evaluated on a whole batch of sample points at once.
pub trait BatchFunction {
    /// Overwrite `out` with `f(x)` for every `x` in `xs`.
    fn evaluate(&self, xs: &[f64], out: &mut Vec<f64>);
}

impl<F: Fn(f64) -> f64> BatchFunction for F {
    fn evaluate(&self, xs: &[f64], out: &mut Vec<f64>) {
        out.clear();
        out.extend(xs.iter().map(|&x| self(x)));
    }
}

/// The fixed set of functions that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(feature = "use_serde", feature = "python_bindings"),
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Function {
    Square,
    Sine,
    #[cfg_attr(
        any(feature = "use_serde", feature = "python_bindings"),
        serde(rename = "exp_sin_square")
    )]
    ExpSinPlusSquare,
    Reciprocal,
    Cubic,
}

impl Default for Function {
    fn default() -> Function {
        Function::Square
    }
}

impl Function {
    pub const ALL: [Function; 5] = [
        Function::Square,
        Function::Sine,
        Function::ExpSinPlusSquare,
        Function::Reciprocal,
        Function::Cubic,
    ];

    #[inline]
    pub fn value(&self, x: f64) -> f64 {
        match self {
            Function::Square => x * x,
            Function::Sine => x.sin(),
            Function::ExpSinPlusSquare => x.exp() * x.sin() + x * x,
            // 1/0 yields inf, which is left to flow into the sums
            Function::Reciprocal => 1. / x,
            Function::Cubic => x * x * x - 2. * x * x + 2.,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Function::Square => "square",
            Function::Sine => "sine",
            Function::ExpSinPlusSquare => "exp_sin_square",
            Function::Reciprocal => "reciprocal",
            Function::Cubic => "cubic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Function::Square => "f(x) = x²",
            Function::Sine => "f(x) = sin(x)",
            Function::ExpSinPlusSquare => "f(x) = e^x * sin(x) + x²",
            Function::Reciprocal => "f(x) = 1/x",
            Function::Cubic => "f(x) = x³ - 2x² + 2",
        }
    }
}

impl BatchFunction for Function {
    fn evaluate(&self, xs: &[f64], out: &mut Vec<f64>) {
        out.clear();
        out.extend(xs.iter().map(|&x| self.value(x)));
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the key (`"sine"`) or the display label (`"f(x) = sin(x)"`).
impl FromStr for Function {
    type Err = DarbouxError;

    fn from_str(s: &str) -> Result<Function, DarbouxError> {
        let s = s.trim();
        Function::ALL
            .iter()
            .find(|f| f.key().eq_ignore_ascii_case(s) || f.label() == s)
            .copied()
            .ok_or_else(|| DarbouxError::UnknownFunction(s.to_owned()))
    }
}
