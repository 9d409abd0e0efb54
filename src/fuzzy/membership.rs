use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Shape tag for a membership function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfShape {
    Triangle,
    Trapezoid,
    ZShape,
    SShape,
}

impl MfShape {
    pub fn param_count(self) -> usize {
        match self {
            MfShape::Triangle => 3,
            MfShape::Trapezoid => 4,
            MfShape::ZShape | MfShape::SShape => 2,
        }
    }
}

/// A labeled membership function with validated parameters.
///
/// Parameters are non-decreasing; degenerate spans (equal parameters) are
/// legal and evaluate to steps or spikes rather than NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipFunction {
    pub label: String,
    pub shape: MfShape,
    pub params: Vec<f64>,
}

impl MembershipFunction {
    pub fn new(label: impl Into<String>, shape: MfShape, params: Vec<f64>) -> Result<Self, Error> {
        let label = label.into();
        if params.len() != shape.param_count() {
            return Err(Error::malformed_mf(
                &label,
                format!(
                    "expected {} parameters, got {}",
                    shape.param_count(),
                    params.len()
                ),
            ));
        }
        if params.iter().any(|p| !p.is_finite()) {
            return Err(Error::malformed_mf(&label, "non-finite parameter"));
        }
        if params.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::malformed_mf(
                &label,
                format!("parameters must be non-decreasing, got {:?}", params),
            ));
        }
        Ok(Self {
            label,
            shape,
            params,
        })
    }

    /// µ(x), always in [0, 1].
    pub fn evaluate(&self, x: f64) -> f64 {
        let p = &self.params;
        match self.shape {
            MfShape::Triangle => {
                let (a, b, c) = (p[0], p[1], p[2]);
                if x == b {
                    1.0
                } else if x <= a || x >= c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MfShape::Trapezoid => {
                let (a, b, c, d) = (p[0], p[1], p[2], p[3]);
                if x >= b && x <= c {
                    1.0
                } else if x <= a || x >= d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            MfShape::ZShape => {
                let (a, b) = (p[0], p[1]);
                if x <= a {
                    1.0
                } else if x >= b {
                    0.0
                } else {
                    let t = (x - a) / (b - a);
                    (1.0 - 2.0 * t * t).clamp(0.0, 1.0)
                }
            }
            MfShape::SShape => {
                let (a, b) = (p[0], p[1]);
                if x <= a {
                    0.0
                } else if x >= b {
                    1.0
                } else {
                    let t = (x - a) / (b - a);
                    (2.0 * t * t).clamp(0.0, 1.0)
                }
            }
        }
    }
}
