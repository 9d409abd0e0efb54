//! The GA search point: every membership-function breakpoint of the six
//! linguistic variables, flattened into one gene vector.
//!
//! The `LAYOUT` table is the single source of truth for the gene ↔ MF
//! mapping; gene slicing, bounds derivation and FIS assembly all read it.

use crate::fuzzy::membership::MfShape;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

/// One membership function's slot in the gene vector.
pub struct MfSlot {
    pub term: &'static str,
    pub shape: MfShape,
    pub len: usize,
}

/// One variable's block in the gene vector.
pub struct VariableLayout {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub start: usize,
    pub gene_count: usize,
    pub mfs: &'static [MfSlot],
}

const fn slot(term: &'static str, shape: MfShape, len: usize) -> MfSlot {
    MfSlot { term, shape, len }
}

/// Z / Tri / Tri / Tri / S, shared by the four signed delta variables.
const FIVE_TERM_MFS: &[MfSlot] = &[
    slot("Negative_Large", MfShape::ZShape, 2),
    slot("Negative", MfShape::Triangle, 3),
    slot("Zero", MfShape::Triangle, 3),
    slot("Positive", MfShape::Triangle, 3),
    slot("Positive_Large", MfShape::SShape, 2),
];

const GAP_MFS: &[MfSlot] = &[
    slot("Small", MfShape::ZShape, 2),
    slot("Medium", MfShape::Triangle, 3),
    slot("Large", MfShape::SShape, 2),
];

const ANOMALY_MFS: &[MfSlot] = &[
    slot("Low", MfShape::ZShape, 2),
    slot("Medium", MfShape::Triangle, 3),
    slot("High", MfShape::SShape, 2),
];

/// Gene layout of the whole chromosome, in gene order. The last entry is
/// the output variable.
pub const LAYOUT: [VariableLayout; 6] = [
    VariableLayout {
        name: "SpeedChange",
        min: -10.0,
        max: 10.0,
        start: 0,
        gene_count: 13,
        mfs: FIVE_TERM_MFS,
    },
    VariableLayout {
        name: "HeadingChange",
        min: -180.0,
        max: 180.0,
        start: 13,
        gene_count: 13,
        mfs: FIVE_TERM_MFS,
    },
    VariableLayout {
        name: "VerticalRateChange",
        min: -20.0,
        max: 20.0,
        start: 26,
        gene_count: 13,
        mfs: FIVE_TERM_MFS,
    },
    VariableLayout {
        name: "AltitudeChange",
        min: -1000.0,
        max: 1000.0,
        start: 39,
        gene_count: 13,
        mfs: FIVE_TERM_MFS,
    },
    VariableLayout {
        name: "TimeGap",
        min: 0.0,
        max: 60.0,
        start: 52,
        gene_count: 7,
        mfs: GAP_MFS,
    },
    VariableLayout {
        name: "AnomalyLevel",
        min: 0.0,
        max: 1.0,
        start: 59,
        gene_count: 7,
        mfs: ANOMALY_MFS,
    },
];

pub const TOTAL_GENES: usize = 66;

/// Expert-chosen default breakpoints, in LAYOUT order.
#[rustfmt::skip]
pub const DEFAULT_GENES: [f64; TOTAL_GENES] = [
    // SpeedChange
    -6.0, -3.0,
    -6.0, -3.0, 0.0,
    -1.0, 0.0, 1.0,
    0.0, 3.0, 6.0,
    3.0, 6.0,
    // HeadingChange
    -90.0, -30.0,
    -60.0, -20.0, 0.0,
    -5.0, 0.0, 5.0,
    0.0, 20.0, 60.0,
    30.0, 90.0,
    // VerticalRateChange
    -10.0, -5.0,
    -10.0, -5.0, 0.0,
    -1.0, 0.0, 1.0,
    0.0, 5.0, 10.0,
    5.0, 10.0,
    // AltitudeChange
    -500.0, -100.0,
    -500.0, -100.0, 0.0,
    -50.0, 0.0, 50.0,
    0.0, 100.0, 500.0,
    100.0, 500.0,
    // TimeGap
    1.0, 5.0,
    3.0, 10.0, 20.0,
    15.0, 30.0,
    // AnomalyLevel
    0.2, 0.4,
    0.2, 0.5, 0.8,
    0.6, 0.8,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneBounds {
    pub min: f64,
    pub max: f64,
}

/// A tuned membership function, for result artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeDump {
    pub variable: &'static str,
    pub term: &'static str,
    pub shape: MfShape,
    pub params: Vec<f64>,
}

/// Gene vector plus per-gene bounds derived from the neighbor scheme.
///
/// After any operator the chromosome is repaired: bounds are recomputed
/// and genes clamped until stable, so the ordering invariants between
/// adjacent membership functions always hold before evaluation.
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub genes: Vec<f64>,
    bounds: Vec<GeneBounds>,
}

impl Default for Chromosome {
    fn default() -> Self {
        Self::new()
    }
}

impl Chromosome {
    pub fn new() -> Self {
        let mut chromosome = Self {
            genes: DEFAULT_GENES.to_vec(),
            bounds: vec![GeneBounds { min: 0.0, max: 0.0 }; TOTAL_GENES],
        };
        chromosome.repair();
        chromosome
    }

    pub fn bounds(&self) -> &[GeneBounds] {
        &self.bounds
    }

    pub fn variable_genes(&self, layout: &VariableLayout) -> &[f64] {
        &self.genes[layout.start..layout.start + layout.gene_count]
    }

    /// Derive every gene's (min, max) from its neighbors and the variable
    /// domain. Within a block the pattern repeats every three genes; the
    /// first and last gene are anchored to the domain edges.
    pub fn update_bounds(&mut self) {
        for var in &LAYOUT {
            for offset in 0..var.gene_count {
                let i = var.start + offset;
                self.bounds[i] = if offset == 0 {
                    GeneBounds {
                        min: var.min,
                        max: self.genes[i + 2],
                    }
                } else if offset == var.gene_count - 1 {
                    GeneBounds {
                        min: self.genes[i - 2],
                        max: var.max,
                    }
                } else {
                    match offset % 3 {
                        1 => GeneBounds {
                            min: self.genes[i + 1],
                            max: self.genes[i + 2],
                        },
                        2 => GeneBounds {
                            min: self.genes[i - 2],
                            max: self.genes[i - 1],
                        },
                        _ => GeneBounds {
                            min: self.genes[i - 2],
                            max: self.genes[i + 2],
                        },
                    }
                };
            }
        }
    }

    /// Recompute bounds and clamp until no gene moves. Clamping a gene
    /// can shift a neighbor's bound, so one sweep is not always enough
    /// after a crossover swapped distant blocks.
    pub fn repair(&mut self) {
        for _ in 0..32 {
            self.update_bounds();
            let mut moved = false;
            for (gene, bound) in self.genes.iter_mut().zip(&self.bounds) {
                if *gene < bound.min {
                    *gene = bound.min;
                    moved = true;
                }
                if *gene > bound.max {
                    *gene = bound.max;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
        debug_assert!(self.is_valid());
    }

    /// Whether every bound is consistent and every gene sits inside its
    /// re-derived bound.
    pub fn is_valid(&self) -> bool {
        let mut probe = self.clone();
        probe.update_bounds();
        probe
            .genes
            .iter()
            .zip(&probe.bounds)
            .all(|(g, b)| b.min <= b.max && *g >= b.min && *g <= b.max)
    }

    /// Re-draw each gene uniformly on its current bounds with probability
    /// `rate`, then repair.
    pub fn mutate(&mut self, rate: f64, rng: &mut StdRng) {
        for i in 0..self.genes.len() {
            if rng.gen::<f64>() < rate {
                let bound = self.bounds[i];
                self.genes[i] = if bound.min < bound.max {
                    rng.gen_range(bound.min..=bound.max)
                } else {
                    bound.min
                };
            }
        }
        self.repair();
    }

    /// Variable-wise uniform crossover: each of the six blocks swaps
    /// between the children with probability 0.5. Both children are
    /// repaired before they are returned.
    pub fn crossover(&self, other: &Self, rng: &mut StdRng) -> (Self, Self) {
        let mut first = self.clone();
        let mut second = other.clone();
        for var in &LAYOUT {
            if rng.gen::<f64>() < 0.5 {
                for i in var.start..var.start + var.gene_count {
                    std::mem::swap(&mut first.genes[i], &mut second.genes[i]);
                }
            }
        }
        first.repair();
        second.repair();
        (first, second)
    }

    /// Tuned breakpoints grouped by variable and term.
    pub fn dump_shapes(&self) -> Vec<ShapeDump> {
        let mut shapes = Vec::new();
        for var in &LAYOUT {
            let mut offset = var.start;
            for slot in var.mfs {
                shapes.push(ShapeDump {
                    variable: var.name,
                    term: slot.term,
                    shape: slot.shape,
                    params: self.genes[offset..offset + slot.len].to_vec(),
                });
                offset += slot.len;
            }
        }
        shapes
    }
}
