// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-category signal accumulation.
//!
//! A [`SignalVector`] always carries all four categories. Weights only grow
//! during a session and can never become negative: every write path either
//! adds a non-negative finite amount or clamps.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Evidence category an answer or keyword contributes to.
///
/// Categories line up one-to-one with routes: A standard, B exploratory,
/// C strategic ambiguity, D integration complexity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Category {
    A,
    B,
    C,
    D,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::A, Category::B, Category::C, Category::D];

    fn slot(self) -> usize {
        match self {
            Category::A => 0,
            Category::B => 1,
            Category::C => 2,
            Category::D => 3,
        }
    }
}

/// Running tally of signal weight for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "SignalWeights", into = "SignalWeights")]
pub struct SignalVector {
    weights: [f64; 4],
}

impl SignalVector {
    /// All-zero vector over the four categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from explicit weights. Negative or non-finite inputs become zero.
    pub fn from_weights(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            weights: [a, b, c, d].map(sanitize),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.weights[category.slot()]
    }

    /// Add `weight` to `category`.
    ///
    /// Returns `false` and leaves the vector untouched when `weight` is
    /// negative, NaN or infinite.
    pub fn add(&mut self, category: Category, weight: f64) -> bool {
        if !weight.is_finite() || weight < 0.0 {
            return false;
        }
        self.weights[category.slot()] += weight;
        true
    }

    pub fn increment(&mut self, category: Category) {
        self.weights[category.slot()] += 1.0;
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// True when no signal has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }

    /// Each weight as a share of the total; all zero for an empty vector.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            weights: self.weights.map(|w| w / total),
        }
    }

    /// The highest and second-highest weights, in that order.
    pub fn top_two(&self) -> (f64, f64) {
        let mut sorted = self.weights;
        sorted.sort_by(|a, b| b.total_cmp(a));
        (sorted[0], sorted[1])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl Index<Category> for SignalVector {
    type Output = f64;

    fn index(&self, category: Category) -> &f64 {
        &self.weights[category.slot()]
    }
}

impl std::fmt::Display for SignalVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (category, weight)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{category}={weight}")?;
        }
        Ok(())
    }
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Wire form: `{"A": 2.0, "B": 0.0, "C": 1.0, "D": 0.0}`. Missing keys default to zero.
#[derive(Serialize, Deserialize)]
struct SignalWeights {
    #[serde(rename = "A", default)]
    a: f64,
    #[serde(rename = "B", default)]
    b: f64,
    #[serde(rename = "C", default)]
    c: f64,
    #[serde(rename = "D", default)]
    d: f64,
}

impl From<SignalWeights> for SignalVector {
    fn from(w: SignalWeights) -> Self {
        SignalVector::from_weights(w.a, w.b, w.c, w.d)
    }
}

impl From<SignalVector> for SignalWeights {
    fn from(v: SignalVector) -> Self {
        let [a, b, c, d] = v.weights;
        SignalWeights { a, b, c, d }
    }
}
