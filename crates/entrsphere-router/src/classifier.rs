// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route classification over accumulated signals.
//!
//! Classification is priority-ordered thresholding, not "highest count
//! wins": C is checked first, then D, then B, and A is the fallback. A
//! single C-leaning answer next to five A answers still routes A, but two
//! C answers route C regardless of the A count.

use entrsphere_config::model::RoutingConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::catalog::Question;
use crate::signals::{Category, SignalVector};

/// Handling route assigned to a discovery interview.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Route {
    /// Clear goal, standard build.
    A,
    /// Exploratory, requirements still forming.
    B,
    /// Strategic ambiguity or stakeholder misalignment.
    C,
    /// Integration with existing systems dominates.
    D,
}

impl Route {
    /// Short human-readable name for the route.
    pub fn label(&self) -> &'static str {
        match self {
            Route::A => "Standard build",
            Route::B => "Exploratory discovery",
            Route::C => "Strategic alignment",
            Route::D => "Integration mapping",
        }
    }
}

/// One entry of the ordered rule list: route to `route` when
/// `category` has accumulated at least `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRule {
    pub category: Category,
    pub threshold: f64,
    pub route: Route,
}

impl RouteRule {
    pub fn matches(&self, signals: &SignalVector) -> bool {
        signals[self.category] >= self.threshold
    }
}

/// Deterministic first-match route classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteClassifier {
    rules: Vec<RouteRule>,
    fallback: Route,
}

impl RouteClassifier {
    pub fn new(rules: Vec<RouteRule>, fallback: Route) -> Self {
        Self { rules, fallback }
    }

    /// Production rule order (C, D, B, fallback A) with configured thresholds.
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(
            vec![
                RouteRule {
                    category: Category::C,
                    threshold: config.c_threshold,
                    route: Route::C,
                },
                RouteRule {
                    category: Category::D,
                    threshold: config.d_threshold,
                    route: Route::D,
                },
                RouteRule {
                    category: Category::B,
                    threshold: config.b_threshold,
                    route: Route::B,
                },
            ],
            Route::A,
        )
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn fallback(&self) -> Route {
        self.fallback
    }

    /// Resolve a route. Always returns a route; never fails.
    pub fn resolve(&self, signals: &SignalVector) -> Route {
        let route = self
            .rules
            .iter()
            .find(|rule| rule.matches(signals))
            .map(|rule| rule.route)
            .unwrap_or(self.fallback);

        debug!(%signals, %route, "route resolved");
        route
    }
}

impl Default for RouteClassifier {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

/// Apply a structured answer to `signals`.
///
/// Each category listed on the chosen option gains one unit. Returns `false`
/// and leaves `signals` untouched if `option_id` is not an option of
/// `question`.
pub fn record_answer(signals: &mut SignalVector, question: &Question, option_id: &str) -> bool {
    let Some(option) = question.option(option_id) else {
        return false;
    };
    for &category in &option.signals {
        signals.increment(category);
    }
    true
}
