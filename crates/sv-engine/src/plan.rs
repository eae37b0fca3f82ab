//! Deferred computation over a dataset
//!
//! A [`LazyFrame`] is a cheap handle on a [`LogicalPlan`] tree. Combinators
//! wrap the current plan in a new node; nothing executes until
//! [`ExecutionContext::collect`](crate::ExecutionContext::collect).

use crate::error::{EngineError, EngineResult};
use std::fmt;
use sv_core::DatasetDescriptor;

/// A node of the logical plan
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    /// Read the raw file of a dataset
    Scan { dataset: DatasetDescriptor },

    /// Keep each row independently with probability `fraction`
    Sample {
        input: Box<LogicalPlan>,
        fraction: f64,
        seed: u64,
    },

    /// Keep the first `n` rows in input order
    Limit { input: Box<LogicalPlan>, n: usize },
}

impl LogicalPlan {
    /// Check parameter ranges across the whole tree
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            LogicalPlan::Scan { .. } => Ok(()),
            LogicalPlan::Sample {
                input, fraction, ..
            } => {
                if !fraction.is_finite() || *fraction <= 0.0 || *fraction > 1.0 {
                    return Err(EngineError::InvalidPlan(format!(
                        "sample fraction must be in (0, 1], got {}",
                        fraction
                    )));
                }
                input.validate()
            }
            LogicalPlan::Limit { input, .. } => input.validate(),
        }
    }

    /// The dataset at the leaf of this plan
    pub fn dataset(&self) -> &DatasetDescriptor {
        match self {
            LogicalPlan::Scan { dataset } => dataset,
            LogicalPlan::Sample { input, .. } | LogicalPlan::Limit { input, .. } => {
                input.dataset()
            }
        }
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            LogicalPlan::Scan { dataset } => writeln!(
                f,
                "{}Scan: {} [{}] {}",
                pad,
                dataset.name,
                dataset.format,
                dataset.source_path.display()
            ),
            LogicalPlan::Sample {
                input,
                fraction,
                seed,
            } => {
                writeln!(f, "{}Sample: fraction={} seed={}", pad, fraction, seed)?;
                input.fmt_indent(f, depth + 1)
            }
            LogicalPlan::Limit { input, n } => {
                writeln!(f, "{}Limit: {}", pad, n)?;
                input.fmt_indent(f, depth + 1)
            }
        }
    }
}

impl fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

/// Handle on a deferred computation
#[derive(Debug, Clone, PartialEq)]
pub struct LazyFrame {
    plan: LogicalPlan,
}

impl LazyFrame {
    /// Start a plan by scanning a dataset
    pub fn scan(dataset: DatasetDescriptor) -> Self {
        Self {
            plan: LogicalPlan::Scan { dataset },
        }
    }

    /// Bernoulli sample: each row kept with probability `fraction`
    pub fn sample(self, fraction: f64, seed: u64) -> Self {
        Self {
            plan: LogicalPlan::Sample {
                input: Box::new(self.plan),
                fraction,
                seed,
            },
        }
    }

    /// Keep at most `n` rows
    pub fn limit(self, n: usize) -> Self {
        Self {
            plan: LogicalPlan::Limit {
                input: Box::new(self.plan),
                n,
            },
        }
    }

    pub fn plan(&self) -> &LogicalPlan {
        &self.plan
    }

    /// Render the plan tree, root first
    pub fn explain(&self) -> String {
        self.plan.to_string()
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
