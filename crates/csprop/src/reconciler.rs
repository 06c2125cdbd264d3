//! Property reconciler: fetch → decide → apply.
//!
//! One pass handles every descriptor independently. A failure on one property
//! is recorded in its outcome and never stops the others. Properties that share
//! a CIB scope are processed in declaration order on the same thread so writes
//! to one shadow CIB never race; different scopes may run concurrently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::dependency::{dependencies, DependencyRef};
use crate::engine::ReconciliationEngine;
use crate::error::{PropertyError, Result};
use crate::property::{
    Action, ObservedProperty, PropertyDescriptor, PropertyValue, ValueComparison,
};
use crate::provider::{MutationExecutor, ObservedStateProvider};

/// Whether a pass writes to the cluster or only reports what it would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReconcileMode {
    Apply,
    /// Dry run: decide but never call the mutation executor.
    Plan,
}

/// Final state of one property after a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OutcomeStatus {
    /// Already in the desired state (or divergence tolerated).
    Unchanged,
    Applied,
    /// A change was computed but not executed.
    Planned,
    Failed { error: String },
}

/// What happened to one property during a pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOutcome {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cib: Option<String>,
    pub dependencies: BTreeSet<DependencyRef>,
    /// Value seen before the pass; `None` if absent or the fetch failed.
    pub observed: Option<PropertyValue>,
    /// Computed action; `None` if the fetch failed before a decision was made.
    pub action: Option<Action>,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl PropertyOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub mode: ReconcileMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One outcome per descriptor, in the order they were given.
    pub outcomes: Vec<PropertyOutcome>,
}

impl ReconcileReport {
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(PropertyOutcome::is_failed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &PropertyOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Outcomes that changed or would change the cluster.
    pub fn changed(&self) -> impl Iterator<Item = &PropertyOutcome> {
        self.outcomes.iter().filter(|o| {
            matches!(o.status, OutcomeStatus::Applied | OutcomeStatus::Planned)
        })
    }

    pub fn count(&self, status: fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| status(&o.status)).count()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unchanged = self.count(|s| matches!(s, OutcomeStatus::Unchanged));
        let applied = self.count(|s| matches!(s, OutcomeStatus::Applied));
        let planned = self.count(|s| matches!(s, OutcomeStatus::Planned));
        let failed = self.count(|s| matches!(s, OutcomeStatus::Failed { .. }));
        write!(
            f,
            "{} properties: {} unchanged, {} applied, {} planned, {} failed",
            self.outcomes.len(),
            unchanged,
            applied,
            planned,
            failed
        )
    }
}

/// The decision reached for one property, before it is turned into an outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub observed: Option<PropertyValue>,
    pub action: Action,
    pub applied: bool,
}

/// Runs reconciliation passes against a state provider and a mutation executor.
pub struct PropertyReconciler<P, M> {
    provider: P,
    executor: M,
    engine: ReconciliationEngine<ValueComparison>,
    parallel: bool,
}

impl<P, M> PropertyReconciler<P, M>
where
    P: ObservedStateProvider,
    M: MutationExecutor,
{
    pub fn new(provider: P, executor: M) -> Self {
        Self {
            provider,
            executor,
            engine: ReconciliationEngine::new(),
            parallel: true,
        }
    }

    pub fn with_comparison(mut self, comparison: ValueComparison) -> Self {
        self.engine = ReconciliationEngine::with_comparator(comparison);
        self
    }

    /// Process CIB scopes concurrently (default) or strictly one after another.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fetches the current state of `desired` and decides what to do about it.
    ///
    /// A fetch failure aborts before any decision is made.
    pub fn plan_property(&self, desired: &PropertyDescriptor) -> Result<(ObservedProperty, Action)> {
        let observed = self
            .provider
            .fetch_property(desired.name(), desired.cib())
            .map_err(|e| PropertyError::FetchFailure {
                name: desired.name().to_string(),
                cib: desired.cib().map(str::to_string),
                source: e,
            })?;

        let action = self.engine.decide(desired, &observed);
        Ok((observed, action))
    }

    /// Executes `action` for `desired`. Nothing is retried here.
    pub fn apply_property(&self, desired: &PropertyDescriptor, action: &Action) -> Result<()> {
        if !action.is_change() {
            return Ok(());
        }

        self.executor
            .apply_action(desired.name(), desired.cib(), action)
            .map_err(|e| PropertyError::ApplyFailure {
                name: desired.name().to_string(),
                cib: desired.cib().map(str::to_string),
                action: action.verb().to_string(),
                source: e,
            })?;
        log::info!("Property '{}': {}", desired.name(), action);
        Ok(())
    }

    /// Fetches, decides and, in apply mode, executes for a single property.
    pub fn reconcile_property(
        &self,
        desired: &PropertyDescriptor,
        mode: ReconcileMode,
    ) -> Result<Decision> {
        let (observed, action) = self.plan_property(desired)?;
        let applied = mode == ReconcileMode::Apply && action.is_change();
        if applied {
            self.apply_property(desired, &action)?;
        }

        Ok(Decision {
            observed: observed.value,
            action,
            applied,
        })
    }

    /// Runs one pass over `descriptors`.
    pub fn run(&self, descriptors: &[PropertyDescriptor], mode: ReconcileMode) -> ReconcileReport {
        let _span = tracing::info_span!(
            "reconcile.pass",
            mode = ?mode,
            properties = descriptors.len()
        )
        .entered();
        let started_at = Utc::now();

        // Group by scope; each group keeps declaration order.
        let mut groups: BTreeMap<Option<&str>, Vec<(usize, &PropertyDescriptor)>> = BTreeMap::new();
        for (index, desc) in descriptors.iter().enumerate() {
            groups.entry(desc.cib()).or_default().push((index, desc));
        }

        let mut indexed: Vec<(usize, PropertyOutcome)> = if self.parallel && groups.len() > 1 {
            let (tx, rx) = crossbeam_channel::unbounded();
            let pass = tracing::Span::current();
            std::thread::scope(|scope| {
                for group in groups.values() {
                    let tx = tx.clone();
                    let pass = pass.clone();
                    scope.spawn(move || {
                        pass.in_scope(|| {
                            for &(index, desc) in group {
                                if tx.send((index, self.outcome(desc, mode))).is_err() {
                                    break;
                                }
                            }
                        })
                    });
                }
            });
            drop(tx);
            rx.iter().collect()
        } else {
            groups
                .values()
                .flatten()
                .map(|&(index, desc)| (index, self.outcome(desc, mode)))
                .collect()
        };
        indexed.sort_by_key(|(index, _)| *index);

        let report = ReconcileReport {
            mode,
            started_at,
            finished_at: Utc::now(),
            outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
        };

        if report.is_success() {
            log::info!("Reconcile pass finished: {}", report);
        } else {
            log::warn!("Reconcile pass finished with failures: {}", report);
        }
        report
    }

    fn outcome(&self, desired: &PropertyDescriptor, mode: ReconcileMode) -> PropertyOutcome {
        let mut outcome = PropertyOutcome {
            name: desired.name().to_string(),
            cib: desired.cib().map(str::to_string),
            dependencies: dependencies(desired),
            observed: None,
            action: None,
            status: OutcomeStatus::Unchanged,
        };

        let (observed, action) = match self.plan_property(desired) {
            Ok(planned) => planned,
            Err(e) => {
                log::error!("{}", e);
                outcome.status = OutcomeStatus::Failed {
                    error: e.to_string(),
                };
                return outcome;
            }
        };

        outcome.status = if !action.is_change() {
            OutcomeStatus::Unchanged
        } else if mode == ReconcileMode::Plan {
            log::info!("Property '{}' would {}", desired.name(), action);
            OutcomeStatus::Planned
        } else {
            match self.apply_property(desired, &action) {
                Ok(()) => OutcomeStatus::Applied,
                Err(e) => {
                    log::error!("{}", e);
                    OutcomeStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };
        outcome.observed = observed.value;
        outcome.action = Some(action);
        outcome
    }
}
