use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::error::ProbeError;

use super::outcome::{FailureRecord, ProbeOutcome, SuccessRecord};

/// Shared sink every worker of one probe writes its outcome into.
///
/// Workers hold an `Arc` clone while they run. `snapshot` only succeeds once
/// every clone has been dropped, so a report can never be built while a
/// worker is still able to write.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outcomes: Mutex<Vec<ProbeOutcome>>,
}

impl ResultAggregator {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(Vec::with_capacity(capacity)),
        })
    }

    /// Appends one outcome. Safe to call from any number of workers.
    pub fn record(&self, outcome: ProbeOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the finished collection.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::AggregateInFlight` when other handles to the
    /// aggregator are still alive, i.e. workers have not all finished.
    pub fn snapshot(self: Arc<Self>) -> Result<ProbeAggregate, ProbeError> {
        match Arc::try_unwrap(self) {
            Ok(aggregator) => {
                let outcomes = aggregator
                    .outcomes
                    .into_inner()
                    .unwrap_or_else(PoisonError::into_inner);
                Ok(ProbeAggregate { outcomes })
            }
            Err(shared) => Err(ProbeError::AggregateInFlight {
                outstanding: Arc::strong_count(&shared).saturating_sub(1),
            }),
        }
    }
}

/// Immutable, arrival-ordered outcomes of one finished probe.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ProbeAggregate {
    outcomes: Vec<ProbeOutcome>,
}

impl ProbeAggregate {
    #[must_use]
    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &SuccessRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ProbeOutcome::Success(record) => Some(record),
            ProbeOutcome::Failure(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ProbeOutcome::Failure(record) => Some(record),
            ProbeOutcome::Success(_) => None,
        })
    }
}

impl From<Vec<ProbeOutcome>> for ProbeAggregate {
    fn from(outcomes: Vec<ProbeOutcome>) -> Self {
        Self { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::probe::outcome::FailureKind;

    fn failure(worker_id: usize) -> ProbeOutcome {
        ProbeOutcome::Failure(FailureRecord {
            worker_id,
            error_kind: FailureKind::Connect,
            message: "refused".to_owned(),
            elapsed: Duration::ZERO,
            started_at: Utc::now(),
        })
    }

    #[test]
    fn concurrent_records_are_not_lost() -> Result<(), String> {
        const WRITERS: usize = 16;
        const PER_WRITER: usize = 50;

        let aggregator = ResultAggregator::with_capacity(WRITERS.saturating_mul(PER_WRITER));
        let mut handles = Vec::with_capacity(WRITERS);
        for writer in 0..WRITERS {
            let aggregator = Arc::clone(&aggregator);
            handles.push(std::thread::spawn(move || {
                for seq in 0..PER_WRITER {
                    aggregator.record(failure(writer.saturating_mul(PER_WRITER).saturating_add(seq)));
                }
            }));
        }
        for handle in handles {
            handle
                .join()
                .map_err(|_panic| "writer thread panicked".to_owned())?;
        }

        let snapshot = aggregator.snapshot().map_err(|err| format!("{}", err))?;
        let ids: BTreeSet<usize> = snapshot.outcomes().iter().map(ProbeOutcome::worker_id).collect();
        if snapshot.len() != WRITERS.saturating_mul(PER_WRITER) {
            return Err(format!("Expected 800 outcomes, got {}", snapshot.len()));
        }
        if ids.len() != snapshot.len() {
            return Err("Duplicate or overwritten outcomes detected".to_owned());
        }
        Ok(())
    }

    #[test]
    fn snapshot_with_live_worker_handle_is_rejected() -> Result<(), String> {
        let aggregator = ResultAggregator::with_capacity(1);
        let worker_handle = Arc::clone(&aggregator);
        worker_handle.record(failure(1));

        match aggregator.snapshot() {
            Err(ProbeError::AggregateInFlight { outstanding: 1 }) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(_) => Err("Snapshot must fail while a worker holds the aggregator".to_owned()),
        }
    }

    #[test]
    fn partitions_successes_and_failures() -> Result<(), String> {
        let aggregate = ProbeAggregate::from(vec![failure(1), failure(2)]);
        if aggregate.successes().count() != 0 || aggregate.failures().count() != 2 {
            return Err("Unexpected partition".to_owned());
        }
        Ok(())
    }
}
