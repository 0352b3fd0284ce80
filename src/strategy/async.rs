//! Asynchronous task-per-pipeline strategy
//!
//! This module runs each pipeline as a tokio task on a multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncStrategy
//!     ├── RuntimeConfig (worker_threads)
//!     └── one tokio task per Pipeline
//!         ├── tokio::fs read of the ledger
//!         └── TransactionExecutor (std Mutex, never held across .await)
//! ```
//!
//! The tasks are joined with `futures::future::join_all`; a panicking task is
//! reported as a failed pipeline.

use super::{panic_message, ExecutionStrategy, PipelineOutcome};
use crate::core::controller::Pipeline;
use crate::core::shared::SharedAccount;
use crate::core::traits::{EventJournal, EventSink};
use crate::types::BankError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

/// Configuration for the async runtime
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Number of tokio worker threads
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
        }
    }
}

impl RuntimeConfig {
    /// Create a new RuntimeConfig, falling back to the default for zero
    pub fn new(worker_threads: usize) -> Self {
        let default = Self::default();

        let worker_threads = if worker_threads == 0 {
            warn!(
                "invalid worker_threads ({}), using default ({})",
                worker_threads, default.worker_threads
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self { worker_threads }
    }
}

/// Runs each pipeline as a task on a dedicated tokio runtime
#[derive(Debug, Clone)]
pub struct AsyncStrategy {
    config: RuntimeConfig,
}

impl AsyncStrategy {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }
}

impl ExecutionStrategy for AsyncStrategy {
    fn execute(
        &self,
        account: &SharedAccount,
        pipelines: Vec<Pipeline>,
        sink: Arc<dyn EventSink>,
    ) -> Vec<PipelineOutcome> {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .thread_name("bank-worker")
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                let error = BankError::Runtime {
                    message: format!("failed to create tokio runtime: {}", e),
                };
                return pipelines
                    .iter()
                    .map(|pipeline| PipelineOutcome {
                        actor: pipeline.actor,
                        events: Vec::new(),
                        failure: Some(BankError::pipeline_failed(pipeline.actor, error.to_string())),
                    })
                    .collect();
            }
        };

        runtime.block_on(async {
            let (owners, tasks): (Vec<_>, Vec<_>) = pipelines
                .into_iter()
                .map(|pipeline| {
                    let actor = pipeline.actor;
                    let journal = Arc::new(EventJournal::new());
                    let task = tokio::spawn(pipeline.run_async(
                        account.clone(),
                        Arc::clone(&journal),
                        Arc::clone(&sink),
                    ));
                    ((actor, journal), task)
                })
                .unzip();

            let joined = join_all(tasks).await;

            owners
                .into_iter()
                .zip(joined)
                .map(|((actor, journal), joined)| {
                    let failure = match joined {
                        Ok(result) => result.err(),
                        Err(e) if e.is_panic() => Some(BankError::pipeline_failed(
                            actor,
                            panic_message(e.into_panic().as_ref()),
                        )),
                        Err(e) => Some(BankError::pipeline_failed(actor, e.to_string())),
                    };
                    PipelineOutcome {
                        actor,
                        events: journal.events(),
                        failure,
                    }
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::NullSink;
    use crate::io::source::LedgerSource;
    use crate::types::Actor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_runtime_config_zero_falls_back_to_default() {
        assert_eq!(RuntimeConfig::new(0), RuntimeConfig::default());
        assert_eq!(RuntimeConfig::new(3).worker_threads, 3);
    }

    #[test]
    fn test_async_strategy_runs_both_pipelines() {
        let account = SharedAccount::new(50);
        let strategy = AsyncStrategy::new(RuntimeConfig::new(2));

        let results = strategy.execute(
            &account,
            vec![
                Pipeline::new(Actor::Husband, LedgerSource::text("deposit 10\n")),
                Pipeline::new(Actor::Wife, LedgerSource::text("deposit 20\n")),
            ],
            Arc::new(NullSink),
        );

        assert!(results.iter().all(PipelineOutcome::is_complete));
        assert_eq!(account.balance(), 80);
    }

    #[test]
    fn test_async_strategy_reads_files() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"deposit 7\n\nwithdraw 2\n").unwrap();
        file.flush().unwrap();

        let account = SharedAccount::new(0);
        let strategy = AsyncStrategy::new(RuntimeConfig::new(1));
        let results = strategy.execute(
            &account,
            vec![Pipeline::new(Actor::Wife, LedgerSource::open(file.path()).unwrap())],
            Arc::new(NullSink),
        );

        let events = &results[0].events;
        assert!(results[0].is_complete());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].transaction.line, 3);
        assert_eq!(account.balance(), 5);
    }

    #[test]
    fn test_async_failed_pipeline_does_not_stop_the_other() {
        let mut bad = NamedTempFile::new().unwrap();
        bad.write_all(&[0xc3, 0x28]).unwrap();
        bad.flush().unwrap();

        let account = SharedAccount::new(0);
        let strategy = AsyncStrategy::new(RuntimeConfig::default());
        let results = strategy.execute(
            &account,
            vec![
                Pipeline::new(Actor::Husband, LedgerSource::text("deposit 4\n")),
                Pipeline::new(Actor::Wife, LedgerSource::open(bad.path()).unwrap()),
            ],
            Arc::new(NullSink),
        );

        assert!(results[0].is_complete());
        assert!(matches!(
            results[1].failure,
            Some(BankError::PipelineFailed {
                actor: Actor::Wife,
                ..
            })
        ));
        assert_eq!(account.balance(), 4);
    }

    struct PanicOnWithdraw;

    impl EventSink for PanicOnWithdraw {
        fn emit(&self, event: &crate::types::TransactionEvent) {
            if event.transaction.kind == crate::types::TransactionKind::Withdraw {
                panic!("withdraw rejected");
            }
        }
    }

    #[test]
    fn test_async_panicked_task_keeps_journaled_events() {
        let account = SharedAccount::new(10);
        let strategy = AsyncStrategy::new(RuntimeConfig::new(2));
        let results = strategy.execute(
            &account,
            vec![Pipeline::new(
                Actor::Husband,
                LedgerSource::text("deposit 1\nwithdraw 3\ndeposit 100\n"),
            )],
            Arc::new(PanicOnWithdraw),
        );

        assert_eq!(
            results[0].failure,
            Some(BankError::pipeline_failed(Actor::Husband, "panicked: withdraw rejected"))
        );
        assert_eq!(results[0].events.len(), 2);
        assert_eq!(account.balance(), 8);
    }
}
