//! Thread-per-pipeline strategy
//!
//! Each pipeline runs on its own scoped OS thread. The scope is the join
//! barrier: `execute` returns only after every thread has finished, and a
//! panicking thread is reported as a failed pipeline instead of tearing down
//! the run.

use super::{panic_message, ExecutionStrategy, PipelineOutcome};
use crate::core::controller::Pipeline;
use crate::core::shared::SharedAccount;
use crate::core::traits::{EventJournal, EventSink};
use crate::types::{Actor, BankError};
use std::sync::Arc;
use std::thread;

/// Runs each pipeline on a dedicated scoped thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadedStrategy;

impl ExecutionStrategy for ThreadedStrategy {
    fn execute(
        &self,
        account: &SharedAccount,
        pipelines: Vec<Pipeline>,
        sink: Arc<dyn EventSink>,
    ) -> Vec<PipelineOutcome> {
        let sink: &dyn EventSink = sink.as_ref();
        let journals: Vec<EventJournal> = pipelines.iter().map(|_| EventJournal::new()).collect();

        let finished: Vec<(Actor, Option<BankError>)> = thread::scope(|scope| {
            let handles: Vec<_> = pipelines
                .into_iter()
                .zip(&journals)
                .map(|(pipeline, journal)| {
                    let actor = pipeline.actor;
                    let account = account.clone();
                    let handle = thread::Builder::new()
                        .name(format!("{}-ledger", actor.as_str().to_lowercase()))
                        .spawn_scoped(scope, move || pipeline.run(account, journal, sink));
                    (actor, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(actor, handle)| {
                    let failure = match handle {
                        Ok(handle) => match handle.join() {
                            Ok(result) => result.err(),
                            Err(payload) => Some(BankError::pipeline_failed(
                                actor,
                                panic_message(payload.as_ref()),
                            )),
                        },
                        Err(e) => Some(BankError::pipeline_failed(
                            actor,
                            format!("failed to spawn thread: {}", e),
                        )),
                    };
                    (actor, failure)
                })
                .collect()
        });

        finished
            .into_iter()
            .zip(journals)
            .map(|((actor, failure), journal)| PipelineOutcome {
                actor,
                events: journal.into_events(),
                failure,
            })
            .collect()
    }
}
