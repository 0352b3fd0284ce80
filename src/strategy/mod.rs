//! Execution strategy module
//!
//! This module defines the Strategy pattern for running actor pipelines
//! concurrently. The controller decides what runs; a strategy decides how the
//! pipelines are scheduled (OS threads or tokio tasks). Both strategies give the
//! same guarantees because both go through the same account lock.

use crate::cli::StrategyType;
use crate::core::controller::Pipeline;
use crate::core::shared::SharedAccount;
use crate::core::traits::EventSink;
use crate::types::{Actor, BankError, TransactionEvent};
use std::any::Any;
use std::sync::Arc;

pub mod r#async;
pub mod threaded;

pub use self::r#async::{AsyncStrategy, RuntimeConfig};
pub use threaded::ThreadedStrategy;

/// What one pipeline left behind
#[derive(Debug)]
pub struct PipelineOutcome {
    pub actor: Actor,

    /// Every event the pipeline produced, including those before a failure
    pub events: Vec<TransactionEvent>,

    /// Why the pipeline stopped early, if it did
    pub failure: Option<BankError>,
}

impl PipelineOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Scheduling policy for a set of pipelines
pub trait ExecutionStrategy: Send + Sync {
    /// Run every pipeline concurrently and wait for all of them
    ///
    /// Each pipeline gets its own clone of `account`, its own journal and the
    /// shared `sink`.
    ///
    /// # Returns
    ///
    /// One outcome per pipeline, in the order the pipelines were given. A
    /// failed pipeline must not prevent the others from completing, and its
    /// outcome still carries the events it produced before failing.
    fn execute(
        &self,
        account: &SharedAccount,
        pipelines: Vec<Pipeline>,
        sink: Arc<dyn EventSink>,
    ) -> Vec<PipelineOutcome>;
}

/// Create an execution strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - Threads or Async
/// * `config` - Optional runtime configuration (ignored for threads)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<RuntimeConfig>,
) -> Box<dyn ExecutionStrategy> {
    match strategy_type {
        StrategyType::Threads => Box::new(ThreadedStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncStrategy::new(config))
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}
