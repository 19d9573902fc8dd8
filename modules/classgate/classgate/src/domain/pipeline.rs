//! Ordered stage execution over one request context.

use std::sync::Arc;

use async_trait::async_trait;

use super::context::{GateRequest, RequestContext};
use super::error::{GateError, GateFault, Rejection};

/// Result of one stage.
#[derive(Debug)]
pub enum Outcome {
    Continue,
    Reject(Rejection),
    Fault(GateFault),
}

impl From<Result<(), GateError>> for Outcome {
    fn from(result: Result<(), GateError>) -> Self {
        match result {
            Ok(()) => Self::Continue,
            Err(GateError::Rejected(rejection)) => Self::Reject(rejection),
            Err(GateError::Fault(fault)) => Self::Fault(fault),
        }
    }
}

/// One independent check. A stage may read the request and the context and
/// may attach values to the context; it never sees later stages.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn run(&self, request: &GateRequest, ctx: &mut RequestContext) -> Outcome;
}

/// Stages run strictly in order; the first non-`Continue` outcome ends the run.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self { stages }
    }

    #[must_use]
    pub fn then(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the rejection or fault of the first stage that did not continue.
    pub async fn run(
        &self,
        request: &GateRequest,
        ctx: &mut RequestContext,
    ) -> Result<(), GateError> {
        for stage in &self.stages {
            match stage.run(request, ctx).await {
                Outcome::Continue => {}
                Outcome::Reject(rejection) => {
                    tracing::debug!(stage = stage.name(), %rejection, "request rejected");
                    return Err(rejection.into());
                }
                Outcome::Fault(fault) => {
                    tracing::error!(stage = stage.name(), error = %fault, "gate stage faulted");
                    return Err(fault.into());
                }
            }
        }
        Ok(())
    }
}
