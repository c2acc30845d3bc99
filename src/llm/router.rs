//! Model selection and fallback orchestration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::{AgentError, ModelError};
use crate::output::OutputSink;

use super::retry::RetryPolicy;

/// Runs the review prompt against one model.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    async fn run(&self, model: &str, sink: &mut dyn OutputSink) -> Result<(), ModelError>;
}

/// Preset model lists and retry behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Up to three attempts per model (2s then 4s backoff, no jitter),
    /// newest model first.
    #[default]
    Fallback,
    /// Several backed-off attempts per model, most stable model first.
    Persistent,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fallback => "fallback",
            Strategy::Persistent => "persistent",
        }
    }

    pub fn models(&self) -> Vec<String> {
        let models: &[&str] = match self {
            Strategy::Fallback => &[
                "models/gemini-2.5-flash",
                "models/gemini-1.5-flash",
                "models/gemini-1.5-pro",
            ],
            Strategy::Persistent => &[
                "models/gemini-1.5-flash",
                "models/gemini-2.5-flash",
                "models/gemini-1.5-pro",
            ],
        };
        models.iter().map(|m| m.to_string()).collect()
    }

    pub fn policy(&self) -> RetryPolicy {
        match self {
            Strategy::Fallback => RetryPolicy {
                attempts_per_model: 3,
                backoff_base: Duration::from_secs(2),
                jitter: Duration::ZERO,
                switch_delay: Duration::from_secs(2),
                ..RetryPolicy::default()
            },
            Strategy::Persistent => RetryPolicy {
                attempts_per_model: 5,
                switch_delay: Duration::from_secs(3),
                ..RetryPolicy::default()
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fallback" => Ok(Strategy::Fallback),
            "persistent" => Ok(Strategy::Persistent),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'fallback' or 'persistent')"
            )),
        }
    }
}

/// Which model finished the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub model: String,
    /// Attempts issued across all models, including the successful one.
    pub attempts: u32,
}

/// Tries each model in order until one completes.
pub struct FallbackOrchestrator<R> {
    runner: R,
    models: Vec<String>,
    policy: RetryPolicy,
}

impl<R: ModelRunner> FallbackOrchestrator<R> {
    pub fn new(runner: R, models: Vec<String>, policy: RetryPolicy) -> Self {
        Self {
            runner,
            models,
            policy,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Drive the models in order.
    ///
    /// Overloaded models are skipped without waiting; any other failure
    /// waits `switch_delay` before the next model. Fatal errors end the run
    /// at once.
    pub async fn run(&self, sink: &mut dyn OutputSink) -> Result<RunOutcome, AgentError> {
        if self.models.is_empty() {
            return Err(AgentError::NoModels);
        }

        let mut attempts = 0;
        let mut last_error = None;

        for (index, model) in self.models.iter().enumerate() {
            let is_last = index + 1 == self.models.len();
            sink.notice(&format!("Trying model: {model}..."));
            info!("Trying model {model}");

            let err = match self.run_model(model, sink, &mut attempts).await {
                Ok(()) => {
                    info!("Model {model} completed after {attempts} attempt(s)");
                    return Ok(RunOutcome {
                        model: model.clone(),
                        attempts,
                    });
                }
                Err(e) => e,
            };

            if err.is_fatal() {
                error!("Model {model} hit a fatal error: {err}");
                return Err(AgentError::Fatal {
                    model: model.clone(),
                    source: err,
                });
            }

            warn!("Model {model} failed: {err}");
            sink.notice(&format!("Model {model} failed: {err}"));

            if (self.policy.is_overload)(&err) {
                if !is_last {
                    sink.notice("Model is overloaded, trying next model...");
                }
            } else if !is_last && !self.policy.switch_delay.is_zero() {
                sink.notice(&format!(
                    "Waiting {} seconds before trying next model...",
                    self.policy.switch_delay.as_secs_f64()
                ));
                tokio::time::sleep(self.policy.switch_delay).await;
            }

            last_error = Some(err);
        }

        match last_error {
            Some(last_error) => Err(AgentError::AllModelsFailed {
                models: self.models.len(),
                attempts,
                last_error,
            }),
            None => Err(AgentError::NoModels),
        }
    }

    /// Attempt one model up to `attempts_per_model` times.
    async fn run_model(
        &self,
        model: &str,
        sink: &mut dyn OutputSink,
        attempts: &mut u32,
    ) -> Result<(), ModelError> {
        let max_attempts = self.policy.max_attempts();
        let mut schedule = self.policy.schedule();

        for attempt in 1..=max_attempts {
            *attempts += 1;

            let err = match self.runner.run(model, sink).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            if err.is_fatal() {
                return Err(err);
            }

            sink.notice(&format!("Attempt {attempt}/{max_attempts} failed: {err}"));
            if attempt == max_attempts {
                return Err(err);
            }

            let delay = schedule.next_delay();
            sink.notice(&format!("Waiting {}ms before retry...", delay.as_millis()));
            tokio::time::sleep(delay).await;
        }

        // max_attempts >= 1, so the loop always returns.
        Err(ModelError::Stream(format!("no attempts made for {model}")))
    }
}

/// Orchestrator for a preset, optionally with an explicit model list.
pub fn orchestrator_for<R: ModelRunner>(
    runner: R,
    strategy: Strategy,
    models: Option<Vec<String>>,
) -> FallbackOrchestrator<R> {
    let models = models
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| strategy.models());
    FallbackOrchestrator::new(runner, models, strategy.policy())
}
