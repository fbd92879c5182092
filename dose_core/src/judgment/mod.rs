//! Clinical judgment - the external verdict a round's difficulty is derived from
//!
//! A [`JudgmentProvider`] is an opaque oracle. Whatever goes wrong with it
//! (network, timeout, malformed payload, a crashed worker) resolves to the
//! deterministic strict-match fallback so a round can always start.

mod client;
mod prompt;

pub use client::{
    CompletionClient, CompletionRequest, JudgmentClientConfig, LlmJudgmentProvider,
    OpenAiChatClient,
};
pub use prompt::{build_prompt, parse_judgment, SYSTEM_PROMPT};

use crate::catalog::Catalog;
use crate::types::{Disease, Protocol};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{info, warn};

pub const FALLBACK_REASONING: &str =
    "System offline. Evaluation based on rigid protocol matching.";
pub const FALLBACK_APPROVED_TITLE: &str = "Standard Protocol";
pub const FALLBACK_REJECTED_TITLE: &str = "Treatment Failed";

/// Pass/fail verdict on a prescription with efficacy and safety sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    pub approved: bool,
    /// 0 to 100
    pub efficacy_score: f64,
    /// 0 to 100
    pub safety_score: f64,
    pub title: String,
    pub reasoning: String,
}

impl Judgment {
    /// Scores must be finite and within 0..=100
    pub fn validate(&self) -> Result<(), JudgmentError> {
        for (name, score) in [("efficacyScore", self.efficacy_score), ("safetyScore", self.safety_score)] {
            if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                return Err(JudgmentError::Malformed(format!(
                    "{} out of range: {}",
                    name, score
                )));
            }
        }
        Ok(())
    }
}

/// Everything a provider is told about the case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDescription {
    pub diagnosis: String,
    pub pathogen: String,
    pub clinical_context: String,
    pub reference_drug_name: String,
    pub reference: Protocol,
    pub prescribed_drug_name: String,
    pub prescribed: Protocol,
    /// Drug ids the strict fallback accepts
    pub susceptible_to: Vec<String>,
}

impl CaseDescription {
    pub fn new(catalog: &Catalog, disease: &Disease, prescribed: Protocol) -> Self {
        CaseDescription {
            diagnosis: disease.name.clone(),
            pathogen: disease.pathogen.clone(),
            clinical_context: disease.description.clone(),
            reference_drug_name: catalog.drug_name(&disease.reference.substance_id).to_string(),
            reference: disease.reference.clone(),
            prescribed_drug_name: catalog.drug_name(&prescribed.substance_id).to_string(),
            prescribed,
            susceptible_to: disease.susceptible_to.clone(),
        }
    }

    fn strictly_matches(&self) -> bool {
        let drug_id = self.prescribed.substance_id.as_str();
        self.susceptible_to.iter().any(|id| id == drug_id) || self.reference.substance_id == drug_id
    }
}

/// Judgment provider failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JudgmentError {
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
    #[error("invalid timeout value: {0}")]
    InvalidTimeout(String),
    #[error("failed to read judgment config {path}: {message}")]
    ReadConfig { path: String, message: String },
    #[error("client build failed: {0}")]
    BuildClient(String),
    #[error("http request failed: {0}")]
    Http(String),
    #[error("http status {code}: {message}")]
    HttpStatus { code: u16, message: String },
    #[error("decode response failed: {0}")]
    Decode(String),
    #[error("empty completion")]
    EmptyResponse,
    #[error("malformed judgment: {0}")]
    Malformed(String),
    #[error("judgment provider is offline")]
    Offline,
    #[error("judgment task ended without a result")]
    TaskFailed,
}

/// External source of clinical judgments
pub trait JudgmentProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    fn evaluate(&self, case: &CaseDescription) -> Result<Judgment, JudgmentError>;
}

/// Provider used when no judgment service is configured; every case falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl JudgmentProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn evaluate(&self, _case: &CaseDescription) -> Result<Judgment, JudgmentError> {
        Err(JudgmentError::Offline)
    }
}

/// Strict protocol match: susceptible or gold-standard drug passes with full marks
pub fn fallback_judgment(case: &CaseDescription) -> Judgment {
    let approved = case.strictly_matches();
    Judgment {
        approved,
        efficacy_score: if approved { 100.0 } else { 0.0 },
        safety_score: 100.0,
        title: if approved {
            FALLBACK_APPROVED_TITLE
        } else {
            FALLBACK_REJECTED_TITLE
        }
        .to_string(),
        reasoning: FALLBACK_REASONING.to_string(),
    }
}

/// Turn a provider result into a judgment, falling back on any error
pub fn resolve(case: &CaseDescription, result: Result<Judgment, JudgmentError>) -> Judgment {
    match result.and_then(|judgment| judgment.validate().map(|_| judgment)) {
        Ok(judgment) => {
            info!(
                approved = judgment.approved,
                efficacy = judgment.efficacy_score,
                safety = judgment.safety_score,
                "judgment received"
            );
            judgment
        }
        Err(err) => {
            warn!(error = %err, drug = %case.prescribed.substance_id, "judgment unavailable, using strict protocol match");
            fallback_judgment(case)
        }
    }
}

/// Evaluate synchronously, never failing
pub fn evaluate_or_fallback(provider: &dyn JudgmentProvider, case: &CaseDescription) -> Judgment {
    resolve(case, provider.evaluate(case))
}

/// A single judgment being computed off the frame loop
///
/// Resolves exactly once. A worker that dies without answering resolves to the fallback.
pub struct PendingJudgment {
    case: CaseDescription,
    receiver: Receiver<Result<Judgment, JudgmentError>>,
    finished: bool,
}

impl PendingJudgment {
    /// Start evaluating `case` on a worker thread
    pub fn spawn(provider: Arc<dyn JudgmentProvider>, case: CaseDescription) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker_case = case.clone();
        let spawned = thread::Builder::new()
            .name("judgment".to_string())
            .spawn(move || {
                let result = provider.evaluate(&worker_case);
                // Receiver gone means the round was abandoned
                let _ = sender.send(result);
            });
        if let Err(err) = spawned {
            warn!(error = %err, "could not spawn judgment worker");
        }

        PendingJudgment {
            case,
            receiver,
            finished: false,
        }
    }

    pub fn case(&self) -> &CaseDescription {
        &self.case
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Non-blocking poll. Returns the judgment the first time it is available, then `None`.
    pub fn try_resolve(&mut self) -> Option<Judgment> {
        if self.finished {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(JudgmentError::TaskFailed),
        };
        self.finished = true;
        Some(resolve(&self.case, result))
    }

    /// Block until the judgment is available
    pub fn wait(self) -> Judgment {
        let result = self
            .receiver
            .recv()
            .unwrap_or(Err(JudgmentError::TaskFailed));
        resolve(&self.case, result)
    }
}
