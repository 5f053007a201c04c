//! One request end to end: red-flag gate, backend, fallback.
//!
//! The gate runs exactly once, over the free text of this request. A halt is
//! an outcome, not an error. A remote failure never fails the request: it is
//! logged and the local engine answers instead.

use serde::Serialize;

use crate::models::{BackendKind, SymptomRecord};
use crate::pipeline::advice::{generate_local_advice, normalize_headings};
use crate::pipeline::generation::{build_user_summary, clean_output, LlmGenerate, SYSTEM_PROMPT};
use crate::pipeline::safety::{detect_red_flags, evaluate_gate, GateDecision, ManualFlags, RedFlagState};

/// Backend identifier for a deliberate local run.
pub const LOCAL_DEMO_ID: &str = "LOCAL-DEMO";
/// Backend identifier when the remote call failed and local answered.
pub const LOCAL_FALLBACK_ID: &str = "LOCAL-FALLBACK";

/// Optional text collaborators. Empty string means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub profile: String,
    pub reference: String,
    pub history: String,
}

/// Which backend the caller asked for.
pub enum Backend<'a> {
    Local,
    Remote(&'a dyn LlmGenerate),
}

impl Backend<'_> {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local => BackendKind::Local,
            Self::Remote(_) => BackendKind::Remote,
        }
    }
}

/// A generated answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceOutcome {
    pub markdown: String,
    pub backend_id: String,
    pub fell_back: bool,
    pub red_flags: RedFlagState,
    /// Red-flag warning shown alongside the advice when proceeding with caution.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionOutcome {
    /// Red flag without override: nothing was generated.
    Halted {
        red_flags: RedFlagState,
        warning: String,
    },
    Advice(AdviceOutcome),
}

impl SessionOutcome {
    pub fn red_flags(&self) -> &RedFlagState {
        match self {
            Self::Halted { red_flags, .. } => red_flags,
            Self::Advice(outcome) => &outcome.red_flags,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }
}

/// Run one request.
pub fn run_session(
    record: &SymptomRecord,
    flags: ManualFlags,
    override_granted: bool,
    context: &SessionContext,
    backend: Backend<'_>,
) -> SessionOutcome {
    let red_flags = detect_red_flags(flags, &record.free_text);
    let decision = evaluate_gate(&red_flags, override_granted);

    let warning = match &decision {
        GateDecision::Halt { warning, .. } => {
            tracing::info!(
                outcome = "halted",
                reasons = red_flags.triggered_reasons.len(),
                "Session stopped at red-flag gate"
            );
            return SessionOutcome::Halted {
                warning: warning.clone(),
                red_flags,
            };
        }
        GateDecision::ProceedWithCaution { warning, .. } => Some(warning.clone()),
        GateDecision::Clear => None,
    };
    let caution = decision.caution();

    let kind = backend.kind();
    let (markdown, backend_id, fell_back) = match backend {
        Backend::Local => {
            let doc = generate_local_advice(record, caution, &context.profile);
            (doc.to_markdown(), LOCAL_DEMO_ID.to_string(), false)
        }
        Backend::Remote(generator) => match remote_advice(generator, record, caution, context) {
            Ok(markdown) => (markdown, generator.model().to_string(), false),
            Err(e) => {
                tracing::warn!(
                    model = generator.model(),
                    error = %e,
                    "Remote generation failed, falling back to local engine"
                );
                let doc = generate_local_advice(record, caution, &context.profile);
                (doc.to_markdown(), LOCAL_FALLBACK_ID.to_string(), true)
            }
        },
    };

    tracing::info!(
        outcome = "advice",
        requested = kind.as_str(),
        backend = %backend_id,
        fell_back,
        red_flag = red_flags.has_red_flag(),
        chars = markdown.chars().count(),
        "Session completed"
    );

    SessionOutcome::Advice(AdviceOutcome {
        markdown,
        backend_id,
        fell_back,
        red_flags,
        warning,
    })
}

/// Remote document: cleaned, heading-normalized, caution quoted on top.
fn remote_advice(
    generator: &dyn LlmGenerate,
    record: &SymptomRecord,
    caution: Option<&str>,
    context: &SessionContext,
) -> Result<String, crate::pipeline::generation::GenerationError> {
    let summary = build_user_summary(record, caution, context);
    let raw = generator.generate(SYSTEM_PROMPT, &summary)?;
    let normalized = normalize_headings(&clean_output(&raw));
    Ok(match caution {
        Some(note) => format!("> {note}\n\n{normalized}"),
        None => normalized,
    })
}
