//! Sequential council adjudication
//!
//! A council is an ordered list of seats. Each seat renders its prompt from the
//! evidence context and the outputs of the seats before it, makes exactly one
//! runtime call, and hands its output down the chain. The first failed call
//! ends the session: later seats are never invoked and no report is produced.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CouncilConfig, RuntimeConfig};
use crate::events::{EventSender, Phase, PipelineEvent};
use crate::evidence::EvidenceContext;
use crate::providers::{CompletionRequest, LlmProvider, TokenUsage};
use crate::targets::Target;
use crate::template;
use crate::{Error, Result};

use super::{Prompts, Role};

/// Placeholders every seat may use
const SHARED_PLACEHOLDERS: [&str; 2] = ["target", "evidence"];

/// One position in the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub role: Role,
    pub model: String,
    pub template: String,
}

impl Seat {
    pub fn new(role: Role, model: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            role,
            model: model.into(),
            template: template.into(),
        }
    }
}

/// Record of one seat's invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilTurn {
    pub role: Role,
    pub model: String,
    pub prompt: String,
    pub output: String,
    pub usage: TokenUsage,
}

/// Completed council session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliberation {
    turns: Vec<CouncilTurn>,
}

impl Deliberation {
    pub fn turns(&self) -> &[CouncilTurn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<CouncilTurn> {
        self.turns
    }

    /// Output of the last seat
    pub fn report(&self) -> &str {
        self.turns.last().map(|t| t.output.as_str()).unwrap_or_default()
    }

    pub fn turn(&self, role: Role) -> Option<&CouncilTurn> {
        self.turns.iter().find(|t| t.role == role)
    }

    pub fn usage(&self) -> TokenUsage {
        self.turns
            .iter()
            .fold(TokenUsage::default(), |acc, t| acc + t.usage)
    }
}

/// Fixed chain of reasoning seats
pub struct Council {
    seats: Vec<Seat>,
    provider: Arc<dyn LlmProvider>,
    events: Arc<dyn EventSender>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl Council {
    /// Create a council, rejecting chains whose templates look ahead
    pub fn new(
        seats: Vec<Seat>,
        provider: Arc<dyn LlmProvider>,
        events: Arc<dyn EventSender>,
    ) -> Result<Self> {
        validate(&seats)?;
        Ok(Self {
            seats,
            provider,
            events,
            max_tokens: None,
            temperature: None,
        })
    }

    /// Build seats from configuration, filling templates from `prompts`
    pub fn from_config(
        config: &CouncilConfig,
        prompts: &Prompts,
        runtime: &RuntimeConfig,
        provider: Arc<dyn LlmProvider>,
        events: Arc<dyn EventSender>,
    ) -> Result<Self> {
        let seats = config
            .seats
            .iter()
            .map(|seat| {
                let template = seat
                    .template
                    .clone()
                    .unwrap_or_else(|| prompts.get(seat.role).to_string());
                Seat::new(seat.role, seat.model.clone(), template)
            })
            .collect();

        let mut council = Self::new(seats, provider, events)?;
        council.max_tokens = Some(runtime.max_tokens);
        council.temperature = runtime.temperature;
        Ok(council)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Prompt for `seat` given the evidence and the turns before it
    pub fn render_prompt(
        seat: &Seat,
        target: &Target,
        evidence: &EvidenceContext,
        prior: &[CouncilTurn],
    ) -> String {
        template::render(&seat.template, |name| match name {
            "target" => Some(Cow::Borrowed(target.as_str())),
            "evidence" => Some(Cow::Borrowed(evidence.as_str())),
            other => prior
                .iter()
                .find(|turn| turn.role.key() == other)
                .map(|turn| Cow::Borrowed(turn.output.as_str())),
        })
    }

    /// Run every seat in order
    pub async fn convene(
        &self,
        target: &Target,
        evidence: &EvidenceContext,
    ) -> Result<Deliberation> {
        self.events.send(PipelineEvent::PhaseStarted {
            phase: Phase::Council,
            target: target.to_string(),
        });

        let mut turns: Vec<CouncilTurn> = Vec::with_capacity(self.seats.len());
        for seat in &self.seats {
            self.events.send(PipelineEvent::TurnStarted {
                role: seat.role,
                model: seat.model.clone(),
            });

            let prompt = Self::render_prompt(seat, target, evidence, &turns);
            debug!(role = %seat.role, "Prompt is {} chars", prompt.len());

            let mut request = CompletionRequest::new(&seat.model, prompt.clone())
                .with_temperature(self.temperature);
            if let Some(max_tokens) = self.max_tokens {
                request = request.with_max_tokens(max_tokens);
            }

            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|e| Error::Council {
                    role: seat.role.to_string(),
                    reason: e.to_string(),
                })?;

            self.events.send(PipelineEvent::TurnCompleted {
                role: seat.role,
                model: seat.model.clone(),
                output_chars: response.content.chars().count(),
            });

            turns.push(CouncilTurn {
                role: seat.role,
                model: seat.model.clone(),
                prompt,
                output: response.content,
                usage: response.usage,
            });
        }

        Ok(Deliberation { turns })
    }
}

fn validate(seats: &[Seat]) -> Result<()> {
    if seats.is_empty() {
        return Err(Error::Config("council needs at least one seat".to_string()));
    }

    let mut seated: HashSet<Role> = HashSet::new();
    for seat in seats {
        if seat.model.trim().is_empty() {
            return Err(Error::Config(format!("{} seat has no model", seat.role)));
        }

        for name in template::placeholders(&seat.template) {
            if SHARED_PLACEHOLDERS.contains(&name) {
                continue;
            }
            match Role::from_key(name) {
                Some(role) if seated.contains(&role) => {}
                Some(role) if role == seat.role => {
                    return Err(Error::Config(format!(
                        "{} template references its own output {{{}}}",
                        seat.role, name
                    )));
                }
                Some(_) => {
                    return Err(Error::Config(format!(
                        "{} template references {{{}}}, which is not an earlier seat",
                        seat.role, name
                    )));
                }
                None => {
                    return Err(Error::Config(format!(
                        "{} template uses unknown placeholder {{{}}}",
                        seat.role, name
                    )));
                }
            }
        }

        if !seated.insert(seat.role) {
            return Err(Error::Config(format!("{} is seated twice", seat.role)));
        }
    }

    Ok(())
}
