//! Best-effort evidence collection
//!
//! Every declared probe yields a field, whatever happens to the tool behind it.
//! Failures are already folded into text by the [`CommandRunner`]; the only
//! decision made here is whether a probe's prerequisite exists.

use std::sync::Arc;

use crate::config::EvidenceConfig;
use crate::events::{EventSender, Phase, PipelineEvent};
use crate::targets::Target;
use crate::tools::{CommandRunner, PrerequisiteCheck};

use super::batch::{EvidenceBatch, ProbeResult};
use super::probes::{Probe, active_probes, passive_probes};

/// Runs the passive and active probe lists against a target
pub struct EvidenceCollector {
    runner: Arc<dyn CommandRunner>,
    prerequisites: Arc<dyn PrerequisiteCheck>,
    events: Arc<dyn EventSender>,
    config: EvidenceConfig,
    passive: Vec<Probe>,
    active: Vec<Probe>,
}

impl EvidenceCollector {
    /// Create a collector with the standard probe lists
    pub fn new(
        config: EvidenceConfig,
        runner: Arc<dyn CommandRunner>,
        prerequisites: Arc<dyn PrerequisiteCheck>,
        events: Arc<dyn EventSender>,
    ) -> Self {
        let passive = passive_probes(&config);
        let active = active_probes(&config);
        Self {
            runner,
            prerequisites,
            events,
            config,
            passive,
            active,
        }
    }

    /// Replace the probe lists
    pub fn with_probes(mut self, passive: Vec<Probe>, active: Vec<Probe>) -> Self {
        self.passive = passive;
        self.active = active;
        self
    }

    pub fn passive_probes(&self) -> &[Probe] {
        &self.passive
    }

    pub fn active_probes(&self) -> &[Probe] {
        &self.active
    }

    pub async fn collect_passive(&self, target: &Target) -> EvidenceBatch {
        self.collect(Phase::Passive, &self.passive, target).await
    }

    pub async fn collect_active(&self, target: &Target) -> EvidenceBatch {
        self.collect(Phase::Active, &self.active, target).await
    }

    async fn collect(&self, phase: Phase, probes: &[Probe], target: &Target) -> EvidenceBatch {
        self.events.send(PipelineEvent::PhaseStarted {
            phase,
            target: target.to_string(),
        });

        let mut results = Vec::with_capacity(probes.len());
        for probe in probes {
            let output = self.run_probe(phase, probe, target).await;
            results.push(ProbeResult::new(probe.field.clone(), output));
        }

        EvidenceBatch::new(phase, results)
    }

    async fn run_probe(&self, phase: Phase, probe: &Probe, target: &Target) -> String {
        if let Some(prerequisite) = &probe.prerequisite {
            if !self.prerequisites.exists(&prerequisite.path) {
                self.events.send(PipelineEvent::ProbeSkipped {
                    phase,
                    field: probe.field.clone(),
                    reason: format!("{} is missing", prerequisite.path.display()),
                });
                return prerequisite.missing.clone();
            }
        }

        self.events.send(PipelineEvent::ProbeStarted {
            phase,
            field: probe.field.clone(),
        });
        let command = probe.command_for(target, &self.config);
        self.runner.run(&command).await
    }
}
