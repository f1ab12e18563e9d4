//! End-to-end run: passive recon, active recon, council, report

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::config::OmegaConfig;
use crate::council::{Council, CouncilTurn, Prompts};
use crate::events::{EventSender, Phase, PipelineEvent, TracingEvents};
use crate::evidence::{Compositor, EvidenceCollector};
use crate::providers::{LlmProvider, OllamaProvider, TokenUsage};
use crate::reports::{FileReportSink, ReportSink, Transcript};
use crate::targets::Target;
use crate::tools::{CommandRunner, FsPrerequisites, PrerequisiteCheck, ShellRunner};
use crate::Result;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub target: String,
    pub report_path: PathBuf,
    pub transcript_path: Option<PathBuf>,
    pub elapsed: Duration,
    pub turns: Vec<CouncilTurn>,
    /// Summed over every turn
    pub usage: TokenUsage,
}

/// The assembled recon and adjudication pipeline
pub struct Pipeline {
    collector: EvidenceCollector,
    compositor: Compositor,
    council: Council,
    sink: Arc<dyn ReportSink>,
    events: Arc<dyn EventSender>,
    save_transcript: bool,
}

impl Pipeline {
    pub fn builder(config: OmegaConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub fn council(&self) -> &Council {
        &self.council
    }

    /// Validate raw user input, then run
    ///
    /// Nothing is executed when the input is not an http(s) URL.
    pub async fn run_input(&self, input: &str) -> Result<RunSummary> {
        let target = Target::parse(input)?;
        self.run(&target).await
    }

    pub async fn run(&self, target: &Target) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        info!(%run_id, "Starting run against {}", target);

        let passive = self.collector.collect_passive(target).await;
        let active = self.collector.collect_active(target).await;
        let evidence = self.compositor.compose(target, &passive, &active);

        let deliberation = self.council.convene(target, &evidence).await?;
        let usage = deliberation.usage();

        self.events.send(PipelineEvent::PhaseStarted {
            phase: Phase::Report,
            target: target.to_string(),
        });
        let report_path = self.sink.persist(target, deliberation.report()).await?;
        self.events.send(PipelineEvent::ReportSaved {
            path: report_path.clone(),
        });

        let transcript_path = if self.save_transcript {
            let transcript = Transcript {
                run_id,
                target: target.to_string(),
                started_at,
                finished_at: Utc::now(),
                evidence: evidence.into_string(),
                turns: deliberation.turns().to_vec(),
                usage,
            };
            Some(self.sink.persist_transcript(target, &transcript).await?)
        } else {
            None
        };

        Ok(RunSummary {
            run_id,
            target: target.to_string(),
            report_path,
            transcript_path,
            elapsed: clock.elapsed(),
            turns: deliberation.into_turns(),
            usage,
        })
    }
}

/// Assembles a [`Pipeline`], defaulting any collaborator not supplied
pub struct PipelineBuilder {
    config: OmegaConfig,
    prompts: Option<Prompts>,
    runner: Option<Arc<dyn CommandRunner>>,
    prerequisites: Option<Arc<dyn PrerequisiteCheck>>,
    provider: Option<Arc<dyn LlmProvider>>,
    sink: Option<Arc<dyn ReportSink>>,
    events: Option<Arc<dyn EventSender>>,
}

impl PipelineBuilder {
    pub fn new(config: OmegaConfig) -> Self {
        Self {
            config,
            prompts: None,
            runner: None,
            prerequisites: None,
            provider: None,
            sink: None,
            events: None,
        }
    }

    pub fn prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = Some(prompts);
        self
    }

    pub fn runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn prerequisites(mut self, prerequisites: Arc<dyn PrerequisiteCheck>) -> Self {
        self.prerequisites = Some(prerequisites);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSender>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let config = self.config;

        let events: Arc<dyn EventSender> = match self.events {
            Some(events) => events,
            None => Arc::new(TracingEvents),
        };
        let runner: Arc<dyn CommandRunner> = match self.runner {
            Some(runner) => runner,
            None => {
                let mut shell = ShellRunner::new();
                if let Some(secs) = config.evidence.command_timeout_secs {
                    shell = shell.with_timeout(Duration::from_secs(secs));
                }
                Arc::new(shell)
            }
        };
        let prerequisites: Arc<dyn PrerequisiteCheck> = match self.prerequisites {
            Some(prerequisites) => prerequisites,
            None => Arc::new(FsPrerequisites),
        };
        let provider: Arc<dyn LlmProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(OllamaProvider::from_config(&config.runtime)?),
        };
        let sink: Arc<dyn ReportSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(FileReportSink::from_config(&config.output)),
        };
        let prompts = match (self.prompts, &config.council.prompts) {
            (Some(prompts), _) => prompts,
            (None, Some(path)) => Prompts::from_file(path)?,
            (None, None) => Prompts::default(),
        };

        let council = Council::from_config(
            &config.council,
            &prompts,
            &config.runtime,
            provider,
            Arc::clone(&events),
        )?;
        let collector = EvidenceCollector::new(
            config.evidence.clone(),
            runner,
            prerequisites,
            Arc::clone(&events),
        );

        Ok(Pipeline {
            collector,
            compositor: Compositor::new(config.context.clone()),
            council,
            sink,
            events,
            save_transcript: config.output.save_transcript,
        })
    }
}
