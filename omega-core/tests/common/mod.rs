//! Shared test doubles for pipeline integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use omega_core::events::{EventSender, PipelineEvent};
use omega_core::providers::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
use omega_core::tools::{CommandRunner, PrerequisiteCheck};
use omega_core::{Error, Result};

/// Answers every command with the same text and remembers what it was asked
pub struct FixedRunner {
    output: String,
    pub commands: Mutex<Vec<String>>,
}

impl FixedRunner {
    pub fn new(output: &str) -> Arc<Self> {
        Arc::new(Self {
            output: output.to_string(),
            commands: Mutex::new(Vec::new()),
        })
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FixedRunner {
    async fn run(&self, command: &str) -> String {
        self.commands.lock().unwrap().push(command.to_string());
        self.output.clone()
    }
}

/// Reports every prerequisite as present or absent
pub struct Prerequisites(pub bool);

impl PrerequisiteCheck for Prerequisites {
    fn exists(&self, _path: &Path) -> bool {
        self.0
    }
}

/// Replies from a fixed script, one entry per call; `Err` entries fail the call
pub struct ScriptedProvider {
    script: Vec<std::result::Result<String, String>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: &[std::result::Result<&str, &str>]) -> Arc<Self> {
        Arc::new(Self {
            script: script
                .iter()
                .map(|&step| step.map(str::to_string).map_err(str::to_string))
                .collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };
        match self.script.get(call) {
            Some(Ok(text)) => Ok(CompletionResponse {
                content: text.clone(),
                usage: TokenUsage {
                    input_tokens: 100,
                    output_tokens: 10,
                },
            }),
            Some(Err(reason)) => Err(Error::Provider(reason.clone())),
            None => Err(Error::Provider(format!("unscripted call #{call}"))),
        }
    }
}

/// Keeps every event in order
#[derive(Default)]
pub struct RecordingEvents(Mutex<Vec<PipelineEvent>>);

impl RecordingEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSender for RecordingEvents {
    fn send(&self, event: PipelineEvent) {
        self.0.lock().unwrap().push(event);
    }
}
