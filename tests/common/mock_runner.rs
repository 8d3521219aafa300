//! Scripted command runner and operator for orchestrator tests

#![allow(dead_code)]

use async_trait::async_trait;
use backporter::cherry_pick::Interaction;
use backporter::error::{Error, Result};
use backporter::repo::CommandRunner;
use backporter::types::CommandOutcome;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const CURRENT_BRANCH: &str = "git rev-parse --abbrev-ref HEAD";
pub const STATUS: &str = "git status --porcelain --untracked-files=no";
pub const CHERRY_PICK: &str = "git cherry-pick -x";
pub const CONTINUE: &str = "git -c core.editor=true cherry-pick --continue";

/// Outcome git produces when a cherry-pick stops on a conflict
pub fn conflict() -> CommandOutcome {
    CommandOutcome {
        exit_code: 1,
        stdout: "Auto-merging src/lib.rs\nCONFLICT (content): Merge conflict in src/lib.rs\n"
            .to_string(),
        stderr: "error: could not apply aaa111... Fix login redirect\n".to_string(),
    }
}

/// A failed command whose stderr is not a conflict
pub fn failure(stderr: &str) -> CommandOutcome {
    CommandOutcome {
        exit_code: 128,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Command runner that records every command and replays scripted results
///
/// - `read` answers from exact-match responses (initial branch `main` and a
///   clean status by default)
/// - `run_captured` pops queued outcomes by command prefix, succeeding when
///   the queue is empty
/// - `run` fails for commands matching an injected prefix
pub struct MockRunner {
    commands: Mutex<Vec<String>>,
    read_responses: Mutex<HashMap<String, String>>,
    captured: Mutex<Vec<(String, VecDeque<CommandOutcome>)>>,
    fail_prefix: Mutex<Option<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        let mut reads = HashMap::new();
        reads.insert(CURRENT_BRANCH.to_string(), "main".to_string());
        reads.insert(STATUS.to_string(), String::new());
        Self {
            commands: Mutex::new(Vec::new()),
            read_responses: Mutex::new(reads),
            captured: Mutex::new(Vec::new()),
            fail_prefix: Mutex::new(None),
        }
    }

    /// Start on a different branch
    pub fn on_branch(&self, branch: &str) {
        self.set_read(CURRENT_BRANCH, branch);
    }

    /// Report uncommitted changes to tracked files
    pub fn with_local_changes(&self) {
        self.set_read(STATUS, " M src/main.rs");
    }

    pub fn set_read(&self, command: &str, output: &str) {
        self.read_responses
            .lock()
            .unwrap()
            .insert(command.to_string(), output.to_string());
    }

    /// Queue outcomes for captured commands starting with `prefix`
    pub fn script_captured(&self, prefix: &str, outcomes: Vec<CommandOutcome>) {
        self.captured
            .lock()
            .unwrap()
            .push((prefix.to_string(), outcomes.into()));
    }

    /// Make strict commands starting with `prefix` exit non-zero
    pub fn fail_on(&self, prefix: &str) {
        *self.fail_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    /// Every command, in execution order
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Number of executed commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Whether a command starting with `prefix` ran
    pub fn ran(&self, prefix: &str) -> bool {
        self.count(prefix) > 0
    }

    fn record(&self, command: &str) {
        self.commands.lock().unwrap().push(command.to_string());
    }

    fn check_failure(&self, command: &str) -> Result<()> {
        match self.fail_prefix.lock().unwrap().as_deref() {
            Some(prefix) if command.starts_with(prefix) => Err(Error::CommandFailed {
                command: command.to_string(),
                exit_code: 1,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &str) -> Result<()> {
        self.record(command);
        self.check_failure(command)
    }

    async fn run_captured(&self, command: &str) -> Result<CommandOutcome> {
        self.record(command);
        let mut captured = self.captured.lock().unwrap();
        let scripted = captured
            .iter_mut()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .and_then(|(_, queue)| queue.pop_front());
        Ok(scripted.unwrap_or_default())
    }

    async fn read(&self, command: &str) -> Result<String> {
        self.record(command);
        self.check_failure(command)?;
        Ok(self
            .read_responses
            .lock()
            .unwrap()
            .get(command)
            .cloned()
            .unwrap_or_default())
    }
}

/// Operator double that records what it was told and confirms every prompt
#[derive(Default)]
pub struct ScriptedInteraction {
    pub messages: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<u32>>,
    refuse_prompt: Mutex<bool>,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the conflict prompt fail, as when stdin is closed
    pub fn refuse_prompts(&self) {
        *self.refuse_prompt.lock().unwrap() = true;
    }

    pub fn prompt_attempts(&self) -> Vec<u32> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    async fn on_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    async fn on_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    async fn await_conflict_resolution(&self, attempt: u32) -> Result<()> {
        self.prompts.lock().unwrap().push(attempt);
        if *self.refuse_prompt.lock().unwrap() {
            return Err(Error::Input("stdin closed".to_string()));
        }
        Ok(())
    }
}
