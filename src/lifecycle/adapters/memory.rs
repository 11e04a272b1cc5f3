//! In-memory capability fakes for tests and headless runs.

use crate::lifecycle::{
    domain::{CardColour, Marker, PromptReply, PromptRequest},
    ports::{
        AnnotationError, AnnotationResult, AnnotationStore, CapabilityError, CapabilityResult,
        Prompt, SessionTimer,
    },
};
use crate::task::domain::DurationUnits;
use async_trait::async_trait;
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

const CAPABILITY: &str = "memory";

fn poisoned<T>(err: &PoisonError<T>) -> CapabilityError {
    CapabilityError::Failed {
        capability: CAPABILITY,
        message: err.to_string(),
    }
}

/// Prompt that answers from a script of replies.
///
/// Once the script runs out every prompt gets the fallback reply.
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    state: Arc<Mutex<ScriptedPromptState>>,
}

#[derive(Debug)]
struct ScriptedPromptState {
    replies: VecDeque<CapabilityResult<PromptReply>>,
    fallback: PromptReply,
    seen: Vec<PromptRequest>,
}

impl ScriptedPrompt {
    /// Creates a prompt that accepts everything.
    #[must_use]
    pub fn accepting() -> Self {
        Self::with_fallback(PromptReply::Accepted)
    }

    /// Creates a prompt answering `fallback` once the script is exhausted.
    #[must_use]
    pub fn with_fallback(fallback: PromptReply) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedPromptState {
                replies: VecDeque::new(),
                fallback,
                seen: Vec::new(),
            })),
        }
    }

    /// Queues the next replies in order.
    #[must_use]
    pub fn then(self, replies: impl IntoIterator<Item = PromptReply>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.replies.extend(replies.into_iter().map(Ok));
        }
        self
    }

    /// Queues a failure as the next reply.
    #[must_use]
    pub fn then_fail(self, message: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.replies.push_back(Err(CapabilityError::Failed {
                capability: CAPABILITY,
                message: message.to_owned(),
            }));
        }
        self
    }

    /// Returns every request shown so far.
    #[must_use]
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.state
            .lock()
            .map(|state| state.seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn confirm(&self, request: &PromptRequest) -> CapabilityResult<PromptReply> {
        let mut state = self.state.lock().map_err(|err| poisoned(&err))?;
        state.seen.push(request.clone());
        let fallback = state.fallback;
        state.replies.pop_front().unwrap_or(Ok(fallback))
    }
}

/// Timer call recorded by [`RecordingTimer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCall {
    /// `start_timer(name, duration)`.
    Start(String, DurationUnits),
    /// `stop_timer()`.
    Stop,
}

/// Timer that records calls and can be told to fail on start.
#[derive(Debug, Clone, Default)]
pub struct RecordingTimer {
    calls: Arc<Mutex<Vec<TimerCall>>>,
    fail_start: bool,
}

impl RecordingTimer {
    /// Creates a timer whose calls succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a timer whose `start_timer` fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail_start: true,
        }
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<TimerCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SessionTimer for RecordingTimer {
    async fn start_timer(&self, name: &str, duration: DurationUnits) -> CapabilityResult<()> {
        if self.fail_start {
            return Err(CapabilityError::Failed {
                capability: CAPABILITY,
                message: format!("timer {name} refused to start"),
            });
        }
        self.calls
            .lock()
            .map_err(|err| poisoned(&err))?
            .push(TimerCall::Start(name.to_owned(), duration));
        Ok(())
    }

    async fn stop_timer(&self) -> CapabilityResult<()> {
        self.calls
            .lock()
            .map_err(|err| poisoned(&err))?
            .push(TimerCall::Stop);
        Ok(())
    }
}

/// Annotation recorded by [`InMemoryAnnotationStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Repository key.
    pub repository: String,
    /// Card title.
    pub title: String,
    /// Marker applied.
    pub marker: Marker,
    /// Appended note.
    pub note: Option<String>,
}

/// Card recorded by [`InMemoryAnnotationStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Repository key.
    pub repository: String,
    /// Card text.
    pub text: String,
    /// Card colour.
    pub colour: CardColour,
}

/// Annotation store that records calls for known repositories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnnotationStore {
    repositories: BTreeSet<String>,
    state: Arc<Mutex<AnnotationLog>>,
}

#[derive(Debug, Default)]
struct AnnotationLog {
    annotations: Vec<Annotation>,
    cards: Vec<Card>,
}

impl InMemoryAnnotationStore {
    /// Creates a store that knows `repositories`.
    #[must_use]
    pub fn with_repositories<I, S>(repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repositories: repositories.into_iter().map(Into::into).collect(),
            state: Arc::default(),
        }
    }

    /// Returns recorded annotations.
    #[must_use]
    pub fn annotations(&self) -> Vec<Annotation> {
        self.state
            .lock()
            .map(|log| log.annotations.clone())
            .unwrap_or_default()
    }

    /// Returns recorded cards.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.state
            .lock()
            .map(|log| log.cards.clone())
            .unwrap_or_default()
    }

    fn check(&self, repository: &str) -> AnnotationResult<()> {
        if self.repositories.contains(repository) {
            Ok(())
        } else {
            Err(AnnotationError::UnknownRepository(repository.to_owned()))
        }
    }
}

fn log_poisoned<T>(err: &PoisonError<T>) -> AnnotationError {
    AnnotationError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AnnotationStore for InMemoryAnnotationStore {
    async fn annotate(
        &self,
        repository: &str,
        title: &str,
        marker: Marker,
        note: Option<&str>,
    ) -> AnnotationResult<()> {
        self.check(repository)?;
        self.state
            .lock()
            .map_err(|err| log_poisoned(&err))?
            .annotations
            .push(Annotation {
                repository: repository.to_owned(),
                title: title.to_owned(),
                marker,
                note: note.map(str::to_owned),
            });
        Ok(())
    }

    async fn add_card(
        &self,
        repository: &str,
        text: &str,
        colour: CardColour,
    ) -> AnnotationResult<()> {
        self.check(repository)?;
        self.state
            .lock()
            .map_err(|err| log_poisoned(&err))?
            .cards
            .push(Card {
                repository: repository.to_owned(),
                text: text.to_owned(),
                colour,
            });
        Ok(())
    }
}
