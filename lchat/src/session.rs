//! Turn orchestration for a single chat panel.
//!
//! A [`ChatSession`] owns its [`Conversation`] and runs one request at a time.
//! Each prompt walks `Idle -> AwaitingResponse -> Streaming -> Finalizing -> Idle`,
//! or drops to `Failed` on any gateway or decoder fault. Faults never escape a
//! turn: they are classified and relayed as exactly one error signal.
//!
//! When driven through [`ChatSession::run`], the session keeps reading its
//! command channel while a request is in flight. Competing prompts and clears
//! are answered with a command-rejected signal that leaves the streaming
//! response intact; exports are served immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use lcommon::{SessionId, sanitize_for_display};
use lprovider::{DeliveryMode, InvokeRequest, ProviderGateway, RequestConfig, Turn};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    ChatError, ChatRuntimeHooks, Conversation, EditorSink, ErrorClassifier, NoopChatHooks,
    TurnOutcome, TurnState, UiCommand, UiRelay, UiSignal, decode_complete, decode_unit,
};

const DEFAULT_SESSION_ID: &str = "default";
const MAX_REJECTION_CHARS: usize = 300;
const BUSY_SUBMIT_MESSAGE: &str =
    "A response is still in progress. Wait for it to finish before sending another prompt.";
const BUSY_CLEAR_MESSAGE: &str =
    "A response is still in progress. Wait for it to finish before clearing the conversation.";

type Interrupts<'a> = Option<&'a mut UnboundedReceiver<UiCommand>>;

enum Step<T> {
    Command(Option<UiCommand>),
    Ready(T),
}

pub struct ChatSession {
    id: SessionId,
    gateway: Arc<dyn ProviderGateway>,
    config: RequestConfig,
    conversation: Conversation,
    relay: Arc<dyn UiRelay>,
    editor: Option<Arc<dyn EditorSink>>,
    hooks: Arc<dyn ChatRuntimeHooks>,
    classifier: ErrorClassifier,
    state: TurnState,
}

impl ChatSession {
    pub fn builder(
        gateway: Arc<dyn ProviderGateway>,
        relay: Arc<dyn UiRelay>,
    ) -> ChatSessionBuilder {
        ChatSessionBuilder::new(gateway, relay)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Runs one prompt to completion or failure.
    ///
    /// Returns `Err` only when the prompt is rejected before any state change;
    /// gateway and decoder faults come back as [`TurnOutcome::Failed`].
    pub async fn submit_prompt(
        &mut self,
        prompt: impl Into<String>,
    ) -> Result<TurnOutcome, ChatError> {
        let mut interrupts = None;
        self.run_turn(prompt.into(), &mut interrupts).await
    }

    pub fn clear_conversation(&mut self) -> Result<(), ChatError> {
        self.recover_stale_request();

        let removed = self.conversation.len();
        self.conversation.clear()?;
        self.hooks.on_conversation_cleared(&self.id, removed);
        Ok(())
    }

    /// Forwards `text` verbatim to the editor sink.
    pub async fn export_to_editor(&self, text: impl Into<String>) -> Result<(), ChatError> {
        let editor = self
            .editor
            .as_ref()
            .ok_or_else(|| ChatError::editor("no active editor to insert into"))?;

        editor.insert(text.into()).await
    }

    /// Processes one UI command, relaying a command-rejected signal if it fails.
    pub async fn handle_command(&mut self, command: UiCommand) {
        let mut interrupts = None;
        self.dispatch(command, &mut interrupts).await;
    }

    /// Consumes commands until the channel closes, then hands the session back.
    pub async fn run(mut self, mut commands: UnboundedReceiver<UiCommand>) -> Self {
        while let Some(command) = commands.recv().await {
            let mut interrupts = Some(&mut commands);
            self.dispatch(command, &mut interrupts).await;
        }

        self
    }

    async fn dispatch(&mut self, command: UiCommand, interrupts: &mut Interrupts<'_>) {
        let name = command.name();
        let result = match command {
            UiCommand::SubmitPrompt(prompt) => self.run_turn(prompt, interrupts).await.map(|_| ()),
            UiCommand::ClearConversation => self.clear_conversation(),
            UiCommand::ExportToEditor(text) => self.export_to_editor(text).await,
        };

        if let Err(error) = result {
            self.reject(name, &error);
        }
    }

    async fn run_turn(
        &mut self,
        prompt: String,
        interrupts: &mut Interrupts<'_>,
    ) -> Result<TurnOutcome, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::invalid_request("prompt must not be empty"));
        }

        self.recover_stale_request();
        self.conversation.append(Turn::user(prompt))?;
        self.conversation.begin_request()?;
        self.state = TurnState::AwaitingResponse;
        self.relay.send(UiSignal::ResponseStarted);

        let mode = self.config.delivery_mode();
        let history_len = self.conversation.len();
        self.hooks.on_turn_start(&self.id, mode, history_len);
        let started = Instant::now();

        let response = match mode {
            DeliveryMode::Streaming => self.stream_response(interrupts).await,
            DeliveryMode::Complete => self.complete_response(interrupts).await,
        };

        let outcome = match response {
            Ok(assistant_text) => {
                self.state = TurnState::Finalizing;
                let chars = assistant_text.chars().count();
                let reply = Turn::assistant(assistant_text.clone());
                self.conversation.append(reply)?;
                self.conversation.finish_request();
                self.relay.send(UiSignal::ResponseEnded);
                let elapsed = started.elapsed();
                self.hooks.on_turn_complete(&self.id, mode, chars, elapsed);
                TurnOutcome::Completed { assistant_text }
            }
            Err(error) => {
                self.state = TurnState::Failed;
                self.conversation.finish_request();
                let message = self.classifier.report(&self.id, &error, started.elapsed());
                self.relay.send(UiSignal::Error(message.text.clone()));
                TurnOutcome::Failed(message)
            }
        };

        self.state = TurnState::Idle;
        Ok(outcome)
    }

    async fn stream_response(
        &mut self,
        interrupts: &mut Interrupts<'_>,
    ) -> Result<String, ChatError> {
        let gateway = Arc::clone(&self.gateway);
        let request = InvokeRequest::new(self.conversation.snapshot(), self.config.clone());

        let mut units = self
            .until_ready(gateway.invoke_streaming(request), interrupts)
            .await?;
        self.state = TurnState::Streaming;

        let mut accumulated = String::new();
        while let Some(unit) = self.until_ready(units.next(), interrupts).await {
            if let Some(fragment) = decode_unit(&unit?)? {
                accumulated.push_str(&fragment.text);
                let chars = fragment.text.chars().count();
                self.hooks.on_fragment(&self.id, chars);
                self.relay.send(UiSignal::Fragment(fragment.text));
            }
        }

        Ok(accumulated)
    }

    async fn complete_response(
        &mut self,
        interrupts: &mut Interrupts<'_>,
    ) -> Result<String, ChatError> {
        let gateway = Arc::clone(&self.gateway);
        let request = InvokeRequest::new(self.conversation.snapshot(), self.config.clone());

        let response = self
            .until_ready(gateway.invoke_complete(request), interrupts)
            .await?;
        let text = decode_complete(&response)?;

        self.hooks.on_fragment(&self.id, text.chars().count());
        self.relay.send(UiSignal::Fragment(text.clone()));
        Ok(text)
    }

    /// Awaits `future` while answering commands that arrive in the meantime.
    async fn until_ready<F>(&self, future: F, interrupts: &mut Interrupts<'_>) -> F::Output
    where
        F: Future,
    {
        let mut future = std::pin::pin!(future);

        loop {
            let Some(commands) = interrupts.as_deref_mut() else {
                return future.await;
            };

            let step = tokio::select! {
                biased;
                command = commands.recv() => Step::Command(command),
                output = &mut future => Step::Ready(output),
            };

            match step {
                Step::Ready(output) => return output,
                Step::Command(Some(command)) => self.interrupt(command).await,
                Step::Command(None) => *interrupts = None,
            }
        }
    }

    async fn interrupt(&self, command: UiCommand) {
        let name = command.name();
        let result = match command {
            UiCommand::SubmitPrompt(_) => Err(ChatError::invalid_state(BUSY_SUBMIT_MESSAGE)),
            UiCommand::ClearConversation => Err(ChatError::invalid_state(BUSY_CLEAR_MESSAGE)),
            UiCommand::ExportToEditor(text) => self.export_to_editor(text).await,
        };

        if let Err(error) = result {
            self.reject(name, &error);
        }
    }

    fn reject(&self, command: &'static str, error: &ChatError) {
        self.hooks.on_command_rejected(&self.id, command, error);
        self.relay.send(UiSignal::CommandRejected {
            command,
            message: sanitize_for_display(&error.message, MAX_REJECTION_CHARS),
        });
    }

    // A turn future dropped mid-request leaves the in-flight mark behind.
    fn recover_stale_request(&mut self) {
        if self.conversation.is_in_flight() {
            self.conversation.finish_request();
        }
        self.state = TurnState::Idle;
    }
}

pub struct ChatSessionBuilder {
    id: SessionId,
    gateway: Arc<dyn ProviderGateway>,
    relay: Arc<dyn UiRelay>,
    config: RequestConfig,
    editor: Option<Arc<dyn EditorSink>>,
    hooks: Arc<dyn ChatRuntimeHooks>,
    conversation: Conversation,
}

impl ChatSessionBuilder {
    pub fn new(gateway: Arc<dyn ProviderGateway>, relay: Arc<dyn UiRelay>) -> Self {
        Self {
            id: SessionId::from(DEFAULT_SESSION_ID),
            gateway,
            relay,
            config: RequestConfig::default(),
            editor: None,
            hooks: Arc::new(NoopChatHooks),
            conversation: Conversation::new(),
        }
    }

    pub fn session_id(mut self, id: impl Into<SessionId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn editor(mut self, editor: Arc<dyn EditorSink>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Seeds the session with an existing history.
    pub fn conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn build(self) -> ChatSession {
        ChatSession {
            id: self.id,
            gateway: self.gateway,
            config: self.config,
            conversation: self.conversation,
            relay: self.relay,
            editor: self.editor,
            classifier: ErrorClassifier::new(Arc::clone(&self.hooks)),
            hooks: self.hooks,
            state: TurnState::Idle,
        }
    }
}
