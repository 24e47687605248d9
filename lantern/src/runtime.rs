//! Runtime wiring: default hooks, session construction, and the spawned command loop.

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::{JoinError, JoinHandle};

use crate::{
    ChannelRelay, ChatConfig, ChatRuntimeHooks, ChatSession, ChatSessionBuilder,
    FanoutChatHooks, MetricsObservabilityHooks, ProviderGateway, SafeChatHooks,
    TracingObservabilityHooks, UiCommand, UiRelay, UiSignal,
};

/// Channels and task handle for a session running on the tokio runtime.
pub struct SessionHandle {
    pub commands: UnboundedSender<UiCommand>,
    pub signals: UnboundedReceiver<UiSignal>,
    pub task: JoinHandle<ChatSession>,
}

impl SessionHandle {
    /// Returns `false` once the session loop has stopped.
    pub fn send(&self, command: UiCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Closes the command channel, waits for the in-flight turn to settle, and
    /// returns the session with every signal it emitted after the last read.
    pub async fn close(self) -> Result<(ChatSession, Vec<UiSignal>), JoinError> {
        let Self {
            commands,
            mut signals,
            task,
        } = self;
        drop(commands);

        let session = task.await?;
        let mut pending = Vec::new();
        while let Ok(signal) = signals.try_recv() {
            pending.push(signal);
        }

        Ok((session, pending))
    }
}

/// Tracing and metrics hooks, each isolated from panics.
pub fn default_hooks() -> Arc<dyn ChatRuntimeHooks> {
    Arc::new(
        FanoutChatHooks::new()
            .with(Arc::new(SafeChatHooks::new(TracingObservabilityHooks)))
            .with(Arc::new(SafeChatHooks::new(MetricsObservabilityHooks))),
    )
}

pub fn session_builder(
    gateway: Arc<dyn ProviderGateway>,
    config: &ChatConfig,
    relay: Arc<dyn UiRelay>,
) -> ChatSessionBuilder {
    ChatSession::builder(gateway, relay)
        .config(config.to_request_config())
        .hooks(default_hooks())
}

/// Spawns a session with default hooks. Must be called inside a tokio runtime.
pub fn spawn_session(gateway: Arc<dyn ProviderGateway>, config: &ChatConfig) -> SessionHandle {
    spawn_session_with(|relay| session_builder(gateway, config, relay).build())
}

/// Spawns the session returned by `build`, wired to a fresh signal channel.
pub fn spawn_session_with(
    build: impl FnOnce(Arc<dyn UiRelay>) -> ChatSession,
) -> SessionHandle {
    let (relay, signals) = ChannelRelay::new();
    let session = build(Arc::new(relay));

    let (commands, receiver) = unbounded_channel();
    let task = tokio::spawn(session.run(receiver));

    SessionHandle {
        commands,
        signals,
        task,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        BoxedUnitStream, ChatConfig, InvokeRequest, ProviderError, ProviderFuture,
        ProviderGateway, RawResponse, RawUnit, UiCommand, UiSignal, VecUnitStream,
    };

    use super::spawn_session;

    #[derive(Debug)]
    struct EchoGateway;

    impl ProviderGateway for EchoGateway {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn invoke_streaming<'a>(
            &'a self,
            request: InvokeRequest,
        ) -> ProviderFuture<'a, Result<BoxedUnitStream<'a>, ProviderError>> {
            Box::pin(async move {
                request.validate()?;
                let units = VecUnitStream::new(vec![
                    Ok(RawUnit::from(r#"{"delta":{"text":"echo: "}}"#)),
                    Ok(RawUnit::from(r#"{"delta":{"text":"hi"}}"#)),
                ]);
                Ok(Box::pin(units) as BoxedUnitStream<'a>)
            })
        }

        fn invoke_complete<'a>(
            &'a self,
            _request: InvokeRequest,
        ) -> ProviderFuture<'a, Result<RawResponse, ProviderError>> {
            Box::pin(async { Err(ProviderError::other("not used")) })
        }
    }

    #[tokio::test]
    async fn spawned_session_streams_and_hands_back_history() {
        let handle = spawn_session(Arc::new(EchoGateway), &ChatConfig::default());
        assert!(handle.send(UiCommand::SubmitPrompt("hi".to_string())));

        let (session, signals) = handle.close().await.expect("session task should finish");
        assert_eq!(
            signals,
            vec![
                UiSignal::ResponseStarted,
                UiSignal::Fragment("echo: ".to_string()),
                UiSignal::Fragment("hi".to_string()),
                UiSignal::ResponseEnded,
            ]
        );
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.session_id().as_str(), "default");
    }
}
