use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::FutureExt;
use lchat::{
    ChannelRelay, ChatError, ChatErrorKind, ChatRuntimeHooks, ChatSession, EditorSink,
    ErrorCategory, SessionId, TurnOutcome, TurnState, UiCommand, UiRelay, UiSignal,
};
use lcommon::BoxFuture;
use lprovider::{
    BoxedUnitStream, DeliveryMode, InvokeRequest, ProviderError, ProviderFuture, ProviderGateway,
    RawResponse, RawUnit, RequestConfig, Role, VecUnitStream,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

enum Script {
    Units(Vec<Result<RawUnit, ProviderError>>),
    Live(UnboundedReceiver<Result<RawUnit, ProviderError>>),
    Fail(ProviderError),
    Complete(Result<RawResponse, ProviderError>),
}

#[derive(Default)]
struct FakeGateway {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<InvokeRequest>>,
}

impl FakeGateway {
    fn with_scripts(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn next_script(&self, request: InvokeRequest) -> Script {
        self.requests.lock().expect("requests lock").push(request);
        self.scripts
            .lock()
            .expect("scripts lock")
            .pop_front()
            .expect("a script for every request")
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

impl ProviderGateway for FakeGateway {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn invoke_streaming<'a>(
        &'a self,
        request: InvokeRequest,
    ) -> ProviderFuture<'a, Result<BoxedUnitStream<'a>, ProviderError>> {
        Box::pin(async move {
            match self.next_script(request) {
                Script::Units(units) => {
                    Ok(Box::pin(VecUnitStream::new(units)) as BoxedUnitStream<'a>)
                }
                Script::Live(receiver) => {
                    let units = futures_util::stream::unfold(receiver, |mut receiver| async move {
                        receiver.recv().await.map(|unit| (unit, receiver))
                    });
                    Ok(Box::pin(units) as BoxedUnitStream<'a>)
                }
                Script::Fail(error) => Err(error),
                Script::Complete(_) => panic!("complete script used on streaming path"),
            }
        })
    }

    fn invoke_complete<'a>(
        &'a self,
        request: InvokeRequest,
    ) -> ProviderFuture<'a, Result<RawResponse, ProviderError>> {
        Box::pin(async move {
            match self.next_script(request) {
                Script::Complete(result) => result,
                Script::Fail(error) => Err(error),
                Script::Units(_) | Script::Live(_) => {
                    panic!("streaming script used on complete path")
                }
            }
        })
    }
}

#[derive(Default)]
struct RecordingRelay {
    signals: Mutex<Vec<UiSignal>>,
}

impl RecordingRelay {
    fn take(&self) -> Vec<UiSignal> {
        std::mem::take(&mut *self.signals.lock().expect("signals lock"))
    }
}

impl UiRelay for RecordingRelay {
    fn send(&self, signal: UiSignal) {
        self.signals.lock().expect("signals lock").push(signal);
    }
}

#[derive(Default)]
struct RecordingEditor {
    inserted: Mutex<Vec<String>>,
}

impl EditorSink for RecordingEditor {
    fn insert<'a>(&'a self, text: String) -> BoxFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.inserted.lock().expect("inserted lock").push(text);
            Ok(())
        })
    }
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }

    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl ChatRuntimeHooks for RecordingHooks {
    fn on_turn_start(&self, _session_id: &SessionId, mode: DeliveryMode, history_len: usize) {
        self.push(format!("start:{mode:?}:{history_len}"));
    }

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        _mode: DeliveryMode,
        chars: usize,
        _elapsed: Duration,
    ) {
        self.push(format!("complete:{chars}"));
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        category: ErrorCategory,
        error: &ChatError,
        _elapsed: Duration,
    ) {
        self.push(format!("failure:{}:{}", category.as_str(), error.message));
    }

    fn on_conversation_cleared(&self, _session_id: &SessionId, removed_turns: usize) {
        self.push(format!("cleared:{removed_turns}"));
    }

    fn on_command_rejected(
        &self,
        _session_id: &SessionId,
        command: &'static str,
        _error: &ChatError,
    ) {
        self.push(format!("rejected:{command}"));
    }
}

fn delta(text: &str) -> Result<RawUnit, ProviderError> {
    Ok(RawUnit::from(format!(
        r#"{{"type":"content_block_delta","delta":{{"type":"text_delta","text":"{text}"}}}}"#
    )))
}

fn session(gateway: Arc<FakeGateway>, relay: Arc<RecordingRelay>) -> ChatSession {
    ChatSession::builder(gateway, relay).session_id("panel-1").build()
}

#[tokio::test]
async fn streamed_fragments_are_relayed_in_order_and_finalized() {
    let gateway = FakeGateway::with_scripts(vec![Script::Units(vec![
        Ok(RawUnit::from(r#"{"type":"message_start","message":{"role":"assistant"}}"#)),
        delta("It "),
        delta("works."),
        Ok(RawUnit::from(r#"{"type":"message_stop"}"#)),
    ])]);
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway.clone(), relay.clone());

    let outcome = session
        .submit_prompt("Explain this code")
        .await
        .expect("prompt should be accepted");

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            assistant_text: "It works.".to_string()
        }
    );
    assert_eq!(
        relay.take(),
        vec![
            UiSignal::ResponseStarted,
            UiSignal::Fragment("It ".to_string()),
            UiSignal::Fragment("works.".to_string()),
            UiSignal::ResponseEnded,
        ]
    );

    let turns = session.conversation().snapshot();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "Explain this code");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "It works.");
    assert_eq!(session.state(), TurnState::Idle);
    assert!(!session.conversation().is_in_flight());
}

#[tokio::test]
async fn fault_free_prompts_produce_alternating_history() {
    let prompts = ["first", "second", "third"];
    let gateway = FakeGateway::with_scripts(
        prompts
            .iter()
            .map(|prompt| Script::Units(vec![delta(&format!("re: {prompt}"))]))
            .collect(),
    );
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway.clone(), relay);

    for prompt in prompts {
        session.submit_prompt(prompt).await.expect("prompt accepted");
    }

    let turns = session.conversation().snapshot();
    assert_eq!(turns.len(), prompts.len() * 2);
    for (index, prompt) in prompts.iter().enumerate() {
        assert_eq!(turns[index * 2].role, Role::User);
        assert_eq!(turns[index * 2].content, *prompt);
        assert_eq!(turns[index * 2 + 1].role, Role::Assistant);
        assert_eq!(turns[index * 2 + 1].content, format!("re: {prompt}"));
    }

    let requests = gateway.requests.lock().expect("requests lock");
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].turns.len(), 5);
    assert_eq!(requests[2].turns[4].content, "third");
}

#[tokio::test]
async fn credentials_fault_before_any_unit_keeps_user_turn() {
    let gateway = FakeGateway::with_scripts(vec![Script::Fail(ProviderError::authentication(
        "no Bedrock API key configured",
    ))]);
    let relay = Arc::new(RecordingRelay::default());
    let hooks = Arc::new(RecordingHooks::default());
    let mut session = ChatSession::builder(gateway, relay.clone())
        .hooks(hooks.clone())
        .build();

    let outcome = session.submit_prompt("Explain this code").await.expect("accepted");
    let message = match outcome {
        TurnOutcome::Failed(message) => message,
        other => panic!("expected failure, got {other:?}"),
    };
    assert_eq!(message.category, ErrorCategory::Credentials);

    let signals = relay.take();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0], UiSignal::ResponseStarted);
    assert_eq!(signals[1], UiSignal::Error(message.text.clone()));
    assert!(!message.text.contains("no Bedrock API key configured"));

    let turns = session.conversation().snapshot();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::User);

    assert_eq!(
        hooks.events(),
        vec![
            "start:Streaming:1".to_string(),
            "failure:credentials:no Bedrock API key configured".to_string(),
        ]
    );
}

#[tokio::test]
async fn malformed_unit_fails_turn_with_one_error_signal() {
    let gateway = FakeGateway::with_scripts(vec![Script::Units(vec![
        delta("partial "),
        Ok(RawUnit::from("{not json")),
        delta("never seen"),
    ])]);
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway, relay.clone());

    let outcome = session.submit_prompt("hello").await.expect("accepted");
    assert!(matches!(
        outcome,
        TurnOutcome::Failed(ref message) if message.category == ErrorCategory::Generic
    ));

    let signals = relay.take();
    assert_eq!(signals[0], UiSignal::ResponseStarted);
    assert_eq!(signals[1], UiSignal::Fragment("partial ".to_string()));
    assert!(matches!(signals[2], UiSignal::Error(_)));
    assert_eq!(signals.len(), 3);

    assert_eq!(session.conversation().len(), 1);
    assert_eq!(session.state(), TurnState::Idle);
}

#[tokio::test]
async fn mid_stream_provider_fault_discards_partial_text() {
    let gateway = FakeGateway::with_scripts(vec![
        Script::Units(vec![
            delta("It "),
            Err(ProviderError::throttled("Too many requests").with_status(429)),
        ]),
        Script::Units(vec![delta("Retried.")]),
    ]);
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway, relay.clone());

    let outcome = session.submit_prompt("hello").await.expect("accepted");
    let message = match outcome {
        TurnOutcome::Failed(message) => message,
        other => panic!("expected failure, got {other:?}"),
    };
    assert!(message.text.contains("Too many requests"));
    assert_eq!(session.conversation().len(), 1);

    session.submit_prompt("hello again").await.expect("accepted");
    let turns = session.conversation().snapshot();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[2].content, "Retried.");
}

#[tokio::test]
async fn complete_path_falls_back_to_pretty_printed_body() {
    let gateway = FakeGateway::with_scripts(vec![Script::Complete(Ok(RawResponse::from(
        r#"{"content":[]}"#,
    )))]);
    let relay = Arc::new(RecordingRelay::default());
    let mut session = ChatSession::builder(gateway.clone(), relay.clone())
        .config(RequestConfig::default().with_model_id("amazon.titan-text-express-v1"))
        .build();

    let outcome = session.submit_prompt("hello").await.expect("accepted");
    let expected = "{\n  \"content\": []\n}".to_string();
    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            assistant_text: expected.clone()
        }
    );
    assert_eq!(
        relay.take(),
        vec![
            UiSignal::ResponseStarted,
            UiSignal::Fragment(expected.clone()),
            UiSignal::ResponseEnded,
        ]
    );
    assert_eq!(session.conversation().snapshot()[1].content, expected);
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_any_state_change() {
    let gateway = FakeGateway::with_scripts(Vec::new());
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway.clone(), relay.clone());

    let err = session.submit_prompt("   ").await.expect_err("empty prompt");
    assert_eq!(err.kind, ChatErrorKind::InvalidRequest);
    assert!(relay.take().is_empty());
    assert!(session.conversation().is_empty());
    assert_eq!(gateway.request_count(), 0);

    session
        .handle_command(UiCommand::SubmitPrompt(String::new()))
        .await;
    let signals = relay.take();
    assert_eq!(signals.len(), 1);
    assert!(matches!(
        signals[0],
        UiSignal::CommandRejected { command: "submit_prompt", .. }
    ));
}

#[tokio::test]
async fn clear_after_completed_turn_empties_history() {
    let gateway = FakeGateway::with_scripts(vec![Script::Units(vec![delta("ok")])]);
    let relay = Arc::new(RecordingRelay::default());
    let hooks = Arc::new(RecordingHooks::default());
    let mut session = ChatSession::builder(gateway, relay.clone())
        .hooks(hooks.clone())
        .build();

    session.submit_prompt("hello").await.expect("accepted");
    session.handle_command(UiCommand::ClearConversation).await;

    assert!(session.conversation().is_empty());
    assert!(hooks.events().contains(&"cleared:2".to_string()));
}

#[tokio::test]
async fn export_without_editor_relays_error() {
    let gateway = FakeGateway::with_scripts(Vec::new());
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway, relay.clone());

    session
        .handle_command(UiCommand::ExportToEditor("fn main() {}".to_string()))
        .await;

    let signals = relay.take();
    assert_eq!(
        signals,
        vec![UiSignal::CommandRejected {
            command: "export_to_editor",
            message: "no active editor to insert into".to_string(),
        }]
    );
}

#[tokio::test]
async fn dropped_turn_leaves_no_stale_in_flight_mark() {
    let (_unit_tx, unit_rx) = unbounded_channel();
    let gateway = FakeGateway::with_scripts(vec![
        Script::Live(unit_rx),
        Script::Units(vec![delta("answer")]),
    ]);
    let relay = Arc::new(RecordingRelay::default());
    let mut session = session(gateway, relay);

    assert!(session.submit_prompt("abandoned").now_or_never().is_none());
    assert!(session.conversation().is_in_flight());

    let outcome = session.submit_prompt("retry").await.expect("accepted");
    assert!(matches!(outcome, TurnOutcome::Completed { .. }));

    let turns = session.conversation().snapshot();
    let contents = turns.iter().map(|turn| turn.content.as_str()).collect::<Vec<_>>();
    assert_eq!(contents, vec!["abandoned", "retry", "answer"]);
    assert!(!session.conversation().is_in_flight());
}

async fn expect_signal(signals: &mut UnboundedReceiver<UiSignal>) -> UiSignal {
    signals.recv().await.expect("relay should stay open")
}

fn send(commands: &UnboundedSender<UiCommand>, command: UiCommand) {
    commands.send(command).expect("session should be running");
}

#[tokio::test]
async fn command_loop_rejects_clear_and_submit_while_streaming() {
    let (unit_tx, unit_rx) = unbounded_channel();
    let gateway = FakeGateway::with_scripts(vec![Script::Live(unit_rx)]);
    let (relay, mut signals) = ChannelRelay::new();
    let editor = Arc::new(RecordingEditor::default());
    let hooks = Arc::new(RecordingHooks::default());
    let session = ChatSession::builder(gateway.clone(), Arc::new(relay))
        .editor(editor.clone())
        .hooks(hooks.clone())
        .build();

    let (commands, command_rx) = unbounded_channel();
    let task = tokio::spawn(session.run(command_rx));

    send(&commands, UiCommand::SubmitPrompt("Explain this code".to_string()));
    assert_eq!(expect_signal(&mut signals).await, UiSignal::ResponseStarted);

    unit_tx.send(delta("It ")).expect("stream open");
    assert_eq!(
        expect_signal(&mut signals).await,
        UiSignal::Fragment("It ".to_string())
    );

    send(&commands, UiCommand::ClearConversation);
    let rejected = expect_signal(&mut signals).await;
    assert!(matches!(
        rejected,
        UiSignal::CommandRejected { command: "clear_conversation", ref message }
            if message.contains("clearing")
    ));

    send(&commands, UiCommand::SubmitPrompt("Another".to_string()));
    let rejected = expect_signal(&mut signals).await;
    assert!(matches!(
        rejected,
        UiSignal::CommandRejected { command: "submit_prompt", ref message }
            if message.contains("another prompt")
    ));

    send(&commands, UiCommand::ExportToEditor("let x = 1;".to_string()));

    unit_tx.send(delta("works.")).expect("stream open");
    drop(unit_tx);
    assert_eq!(
        expect_signal(&mut signals).await,
        UiSignal::Fragment("works.".to_string())
    );
    assert_eq!(expect_signal(&mut signals).await, UiSignal::ResponseEnded);

    drop(commands);
    let session = task.await.expect("session task should finish");

    let turns = session.conversation().snapshot();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].content, "It works.");
    assert_eq!(gateway.request_count(), 1);
    assert_eq!(
        editor.inserted.lock().expect("inserted lock").as_slice(),
        &["let x = 1;".to_string()]
    );

    let events = hooks.events();
    assert!(events.contains(&"rejected:clear_conversation".to_string()));
    assert!(events.contains(&"rejected:submit_prompt".to_string()));
    assert!(events.contains(&"complete:9".to_string()));
}

const BUSY_CLEAR_MESSAGE: &str =
    "A response is still in progress. Wait for it to finish before clearing the conversation.";

#[tokio::test]
async fn rejected_clear_mid_stream_does_not_end_successful_response() {
    let (unit_tx, unit_rx) = unbounded_channel();
    let gateway = FakeGateway::with_scripts(vec![Script::Live(unit_rx)]);
    let (relay, mut signals) = ChannelRelay::new();
    let session = ChatSession::builder(gateway, Arc::new(relay)).build();

    let (commands, command_rx) = unbounded_channel();
    let task = tokio::spawn(session.run(command_rx));

    send(&commands, UiCommand::SubmitPrompt("Explain this code".to_string()));
    unit_tx.send(delta("It ")).expect("stream open");
    let mut received = vec![
        expect_signal(&mut signals).await,
        expect_signal(&mut signals).await,
    ];

    send(&commands, UiCommand::ClearConversation);
    received.push(expect_signal(&mut signals).await);

    unit_tx.send(delta("works.")).expect("stream open");
    drop(unit_tx);
    received.push(expect_signal(&mut signals).await);
    received.push(expect_signal(&mut signals).await);

    drop(commands);
    let session = task.await.expect("session task should finish");

    assert_eq!(
        received,
        vec![
            UiSignal::ResponseStarted,
            UiSignal::Fragment("It ".to_string()),
            UiSignal::CommandRejected {
                command: "clear_conversation",
                message: BUSY_CLEAR_MESSAGE.to_string(),
            },
            UiSignal::Fragment("works.".to_string()),
            UiSignal::ResponseEnded,
        ]
    );
    assert!(!received.iter().any(|signal| matches!(signal, UiSignal::Error(_))));
    assert_eq!(session.conversation().len(), 2);
}
