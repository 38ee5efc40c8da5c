use std::cell::Cell;

use crate::api::{self, ChatTransport};
use crate::errors::ChatError;
use crate::i18n::Strings;
use crate::models::{ChatRequest, Message, QuickAction, Role};
use crate::session::{SessionStore, StorageBackend};

/// Moves keyboard focus to the text field.
pub trait FocusInput {
    fn focus_input(&self);
}

/// Render primitives the message pump drives.
pub trait ChatView: FocusInput {
    fn push_message(&self, message: Message);
    fn clear_messages(&self);
    fn set_typing(&self, visible: bool);
    /// Disables (`true`) or enables the submit control.
    fn set_busy(&self, busy: bool);
    fn set_quick_actions_visible(&self, visible: bool);
    fn set_input(&self, text: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    Sending,
}

/// What a call to [`MessagePump::submit`] ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Another exchange was in flight; nothing happened.
    Busy,
    Replied,
    RateLimited,
    Failed,
    /// The widget was reset while the request was in flight and the reply
    /// was dropped.
    Discarded,
}

impl SubmitOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitOutcome::Ignored => "ignored",
            SubmitOutcome::Busy => "busy",
            SubmitOutcome::Replied => "replied",
            SubmitOutcome::RateLimited => "rate_limited",
            SubmitOutcome::Failed => "failed",
            SubmitOutcome::Discarded => "discarded",
        }
    }
}

/// How a reply that settles after a `refresh` is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaleReplyPolicy {
    /// Drop the reply and its session id.
    #[default]
    Discard,
    /// Render it after the greeting and keep its session id.
    Accept,
}

/// The send/receive lifecycle: Idle ⇄ Sending, guarded so that exactly one
/// exchange is in flight at a time.
pub struct MessagePump<V, T, B> {
    view: V,
    transport: T,
    session: SessionStore<B>,
    strings: Strings,
    stale_replies: StaleReplyPolicy,
    state: Cell<PumpState>,
    generation: Cell<u64>,
    next_message_id: Cell<u64>,
}

impl<V: ChatView, T: ChatTransport, B: StorageBackend> MessagePump<V, T, B> {
    pub fn new(
        view: V,
        transport: T,
        session: SessionStore<B>,
        strings: Strings,
        stale_replies: StaleReplyPolicy,
    ) -> Self {
        Self {
            view,
            transport,
            session,
            strings,
            stale_replies,
            state: Cell::new(PumpState::Idle),
            generation: Cell::new(0),
            next_message_id: Cell::new(0),
        }
    }

    pub fn state(&self) -> PumpState {
        self.state.get()
    }

    pub fn is_sending(&self) -> bool {
        self.state.get() == PumpState::Sending
    }

    /// Sends `text` as a user message and renders the outcome.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_sending() {
            log::debug!("Submission dropped: an exchange is already in flight");
            return SubmitOutcome::Busy;
        }

        self.push(Role::User, text);
        self.view.set_input("");
        self.state.set(PumpState::Sending);
        self.view.set_busy(true);
        self.view.set_quick_actions_visible(false);
        self.view.set_typing(true);

        let _settle = SettleGuard { view: &self.view, state: &self.state };
        let generation = self.generation.get();
        let request = ChatRequest::new(text, self.session.token());
        log::debug!("Sending chat request (session: {:?})", request.session_id);

        let result = match self.transport.post_chat(&request).await {
            Ok(reply) => api::classify(reply),
            Err(e) => Err(ChatError::from(e)),
        };
        self.view.set_typing(false);

        if generation != self.generation.get() && self.stale_replies == StaleReplyPolicy::Discard {
            log::debug!("Dropping reply from before the last reset");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(reply) => {
                if let Some(session_id) = reply.new_session_id() {
                    self.session.set(session_id);
                }
                self.push(Role::Assistant, reply.reply);
                SubmitOutcome::Replied
            }
            Err(e) => {
                log::debug!("Chat exchange failed: {e}");
                self.push(Role::Assistant, e.user_message(&self.strings));
                if e.is_rate_limited() {
                    SubmitOutcome::RateLimited
                } else {
                    SubmitOutcome::Failed
                }
            }
        }
    }

    /// Fills the input with the action's prompt and submits it. Leaves the
    /// view untouched while an exchange is in flight.
    pub async fn select_quick_action(&self, action: &QuickAction) -> SubmitOutcome {
        if self.is_sending() {
            log::debug!("Quick action dropped: an exchange is already in flight");
            return SubmitOutcome::Busy;
        }
        self.view.set_input(action.prompt);
        self.submit(action.prompt).await
    }

    /// Starts a new conversation. An exchange already in flight is not
    /// cancelled; it still settles when it resolves.
    pub fn refresh(&self) {
        self.generation.set(self.generation.get() + 1);
        self.view.clear_messages();
        self.view.set_quick_actions_visible(true);
        self.session.clear();
        self.greet();
    }

    pub fn greet(&self) {
        self.push(Role::Assistant, self.strings.greeting);
    }

    fn push(&self, role: Role, text: impl Into<String>) {
        let id = self.next_message_id.get();
        self.next_message_id.set(id + 1);
        self.view.push_message(Message::new(id, role, text));
    }
}

/// Runs the settle step when an exchange ends, however it ends.
struct SettleGuard<'a, V: ChatView> {
    view: &'a V,
    state: &'a Cell<PumpState>,
}

impl<V: ChatView> Drop for SettleGuard<'_, V> {
    fn drop(&mut self) {
        self.state.set(PumpState::Idle);
        self.view.set_typing(false);
        self.view.set_busy(false);
        self.view.focus_input();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    use super::*;
    use crate::api::HttpReply;
    use crate::errors::TransportError;
    use crate::i18n::Locale;
    use crate::quick_actions;
    use crate::session::tests::FailingStorage;
    use crate::session::{MemoryStorage, DEFAULT_SESSION_KEY};

    #[derive(Debug, Default)]
    pub(crate) struct ViewLog {
        pub messages: Vec<Message>,
        pub typing: bool,
        pub typing_shown: usize,
        pub busy: bool,
        pub quick_actions_visible: bool,
        pub input: String,
        pub focus_calls: usize,
    }

    /// Records what the pump renders.
    #[derive(Clone, Default)]
    pub(crate) struct FakeView(pub Rc<RefCell<ViewLog>>);

    impl FakeView {
        pub fn new() -> Self {
            let view = Self::default();
            view.0.borrow_mut().quick_actions_visible = true;
            view
        }

        fn texts(&self) -> Vec<(Role, String)> {
            self.0.borrow().messages.iter().map(|m| (m.role, m.text.clone())).collect()
        }
    }

    impl FocusInput for FakeView {
        fn focus_input(&self) {
            self.0.borrow_mut().focus_calls += 1;
        }
    }

    impl ChatView for FakeView {
        fn push_message(&self, message: Message) {
            self.0.borrow_mut().messages.push(message);
        }
        fn clear_messages(&self) {
            self.0.borrow_mut().messages.clear();
        }
        fn set_typing(&self, visible: bool) {
            let mut log = self.0.borrow_mut();
            if visible && !log.typing {
                log.typing_shown += 1;
            }
            log.typing = visible;
        }
        fn set_busy(&self, busy: bool) {
            self.0.borrow_mut().busy = busy;
        }
        fn set_quick_actions_visible(&self, visible: bool) {
            self.0.borrow_mut().quick_actions_visible = visible;
        }
        fn set_input(&self, text: &str) {
            self.0.borrow_mut().input = text.to_string();
        }
    }

    pub(crate) enum Scripted {
        Ready(Result<HttpReply, TransportError>),
        Deferred(oneshot::Receiver<Result<HttpReply, TransportError>>),
    }

    /// Answers requests from a script and snapshots the view at send time.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        pub requests: RefCell<Vec<ChatRequest>>,
        pub script: RefCell<VecDeque<Scripted>>,
        pub observer: Option<FakeView>,
        pub seen_at_send: RefCell<Vec<(bool, bool, usize)>>,
    }

    impl ScriptedTransport {
        pub fn with(script: Vec<Scripted>) -> Self {
            Self { script: RefCell::new(script.into()), ..Default::default() }
        }
    }

    impl ChatTransport for Rc<ScriptedTransport> {
        async fn post_chat(&self, request: &ChatRequest) -> Result<HttpReply, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            if let Some(view) = &self.observer {
                let log = view.0.borrow();
                self.seen_at_send.borrow_mut().push((log.typing, log.busy, log.messages.len()));
            }
            let next = self.script.borrow_mut().pop_front();
            match next.expect("unscripted request") {
                Scripted::Ready(result) => result,
                Scripted::Deferred(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(TransportError::new("sender dropped"))),
            }
        }
    }

    fn ok(body: &str) -> Scripted {
        Scripted::Ready(Ok(HttpReply::new(200, body)))
    }

    fn status(code: u16) -> Scripted {
        Scripted::Ready(Ok(HttpReply::new(code, "")))
    }

    type TestPump = MessagePump<FakeView, Rc<ScriptedTransport>, Rc<MemoryStorage>>;

    struct Harness {
        view: FakeView,
        transport: Rc<ScriptedTransport>,
        storage: Rc<MemoryStorage>,
        pump: Rc<TestPump>,
    }

    fn harness_with(script: Vec<Scripted>, policy: StaleReplyPolicy) -> Harness {
        let view = FakeView::new();
        let mut transport = ScriptedTransport::with(script);
        transport.observer = Some(view.clone());
        let transport = Rc::new(transport);
        let storage = Rc::new(MemoryStorage::new());
        let pump = Rc::new(MessagePump::new(
            view.clone(),
            transport.clone(),
            SessionStore::new(storage.clone(), DEFAULT_SESSION_KEY),
            Strings::for_locale(Locale::Korean),
            policy,
        ));
        Harness { view, transport, storage, pump }
    }

    fn harness(script: Vec<Scripted>) -> Harness {
        harness_with(script, StaleReplyPolicy::Discard)
    }

    fn stored_token(h: &Harness) -> Option<String> {
        h.storage.read(DEFAULT_SESSION_KEY).unwrap()
    }

    fn assert_settled(h: &Harness) {
        let log = h.view.0.borrow();
        assert_eq!(h.pump.state(), PumpState::Idle);
        assert!(!log.busy, "submit control must be enabled after settle");
        assert!(!log.typing, "typing indicator must be gone after settle");
    }

    #[test]
    fn first_exchange_stores_session_and_renders_reply() {
        let h = harness(vec![ok(r#"{"reply":"두온교육은 AI 도서를 출판합니다.","session_id":"abc"}"#)]);

        let outcome = block_on(h.pump.submit("  어떤 도서를 출판하나요?  "));

        assert_eq!(outcome, SubmitOutcome::Replied);
        let requests = h.transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], ChatRequest::new("어떤 도서를 출판하나요?", None));
        assert_eq!(
            h.view.texts(),
            vec![
                (Role::User, "어떤 도서를 출판하나요?".to_string()),
                (Role::Assistant, "두온교육은 AI 도서를 출판합니다.".to_string()),
            ]
        );
        assert_eq!(stored_token(&h).as_deref(), Some("abc"));
        assert_settled(&h);
    }

    #[test]
    fn user_message_and_typing_precede_the_network_call() {
        let h = harness(vec![ok(r#"{"reply":"ok"}"#)]);
        h.view.0.borrow_mut().input = "hello".into();

        block_on(h.pump.submit("hello"));

        let seen = h.transport.seen_at_send.borrow();
        assert_eq!(seen.as_slice(), &[(true, true, 1)]);
        let log = h.view.0.borrow();
        assert_eq!(log.input, "");
        assert!(!log.quick_actions_visible);
        assert_eq!(log.focus_calls, 1);
    }

    #[test]
    fn existing_token_is_sent_and_overwritten() {
        let h = harness(vec![
            ok(r#"{"reply":"one","session_id":"new-id"}"#),
            ok(r#"{"reply":"two"}"#),
        ]);
        h.storage.write(DEFAULT_SESSION_KEY, "old-id").unwrap();

        block_on(h.pump.submit("first"));
        assert_eq!(stored_token(&h).as_deref(), Some("new-id"));

        block_on(h.pump.submit("second"));
        assert_eq!(stored_token(&h).as_deref(), Some("new-id"));

        let requests = h.transport.requests.borrow();
        assert_eq!(requests[0].session_id.as_deref(), Some("old-id"));
        assert_eq!(requests[1].session_id.as_deref(), Some("new-id"));
    }

    #[test]
    fn blank_input_has_no_effect() {
        let h = harness(vec![]);
        for text in ["", "   ", "\n\t "] {
            assert_eq!(block_on(h.pump.submit(text)), SubmitOutcome::Ignored);
        }
        assert!(h.transport.requests.borrow().is_empty());
        let log = h.view.0.borrow();
        assert!(log.messages.is_empty());
        assert_eq!(log.typing_shown, 0);
        assert_eq!(log.focus_calls, 0);
    }

    #[test]
    fn rate_limit_renders_fixed_text_and_keeps_session() {
        let h = harness(vec![status(429)]);
        h.storage.write(DEFAULT_SESSION_KEY, "keep-me").unwrap();

        assert_eq!(block_on(h.pump.submit("hi")), SubmitOutcome::RateLimited);

        let strings = Strings::for_locale(Locale::Korean);
        let texts = h.view.texts();
        assert_eq!(texts.last().unwrap(), &(Role::Assistant, strings.rate_limited.to_string()));
        assert_eq!(stored_token(&h).as_deref(), Some("keep-me"));
        assert_settled(&h);
    }

    #[test]
    fn every_failure_class_settles_with_generic_text() {
        let strings = Strings::for_locale(Locale::Korean);
        let cases = vec![
            status(500),
            status(404),
            Scripted::Ready(Err(TransportError::new("connection refused"))),
            ok("not json"),
        ];
        for case in cases {
            let h = harness(vec![case]);
            assert_eq!(block_on(h.pump.submit("hi")), SubmitOutcome::Failed);
            let texts = h.view.texts();
            assert_eq!(texts.len(), 2, "user message is never retracted");
            assert_eq!(texts[1], (Role::Assistant, strings.request_failed.to_string()));
            assert_eq!(h.view.0.borrow().typing_shown, 1);
            assert_eq!(stored_token(&h), None);
            assert_settled(&h);
        }
    }

    #[test]
    fn second_submit_while_pending_is_dropped() {
        let (tx, rx) = oneshot::channel();
        let h = harness(vec![Scripted::Deferred(rx)]);
        let mut pool = LocalPool::new();

        let pump = h.pump.clone();
        pool.spawner()
            .spawn_local(async move {
                assert_eq!(pump.submit("first").await, SubmitOutcome::Replied);
            })
            .unwrap();
        pool.run_until_stalled();
        assert!(h.pump.is_sending());
        assert!(h.view.0.borrow().busy);

        assert_eq!(pool.run_until(h.pump.submit("second")), SubmitOutcome::Busy);
        assert_eq!(h.view.texts().len(), 1);
        assert_eq!(h.view.0.borrow().typing_shown, 1);

        tx.send(Ok(HttpReply::new(200, r#"{"reply":"done"}"#))).unwrap();
        pool.run();

        assert_eq!(h.transport.requests.borrow().len(), 1);
        assert_eq!(h.view.texts().last().unwrap().1, "done");
        assert_settled(&h);
    }

    #[test]
    fn dropped_exchange_still_settles() {
        let (_tx, rx) = oneshot::channel();
        let h = harness(vec![Scripted::Deferred(rx)]);
        let mut pool = LocalPool::new();

        let pump = h.pump.clone();
        let handle = pool
            .spawner()
            .spawn_local_with_handle(async move { pump.submit("first").await })
            .unwrap();
        pool.run_until_stalled();
        assert!(h.pump.is_sending());

        drop(handle);
        pool.run_until_stalled();
        assert_settled(&h);
    }

    #[test]
    fn refresh_resets_conversation() {
        let h = harness(vec![ok(r#"{"reply":"a","session_id":"abc"}"#), ok(r#"{"reply":"b"}"#)]);
        block_on(h.pump.submit("one"));
        block_on(h.pump.submit("two"));
        assert_eq!(h.view.texts().len(), 4);

        h.pump.refresh();

        let strings = Strings::for_locale(Locale::Korean);
        assert_eq!(h.view.texts(), vec![(Role::Assistant, strings.greeting.to_string())]);
        assert!(h.view.0.borrow().quick_actions_visible);
        assert_eq!(stored_token(&h), None);

        h.pump.refresh();
        assert_eq!(h.view.texts().len(), 1);
    }

    #[test]
    fn refresh_survives_storage_failure() {
        let view = FakeView::new();
        let pump = MessagePump::new(
            view.clone(),
            Rc::new(ScriptedTransport::default()),
            SessionStore::new(FailingStorage, DEFAULT_SESSION_KEY),
            Strings::for_locale(Locale::English),
            StaleReplyPolicy::Discard,
        );
        pump.refresh();
        assert_eq!(view.texts().len(), 1);
    }

    fn refresh_mid_flight(policy: StaleReplyPolicy) -> (Harness, SubmitOutcome) {
        let (tx, rx) = oneshot::channel();
        let h = harness_with(vec![Scripted::Deferred(rx)], policy);
        let mut pool = LocalPool::new();

        let pump = h.pump.clone();
        let handle = pool
            .spawner()
            .spawn_local_with_handle(async move { pump.submit("question").await })
            .unwrap();
        pool.run_until_stalled();

        h.pump.refresh();
        assert!(h.pump.is_sending(), "refresh does not cancel the exchange");

        tx.send(Ok(HttpReply::new(200, r#"{"reply":"stale","session_id":"old"}"#))).unwrap();
        let outcome = pool.run_until(handle);
        (h, outcome)
    }

    #[test]
    fn stale_reply_is_discarded_after_refresh() {
        let (h, outcome) = refresh_mid_flight(StaleReplyPolicy::Discard);

        assert_eq!(outcome, SubmitOutcome::Discarded);
        let strings = Strings::for_locale(Locale::Korean);
        assert_eq!(h.view.texts(), vec![(Role::Assistant, strings.greeting.to_string())]);
        assert_eq!(stored_token(&h), None);
        assert_settled(&h);
    }

    #[test]
    fn stale_reply_can_be_accepted() {
        let (h, outcome) = refresh_mid_flight(StaleReplyPolicy::Accept);

        assert_eq!(outcome, SubmitOutcome::Replied);
        let texts = h.view.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1], (Role::Assistant, "stale".to_string()));
        assert_eq!(stored_token(&h).as_deref(), Some("old"));
        assert_settled(&h);
    }

    #[test]
    fn quick_action_goes_through_submit() {
        let action = quick_actions::catalog(Locale::Korean)[0];
        let h = harness(vec![ok(r#"{"reply":"도서 목록입니다"}"#)]);

        assert_eq!(block_on(h.pump.select_quick_action(&action)), SubmitOutcome::Replied);

        assert_eq!(h.transport.requests.borrow()[0].message, action.prompt);
        assert_eq!(h.view.texts()[0], (Role::User, action.prompt.to_string()));
        assert!(!h.view.0.borrow().quick_actions_visible);

        h.pump.refresh();
        assert!(h.view.0.borrow().quick_actions_visible);
    }

    #[test]
    fn quick_action_respects_the_guard() {
        let (tx, rx) = oneshot::channel();
        let h = harness(vec![Scripted::Deferred(rx)]);
        let mut pool = LocalPool::new();

        let pump = h.pump.clone();
        pool.spawner()
            .spawn_local(async move {
                pump.submit("typed").await;
            })
            .unwrap();
        pool.run_until_stalled();

        let action = quick_actions::catalog(Locale::Korean)[1];
        assert_eq!(pool.run_until(h.pump.select_quick_action(&action)), SubmitOutcome::Busy);

        tx.send(Err(TransportError::new("offline"))).unwrap();
        pool.run();
        assert_eq!(h.transport.requests.borrow().len(), 1);
    }

    #[test]
    fn quick_action_after_refresh_mid_flight_leaves_view_alone() {
        let (tx, rx) = oneshot::channel();
        let h = harness(vec![Scripted::Deferred(rx)]);
        let mut pool = LocalPool::new();

        let pump = h.pump.clone();
        let handle = pool
            .spawner()
            .spawn_local_with_handle(async move { pump.submit("q").await })
            .unwrap();
        pool.run_until_stalled();

        h.pump.refresh();
        h.view.0.borrow_mut().input = "draft".into();
        let action = quick_actions::catalog(Locale::Korean)[0];
        assert_eq!(pool.run_until(h.pump.select_quick_action(&action)), SubmitOutcome::Busy);
        {
            let log = h.view.0.borrow();
            assert!(log.quick_actions_visible);
            assert_eq!(log.input, "draft");
            assert_eq!(log.messages.len(), 1);
        }

        tx.send(Ok(HttpReply::new(200, r#"{"reply":"late"}"#))).unwrap();
        assert_eq!(pool.run_until(handle), SubmitOutcome::Discarded);
        assert_eq!(h.transport.requests.borrow().len(), 1);
        assert!(h.view.0.borrow().quick_actions_visible);
        assert_settled(&h);
    }

    #[test]
    fn message_ids_stay_unique_across_refresh() {
        let h = harness(vec![ok(r#"{"reply":"a"}"#)]);
        h.pump.greet();
        block_on(h.pump.submit("q"));
        let before: Vec<u64> = h.view.0.borrow().messages.iter().map(|m| m.id).collect();
        assert_eq!(before, vec![0, 1, 2]);

        h.pump.refresh();

        let log = h.view.0.borrow();
        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.messages[0].id, 3);
    }
}
