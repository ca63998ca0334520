//! Scheduler and navigation driven through fake ports.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rb_app::{AppDeps, NavigateResult, NavigateResultError, Scheduler, SchedulerConfig};
use rb_core::config::CacheConfig;
use rb_core::ports::{
    ClockPort, JobEvents, JobRunnerPort, MessengerError, MessengerPort, OutgoingMessage,
    ResultCachePort,
};
use rb_core::queue::EtaPolicy;
use rb_core::{
    ChannelId, CommandError, ComputationResult, EnqueueOutcome, GuildId, JobEvent, JobFailure,
    MessageId, NavAction, NavigationError, OriginRef, ProgressEvent, ScoreRecord, SubjectId,
    UserId,
};
use rb_infra::InMemoryResultCache;
use tokio::sync::{mpsc, Semaphore};

// ===== Fakes =====

/// Replays scripted events per subject; each run waits for one gate permit.
struct ScriptedRunner {
    scripts: Mutex<HashMap<String, VecDeque<Vec<JobEvent>>>>,
    runs: Mutex<Vec<String>>,
    gate: Arc<Semaphore>,
}

impl ScriptedRunner {
    fn open() -> Self {
        Self::with_gate(Semaphore::new(1_000))
    }

    fn gated() -> Self {
        Self::with_gate(Semaphore::new(0))
    }

    fn with_gate(gate: Semaphore) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            runs: Mutex::new(Vec::new()),
            gate: Arc::new(gate),
        }
    }

    fn script(self, subject: &str, events: Vec<JobEvent>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(subject.to_string())
            .or_default()
            .push_back(events);
        self
    }

    fn release(&self, runs: usize) {
        self.gate.add_permits(runs);
    }

    fn runs(&self) -> Vec<String> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRunnerPort for ScriptedRunner {
    async fn run(&self, subject_id: &SubjectId) -> JobEvents {
        self.runs.lock().unwrap().push(subject_id.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(subject_id.as_str())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| vec![JobEvent::Completed(result_with(1))]);

        let (tx, rx) = mpsc::channel(16);
        let gate = self.gate.clone();
        tokio::spawn(async move {
            gate.acquire().await.unwrap().forget();
            for event in script {
                let _ = tx.send(event).await;
            }
        });
        rx
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    New {
        channel: ChannelId,
        id: MessageId,
        message: OutgoingMessage,
    },
    Edit {
        channel: ChannelId,
        id: MessageId,
        message: OutgoingMessage,
    },
}

#[derive(Default)]
struct RecordingMessenger {
    log: Mutex<Vec<Sent>>,
}

impl RecordingMessenger {
    fn log(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    /// Texts sent or edited into `channel`, in order.
    fn texts_in(&self, channel: &str) -> Vec<String> {
        self.log()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::New {
                    channel: c,
                    message: OutgoingMessage::Text(text),
                    ..
                }
                | Sent::Edit {
                    channel: c,
                    message: OutgoingMessage::Text(text),
                    ..
                } if c.as_str() == channel => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Result pages delivered as new messages.
    fn pages(&self) -> Vec<(ChannelId, MessageId, rb_core::RenderedPage)> {
        self.log()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::New {
                    channel,
                    id,
                    message: OutgoingMessage::Page(page),
                } => Some((channel, id, page)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessengerPort for RecordingMessenger {
    async fn send(
        &self,
        channel_id: &ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, MessengerError> {
        let mut log = self.log.lock().unwrap();
        let id = MessageId::from(format!("msg-{}", log.len() + 1));
        log.push(Sent::New {
            channel: channel_id.clone(),
            id: id.clone(),
            message,
        });
        Ok(id)
    }

    async fn edit(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        message: OutgoingMessage,
    ) -> Result<(), MessengerError> {
        self.log.lock().unwrap().push(Sent::Edit {
            channel: channel_id.clone(),
            id: message_id.clone(),
            message,
        });
        Ok(())
    }
}

mockall::mock! {
    pub Messenger {}

    #[async_trait]
    impl MessengerPort for Messenger {
        async fn send(
            &self,
            channel_id: &ChannelId,
            message: OutgoingMessage,
        ) -> Result<MessageId, MessengerError>;

        async fn edit(
            &self,
            channel_id: &ChannelId,
            message_id: &MessageId,
            message: OutgoingMessage,
        ) -> Result<(), MessengerError>;
    }
}

struct FrozenClock;

impl ClockPort for FrozenClock {
    fn now_ms(&self) -> i64 {
        1_700_000_000_000
    }
}

// ===== Helpers =====

fn result_with(count: u64) -> ComputationResult {
    ComputationResult {
        username: "mrekk".into(),
        live_pp: 25000.0,
        local_pp: 24900.0,
        playcount_pp: 416.0,
        scores: (1..=count)
            .map(|n| ScoreRecord {
                beatmap_name: format!("Map {n}"),
                beatmap_id: n,
                local_pp: 500.0,
                live_pp: 490.0,
                mods: vec![],
                combo: 1000,
                accuracy: 99.0,
                miss_count: 0,
                position_change: 0,
            })
            .collect(),
    }
}

fn origin(channel: &str, user: &str) -> OriginRef {
    OriginRef::new(
        ChannelId::from(channel),
        UserId::from(user),
        Some(GuildId::from("g1")),
    )
}

struct Harness {
    scheduler: Arc<Scheduler>,
    navigate: NavigateResult,
    cache: Arc<InMemoryResultCache>,
}

fn harness(
    runner: Arc<ScriptedRunner>,
    messenger: Arc<dyn MessengerPort>,
    max_attempts: u32,
) -> Harness {
    let cache = Arc::new(InMemoryResultCache::new(
        &CacheConfig {
            max_entries: 100,
            ttl_secs: 0,
        },
        Arc::new(FrozenClock),
    ));
    let deps = AppDeps {
        job_runner: runner,
        messenger,
        result_cache: cache.clone(),
    };
    let config = SchedulerConfig {
        eta: EtaPolicy {
            min_secs: 36,
            max_secs: 36,
        },
        max_attempts,
    };
    Harness {
        scheduler: Arc::new(Scheduler::new(&deps, config)),
        navigate: NavigateResult::new(&deps),
        cache,
    }
}

// ===== Tests =====

#[tokio::test]
async fn delivers_result_and_pages_through_it() {
    let runner = Arc::new(ScriptedRunner::open().script(
        "123",
        vec![
            JobEvent::Progress(ProgressEvent::from_chunks(1)),
            JobEvent::Completed(result_with(7)),
        ],
    ));
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 2);

    let submission = h
        .scheduler
        .submit("!calculate 123", origin("c1", "u1"))
        .await
        .unwrap();
    assert_eq!(submission.outcome, EnqueueOutcome::Started);
    submission.drain.expect("drain started").await.unwrap();

    assert_eq!(
        messenger.texts_in("c1"),
        vec![
            "<@u1> proccessing user with ID: 123",
            "<@u1> proccessing user with ID: 123 (~1%)",
            "Proccessing complete, preparing embed.",
        ]
    );

    let pages = messenger.pages();
    assert_eq!(pages.len(), 1);
    let (channel, handle, first) = pages[0].clone();
    assert_eq!(first.item_range, 0..5);
    assert_eq!(first.content, "<@u1>");

    let owner = UserId::from("u1");
    let second = h
        .navigate
        .execute(&handle, &channel, &owner, NavAction::Next)
        .await
        .unwrap();
    assert_eq!(second.item_range, 5..7);
    assert!(matches!(
        messenger.log().last(),
        Some(Sent::Edit { id, .. }) if *id == handle
    ));

    let err = h
        .navigate
        .execute(&handle, &channel, &owner, NavAction::Next)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NavigateResultError::Rejected(NavigationError::OutOfRange)
    ));
    assert_eq!(h.cache.get(&handle).await.unwrap().page, 1);
}

#[tokio::test]
async fn jobs_start_in_order_of_first_request() {
    let runner = Arc::new(ScriptedRunner::gated());
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 1);

    let first = h
        .scheduler
        .submit("!calculate 10", origin("c1", "u1"))
        .await
        .unwrap();
    let second = h
        .scheduler
        .submit("!calculate 20", origin("c1", "u1"))
        .await
        .unwrap();
    let merged = h
        .scheduler
        .submit("!calculate 10", origin("c2", "u2"))
        .await
        .unwrap();
    let third = h
        .scheduler
        .submit("!calculate 30", origin("c1", "u1"))
        .await
        .unwrap();

    assert!(second.drain.is_none() && merged.drain.is_none() && third.drain.is_none());
    assert_eq!(second.outcome.position(), Some(2));
    assert!(matches!(
        merged.outcome,
        EnqueueOutcome::MergedNewOrigin { position: 1, .. }
    ));
    assert_eq!(third.outcome.position(), Some(3));

    runner.release(3);
    first.drain.unwrap().await.unwrap();

    assert_eq!(runner.runs(), vec!["10", "20", "30"]);
    let delivered: Vec<_> = messenger
        .pages()
        .into_iter()
        .map(|(channel, _, _)| channel.as_str().to_string())
        .collect();
    assert_eq!(delivered, vec!["c1", "c2", "c1", "c1"]);
    assert!(h.scheduler.pending().await.is_empty());
}

#[tokio::test]
async fn request_from_another_channel_merges_in_place() {
    let runner = Arc::new(ScriptedRunner::gated());
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 1);

    let first = h
        .scheduler
        .submit("!calculate 1", origin("c1", "u1"))
        .await
        .unwrap();
    h.scheduler
        .submit("!calculate 2", origin("c1", "u1"))
        .await
        .unwrap();

    let same = h
        .scheduler
        .submit("!calculate 2", origin("c1", "u3"))
        .await
        .unwrap();
    let other = h
        .scheduler
        .submit("!calculate 2", origin("c2", "u2"))
        .await
        .unwrap();

    assert!(matches!(
        same.outcome,
        EnqueueOutcome::MergedSameOrigin { position: 2, .. }
    ));
    assert!(matches!(
        other.outcome,
        EnqueueOutcome::MergedNewOrigin { position: 2, .. }
    ));
    let pending = h.scheduler.pending().await;
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[1].origins.len(), 2);
    assert!(messenger.texts_in("c2")[0].contains("already in line for another channel"));

    runner.release(2);
    first.drain.unwrap().await.unwrap();
}

#[tokio::test]
async fn invalid_subject_is_rejected_before_queueing() {
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .withf(|channel, message| {
            channel.as_str() == "c1"
                && matches!(message, OutgoingMessage::Text(text) if text.contains("`abc` is not a valid user ID"))
        })
        .times(1)
        .returning(|_, _| Ok(MessageId::from("reply")));
    messenger.expect_edit().never();

    let runner = Arc::new(ScriptedRunner::open());
    let h = harness(runner.clone(), Arc::new(messenger), 1);

    let err = h
        .scheduler
        .submit("!calculate abc", origin("c1", "u1"))
        .await
        .unwrap_err();

    assert_eq!(err, CommandError::InvalidSubject("abc".into()));
    assert!(h.scheduler.pending().await.is_empty());
    assert!(runner.runs().is_empty());
}

#[tokio::test]
async fn retryable_failure_is_run_again() {
    let runner = Arc::new(
        ScriptedRunner::open()
            .script(
                "5",
                vec![JobEvent::Failed(JobFailure::ProcessFailure {
                    exit_code: Some(134),
                })],
            )
            .script("5", vec![JobEvent::Completed(result_with(2))]),
    );
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 2);

    let submission = h
        .scheduler
        .submit("!calculate 5", origin("c1", "u1"))
        .await
        .unwrap();
    submission.drain.unwrap().await.unwrap();

    assert_eq!(runner.runs(), vec!["5", "5"]);
    assert_eq!(messenger.pages().len(), 1);
}

#[tokio::test]
async fn attempts_are_bounded_and_failure_is_reported() {
    let failure = || {
        vec![JobEvent::Failed(JobFailure::ProcessFailure {
            exit_code: Some(1),
        })]
    };
    let runner = Arc::new(
        ScriptedRunner::open()
            .script("5", failure())
            .script("5", failure())
            .script("5", failure()),
    );
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 2);

    let submission = h
        .scheduler
        .submit("!calculate 5", origin("c1", "u1"))
        .await
        .unwrap();
    submission.drain.unwrap().await.unwrap();

    assert_eq!(runner.runs().len(), 2);
    assert!(messenger.pages().is_empty());
    assert!(messenger
        .texts_in("c1")
        .last()
        .unwrap()
        .starts_with("The calculator failed while processing user with ID 5"));
}

#[tokio::test]
async fn fatal_failure_advances_to_the_next_subject() {
    let runner = Arc::new(
        ScriptedRunner::gated()
            .script("1", vec![JobEvent::Failed(JobFailure::InvalidSubject)])
            .script("2", vec![JobEvent::Completed(result_with(3))]),
    );
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 3);

    let first = h
        .scheduler
        .submit("!calculate 1", origin("c1", "u1"))
        .await
        .unwrap();
    h.scheduler
        .submit("!calculate 2", origin("c2", "u2"))
        .await
        .unwrap();
    runner.release(2);
    first.drain.unwrap().await.unwrap();

    assert_eq!(runner.runs(), vec!["1", "2"]);
    assert_eq!(
        messenger.texts_in("c1").last().map(String::as_str),
        Some("A wrong user Id was given, aborting task.")
    );
    let pages = messenger.pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].0, ChannelId::from("c2"));
}

#[tokio::test]
async fn origin_merged_mid_run_gets_the_result() {
    let runner = Arc::new(ScriptedRunner::gated().script(
        "9",
        vec![
            JobEvent::Progress(ProgressEvent::from_chunks(1)),
            JobEvent::Completed(result_with(1)),
        ],
    ));
    let messenger = Arc::new(RecordingMessenger::default());
    let h = harness(runner.clone(), messenger.clone(), 1);

    let first = h
        .scheduler
        .submit("!calculate 9", origin("c1", "u1"))
        .await
        .unwrap();
    let late = h
        .scheduler
        .submit("!calculate 9", origin("c2", "u2"))
        .await
        .unwrap();
    assert!(matches!(
        late.outcome,
        EnqueueOutcome::MergedNewOrigin { position: 1, .. }
    ));

    runner.release(1);
    first.drain.unwrap().await.unwrap();

    let texts = messenger.texts_in("c2");
    assert!(texts.contains(&"<@u2> proccessing user with ID: 9".to_string()));
    let handles: Vec<_> = messenger.pages().into_iter().map(|(_, id, _)| id).collect();
    assert_eq!(handles.len(), 2);
    let late_entry = h.cache.get(&handles[1]).await.unwrap();
    assert_eq!(late_entry.requester_id, UserId::from("u2"));
}

#[tokio::test]
async fn messaging_errors_do_not_stop_the_drain() {
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .returning(|_, _| Err(MessengerError::Transport("gateway down".into())));
    messenger
        .expect_edit()
        .returning(|_, _, _| Err(MessengerError::Transport("gateway down".into())));

    let runner = Arc::new(ScriptedRunner::gated());
    let h = harness(runner.clone(), Arc::new(messenger), 1);

    let first = h
        .scheduler
        .submit("!calculate 1", origin("c1", "u1"))
        .await
        .unwrap();
    h.scheduler
        .submit("!calculate 2", origin("c1", "u1"))
        .await
        .unwrap();
    runner.release(2);
    first.drain.unwrap().await.unwrap();

    assert_eq!(runner.runs(), vec!["1", "2"]);
    assert!(h.scheduler.pending().await.is_empty());
}
