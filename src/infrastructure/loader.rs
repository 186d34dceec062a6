//! Background worker standing in for the marketplace backend.
//!
//! Jobs go in over a channel, results come back tagged with the frame
//! ticket they were requested for. The worker never touches navigation
//! state; deciding whether a result is still wanted is up to the receiver.

use crate::application::format_cents;
use crate::domain::{
    ChatList, ChatMessage, ChatroomRef, ConversationSummary, FetchKind, Job, LoaderEvent,
    Operation, Payload, WalletSummary,
};
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Source of marketplace data and server-side actions.
pub trait MarketplaceBackend: Send + 'static {
    fn fetch(&self, kind: &FetchKind) -> Result<Payload, String>;
    fn perform(&self, operation: &Operation) -> Result<String, String>;
}

/// Canned data for running the account area without a server.
#[derive(Debug, Default, Clone)]
pub struct FixtureBackend;

const DECLINE_ABOVE_CENTS: i64 = 1_000_000;

impl MarketplaceBackend for FixtureBackend {
    fn fetch(&self, kind: &FetchKind) -> Result<Payload, String> {
        match kind {
            FetchKind::ChatList => Ok(Payload::Chats(ChatList {
                conversations: vec![
                    summary("c1", "Maya (Loft on 5th)", "Is parking included?", 2),
                    summary("c2", "Theo (Garden studio)", "Thanks, see you Friday", 0),
                    summary("c3", "Support", "Your refund is on its way", 1),
                ],
            })),
            FetchKind::Chatroom(chat_id) => {
                let messages = match chat_id.as_str() {
                    "c1" => vec![
                        message(false, "Hi! Is parking included?"),
                        message(true, "Yes, one covered spot."),
                        message(false, "Great, applying now."),
                    ],
                    "c2" => vec![message(false, "Thanks, see you Friday")],
                    "c3" => vec![message(false, "Your refund is on its way")],
                    id if id.starts_with("chat-") => {
                        vec![message(false, "Let me know if anything needs fixing.")]
                    }
                    other => return Err(format!("no conversation {}", other)),
                };
                Ok(Payload::Chatroom(ChatroomRef {
                    chat_id: chat_id.clone(),
                    messages,
                }))
            }
            FetchKind::Wallet => Ok(Payload::Wallet(WalletSummary {
                balance_cents: 152_050,
                pending_payouts: 1,
            })),
        }
    }

    fn perform(&self, operation: &Operation) -> Result<String, String> {
        match operation {
            Operation::WithdrawApplication(listing_id) => {
                Ok(format!("Application for {} withdrawn", listing_id))
            }
            Operation::EndRental(rental_id) => Ok(format!("Rental {} ended", rental_id)),
            Operation::PayBooking(intent) if intent.amount_cents > DECLINE_ABOVE_CENTS => {
                Err("Card declined".to_string())
            }
            Operation::PayBooking(intent) => Ok(format!(
                "Payment of {} received for {}",
                format_cents(intent.amount_cents),
                intent.booking_id
            )),
        }
    }
}

fn summary(chat_id: &str, counterpart: &str, last: &str, unread: u32) -> ConversationSummary {
    ConversationSummary {
        chat_id: chat_id.to_string(),
        counterpart: counterpart.to_string(),
        last_message: last.to_string(),
        unread,
    }
}

fn message(from_me: bool, body: &str) -> ChatMessage {
    ChatMessage {
        from_me,
        body: body.to_string(),
    }
}

pub fn run_job<B: MarketplaceBackend + ?Sized>(backend: &B, job: Job) -> LoaderEvent {
    match job {
        Job::Fetch { ticket, kind } => match backend.fetch(&kind) {
            Ok(payload) => LoaderEvent::Fetched { ticket, payload },
            Err(reason) => LoaderEvent::FetchFailed { ticket, reason },
        },
        Job::Perform(operation) => {
            let result = backend.perform(&operation);
            LoaderEvent::Completed { operation, result }
        }
    }
}

/// Handle to the worker thread. Dropping it stops the worker without
/// running the jobs still queued.
pub struct Loader {
    jobs: Option<Sender<Job>>,
    stop: Option<Sender<()>>,
    events: Receiver<LoaderEvent>,
    worker: Option<JoinHandle<()>>,
}

impl Loader {
    /// Starts the worker. Every job waits `delay` before running so the
    /// UI's loading states are visible.
    pub fn spawn<B: MarketplaceBackend>(backend: B, delay: Duration) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (event_tx, event_rx) = mpsc::channel();
        // Never sent on; the worker watches for the sender being dropped
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("navdeck-loader".to_string())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    let stopped = if delay.is_zero() {
                        matches!(stop_rx.try_recv(), Err(TryRecvError::Disconnected))
                    } else {
                        matches!(stop_rx.recv_timeout(delay), Err(RecvTimeoutError::Disconnected))
                    };
                    if stopped {
                        debug!(?job, "loader stopping, job dropped");
                        break;
                    }
                    let event = run_job(&backend, job);
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                debug!("loader worker stopped");
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            stop: Some(stop_tx),
            events: event_rx,
            worker: Some(worker),
        })
    }

    /// Queues a job. Returns false if the worker has gone away.
    pub fn submit(&self, job: Job) -> bool {
        let Some(jobs) = &self.jobs else {
            return false;
        };
        match jobs.send(job) {
            Ok(()) => true,
            Err(e) => {
                warn!(job = ?e.0, "loader worker is gone");
                false
            }
        }
    }

    /// Everything that has finished since the last call, without blocking.
    pub fn drain(&self) -> Vec<LoaderEvent> {
        self.events.try_iter().collect()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoaderEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.stop.take();
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("loader worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Navigator;
    use crate::domain::{PaymentIntent, StepKey};

    #[test]
    fn test_fixture_chatroom() {
        let payload = FixtureBackend.fetch(&FetchKind::Chatroom("c1".to_string())).unwrap();
        match payload {
            Payload::Chatroom(room) => {
                assert_eq!(room.chat_id, "c1");
                assert_eq!(room.messages.len(), 3);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_fixture_unknown_chat() {
        let result = FixtureBackend.fetch(&FetchKind::Chatroom("zz".to_string()));
        assert_eq!(result, Err("no conversation zz".to_string()));
    }

    #[test]
    fn test_fixture_payment_decline() {
        let big = Operation::PayBooking(PaymentIntent {
            booking_id: "bk-9".to_string(),
            amount_cents: 5_000_000,
        });
        assert_eq!(FixtureBackend.perform(&big), Err("Card declined".to_string()));

        let ok = Operation::PayBooking(PaymentIntent {
            booking_id: "bk-1".to_string(),
            amount_cents: 48_000,
        });
        assert_eq!(
            FixtureBackend.perform(&ok),
            Ok("Payment of $480.00 received for bk-1".to_string())
        );
    }

    #[test]
    fn test_run_job_fetch_failure() {
        let mut nav = Navigator::new();
        let ticket = nav.push(StepKey::Chatroom);
        let event = run_job(
            &FixtureBackend,
            Job::Fetch {
                ticket,
                kind: FetchKind::Chatroom("missing".to_string()),
            },
        );
        assert!(matches!(event, LoaderEvent::FetchFailed { ticket: t, .. } if t == ticket));
    }

    #[test]
    fn test_loader_round_trip() {
        let loader = Loader::spawn(FixtureBackend, Duration::ZERO).unwrap();
        let mut nav = Navigator::new();
        let ticket = nav.push(StepKey::Wallet);

        assert!(loader.submit(Job::Fetch {
            ticket,
            kind: FetchKind::Wallet,
        }));
        let event = loader.recv_timeout(Duration::from_secs(5)).unwrap();

        match event {
            LoaderEvent::Fetched { ticket: t, payload } => {
                assert_eq!(t, ticket);
                nav.deliver(t, payload).unwrap();
                assert!(matches!(nav.data_passed(), Some(Payload::Wallet(_))));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(loader.drain().is_empty());
    }

    #[test]
    fn test_drop_skips_queued_jobs() {
        let loader = Loader::spawn(FixtureBackend, Duration::from_secs(30)).unwrap();
        for _ in 0..5 {
            assert!(loader.submit(Job::Perform(Operation::EndRental("rent-12".to_string()))));
        }

        let started = std::time::Instant::now();
        drop(loader);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_loader_result_for_popped_frame() {
        let loader = Loader::spawn(FixtureBackend, Duration::ZERO).unwrap();
        let mut nav = Navigator::new();
        nav.push(StepKey::Chats);
        let ticket = nav.push(StepKey::Chatroom);
        loader.submit(Job::Fetch {
            ticket,
            kind: FetchKind::Chatroom("c2".to_string()),
        });
        nav.pop();

        let event = loader.recv_timeout(Duration::from_secs(5)).unwrap();
        if let LoaderEvent::Fetched { ticket, payload } = event {
            assert!(nav.deliver(ticket, payload).is_err());
        } else {
            panic!("expected fetched event");
        }
        assert_eq!(nav.current_page(), Some(StepKey::Chats));
        assert!(nav.data_passed().is_none());
    }
}
