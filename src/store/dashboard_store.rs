use std::sync::Arc;

use tokio::select;
use tokio::spawn;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::client::{ApiError, DashboardApi};
use crate::models::{DashboardSnapshot, TransactionRecord};
use crate::store::{RefreshMachine, RefreshMode};
use crate::types::RequestSequence;

enum StoreCommand {
    Refresh {
        mode: RefreshMode,
        reply: Option<oneshot::Sender<DashboardSnapshot>>
    },
    Shutdown
}

struct Settled {
    sequence: RequestSequence,
    result: Result<Vec<TransactionRecord>, ApiError>
}

/// Owner of the dashboard snapshot.
///
/// The snapshot lives inside a single spawned task, which is its only writer. Readers get
/// clones through a [`StoreHandle`].
pub struct DashboardStore {
    handle: StoreHandle,
    task: JoinHandle<()>
}

/// Cloneable access to the store: request refreshes, read or watch the snapshot.
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::UnboundedSender<StoreCommand>,
    snapshot: watch::Receiver<DashboardSnapshot>
}

impl DashboardStore {
    /// Spawns the store task and issues the one automatic startup refresh.
    pub fn spawn<A: DashboardApi>(api: Arc<A>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (publisher, snapshot) = watch::channel(DashboardSnapshot::Uninitialized);

        let task = spawn(run_store(api, receiver, publisher));
        let handle = StoreHandle { sender, snapshot };

        handle.request(RefreshMode::Coalesce, None);

        Self { handle, task }
    }

    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Stops the store task, abandoning any fetch still in flight.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        let _ = self.handle.sender.send(StoreCommand::Shutdown);
        self.task.await
    }
}

impl StoreHandle {
    pub fn current(&self) -> DashboardSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot.clone()
    }

    /// Refreshes the dashboard and resolves with the settled snapshot.
    ///
    /// While a fetch is in flight the call joins it rather than putting a second request on
    /// the wire.
    pub async fn refresh(&self) -> DashboardSnapshot {
        self.request_and_wait(RefreshMode::Coalesce).await
    }

    /// Like [`refresh`](Self::refresh), but abandons an in-flight fetch in favour of a new one,
    /// so the result is guaranteed to be fetched after this call was made.
    pub async fn reload(&self) -> DashboardSnapshot {
        self.request_and_wait(RefreshMode::Supersede).await
    }

    /// Waits until the snapshot is `Ready` or `Errored`.
    pub async fn settled(&self) -> DashboardSnapshot {
        let mut receiver = self.snapshot.clone();

        match receiver.wait_for(DashboardSnapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.current()
        }
    }

    async fn request_and_wait(&self, mode: RefreshMode) -> DashboardSnapshot {
        let (reply, response) = oneshot::channel();

        if !self.request(mode, Some(reply)) {
            return self.current();
        }

        response.await.unwrap_or_else(|_| self.current())
    }

    fn request(&self, mode: RefreshMode, reply: Option<oneshot::Sender<DashboardSnapshot>>) -> bool {
        let accepted = self.sender.send(StoreCommand::Refresh { mode, reply }).is_ok();

        if !accepted {
            warn!("Dashboard store has shut down, refresh request dropped");
        }

        accepted
    }
}

async fn run_store<A: DashboardApi>(
    api: Arc<A>,
    mut commands: mpsc::UnboundedReceiver<StoreCommand>,
    publisher: watch::Sender<DashboardSnapshot>
) {
    let (settled_sender, mut settled_receiver) = mpsc::unbounded_channel::<Settled>();
    let mut machine = RefreshMachine::new();
    let mut fetch: Option<JoinHandle<()>> = None;
    let mut waiters: Vec<oneshot::Sender<DashboardSnapshot>> = Vec::new();

    loop {
        select! {
            // Commands are drained first so a refresh sent before a fetch settles joins that fetch.
            biased;

            command = commands.recv() => match command {
                Some(StoreCommand::Refresh { mode, reply }) => {
                    waiters.extend(reply);

                    let Some(sequence) = machine.begin(mode) else {
                        debug!("Refresh coalesced into in-flight fetch [{:?}]", machine.in_flight());
                        continue;
                    };

                    if let Some(previous) = fetch.take() {
                        debug!("Fetch superseded by [{sequence}]");
                        previous.abort();
                    }

                    publisher.send_replace(machine.snapshot().clone());
                    fetch = Some(spawn_fetch(api.clone(), sequence, settled_sender.clone()));
                },
                Some(StoreCommand::Shutdown) | None => break
            },
            Some(settled) = settled_receiver.recv() => {
                let Some(snapshot) = machine.settle(settled.sequence, settled.result) else {
                    debug!("Discarded stale dashboard response [{}]", settled.sequence);
                    continue;
                };

                match snapshot {
                    DashboardSnapshot::Ready(rows) => info!("Dashboard refreshed with {} rows", rows.len()),
                    DashboardSnapshot::Errored(message) => warn!("{message}"),
                    _ => error!("Refresh settled into unexpected state {snapshot:?}")
                }

                let snapshot = snapshot.clone();
                fetch = None;
                publisher.send_replace(snapshot.clone());

                for waiter in waiters.drain(..) {
                    let _ = waiter.send(snapshot.clone());
                }
            }
        }
    }

    if let Some(fetch) = fetch {
        fetch.abort();
    }
}

fn spawn_fetch<A: DashboardApi>(api: Arc<A>, sequence: RequestSequence, settled: mpsc::UnboundedSender<Settled>) -> JoinHandle<()> {
    spawn(async move {
        let result = api.fetch_dashboard().await;
        let _ = settled.send(Settled { sequence, result });
    })
}
