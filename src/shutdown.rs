use std::time::Duration;

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::time::sleep;
use tracing::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Non-blocking check for a pending shutdown signal. A closed channel means
/// nobody can signal anymore, which is not a shutdown.
pub(crate) fn shutdown_pending(receiver: &mut ShutdownReceiver) -> bool {
    match receiver.try_recv() {
        Ok(()) | Err(TryRecvError::Lagged(_)) => true,
        Err(TryRecvError::Empty | TryRecvError::Closed) => false,
    }
}

/// Sleeps for `delay`. Returns true when a shutdown arrived first.
pub(crate) async fn sleep_or_shutdown(
    delay: Duration,
    shutdown: Option<&mut ShutdownReceiver>,
) -> bool {
    let Some(receiver) = shutdown else {
        sleep(delay).await;
        return false;
    };

    let pause = sleep(delay);
    tokio::pin!(pause);
    tokio::select! {
        () = &mut pause => false,
        signal = receiver.recv() => match signal {
            Ok(()) | Err(RecvError::Lagged(_)) => true,
            Err(RecvError::Closed) => {
                pause.await;
                false
            }
        },
    }
}

/// Forwards Ctrl+C (and SIGTERM on unix) into the shutdown channel.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received; finishing launched workers.");
                    drop(shutdown_tx.send(()));
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    info!("SIGTERM received; finishing launched workers.");
                    drop(shutdown_tx.send(()));
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received; finishing launched workers.");
                    drop(shutdown_tx.send(()));
                }
            }
        }
    })
}
