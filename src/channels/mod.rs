//! Message transports and the inbound message loop.
//!
//! Transports push [`ChannelMessage`]s into a single queue; the loop handles
//! them one at a time, so each sender's messages are processed in arrival
//! order and a transition never interleaves with another.

pub mod cli;
pub mod traits;

pub use cli::CliChannel;
pub use traits::{Channel, ChannelMessage, InboundError, SendMessage};

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::config::{ChannelsConfig, Config};
use crate::dialogue::DialogueEngine;
use crate::{gateway, infra, sessions};

/// Create the configured transport.
pub fn create_channel(config: &ChannelsConfig) -> Result<Arc<dyn Channel>> {
    if config.cli {
        return Ok(Arc::new(CliChannel::new(config.cli_sender.clone())));
    }
    bail!("No channel enabled; set channels_config.cli = true")
}

/// Drain the queue until every sender is dropped. Returns the number of
/// messages handled.
///
/// Delivery failures are logged and otherwise ignored.
pub async fn run_message_loop(
    engine: &DialogueEngine,
    channel: &dyn Channel,
    mut rx: mpsc::Receiver<ChannelMessage>,
) -> usize {
    let mut handled = 0;
    while let Some(message) = rx.recv().await {
        handled += 1;
        let Some(reply) = engine.handle_message(&message) else {
            continue;
        };
        let recipient = message.sender.unwrap_or_default();
        let outbound = SendMessage::new(recipient, reply.text());
        if let Err(e) = channel.send(&outbound).await {
            tracing::warn!(
                channel = channel.name(),
                recipient = %outbound.recipient,
                "reply delivery failed: {e:#}"
            );
        }
    }
    handled
}

/// Run the assistant: session store, daily reset, liveness endpoint, and the
/// configured channel. Returns when the channel closes or on Ctrl-C.
pub async fn start_channels(config: Config) -> Result<()> {
    let store = sessions::create_session_store();
    let engine = DialogueEngine::new(Arc::clone(&store));
    let channel = create_channel(&config.channels_config)?;

    // Bind before anything starts so a taken port fails the whole process.
    let liveness_listener = if config.gateway.enabled {
        Some(gateway::bind(&config.gateway.host, config.gateway.port).await?)
    } else {
        None
    };

    let reset = infra::create_reset_scheduler(Arc::clone(&store), &config.reset)?.map(|s| {
        tracing::info!(
            zone = %s.zone().label(),
            next_reset = %s.next_reset(),
            "Daily session reset scheduled"
        );
        s.spawn()
    });

    let shutdown = CancellationToken::new();
    let mut liveness = liveness_listener
        .map(|listener| tokio::spawn(gateway::serve(listener, shutdown.clone())));

    let (tx, rx) = mpsc::channel(config.channels_config.queue_capacity);
    let listener = {
        let channel = Arc::clone(&channel);
        tokio::spawn(async move { channel.listen(tx).await })
    };

    tracing::info!(
        channel = channel.name(),
        store = store.name(),
        "✅ Assistant ready"
    );

    let mut liveness_failure = None;
    tokio::select! {
        handled = run_message_loop(&engine, channel.as_ref(), rx) => {
            tracing::info!(handled, "Channel closed");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
        result = wait_liveness(&mut liveness) => {
            tracing::error!("Liveness endpoint stopped; shutting down");
            liveness_failure = Some(result);
        }
    }

    shutdown.cancel();
    if let Some(handle) = reset {
        handle.shutdown().await;
    }
    if let Some(task) = liveness.filter(|_| liveness_failure.is_none()) {
        match task.await {
            Ok(Err(e)) => tracing::warn!("Liveness endpoint stopped with error: {e:#}"),
            Err(e) => tracing::warn!("Liveness endpoint task failed: {e}"),
            Ok(Ok(())) => {}
        }
    }

    if listener.is_finished() {
        listener
            .await
            .context("Channel listener task failed")?
            .context("Channel listener failed")?;
    } else {
        listener.abort();
    }

    match liveness_failure {
        Some(Ok(Err(e))) => Err(e),
        Some(Ok(Ok(()))) => bail!("Liveness endpoint stopped unexpectedly"),
        Some(Err(e)) => Err(e).context("Liveness endpoint task failed"),
        None => Ok(()),
    }
}

/// Resolve when the liveness task ends; pend forever when it is not running.
async fn wait_liveness(
    task: &mut Option<JoinHandle<Result<()>>>,
) -> Result<Result<()>, JoinError> {
    match task {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}
