//! Omicron connector client entry point.
//!
//! Wires together the config file, the network transport, and the event
//! dispatcher, then runs the consumer tick until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML config with defaults
//!  └─ ConnectorClient::connect -- TCP handshake + UDP receive task
//!  └─ consumer tick loop
//!       ├─ interval fires      -> EventDispatcher::pump (drain + deliver)
//!       ├─ state poll          -> warn once when the stream dies
//!       └─ Ctrl-C              -> disconnect and exit
//! ```
//!
//! Log verbosity comes from `RUST_LOG` when set, otherwise from the
//! `log_level` field in the config file.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use omicron_client::application::dispatch_events::{EventDispatcher, TraceListener};
use omicron_client::infrastructure::network::{ConnectionState, ConnectorClient};
use omicron_client::infrastructure::storage::config::load_config;
use omicron_core::EventQueue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.client.log_level.clone())),
        )
        .init();

    info!(
        server = %config.connector.server_host,
        control_port = config.connector.control_port,
        data_port = config.connector.data_port,
        "omicron connector starting"
    );

    let queue = Arc::new(EventQueue::new());
    let client = ConnectorClient::new(config.connector.to_connector_config(), Arc::clone(&queue));
    client.connect().await?;

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Box::new(TraceListener));

    // ── Consumer tick loop ────────────────────────────────────────────────────
    let mut tick = tokio::time::interval(Duration::from_millis(config.client.poll_interval_ms));
    let mut stream_lost_reported = false;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                dispatcher.pump(&queue);

                // UDP gives no end-of-stream; poll the session state so a
                // dead socket is at least visible in the log.
                if client.state().await == ConnectionState::Disconnected && !stream_lost_reported {
                    warn!("event stream ended; no further events will arrive");
                    stream_lost_reported = true;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    client.disconnect().await;

    // Deliver whatever arrived between the last tick and the disconnect.
    let remaining = dispatcher.pump(&queue);
    if remaining > 0 {
        info!(remaining, "flushed final event batch");
    }
    if client.dropped_packets() > 0 {
        warn!(
            dropped = client.dropped_packets(),
            "undecodable datagrams were dropped this session"
        );
    }

    info!("omicron connector stopped");
    Ok(())
}
