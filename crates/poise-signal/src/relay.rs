//! Signaling relay - registry of live connections
//!
//! All registry reads and writes go through one mutex, so broadcast
//! never iterates while a connect or disconnect mutates the table.
//! Delivery uses `try_send` and never awaits while the lock is held.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use poise_core::UserId;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

/// Text frame queued for a connection
pub type OutboundMessage = Arc<str>;
pub type OutboundSender = mpsc::Sender<OutboundMessage>;
pub type OutboundReceiver = mpsc::Receiver<OutboundMessage>;

/// Process-unique connection identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conn({})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relay configuration
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Outbound queue depth per connection
    pub channel_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            channel_capacity: 64,
        }
    }
}

/// A registered connection
#[derive(Debug)]
pub struct Connection {
    pub identity: UserId,
    pub id: ConnectionId,
    channel: OutboundSender,
    active: bool,
}

impl Connection {
    fn deliver(&self, message: &OutboundMessage) -> Delivery {
        if !self.active {
            return Delivery::NotConnected;
        }
        match self.channel.try_send(Arc::clone(message)) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::Dropped,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

/// Outcome of a single delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued on the recipient's channel
    Delivered,
    /// Recipient queue full, message discarded
    Dropped,
    /// Recipient channel closed; the identity was evicted
    Closed,
    /// No live connection under that identity
    NotConnected,
}

#[derive(Clone, Debug, Default)]
pub struct RelayStats {
    pub connects: u64,
    pub replaced: u64,
    pub disconnects: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub evicted: u64,
}

#[derive(Default)]
struct Registry {
    connections: HashMap<UserId, Connection>,
    stats: RelayStats,
}

impl Registry {
    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered => self.stats.delivered += 1,
            Delivery::Dropped => self.stats.dropped += 1,
            Delivery::Closed => self.stats.evicted += 1,
            Delivery::NotConnected => {}
        }
    }

    fn evict(&mut self, identity: &str) {
        if let Some(mut conn) = self.connections.remove(identity) {
            conn.active = false;
            warn!(identity = %conn.identity, connection = %conn.id, "evicting closed connection");
        }
    }
}

/// Signaling relay
pub struct SignalRelay {
    config: RelayConfig,
    registry: Mutex<Registry>,
    next_id: AtomicU64,
}

impl SignalRelay {
    pub fn new() -> Self {
        Self::with_config(RelayConfig::default())
    }

    pub fn with_config(config: RelayConfig) -> Self {
        SignalRelay {
            config,
            registry: Mutex::new(Registry::default()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Create a bounded outbound channel and register it
    pub fn open(&self, identity: UserId) -> (ConnectionId, OutboundSender, OutboundReceiver) {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let id = self.connect(identity, tx.clone());
        (id, tx, rx)
    }

    /// Register a channel under `identity`.
    ///
    /// An existing entry for the same identity is replaced.
    pub fn connect(&self, identity: UserId, channel: OutboundSender) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let conn = Connection {
            identity: identity.clone(),
            id,
            channel,
            active: true,
        };

        let mut registry = self.registry.lock();
        registry.stats.connects += 1;
        if let Some(mut previous) = registry.connections.insert(identity, conn) {
            previous.active = false;
            registry.stats.replaced += 1;
            info!(identity = %previous.identity, old = %previous.id, new = %id, "connection replaced");
        } else {
            info!(connection = %id, "connection registered");
        }
        id
    }

    /// Remove `identity` from the registry. No-op if absent.
    pub fn disconnect(&self, identity: &str) -> bool {
        let mut registry = self.registry.lock();
        match registry.connections.remove(identity) {
            Some(mut conn) => {
                conn.active = false;
                registry.stats.disconnects += 1;
                info!(identity = %conn.identity, connection = %conn.id, "connection removed");
                true
            }
            None => false,
        }
    }

    /// Remove `identity` only if it is still bound to connection `id`.
    ///
    /// A session that was superseded by a newer connection must not
    /// evict its successor.
    pub fn release(&self, identity: &str, id: ConnectionId) -> bool {
        let mut registry = self.registry.lock();
        let owned = registry
            .connections
            .get(identity)
            .is_some_and(|conn| conn.id == id);
        if !owned {
            debug!(identity, connection = %id, "release skipped, not the registered connection");
            return false;
        }

        if let Some(mut conn) = registry.connections.remove(identity) {
            conn.active = false;
            registry.stats.disconnects += 1;
            info!(identity = %conn.identity, connection = %conn.id, "connection released");
        }
        true
    }

    /// Deliver to a single identity
    pub fn send(&self, identity: &str, message: impl Into<OutboundMessage>) -> Delivery {
        let message = message.into();
        let mut registry = self.registry.lock();

        let delivery = match registry.connections.get(identity) {
            Some(conn) => conn.deliver(&message),
            None => Delivery::NotConnected,
        };
        registry.record(delivery);

        match delivery {
            Delivery::Closed => registry.evict(identity),
            Delivery::Dropped => warn!(identity, "outbound queue full, message dropped"),
            _ => {}
        }
        delivery
    }

    /// Deliver to every registered identity not in `excluding`.
    ///
    /// A failing recipient never stops delivery to the others. Returns
    /// the number of recipients the message was queued for.
    pub fn broadcast(&self, message: impl Into<OutboundMessage>, excluding: &HashSet<UserId>) -> usize {
        let message = message.into();
        let mut registry = self.registry.lock();

        let mut delivered = 0;
        let mut closed = Vec::new();
        let outcomes: Vec<(UserId, Delivery)> = registry
            .connections
            .iter()
            .filter(|(identity, _)| !excluding.contains(*identity))
            .map(|(identity, conn)| (identity.clone(), conn.deliver(&message)))
            .collect();

        for (identity, delivery) in outcomes {
            registry.record(delivery);
            match delivery {
                Delivery::Delivered => delivered += 1,
                Delivery::Dropped => warn!(%identity, "outbound queue full, broadcast dropped"),
                Delivery::Closed => closed.push(identity),
                Delivery::NotConnected => {}
            }
        }

        for identity in closed {
            registry.evict(identity.as_str());
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.registry.lock().connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_connected(&self, identity: &str) -> bool {
        self.registry.lock().connections.contains_key(identity)
    }

    /// Connection id currently bound to `identity`
    pub fn connection_id(&self, identity: &str) -> Option<ConnectionId> {
        self.registry.lock().connections.get(identity).map(|c| c.id)
    }

    /// Registered identities, in no particular order
    pub fn identities(&self) -> Vec<UserId> {
        self.registry.lock().connections.keys().cloned().collect()
    }

    pub fn stats(&self) -> RelayStats {
        self.registry.lock().stats.clone()
    }
}

impl Default for SignalRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SignalRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRelay")
            .field("config", &self.config)
            .field("connections", &self.len())
            .finish()
    }
}
