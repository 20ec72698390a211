//! Table-level change notifications.
//!
//! Every write through the [`Store`](crate::db::Store) facade publishes the
//! touched table on a broadcast bus. [`Store::watch`](crate::db::Store::watch)
//! turns that into a live query: run once up front, re-run whenever the table
//! changes, push each result to an mpsc receiver. Dropping the receiver tears
//! the task down.

use tokio::sync::broadcast;

/// One variant per persisted table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Channels,
    Movies,
    TvSeries,
    Seasons,
    Episodes,
    Categories,
    Favorites,
    WatchHistory,
    EpgPrograms,
    UserSettings,
    UserCredentials,
}

impl Table {
    /// Every table, in schema creation order.
    pub const ALL: [Self; 11] = [
        Self::Channels,
        Self::Movies,
        Self::TvSeries,
        Self::Seasons,
        Self::Episodes,
        Self::Categories,
        Self::Favorites,
        Self::WatchHistory,
        Self::EpgPrograms,
        Self::UserSettings,
        Self::UserCredentials,
    ];
}

/// Broadcast fan-out of table change events.
///
/// Cloning shares the underlying channel, so every [`Store`](crate::db::Store)
/// clone publishes to the same subscribers.
#[derive(Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<Table>,
}

impl ChangeBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Announces a write to the given table. Nobody listening is fine.
    pub fn publish(&self, table: Table) {
        let _ = self.tx.send(table);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.tx.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = ChangeBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Table::Channels);
        assert_eq!(rx.recv().await.unwrap(), Table::Channels);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let bus = ChangeBus::new(8);
        bus.publish(Table::Movies);
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let bus = ChangeBus::new(8);
        let clone = bus.clone();
        let mut rx = bus.subscribe();
        clone.publish(Table::Favorites);
        assert_eq!(rx.recv().await.unwrap(), Table::Favorites);
    }
}
