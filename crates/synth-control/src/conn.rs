//! Fixed-capacity connection table. The source links connections in a
//! doubly-linked list ordered by arrival so the oldest can be evicted in
//! O(1); a vector with index-ordered insertion and swap-free removal is
//! equivalent for at most MX_UI elements and simpler to reason about.

use synth_core::consts::{MXCMD, MXRSP, MX_UI};

/// Per-client buffers and bookkeeping. The oldest connection is always at
/// index 0, since new connections are pushed at the back and eviction
/// removes from the front.
pub struct Connection<Id> {
    pub id: Id,
    pub cmdbuf: String,
    pub rspbuf: String,
}

impl<Id> Connection<Id> {
    pub fn new(id: Id) -> Self {
        Connection { id, cmdbuf: String::with_capacity(MXCMD), rspbuf: String::with_capacity(MXRSP) }
    }
}

/// Ordered connection list capped at `MX_UI`. Accepting past capacity
/// evicts the oldest (front) connection, returning it so the caller can
/// close its socket.
pub struct ConnTable<Id> {
    conns: std::collections::VecDeque<Connection<Id>>,
}

impl<Id> ConnTable<Id> {
    pub fn new() -> Self {
        ConnTable { conns: std::collections::VecDeque::with_capacity(MX_UI) }
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Inserts a new connection, evicting and returning the oldest one if
    /// the table was already at capacity.
    pub fn accept(&mut self, conn: Connection<Id>) -> Option<Connection<Id>> {
        let evicted = if self.conns.len() >= MX_UI { self.conns.pop_front() } else { None };
        self.conns.push_back(conn);
        evicted
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Connection<Id>> {
        self.conns.iter_mut()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Connection<Id>) -> bool) {
        self.conns.retain(|c| keep(c));
    }

    /// Removes the connection at `index`, matching the source's unlink of
    /// a closed connection from the list.
    pub fn remove(&mut self, index: usize) -> Option<Connection<Id>> {
        self.conns.remove(index)
    }
}

impl<Id> Default for ConnTable<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut table: ConnTable<usize> = ConnTable::new();
        for i in 0..MX_UI {
            assert!(table.accept(Connection::new(i)).is_none());
        }
        let evicted = table.accept(Connection::new(MX_UI));
        assert_eq!(evicted.unwrap().id, 0);
        assert_eq!(table.len(), MX_UI);
    }
}
