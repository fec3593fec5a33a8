use crate::error::GraphError;

/// Identifier of a node within an editing session.
pub type NodeId = String;

/// Prefix used for node identifiers issued by a default allocator.
pub const DEFAULT_PREFIX: &str = "dndnode_";

/// Highest counter suffix an allocator accepts from foreign identifiers. Everything
/// above it stays free for the allocator's own use, so the counter never wraps.
pub const MAX_RESERVABLE: u64 = u64::MAX / 2;

/// Issues node identifiers for one editing session.
///
/// Identifiers are `"{prefix}{counter}"` with the counter seeded at zero and only ever
/// incremented, so an allocator never hands out the same identifier twice. Every graph
/// owns its own allocator; two sessions never share a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: String,
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Returns a fresh identifier, distinct from every identifier issued before.
    pub fn next(&mut self) -> NodeId {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers issued (or reserved) so far.
    pub fn issued(&self) -> u64 {
        self.next
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Advances the counter past every identifier in `ids` that this allocator could
    /// have produced, so restored nodes never collide with newly allocated ones.
    ///
    /// Fails without moving the counter if an identifier's suffix exceeds
    /// [`MAX_RESERVABLE`].
    pub fn reserve_past<'a, I>(&mut self, ids: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut highest = None;
        for id in ids {
            let Some(counter) = id
                .strip_prefix(self.prefix.as_str())
                .and_then(|suffix| suffix.parse::<u64>().ok())
            else {
                continue;
            };
            if counter > MAX_RESERVABLE {
                return Err(GraphError::IdSpaceExhausted {
                    node_id: id.to_string(),
                });
            }
            highest = highest.max(Some(counter));
        }

        if let Some(highest) = highest {
            self.next = self.next.max(highest + 1);
        }
        Ok(())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
