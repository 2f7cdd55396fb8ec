//! Port allocation for the local server pool.

/// Listener ports of one server instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstancePorts {
    pub index: u16,
    pub https: u16,
    pub http: u16,
    pub stats: u16,
}

/// Contiguous port ranges for `count` server instances.
///
/// Instance `i` listens on `base + i` for each of the three listeners, so the
/// ports of a pool form three arithmetic sequences with step one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPlan {
    https_base: u16,
    http_base: u16,
    stats_base: u16,
    count: u16,
}

impl PortPlan {
    #[must_use]
    pub const fn new(https_base: u16, http_base: u16, stats_base: u16, count: u16) -> Self {
        Self { https_base, http_base, stats_base, count }
    }

    #[must_use]
    pub const fn count(&self) -> u16 {
        self.count
    }

    /// Ports of instance `index`, or `None` when the index is outside the pool
    /// or one of the ports would not fit into `u16`.
    #[must_use]
    pub const fn ports(&self, index: u16) -> Option<InstancePorts> {
        if index >= self.count {
            return None;
        }
        let (Some(https), Some(http), Some(stats)) = (
            self.https_base.checked_add(index),
            self.http_base.checked_add(index),
            self.stats_base.checked_add(index),
        ) else {
            return None;
        };
        Some(InstancePorts { index, https, http, stats })
    }

    /// Returns `true` when every instance of the pool has valid ports.
    #[must_use]
    pub const fn fits(&self) -> bool {
        self.count == 0 || self.ports(self.count - 1).is_some()
    }

    /// Iterates instances in index order.
    pub fn iter(&self) -> impl Iterator<Item = InstancePorts> + '_ {
        (0..self.count).map_while(|index| self.ports(index))
    }
}
