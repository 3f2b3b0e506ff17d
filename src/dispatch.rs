//! Group address → handler registry.
//!
//! Handlers are invoked synchronously, in registration order, from the
//! caller's context. A slow handler stalls whoever called
//! [`GroupRegistry::dispatch`]. The registry takes `&mut self` everywhere and
//! does no locking of its own; wrap it in a mutex for cross-thread use.
//!
//! ```rust
//! use knx_ipcore::{GroupAddress, GroupRegistry, Telegram, TransportMode};
//!
//! let mut registry = GroupRegistry::new();
//! registry.register(GroupAddress::from_parts(1, 0, 1), |t: &Telegram| {
//!     assert!(t.is_group_address());
//! });
//!
//! let telegram = Telegram::parse(&[], TransportMode::Routing);
//! assert_eq!(registry.dispatch(&telegram), 0);
//! ```

use alloc::collections::BTreeMap;
use core::fmt;

use crate::addressing::GroupAddress;
use crate::protocol::telegram::Telegram;

/// Callback invoked for a matching telegram.
pub type Handler = alloc::boxed::Box<dyn FnMut(&Telegram)>;

/// Ordered handler lists keyed by group address.
#[derive(Default)]
pub struct GroupRegistry {
    handlers: BTreeMap<GroupAddress, alloc::vec::Vec<Handler>>,
}

impl fmt::Debug for GroupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(addr, list)| (addr, list.len())))
            .finish()
    }
}

impl GroupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `address`.
    pub fn register<F>(&mut self, address: GroupAddress, handler: F)
    where
        F: FnMut(&Telegram) + 'static,
    {
        self.handlers.entry(address).or_default().push(alloc::boxed::Box::new(handler));
    }

    /// Drop every handler registered for `address`, returning how many.
    pub fn unregister(&mut self, address: GroupAddress) -> usize {
        let removed = self.handlers.remove(&address).map_or(0, |list| list.len());
        knx_log!(debug, "unregistered {} handler(s) for {}", removed, address);
        removed
    }

    /// Run every handler registered for the telegram's group destination.
    ///
    /// Telegrams to individual addresses and unknown groups are ignored.
    /// Returns the number of handlers invoked.
    pub fn dispatch(&mut self, telegram: &Telegram) -> usize {
        let Some(address) = telegram.group_address() else {
            return 0;
        };
        let Some(list) = self.handlers.get_mut(&address) else {
            return 0;
        };

        knx_log!(trace, "dispatch to {} ({} handlers)", address, list.len());
        for handler in list.iter_mut() {
            handler(telegram);
        }
        list.len()
    }

    /// Number of handlers registered for `address`.
    pub fn handler_count(&self, address: GroupAddress) -> usize {
        self.handlers.get(&address).map_or(0, alloc::vec::Vec::len)
    }

    /// Whether any handler is registered for `address`.
    pub fn contains(&self, address: GroupAddress) -> bool {
        self.handlers.contains_key(&address)
    }

    /// Group addresses with at least one handler, in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = GroupAddress> + '_ {
        self.handlers.keys().copied()
    }

    /// Whether no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drop all handlers.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
