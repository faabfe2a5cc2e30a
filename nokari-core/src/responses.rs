//! Remembers which message the bot sent in response to a command invocation.
use nokari::model::id::{ChannelId, MessageId};

use parking_lot::Mutex;

use std::collections::{HashMap, VecDeque};

/// A bounded map from invoking message to the latest response. The oldest
/// invocation is forgotten first.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    map: HashMap<MessageId, (ChannelId, MessageId)>,
    order: VecDeque<MessageId>,
    capacity: usize,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
                capacity,
            }),
        }
    }

    /// Records `response` as the response to `invocation`, replacing any
    /// previous response.
    pub fn insert(&self, invocation: MessageId, channel_id: ChannelId, response: MessageId) {
        let mut inner = self.inner.lock();
        if inner.capacity == 0 {
            return;
        }

        if inner.map.insert(invocation, (channel_id, response)).is_none() {
            inner.order.push_back(invocation);
        }

        while inner.map.len() > inner.capacity {
            match inner.order.pop_front() {
                Some(id) => {
                    inner.map.remove(&id);
                }
                None => break,
            }
        }
    }

    pub fn get(&self, invocation: MessageId) -> Option<(ChannelId, MessageId)> {
        self.inner.lock().map.get(&invocation).copied()
    }

    pub fn remove(&self, invocation: MessageId) -> Option<(ChannelId, MessageId)> {
        let mut inner = self.inner.lock();

        let response = inner.map.remove(&invocation)?;
        inner.order.retain(|id| *id != invocation);
        Some(response)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseCache;

    use nokari::model::id::{ChannelId, MessageId};

    #[test]
    fn test_response_cache_bounded() {
        let cache = ResponseCache::new(2);

        cache.insert(MessageId(1), ChannelId(9), MessageId(11));
        cache.insert(MessageId(2), ChannelId(9), MessageId(12));
        // Replacing a response doesn't count as a new invocation.
        cache.insert(MessageId(1), ChannelId(9), MessageId(13));
        assert_eq!(cache.len(), 2);

        cache.insert(MessageId(3), ChannelId(9), MessageId(14));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(MessageId(1)).is_none());
        assert_eq!(cache.get(MessageId(2)), Some((ChannelId(9), MessageId(12))));
        assert_eq!(cache.get(MessageId(3)), Some((ChannelId(9), MessageId(14))));
    }

    #[test]
    fn test_response_cache_remove() {
        let cache = ResponseCache::new(4);
        cache.insert(MessageId(1), ChannelId(9), MessageId(11));

        assert_eq!(cache.remove(MessageId(1)), Some((ChannelId(9), MessageId(11))));
        assert!(cache.remove(MessageId(1)).is_none());
        assert!(cache.is_empty());
    }
}
