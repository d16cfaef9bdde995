use crate::config::MAX_EVENT_BUFFER_SIZE;
use crate::NodeId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// Events emitted while a pipeline is assembled and driven
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    NodeCreated {
        node_id: NodeId,
        name: String,
        timestamp: DateTime<Utc>,
    },
    NodeErased {
        node_id: NodeId,
        timestamp: DateTime<Utc>,
    },
    Connected {
        src: NodeId,
        dst: NodeId,
        slot: usize,
        timestamp: DateTime<Utc>,
    },
    NodeClosed {
        node_id: NodeId,
        tick: u64,
        timestamp: DateTime<Utc>,
    },
    Completed {
        ticks: u64,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast bus for pipeline events.
///
/// Sending never blocks; events are dropped when nobody listens.
pub struct EventBus {
    sender: broadcast::Sender<PipelineEvent>,
}

impl EventBus {
    /// `capacity` is clamped to `1..=MAX_EVENT_BUFFER_SIZE`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.clamp(1, MAX_EVENT_BUFFER_SIZE));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: PipelineEvent) {
        let _ = self.sender.send(event);
    }

    pub fn node_created(&self, node_id: NodeId, name: String) {
        self.emit(PipelineEvent::NodeCreated {
            node_id,
            name,
            timestamp: Utc::now(),
        });
    }

    pub fn node_erased(&self, node_id: NodeId) {
        self.emit(PipelineEvent::NodeErased {
            node_id,
            timestamp: Utc::now(),
        });
    }

    pub fn connected(&self, src: NodeId, dst: NodeId, slot: usize) {
        self.emit(PipelineEvent::Connected {
            src,
            dst,
            slot,
            timestamp: Utc::now(),
        });
    }

    pub fn node_closed(&self, node_id: NodeId, tick: u64) {
        self.emit(PipelineEvent::NodeClosed {
            node_id,
            tick,
            timestamp: Utc::now(),
        });
    }

    pub fn completed(&self, ticks: u64) {
        self.emit(PipelineEvent::Completed {
            ticks,
            timestamp: Utc::now(),
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new(4);
        bus.completed(1);
    }

    #[test]
    fn capacity_is_clamped() {
        for capacity in [0, usize::MAX] {
            let bus = EventBus::new(capacity);
            let mut rx = bus.subscribe();
            bus.completed(1);
            assert!(matches!(rx.try_recv(), Ok(PipelineEvent::Completed { ticks: 1, .. })));
        }
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.node_created(NodeId::from_index(0), "a".to_string());
        bus.completed(3);

        match rx.try_recv() {
            Ok(PipelineEvent::NodeCreated { node_id, name, .. }) => {
                assert_eq!(node_id, NodeId::from_index(0));
                assert_eq!(name, "a");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Ok(PipelineEvent::Completed { ticks: 3, .. })));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = PipelineEvent::Connected {
            src: NodeId::from_index(0),
            dst: NodeId::from_index(1),
            slot: 0,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Connected");
        assert_eq!(json["dst"], 1);
    }
}
