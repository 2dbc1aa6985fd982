// Copyright 2025 the ember authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use log;

/// Manages a generic, thread-safe event channel.
///
/// The bus is generic over the event type `T` it transports, so this crate
/// stays decoupled from the concrete event types defined by higher-level
/// subsystems (collision events, variable changes, ...).
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a new EventBus with an unbounded channel for a specific event type.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Attempts to send an event, logging an error if the receiver is disconnected.
    pub fn publish(&self, event: T) {
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to send event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    /// Use this to allow other parts of the system to send events.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a clone of the receiver end of the channel.
    ///
    /// The underlying channel is multi-consumer; each event is delivered to
    /// exactly one receiver, so hand out one receiver per consuming system.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        self.receiver.clone()
    }

    /// Whether any receiver besides the bus's own exists.
    ///
    /// Publishers that only emit for external consumers can skip sending when
    /// this is false; the unbounded channel would otherwise retain every
    /// event for the life of the bus.
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 1
    }

    /// Drains every currently-queued event without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Touched { a: u32, b: u32 },
        Separated { a: u32, b: u32 },
    }

    #[test]
    fn publish_then_drain() {
        let bus = EventBus::<TestEvent>::new();
        bus.publish(TestEvent::Touched { a: 1, b: 2 });
        bus.publish(TestEvent::Separated { a: 1, b: 2 });

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TestEvent::Touched { a: 1, b: 2 });
        assert_eq!(events[1], TestEvent::Separated { a: 1, b: 2 });
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn has_subscribers_tracks_external_receivers() {
        let bus = EventBus::<TestEvent>::new();
        assert!(!bus.has_subscribers());

        let rx = bus.subscribe();
        assert!(bus.has_subscribers());

        drop(rx);
        assert!(!bus.has_subscribers());
    }

    #[test]
    fn subscriber_sees_nothing_when_empty() {
        let bus = EventBus::<TestEvent>::new();
        let rx = bus.subscribe();
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn sender_works_across_threads() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();
        let rx = bus.subscribe();

        let handle = thread::spawn(move || {
            sender
                .send(TestEvent::Touched { a: 7, b: 9 })
                .expect("send from thread");
        });
        handle.join().expect("thread join");

        assert_eq!(rx.recv().expect("recv"), TestEvent::Touched { a: 7, b: 9 });
    }
}
