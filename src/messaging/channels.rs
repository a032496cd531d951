// Lock-free communication channels

use crate::instrument::TriggerEvent;
use crate::messaging::notification::Notification;
use ringbuf::{HeapRb, traits::Split};

/// Scheduler → audio thread: timestamped trigger requests
pub type TriggerProducer = ringbuf::HeapProd<TriggerEvent>;
pub type TriggerConsumer = ringbuf::HeapCons<TriggerEvent>;

pub fn create_trigger_channel(capacity: usize) -> (TriggerProducer, TriggerConsumer) {
    let rb = HeapRb::<TriggerEvent>::new(capacity);
    rb.split()
}

/// Scheduler → UI thread: recoverable problems worth surfacing
pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}
