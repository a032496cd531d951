// Messaging - lock-free channels between the scheduler thread and its observers

pub mod channels;
pub mod notification;

pub use channels::{
    NotificationConsumer, NotificationProducer, TriggerConsumer, TriggerProducer,
    create_notification_channel, create_trigger_channel,
};
pub use notification::{Notification, NotificationCategory, NotificationLevel};
