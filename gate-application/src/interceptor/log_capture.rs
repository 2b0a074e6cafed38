//! 测试用日志收集：记录事件级别与消息
//!
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub(crate) type Records = Arc<Mutex<Vec<(Level, String)>>>;

struct Capture {
    records: Records,
}

#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = Message::default();
        event.record(&mut message);
        self.records
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message.0));
    }
}

/// 在当前线程安装收集器；守卫释放前的日志都会被记录
pub(crate) fn capture() -> (DefaultGuard, Records) {
    let records = Records::default();
    let subscriber = tracing_subscriber::registry().with(Capture {
        records: records.clone(),
    });
    (tracing::subscriber::set_default(subscriber), records)
}

pub(crate) fn messages_at(records: &Records, level: Level) -> Vec<String> {
    records
        .lock()
        .unwrap()
        .iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, m)| m.clone())
        .collect()
}
