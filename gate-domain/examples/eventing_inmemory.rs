/// 内存事件总线示例
/// 展示 事件宏 -> 信封 -> 序列化 -> 总线广播 -> 多订阅者消费
use futures_util::StreamExt;
use gate_domain::domain_event::{BusinessContext, EventEnvelope, SerializedEvent};
use gate_domain::error::DomainResult;
use gate_domain::eventing::{EventBus, InMemoryEventBus};
use gate_macros::event;

#[event]
enum ShipmentEvent {
    #[event(event_type = "shipment.dispatched")]
    Dispatched { shipment_id: String, carrier: String },
    #[event(event_type = "shipment.delivered", event_version = 2)]
    Delivered { shipment_id: String },
}

#[tokio::main]
async fn main() -> DomainResult<()> {
    let bus = InMemoryEventBus::new(16);

    let mut handles = Vec::new();
    for name in ["audit", "notifier"] {
        let mut stream = bus.subscribe().await;
        handles.push(tokio::spawn(async move {
            let mut received = 0;
            while let Some(item) = stream.next().await {
                match item {
                    Ok(event) => {
                        received += 1;
                        println!(
                            "[{name}] {} v{} correlation={:?} payload={}",
                            event.event_type(),
                            event.event_version(),
                            event.correlation_id(),
                            event.payload()
                        );
                    }
                    Err(err) => println!("[{name}] lagged: {err}"),
                }
                if received == 2 {
                    break;
                }
            }
            received
        }));
    }

    let biz = BusinessContext::builder()
        .correlation_id("order-77".into())
        .build()
        .caused_by("dispatch-demo", 3);

    let events = [
        ShipmentEvent::Dispatched {
            shipment_id: "s-1".into(),
            carrier: "acme".into(),
        },
        ShipmentEvent::Delivered {
            shipment_id: "s-1".into(),
        },
    ];

    let mut batch = Vec::new();
    for event in events {
        let envelope = EventEnvelope::new("dispatch-demo", "Ship", event, biz.clone());
        batch.push(SerializedEvent::try_from(&envelope)?);
    }
    println!("subscribers: {}", bus.subscriber_count());
    bus.publish_batch(&batch).await?;

    for handle in handles {
        match handle.await {
            Ok(n) => println!("subscriber done, received {n}"),
            Err(err) => println!("subscriber task failed: {err}"),
        }
    }
    Ok(())
}
