use gate_domain::domain_event::DomainEvent;
use gate_macros::event;

#[event(version = 2)]
enum PaymentEvent {
    Authorized { payment_id: String, amount: u64 },
    #[event(event_type = "payment.declined", event_version = 5)]
    Declined(String),
    #[event(event_version = 1)]
    Expired,
}

fn main() {
    let authorized = PaymentEvent::Authorized {
        payment_id: "p-1".into(),
        amount: 10,
    };
    assert_eq!(authorized.event_type(), "PaymentEvent.Authorized");
    assert_eq!(authorized.event_version(), 2);

    let declined = PaymentEvent::Declined("insufficient funds".into());
    assert_eq!(declined.event_type(), "payment.declined");
    assert_eq!(declined.event_version(), 5);

    assert_eq!(PaymentEvent::Expired.event_type(), "PaymentEvent.Expired");
    assert_eq!(PaymentEvent::Expired.event_version(), 1);
    assert!(format!("{:?}", authorized.clone()).contains("Authorized"));
}
