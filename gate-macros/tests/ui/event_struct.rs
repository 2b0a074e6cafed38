use gate_domain::domain_event::DomainEvent;
use gate_macros::event;

#[event]
struct Shipped;

#[event(event_type = "order.placed", version = 3)]
struct OrderPlaced {
    order_id: String,
    amount: u64,
}

#[event]
#[derive(PartialEq)]
struct Refunded(u64);

fn main() {
    assert_eq!(Shipped.event_type(), "Shipped");
    assert_eq!(Shipped.event_version(), 1);

    let placed = OrderPlaced {
        order_id: "o-1".into(),
        amount: 42,
    };
    assert_eq!(placed.event_type(), "order.placed");
    assert_eq!(placed.event_version(), 3);
    assert_eq!(placed.clone().amount, 42);

    let refunded = Refunded(7);
    assert_eq!(refunded.clone(), refunded);
    assert_eq!(refunded.event_type(), "Refunded");
}
