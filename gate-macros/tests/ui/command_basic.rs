use gate_application::command::Command;
use gate_macros::command;

#[command(output = Vec<String>)]
struct ListUsers {
    limit: usize,
}

#[command(name = "billing.charge")]
#[derive(Clone)]
struct Charge(u64);

#[command(output = u32)]
enum Adjust {
    Up(u32),
    Down(u32),
}

fn main() {
    assert_eq!(ListUsers::NAME, "ListUsers");
    assert_eq!(<Charge as Command>::NAME, "billing.charge");
    assert_eq!(Adjust::NAME, "Adjust");

    let _: <ListUsers as Command>::Output = vec![String::new()];
    let _: <Charge as Command>::Output = ();
    let _: <Adjust as Command>::Output = 1u32;

    let cmd = ListUsers { limit: 10 };
    assert!(format!("{cmd:?}").contains("limit"));
    let _ = Charge(5).clone();
    let _ = (Adjust::Up(1), Adjust::Down(1));
}
