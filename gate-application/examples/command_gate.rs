/// 命令网关示例
/// 展示 注册 -> 标准拦截器链 -> 分发 -> 结果事件 -> 订阅 的完整流程
///
/// 运行：`RUST_LOG=debug cargo run -p gate-application --example command_gate`
use async_trait::async_trait;
use futures_util::StreamExt;
use gate_application::prelude::*;
use gate_domain::domain_event::BusinessContext;
use gate_domain::eventing::{EventBus, InMemoryEventBus};
use gate_macros::{command, event};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ============================================================================
// 命令与事件
// ============================================================================

#[command(output = u64)]
struct OpenAccount {
    owner: String,
}

#[command(output = Deposited)]
struct Deposit {
    account_id: u64,
    amount: u64,
}

#[command(output = u64)]
struct Withdraw {
    account_id: u64,
    amount: u64,
}

#[event(event_type = "account.deposited")]
struct Deposited {
    account_id: u64,
    amount: u64,
}

#[event]
enum WithdrawalEvent {
    Completed { account_id: u64, remaining: u64 },
    Refused { reason: String },
}

// ============================================================================
// 处理器
// ============================================================================

/// 普通执行器：结果原样返回
struct OpenAccountHandler;

#[async_trait]
impl CommandHandler<OpenAccount> for OpenAccountHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: &OpenAccount) -> Result<u64, AppError> {
        if cmd.owner.is_empty() {
            return Err(AppError::Validation("owner is required".into()));
        }
        Ok(1001)
    }
}

/// 标记：成功返回值即事件
struct DepositHandler;

#[async_trait]
impl CommandHandler<Deposit> for DepositHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: &Deposit) -> Result<Deposited, AppError> {
        Ok(Deposited {
            account_id: cmd.account_id,
            amount: cmd.amount,
        })
    }
}

impl ReturnEventOnSuccess for DepositHandler {}

/// 事件生产者：成功与失败都会发布事件
struct WithdrawHandler {
    balance: u64,
}

#[async_trait]
impl CommandHandler<Withdraw> for WithdrawHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: &Withdraw) -> Result<u64, AppError> {
        // 模拟慢处理，便于观察 profiling 日志
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.balance.checked_sub(cmd.amount).ok_or_else(|| {
            AppError::Validation(format!("insufficient funds on {}", cmd.account_id))
        })
    }
}

impl EventProducer<Withdraw> for WithdrawHandler {
    type Event = WithdrawalEvent;

    fn event_on_success(&self, remaining: &u64) -> Option<WithdrawalEvent> {
        Some(WithdrawalEvent::Completed {
            account_id: 1001,
            remaining: *remaining,
        })
    }

    fn event_on_failure(&self, error: &AppError) -> Option<WithdrawalEvent> {
        Some(WithdrawalEvent::Refused {
            reason: error.to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bus = Arc::new(InMemoryEventBus::new(64));
    let mut events = bus.subscribe().await;
    let listener = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(Ok(event)) = events.next().await {
            println!(
                "[subscriber] {} v{} <- {} ({})",
                event.event_type(),
                event.event_version(),
                event.command_type(),
                event.payload()
            );
            seen.push(event);
            if seen.len() == 3 {
                break;
            }
        }
        seen
    });

    let registry = Arc::new(InMemoryHandlerRegistry::new());
    registry.register::<OpenAccount, _>(Arc::new(OpenAccountHandler))?;
    registry.register_returning_event::<Deposit, _>(Arc::new(DepositHandler))?;
    registry.register_event_producer::<Withdraw, _>(Arc::new(WithdrawHandler {
        balance: 100,
    }))?;

    let config = GateConfig::builder().slow_command_threshold_ms(10).build();
    let gate = CommandGate::with_event_bus(registry, bus.clone(), &config);
    println!("interceptors: {:?}", gate.chain());

    let ctx = AppContext::new(
        BusinessContext::builder()
            .correlation_id("req-2024-001".into())
            .actor_type("user".into())
            .actor_id("alice".into())
            .build(),
    )
    .with_idempotency_key("open-alice");

    let account_id = gate
        .dispatch(
            &ctx,
            OpenAccount {
                owner: "alice".into(),
            },
        )
        .await?;
    println!("opened account: {account_id:?}");

    let deposited = gate
        .dispatch(
            &ctx,
            Deposit {
                account_id: 1001,
                amount: 50,
            },
        )
        .await?;
    println!("deposit result (published as event): {deposited:?}");

    let withdrawn = gate
        .dispatch(
            &ctx,
            Withdraw {
                account_id: 1001,
                amount: 30,
            },
        )
        .await?;
    println!("withdraw result (replaced by event): {withdrawn:?}");

    match gate
        .dispatch(
            &ctx,
            Withdraw {
                account_id: 1001,
                amount: 500,
            },
        )
        .await
    {
        Ok(v) => println!("unexpected success: {v:?}"),
        Err(err) => println!("withdraw failed: {err}"),
    }

    match listener.await {
        Ok(seen) => println!("subscriber received {} events", seen.len()),
        Err(err) => println!("subscriber task failed: {err}"),
    }
    Ok(())
}
