//! Cooperative single-threaded scheduler.
//!
//! One [`tick`](Scheduler::tick) polls every channel once, in a fixed order:
//!
//! 1. WiFi status (inline re-association if the link dropped),
//! 2. button edge,
//! 3. keypad key,
//! 4. BLE tick,
//! 5. HTTP service,
//! 6. timeout sweep (keypad inactivity, display revert).
//!
//! At most one toggle commits per tick. The budget is spent by the first
//! accepted request in poll order; later requests in the same tick are not
//! forwarded to the controller, which gives first-committed-wins semantics
//! without any channel knowing about the others.
//!
//! # Starvation trade-off
//!
//! The HTTP poll serves an accepted connection inline, so a slow client can
//! occupy a tick for up to the connection deadline (plus the POST body
//! grace). During that stretch the button, keypad, and BLE tick are not
//! polled. This mirrors the reference firmware's blocking per-connection
//! loop and is kept deliberately; an event-driven redesign would change
//! observable arbitration behavior.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use latchkey_ble::NotifySink;
use latchkey_core::{LockState, TogglePolicy, ToggleRequest, ToggleSource, UnlockCode};
use latchkey_hardware::{
    ButtonInput, IndicatorLamp, KeypadPort, LockActuator, NetworkLink, Sounder, TextPanel,
};
use latchkey_http::{ParsedRequest, RouteAction};

use crate::context::AppContext;
use crate::error::AppError;

/// Pause between ticks. The reference firmware spun freely on bare metal; a
/// host process yields briefly so an idle loop does not burn a core.
const TICK_INTERVAL: Duration = Duration::from_millis(5);

/// What happened during one tick, for observability and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    /// The channel whose toggle committed this tick, if any.
    pub toggled: Option<ToggleSource>,

    /// Whether an HTTP exchange was served.
    pub http_served: bool,

    /// Whether the keypad inactivity sweep fired.
    pub keypad_swept: bool,

    /// Whether a link re-association was attempted.
    pub link_reconnected: bool,
}

/// One-toggle-per-tick arbitration token.
#[derive(Debug, Default)]
struct ToggleBudget {
    spent: bool,
}

impl ToggleBudget {
    fn new() -> Self {
        Self::default()
    }

    fn spent(&self) -> bool {
        self.spent
    }

    fn mark_spent(&mut self) {
        self.spent = true;
    }
}

/// Outcome of routing one HTTP request against the unlock code.
#[derive(Debug)]
struct HttpDecision {
    request: Option<ToggleRequest>,
    invalid_pin: bool,
}

/// Decide what an HTTP request does to the lock.
///
/// An empty PIN passes the code check — requests with no `pin` field at all
/// are accepted as-is. This reproduces the reference firmware's behavior and
/// is a known security gap, kept for compatibility; the notice in the
/// response only ever reflects a non-empty mismatch.
fn decide(request: &ParsedRequest, code: &UnlockCode) -> HttpDecision {
    let pin = request.pin();
    let matched = !pin.is_empty() && code.matches_text(pin);
    let pin_ok = pin.is_empty() || matched;

    let toggle = match request.action() {
        Some(RouteAction::Lock) if pin_ok => Some(ToggleRequest::new(
            ToggleSource::Http,
            TogglePolicy::OnlyIfUnlocked,
            matched,
        )),
        Some(RouteAction::Unlock) if pin_ok => Some(ToggleRequest::new(
            ToggleSource::Http,
            TogglePolicy::OnlyIfLocked,
            matched,
        )),
        _ => None,
    };

    HttpDecision {
        request: toggle,
        invalid_pin: !pin_ok,
    }
}

/// The cooperative main loop.
pub struct Scheduler<A, L, S, P, B, K, W, N>
where
    A: LockActuator,
    L: IndicatorLamp,
    S: Sounder,
    P: TextPanel,
    B: ButtonInput,
    K: KeypadPort,
    W: NetworkLink,
    N: NotifySink,
{
    ctx: AppContext<A, L, S, P, B, K, W, N>,
    tick_interval: Duration,
}

impl<A, L, S, P, B, K, W, N> Scheduler<A, L, S, P, B, K, W, N>
where
    A: LockActuator,
    L: IndicatorLamp,
    S: Sounder,
    P: TextPanel,
    B: ButtonInput,
    K: KeypadPort,
    W: NetworkLink,
    N: NotifySink,
{
    /// Take ownership of the context.
    pub fn new(ctx: AppContext<A, L, S, P, B, K, W, N>) -> Self {
        Self {
            ctx,
            tick_interval: TICK_INTERVAL,
        }
    }

    /// Read-only view of the owned context, for inspection.
    pub fn context(&self) -> &AppContext<A, L, S, P, B, K, W, N> {
        &self.ctx
    }

    /// Current lock state.
    pub fn state(&self) -> LockState {
        self.ctx.controller.state()
    }

    /// Run one full pass through all channel polls.
    ///
    /// # Errors
    ///
    /// Returns an error if a device or the listener fails in a way the
    /// channel contracts treat as fatal. Best-effort failures (notify,
    /// response write, re-association) are logged and absorbed.
    pub async fn tick(&mut self) -> Result<TickReport, AppError> {
        let mut report = TickReport::default();
        let mut budget = ToggleBudget::new();
        let ctx = &mut self.ctx;

        // 1. WiFi status.
        if !ctx.link.is_connected().await {
            warn!("network link down, re-associating");
            report.link_reconnected = true;
            if let Err(error) = ctx.link.reconnect().await {
                warn!(%error, "re-association failed");
            }
        }

        // 2. Button edge.
        let sample = ctx.button.sample().await?;
        if sample.edge {
            let request = ToggleRequest::unconditional(ToggleSource::Button);
            Self::commit(ctx, request, &mut budget, &mut report).await?;
        }

        // 3. Keypad.
        let state = ctx.controller.state();
        let keypad_request = ctx
            .keypad
            .poll(state, &ctx.code, &mut ctx.periph.sounder, &mut ctx.display)
            .await?;
        if let Some(request) = keypad_request {
            Self::commit(ctx, request, &mut budget, &mut report).await?;
        }

        // 4. BLE tick. The same-tick button level gates the toggle.
        let ble_request = ctx
            .ble
            .tick(Instant::now(), sample.pressed, &ctx.code, &mut ctx.notifier);
        if let Some(request) = ble_request {
            Self::commit(ctx, request, &mut budget, &mut report).await?;
        }

        // 5. HTTP service. Serves one connection inline, if one is waiting.
        if let Some(exchange) = ctx.http.poll().await? {
            let decision = decide(exchange.request(), &ctx.code);
            if let Some(request) = decision.request {
                Self::commit(ctx, request, &mut budget, &mut report).await?;
            }
            let state = ctx.controller.state();
            if let Err(error) = exchange.respond(state, decision.invalid_pin).await {
                warn!(%error, "response write failed");
            }
            report.http_served = true;
        }

        // 6. Timeout sweep.
        report.keypad_swept = ctx.keypad.sweep(&mut ctx.display).await?;
        ctx.display.update().await?;

        Ok(report)
    }

    /// Loop [`tick`](Self::tick) forever.
    ///
    /// # Errors
    ///
    /// Returns the first fatal tick error.
    pub async fn run(mut self) -> Result<(), AppError> {
        info!("scheduler running");
        loop {
            self.tick().await?;
            tokio::time::sleep(self.tick_interval).await;
        }
    }

    /// Forward a request to the controller unless this tick's toggle budget
    /// is already spent.
    async fn commit(
        ctx: &mut AppContext<A, L, S, P, B, K, W, N>,
        request: ToggleRequest,
        budget: &mut ToggleBudget,
        report: &mut TickReport,
    ) -> Result<(), AppError> {
        if budget.spent() {
            debug!(source = %request.source, "toggle budget already spent this tick");
            return Ok(());
        }

        let toggled = ctx
            .controller
            .toggle(&request, &mut ctx.periph, &mut ctx.display)
            .await?;
        if toggled {
            budget.mark_spent();
            report.toggled = Some(request.source);
        }
        Ok(())
    }
}
