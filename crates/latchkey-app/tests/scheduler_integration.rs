//! End-to-end scheduler tests against mock peripherals and real sockets.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use latchkey_app::{AppContext, LogNotifier, Scheduler, TickReport};
use latchkey_ble::{BleCommandSink, LinkEvents, SinkCallbacks};
use latchkey_core::{LockState, ToggleSource, UnlockCode};
use latchkey_hardware::mock::{
    Journal, MockActuator, MockButton, MockButtonHandle, MockKeypad, MockKeypadHandle, MockLamp,
    MockLink, MockLinkHandle, MockPanel, MockSounder,
};
use latchkey_hardware::{EdgeDetector, KeypadKey, Peripherals};
use latchkey_http::HttpService;
use latchkey_keypad::KeypadChannel;
use latchkey_lock::{LockController, StatusDisplay};

const CODE: u32 = 1234;

type MockScheduler = Scheduler<
    MockActuator,
    MockLamp,
    MockSounder,
    MockPanel,
    MockButton,
    MockKeypad,
    MockLink,
    LogNotifier,
>;

struct Harness {
    scheduler: MockScheduler,
    journal: Journal,
    button: MockButtonHandle,
    keypad: MockKeypadHandle,
    link: MockLinkHandle,
    ble: SinkCallbacks,
    actuator: MockActuator,
    addr: SocketAddr,
}

impl Harness {
    async fn tick(&mut self) -> TickReport {
        self.scheduler.tick().await.unwrap()
    }

    async fn ticks(&mut self, n: usize) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(n);
        for _ in 0..n {
            reports.push(self.tick().await);
        }
        reports
    }

    fn state(&self) -> LockState {
        self.scheduler.state()
    }

    /// One full button press-and-release across two ticks.
    async fn press_button(&mut self) -> TickReport {
        self.button.press();
        let report = self.tick().await;
        self.button.release();
        self.tick().await;
        report
    }
}

async fn harness() -> Harness {
    let journal = Journal::new();
    let (button, button_handle) = MockButton::new();
    let (keypad, keypad_handle) = MockKeypad::new();
    let (link, link_handle) = MockLink::new();

    let actuator = MockActuator::new(&journal);
    let actuator_observer = actuator.clone();

    let mut display = StatusDisplay::new(MockPanel::new(&journal));
    display.init().await.unwrap();

    let ble = BleCommandSink::with_interval(Duration::from_millis(50));
    let callbacks = ble.callbacks();

    let http = HttpService::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap()
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(20));
    let addr = http.local_addr().unwrap();

    let ctx = AppContext {
        controller: LockController::with_message_hold(Duration::from_millis(50)),
        display,
        periph: Peripherals::new(
            actuator,
            MockLamp::new(&journal),
            MockSounder::new(&journal),
        ),
        button: EdgeDetector::new(button),
        keypad: KeypadChannel::with_windows(
            keypad,
            Duration::from_millis(80),
            Duration::from_millis(50),
        ),
        ble,
        notifier: LogNotifier,
        link,
        http,
        code: UnlockCode::new(CODE),
    };

    Harness {
        scheduler: Scheduler::new(ctx),
        journal,
        button: button_handle,
        keypad: keypad_handle,
        link: link_handle,
        ble: callbacks,
        actuator: actuator_observer,
        addr,
    }
}

async fn http_request(addr: SocketAddr, request: &[u8]) -> tokio::task::JoinHandle<String> {
    let request = request.to_vec();
    tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(&request).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    })
}

/// Tick the scheduler until the client task completes.
async fn serve_until_done(harness: &mut Harness, client: &tokio::task::JoinHandle<String>) {
    for _ in 0..2000 {
        harness.tick().await;
        if client.is_finished() {
            return;
        }
    }
    panic!("client never finished");
}

#[tokio::test]
async fn boots_unlocked_and_idle() {
    let mut harness = harness().await;
    assert_eq!(harness.state(), LockState::Unlocked);

    let report = harness.tick().await;
    assert!(report.toggled.is_none());
    assert!(!harness.actuator.is_engaged());
}

#[tokio::test]
async fn button_edge_toggles_once_per_press() {
    let mut harness = harness().await;

    harness.button.press();
    let report = harness.tick().await;
    assert_eq!(report.toggled, Some(ToggleSource::Button));
    assert_eq!(harness.state(), LockState::Locked);
    assert!(harness.actuator.is_engaged());

    // Held across further ticks: no more edges.
    let reports = harness.ticks(3).await;
    assert!(reports.iter().all(|r| r.toggled.is_none()));
    assert_eq!(harness.state(), LockState::Locked);

    harness.button.release();
    harness.tick().await;
    harness.button.press();
    let report = harness.tick().await;
    assert_eq!(report.toggled, Some(ToggleSource::Button));
    assert_eq!(harness.state(), LockState::Unlocked);
}

#[tokio::test]
async fn keypad_code_unlocks_when_locked() {
    let mut harness = harness().await;
    harness.press_button().await;
    assert_eq!(harness.state(), LockState::Locked);

    harness.keypad.send_entry(&[1, 2, 3, 4]).await.unwrap();
    let reports = harness.ticks(5).await;

    assert_eq!(harness.state(), LockState::Unlocked);
    assert!(!harness.actuator.is_engaged());
    assert!(
        reports
            .iter()
            .any(|r| r.toggled == Some(ToggleSource::Keypad))
    );
}

#[tokio::test]
async fn keypad_code_is_noop_when_already_unlocked() {
    let mut harness = harness().await;
    assert_eq!(harness.state(), LockState::Unlocked);

    harness.keypad.send_entry(&[1, 2, 3, 4]).await.unwrap();
    let reports = harness.ticks(5).await;

    assert_eq!(harness.state(), LockState::Unlocked);
    assert!(reports.iter().all(|r| r.toggled.is_none()));
    assert_eq!(
        harness.scheduler.context().display.current_text(),
        "WRONG CODE"
    );
}

#[tokio::test]
async fn keypad_wrong_code_rejected() {
    let mut harness = harness().await;
    harness.press_button().await;

    harness.keypad.send_entry(&[4, 3, 2, 1]).await.unwrap();
    let reports = harness.ticks(5).await;

    assert_eq!(harness.state(), LockState::Locked);
    assert!(reports.iter().all(|r| r.toggled.is_none()));
    assert_eq!(harness.scheduler.context().keypad.buffer(), "");
}

#[tokio::test]
async fn star_force_locks_and_is_idempotent() {
    let mut harness = harness().await;

    harness.keypad.send_key(KeypadKey::Star).await.unwrap();
    let report = harness.tick().await;
    assert_eq!(report.toggled, Some(ToggleSource::Keypad));
    assert_eq!(harness.state(), LockState::Locked);

    // Star while already locked is a no-op.
    harness.keypad.send_key(KeypadKey::Star).await.unwrap();
    let report = harness.tick().await;
    assert!(report.toggled.is_none());
    assert_eq!(harness.state(), LockState::Locked);
}

#[tokio::test]
async fn ble_write_toggles_exactly_once() {
    let mut harness = harness().await;
    harness.ble.on_connect();
    harness.ble.on_write(b"1234");

    // Several ready cycles inside one gate window: single fire.
    let reports = harness.ticks(4).await;
    let ble_toggles = reports
        .iter()
        .filter(|r| r.toggled == Some(ToggleSource::Ble))
        .count();
    assert_eq!(ble_toggles, 1);
    assert_eq!(harness.state(), LockState::Locked);

    // Past the window, mailbox is empty: nothing further.
    tokio::time::sleep(Duration::from_millis(60)).await;
    let report = harness.tick().await;
    assert!(report.toggled.is_none());
}

#[tokio::test]
async fn ble_suppressed_while_button_pressed() {
    let mut harness = harness().await;
    harness.ble.on_connect();
    harness.ble.on_write(b"1234");

    harness.button.press();
    let report = harness.tick().await;
    // The button committed; the BLE payload was evaluated under a pressed
    // button and dropped.
    assert_eq!(report.toggled, Some(ToggleSource::Button));

    harness.button.release();
    tokio::time::sleep(Duration::from_millis(60)).await;
    let report = harness.tick().await;
    assert!(report.toggled.is_none());
    assert_eq!(harness.state(), LockState::Locked);
}

#[tokio::test]
async fn http_post_unlock_with_correct_pin() {
    let mut harness = harness().await;
    harness.press_button().await;
    assert_eq!(harness.state(), LockState::Locked);

    let client = http_request(
        harness.addr,
        b"POST /unlock HTTP/1.1\r\nHost: x\r\n\r\npin=1234",
    )
    .await;
    serve_until_done(&mut harness, &client).await;

    assert_eq!(harness.state(), LockState::Unlocked);
    let response = client.await.unwrap();
    assert!(response.contains("Lock State: Unlocked"));
    assert!(!response.contains("Invalid PIN"));
}

#[tokio::test]
async fn http_post_unlock_with_wrong_pin() {
    let mut harness = harness().await;
    harness.press_button().await;

    let client = http_request(
        harness.addr,
        b"POST /unlock HTTP/1.1\r\nHost: x\r\n\r\npin=9999",
    )
    .await;
    serve_until_done(&mut harness, &client).await;

    assert_eq!(harness.state(), LockState::Locked);
    let response = client.await.unwrap();
    assert!(response.contains("Lock State: Locked"));
    assert!(response.contains("Invalid PIN code!"));
}

#[tokio::test]
async fn http_lock_without_pin_is_accepted() {
    let mut harness = harness().await;
    assert_eq!(harness.state(), LockState::Unlocked);

    // No pin field at all: the empty pin passes the code check.
    let client = http_request(harness.addr, b"POST /lock HTTP/1.1\r\nHost: x\r\n\r\n").await;
    serve_until_done(&mut harness, &client).await;

    assert_eq!(harness.state(), LockState::Locked);
    let response = client.await.unwrap();
    assert!(response.contains("Lock State: Locked"));
}

#[tokio::test]
async fn http_unlock_when_already_unlocked_is_noop() {
    let mut harness = harness().await;

    let client = http_request(
        harness.addr,
        b"POST /unlock HTTP/1.1\r\nHost: x\r\n\r\npin=1234",
    )
    .await;
    serve_until_done(&mut harness, &client).await;

    assert_eq!(harness.state(), LockState::Unlocked);
    let response = client.await.unwrap();
    assert!(response.contains("Lock State: Unlocked"));
}

#[tokio::test]
async fn first_committed_toggle_wins_the_tick() {
    let mut harness = harness().await;

    // Stage a complete keypad entry, digits consumed one per tick.
    harness.keypad.send_digits(&[1, 2, 3, 4]).await.unwrap();
    harness.ticks(4).await;

    // Queue the submit key and press the button for the same tick.
    harness.keypad.send_key(KeypadKey::Hash).await.unwrap();
    harness.button.press();

    let report = harness.tick().await;
    // Button polls first and locks; the keypad submission (now valid, the
    // lock is closed) loses the budget race and does not unlock again.
    assert_eq!(report.toggled, Some(ToggleSource::Button));
    assert_eq!(harness.state(), LockState::Locked);
}

#[tokio::test]
async fn link_drop_triggers_inline_reconnect() {
    let mut harness = harness().await;
    harness.link.drop_link();

    let report = harness.tick().await;
    assert!(report.link_reconnected);
    assert_eq!(harness.link.reconnect_attempts(), 1);
    assert!(harness.link.is_connected());

    let report = harness.tick().await;
    assert!(!report.link_reconnected);
    assert_eq!(harness.link.reconnect_attempts(), 1);
}

#[tokio::test]
async fn keypad_inactivity_sweep_restores_idle() {
    let mut harness = harness().await;
    harness.keypad.send_digits(&[7, 8]).await.unwrap();
    harness.ticks(2).await;
    assert_eq!(harness.scheduler.context().keypad.buffer(), "78");
    assert_eq!(harness.scheduler.context().display.current_text(), "78");

    tokio::time::sleep(Duration::from_millis(100)).await;
    let report = harness.tick().await;

    assert!(report.keypad_swept);
    assert_eq!(harness.scheduler.context().keypad.buffer(), "");
    assert_eq!(
        harness.scheduler.context().display.current_text(),
        "SMART LOCK"
    );
}

#[tokio::test]
async fn state_change_message_reverts_between_ticks() {
    let mut harness = harness().await;
    harness.press_button().await;
    assert_eq!(harness.scheduler.context().display.current_text(), "Locked");

    tokio::time::sleep(Duration::from_millis(80)).await;
    harness.tick().await;
    assert_eq!(
        harness.scheduler.context().display.current_text(),
        "SMART LOCK"
    );
}

#[tokio::test]
async fn side_effect_order_holds_through_the_scheduler() {
    let mut harness = harness().await;
    harness.journal.clear();

    harness.button.press();
    harness.tick().await;

    let labels = harness.journal.labels();
    assert_eq!(
        labels,
        vec![
            "actuator engaged",
            "lamp lit",
            "sounder pulse 500ms",
            "display 'Locked'",
        ]
    );
}

#[tokio::test]
async fn rejected_requests_never_change_state() {
    let mut harness = harness().await;

    // A run of requests whose policies all fail in the current state.
    harness.keypad.send_key(KeypadKey::Star).await.unwrap(); // locks
    harness.tick().await;
    harness.keypad.send_key(KeypadKey::Star).await.unwrap(); // no-op
    harness.keypad.send_entry(&[9, 9, 9, 9]).await.unwrap(); // wrong code
    let reports = harness.ticks(6).await;

    assert!(reports.iter().all(|r| r.toggled.is_none()));
    assert_eq!(harness.state(), LockState::Locked);
}
