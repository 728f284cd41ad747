//! Integration test for the full host pipeline over a real loopback socket:
//! `HostReceiver` → `EventQueue` → `SessionWorker` → injector.

use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use keyshare_core::protocol::encode_message;
use keyshare_core::{
    EventQueue, KeyAction, KeyBindingTable, KeyInjector, Role, RoleController, WireMessage,
};
use keyshare_host::application::manage_sessions::SessionManager;
use keyshare_host::application::process_messages::SessionWorker;
use keyshare_host::infrastructure::input_injection::mock::RecordingInjector;
use keyshare_host::infrastructure::network::start_host_receiver;

/// Polls `cond` until it holds or two seconds pass.
fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn test_datagrams_from_two_clients_reach_injector() {
    // Arrange
    let queue = Arc::new(EventQueue::new());
    let controller = Arc::new(RoleController::new());
    controller.set_role(Role::Host).expect("role");
    controller.set_triggers(true);
    let injector = Arc::new(RecordingInjector::new());
    let poll = Duration::from_millis(2);

    let (addr, receiver) = start_host_receiver(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        poll,
        Arc::clone(&queue),
        Arc::clone(&controller),
    )
    .expect("bind loopback");
    let manager = SessionManager::new(
        KeyBindingTable::builtin_default(),
        Arc::clone(&controller),
        Arc::clone(&injector) as Arc<dyn KeyInjector>,
    );
    let session = SessionWorker::new(manager, Arc::clone(&queue), Arc::clone(&controller), poll, poll)
        .spawn()
        .expect("spawn session worker");

    let alice = UdpSocket::bind("127.0.0.1:0").expect("bind client");
    let bob = UdpSocket::bind("127.0.0.1:0").expect("bind client");

    // Act
    alice
        .send_to(&encode_message(&WireMessage::key("x", KeyAction::Press)), addr)
        .expect("send");
    assert!(wait_until(|| injector.recorded().len() == 1));
    bob.send_to(&encode_message(&WireMessage::key("x", KeyAction::Press)), addr)
        .expect("send");
    assert!(wait_until(|| injector.recorded().len() == 2));
    alice
        .send_to(&encode_message(&WireMessage::Disconnect), addr)
        .expect("send");
    thread::sleep(Duration::from_millis(50));

    controller.trigger_exit(&queue);
    receiver.join().expect("receiver thread");
    let manager = session.join().expect("session thread");

    // Assert
    assert_eq!(
        injector.recorded(),
        vec![
            ("s".to_string(), KeyAction::Press),
            ("k".to_string(), KeyAction::Press),
        ]
    );
    assert_eq!(manager.session_count(), 1);
    assert_eq!(manager.player_for(bob.local_addr().expect("addr")), Some(1));
}
