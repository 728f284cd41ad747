//! Integration test for the client path: scripted key input through the
//! input loop and the sender to a real loopback UDP socket standing in for
//! the host.

use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;

use keyshare_client::application::forward_events::{ClientSender, SenderTimings};
use keyshare_client::infrastructure::network::UdpSink;
use keyshare_core::capture::mock::ScriptedKeySource;
use keyshare_core::{
    decode_datagram, EventQueue, InputLoop, InputSettings, KeyAction, KeyEvent, Role,
    RoleController, WireMessage,
};

#[test]
fn test_tracked_key_reaches_host_socket_then_disconnect() {
    // Arrange: a fake host socket and a client wired to it
    let host = UdpSocket::bind("127.0.0.1:0").expect("bind host");
    host.set_read_timeout(Some(Duration::from_secs(2))).expect("timeout");
    let sink = UdpSink::connect(host.local_addr().expect("addr")).expect("client socket");

    let controller = Arc::new(RoleController::new());
    controller.set_role(Role::Client).expect("role");
    let queue = Arc::new(EventQueue::new());
    let timings = SenderTimings {
        poll: Duration::from_millis(1),
        disconnect_grace: Duration::from_millis(10),
        role_poll: Duration::from_millis(1),
    };
    let sender = ClientSender::new(sink, Arc::clone(&queue), Arc::clone(&controller), timings)
        .spawn()
        .expect("spawn sender");

    // Act: enable tracking, tap x, tap an untracked key, then exit
    let source = ScriptedKeySource::new([
        KeyEvent::down("f3"),
        KeyEvent::up("f3"),
        KeyEvent::down("x"),
        KeyEvent::up("x"),
        KeyEvent::down("q"),
        KeyEvent::up("q"),
        KeyEvent::down("f8"),
    ]);
    InputLoop::new(
        source,
        InputSettings::default(),
        Arc::clone(&controller),
        Arc::clone(&queue),
    )
    .run();
    let sent = sender.join().expect("sender thread");

    // Assert
    let mut received = Vec::new();
    let mut buf = [0u8; 2048];
    for _ in 0..sent {
        let (len, _) = host.recv_from(&mut buf).expect("datagram");
        received.push(decode_datagram(&buf[..len]).expect("decodes"));
    }
    assert_eq!(
        received,
        vec![
            WireMessage::key("x", KeyAction::Press),
            WireMessage::key("x", KeyAction::Release),
            WireMessage::Disconnect,
        ]
    );
}

#[test]
fn test_exit_before_sender_starts_still_delivers_disconnect() {
    // Arrange: the exit key is read before the sender thread exists
    let host = UdpSocket::bind("127.0.0.1:0").expect("bind host");
    host.set_read_timeout(Some(Duration::from_secs(2))).expect("timeout");
    let sink = UdpSink::connect(host.local_addr().expect("addr")).expect("client socket");

    let controller = Arc::new(RoleController::new());
    controller.set_role(Role::Client).expect("role");
    let queue = Arc::new(EventQueue::new());
    let source = ScriptedKeySource::new([
        KeyEvent::down("f3"),
        KeyEvent::down("x"),
        KeyEvent::down("f8"),
    ]);
    InputLoop::new(
        source,
        InputSettings::default(),
        Arc::clone(&controller),
        Arc::clone(&queue),
    )
    .run();
    assert!(!controller.is_running());

    // Act
    let timings = SenderTimings {
        poll: Duration::from_millis(1),
        disconnect_grace: Duration::from_millis(10),
        role_poll: Duration::from_millis(1),
    };
    let sent = ClientSender::new(sink, Arc::clone(&queue), controller, timings)
        .spawn()
        .expect("spawn sender")
        .join()
        .expect("sender thread");

    // Assert
    assert_eq!(sent, 2);
    let mut buf = [0u8; 2048];
    let mut received = Vec::new();
    for _ in 0..sent {
        let (len, _) = host.recv_from(&mut buf).expect("datagram");
        received.push(decode_datagram(&buf[..len]).expect("decodes"));
    }
    assert_eq!(
        received,
        vec![WireMessage::key("x", KeyAction::Press), WireMessage::Disconnect]
    );
    assert!(queue.is_empty());
}
