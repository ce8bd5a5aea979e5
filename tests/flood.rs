//! Integration tests for outgoing flood control.
//!
//! Run on a paused clock: the runtime jumps straight to the next timer
//! whenever every task is idle, so window boundaries are exact.

mod common;

use common::{config, connect};
use parley::Client;
use std::time::Duration;
use tokio::time::Instant;

/// Longer than any window used here, so the flood timer always fires first.
const LONG: Duration = Duration::from_secs(120);

fn client(throughput: u32, window_secs: u64) -> Client {
    Client::builder(config().with_flood(throughput, window_secs))
        .without_default_handlers()
        .build()
}

#[tokio::test(start_paused = true)]
async fn test_throughput_then_wait_for_window() {
    let start = Instant::now();
    let mut session = connect(client(3, 20)).await;

    for n in 0..5 {
        assert!(session.client.privmsg("#c", &n.to_string()));
    }

    for n in 0..3 {
        assert_eq!(session.server.recv().await.unwrap(), format!("PRIVMSG #c :{n}"));
    }
    assert!(start.elapsed() < Duration::from_secs(20));

    assert_eq!(
        session.server.recv_timeout(LONG).await.unwrap(),
        "PRIVMSG #c :3"
    );
    assert!(start.elapsed() >= Duration::from_secs(20));

    // Same fresh window, no further wait.
    assert_eq!(
        session.server.recv_timeout(LONG).await.unwrap(),
        "PRIVMSG #c :4"
    );
    assert!(start.elapsed() < Duration::from_secs(40));

    session.client.quit(None).await;
    session.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_registration_bypasses_flood_window() {
    let start = Instant::now();
    let mut session = connect(client(1, 30)).await;
    assert!(start.elapsed() < Duration::from_secs(30));

    // The window is still untouched by NICK/USER.
    session.client.write("JOIN #c");
    assert_eq!(session.server.recv().await.unwrap(), "JOIN #c");
    assert!(start.elapsed() < Duration::from_secs(30));

    session.client.quit(None).await;
    session.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_drops_queued_lines() {
    let start = Instant::now();
    let mut session = connect(client(1, 10)).await;

    session.client.write("PRIVMSG #c :a");
    assert_eq!(session.server.recv().await.unwrap(), "PRIVMSG #c :a");

    for line in ["PRIVMSG #c :b", "PRIVMSG #c :c", "PRIVMSG #c :d"] {
        session.client.write(line);
    }
    tokio::task::yield_now().await;
    assert_eq!(session.client.pending_writes(), 3);
    assert_eq!(session.client.interrupt(), 3);
    assert_eq!(session.client.pending_writes(), 0);

    // Interrupting does not refund the window.
    session.client.write("PRIVMSG #c :e");
    assert_eq!(
        session.server.recv_timeout(LONG).await.unwrap(),
        "PRIVMSG #c :e"
    );
    assert!(start.elapsed() >= Duration::from_secs(10));

    session.client.quit(None).await;
    session.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_writes_keep_fifo_order_across_windows() {
    let mut session = connect(client(2, 1)).await;

    let lines: Vec<String> = (0..7).map(|n| format!("NOTICE #c :{n}")).collect();
    for line in &lines {
        session.client.write(line.clone());
    }

    for expected in &lines {
        assert_eq!(&session.server.recv_timeout(LONG).await.unwrap(), expected);
    }

    session.client.quit(None).await;
    session.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_quit_skips_queue() {
    let mut session = connect(client(1, 60)).await;

    session.client.write("PRIVMSG #c :first");
    assert_eq!(session.server.recv().await.unwrap(), "PRIVMSG #c :first");
    session.client.write("PRIVMSG #c :never sent");

    session.client.quit(Some("bye")).await;
    assert_eq!(session.server.recv().await.unwrap(), "QUIT :bye");
    session.server.expect_eof().await.unwrap();
    session.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_zero_window_still_limits() {
    let start = Instant::now();
    let mut session = connect(client(2, 0)).await;

    for n in 0..3 {
        assert!(session.client.privmsg("#c", &n.to_string()));
    }
    for n in 0..2 {
        assert_eq!(session.server.recv().await.unwrap(), format!("PRIVMSG #c :{n}"));
    }
    assert!(start.elapsed() < Duration::from_secs(1));

    assert_eq!(
        session.server.recv_timeout(LONG).await.unwrap(),
        "PRIVMSG #c :2"
    );
    assert!(start.elapsed() >= Duration::from_secs(1));

    session.client.quit(None).await;
    session.finished().await.unwrap();
}
