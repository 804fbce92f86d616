use crate::{
    application::GatewaySession,
    domain::{Operation, SessionEvent, ToastLevel},
    tests::support::{
        MockTransport, MockUploader, ack_of, recv_matching, sent_operations, test_config,
        test_descriptor, wait_until,
    },
};
use std::{fs, path::PathBuf, sync::Arc, time::Duration};
use tempfile::TempDir;

fn sources(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, b"payload").unwrap();
            path
        })
        .collect()
}

struct Harness {
    session: Arc<GatewaySession<MockTransport, MockUploader>>,
    events: tokio::sync::mpsc::Receiver<SessionEvent>,
    runner: tokio::task::JoinHandle<tokio::io::Result<()>>,
    sent: Arc<std::sync::Mutex<Vec<Vec<u8>>>>,
}

/// Session with a ready connection, tracking frames through `sent`.
async fn ready_session(uploader: MockUploader) -> Harness {
    let transport = MockTransport::new();
    let feeder = transport.accept();
    let sent = transport.sent.clone();
    let (session, events) =
        GatewaySession::new(transport, uploader, test_descriptor(), test_config());
    let session = Arc::new(session);
    let runner = tokio::spawn({
        let session = session.clone();
        async move { session.run().await }
    });

    feeder.send(ack_of(Operation::Ready)).unwrap();
    wait_until(|| sent_operations(&sent).len() == 1).await;
    Harness {
        session,
        events,
        runner,
        sent,
    }
}

fn listing_requests(sent: &Arc<std::sync::Mutex<Vec<Vec<u8>>>>) -> usize {
    sent_operations(sent)
        .iter()
        .filter(|op| **op == Operation::ListFiles)
        .count()
}

#[tokio::test]
async fn uploads_run_one_at_a_time_in_queue_order() {
    let uploader = MockUploader::new(Duration::from_millis(20));
    let max_active = uploader.max_active.clone();
    let completed = uploader.completed.clone();
    let mut harness = ready_session(uploader).await;

    let dir = TempDir::new().unwrap();
    for source in sources(&dir, &["a.txt", "b.txt", "c.txt"]) {
        assert!(harness.session.queue_upload(source, "/dest"));
    }

    for _ in 0..3 {
        recv_matching(&mut harness.events, |e| {
            matches!(
                e,
                SessionEvent::Toast {
                    level: ToastLevel::Success,
                    ..
                }
            )
        })
        .await;
    }

    assert_eq!(max_active.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(
        *completed.lock().unwrap(),
        ["/dest/a.txt", "/dest/b.txt", "/dest/c.txt"]
    );
    // Initial listing plus one refresh per finished upload.
    wait_until(|| listing_requests(&harness.sent) == 4).await;

    harness.session.disconnect();
    harness.runner.await.unwrap().unwrap();
}

#[tokio::test]
async fn failed_upload_is_skipped_not_retried() {
    let mut uploader = MockUploader::new(Duration::from_millis(5));
    uploader.fail.insert("broken.txt".to_string());
    let completed = uploader.completed.clone();
    let mut harness = ready_session(uploader).await;

    let dir = TempDir::new().unwrap();
    for source in sources(&dir, &["first.txt", "broken.txt", "last.txt"]) {
        assert!(harness.session.queue_upload(source, "/inbox"));
    }

    let mut toasts = Vec::new();
    while toasts.len() < 3 {
        let seen = recv_matching(&mut harness.events, |e| {
            matches!(e, SessionEvent::Toast { .. })
        })
        .await;
        toasts.extend(seen.into_iter().filter_map(|e| match e {
            SessionEvent::Toast { level, message } => Some((level, message)),
            _ => None,
        }));
    }

    assert_eq!(toasts[0].0, ToastLevel::Success);
    assert_eq!(toasts[1].0, ToastLevel::Error);
    assert!(toasts[1].1.contains("broken.txt"));
    assert_eq!(toasts[2].0, ToastLevel::Success);
    assert_eq!(
        *completed.lock().unwrap(),
        ["/inbox/first.txt", "/inbox/last.txt"]
    );
    // No refresh for the failed transfer.
    wait_until(|| listing_requests(&harness.sent) == 3).await;

    harness.session.disconnect();
    harness.runner.await.unwrap().unwrap();
}

#[tokio::test]
async fn stuck_upload_times_out_and_frees_the_queue() {
    let mut uploader = MockUploader::new(Duration::from_millis(5));
    uploader.hang.insert("stuck.txt".to_string());
    let completed = uploader.completed.clone();
    let mut harness = ready_session(uploader).await;

    let dir = TempDir::new().unwrap();
    for source in sources(&dir, &["stuck.txt", "after.txt"]) {
        assert!(harness.session.queue_upload(source, "/dest"));
    }

    // The configured timeout is one second; the error toast proves the
    // worker gave up on the stuck transfer.
    let seen = recv_matching(&mut harness.events, |e| {
        matches!(
            e,
            SessionEvent::Toast {
                level: ToastLevel::Error,
                ..
            }
        )
    })
    .await;
    match seen.last().unwrap() {
        SessionEvent::Toast { message, .. } => {
            assert!(message.contains("stuck.txt"));
            assert!(message.contains("timed out"));
        }
        other => panic!("unexpected event {other:?}"),
    }

    recv_matching(&mut harness.events, |e| {
        matches!(
            e,
            SessionEvent::Toast {
                level: ToastLevel::Success,
                ..
            }
        )
    })
    .await;
    assert_eq!(*completed.lock().unwrap(), ["/dest/after.txt"]);

    harness.session.disconnect();
    harness.runner.await.unwrap().unwrap();
}

#[tokio::test]
async fn queue_rejects_when_full() {
    let mut uploader = MockUploader::new(Duration::from_millis(5));
    uploader.hang.insert("plug.txt".to_string());
    let harness = ready_session(uploader).await;

    let dir = TempDir::new().unwrap();
    let plug = sources(&dir, &["plug.txt"]).remove(0);
    let filler = sources(&dir, &["filler.txt"]).remove(0);

    // The worker is busy with the hanging transfer; the channel holds
    // the rest, up to its capacity.
    assert!(harness.session.queue_upload(plug, "/dest"));
    let mut accepted = 0;
    while harness.session.queue_upload(filler.clone(), "/dest") {
        accepted += 1;
        assert!(accepted <= 256, "queue never filled");
    }
    assert!(accepted > 0);

    harness.session.disconnect();
    harness.runner.await.unwrap().unwrap();
}
