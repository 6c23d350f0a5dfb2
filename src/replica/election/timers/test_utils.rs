use crate::actor::Event;
use crate::replica::election::timers::ElectionTimeout;
use std::time::Duration;
use tokio::sync::mpsc;

pub(super) struct TestUtilActor {
    rx: mpsc::Receiver<Event>,
    quiet_period: Duration,
}

impl TestUtilActor {
    pub(super) fn new(rx: mpsc::Receiver<Event>) -> Self {
        TestUtilActor {
            rx,
            quiet_period: Duration::from_millis(10),
        }
    }

    pub(super) async fn assert_election_timeout_event(&mut self, expected: ElectionTimeout) {
        let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("Unexpected timeout")
            .expect("Expected value");

        match event {
            Event::ElectionTimeout(timeout) => assert_eq!(timeout, expected),
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    pub(super) async fn assert_no_event(&mut self) {
        tokio::time::timeout(self.quiet_period, self.rx.recv())
            .await
            .expect_err("Expected timeout");
    }
}
