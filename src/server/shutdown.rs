use tokio::sync::oneshot;

/// The server keeps running until the handle is dropped.
pub(crate) fn shutdown_signal() -> (RpcServerShutdownHandle, RpcServerShutdownSignal) {
    let (tx, rx) = oneshot::channel();

    (RpcServerShutdownHandle { _tx: tx }, RpcServerShutdownSignal { rx })
}

pub(crate) struct RpcServerShutdownHandle {
    _tx: oneshot::Sender<()>,
}

pub(crate) struct RpcServerShutdownSignal {
    rx: oneshot::Receiver<()>,
}

impl RpcServerShutdownSignal {
    pub(crate) async fn wait(self) {
        // Nothing is ever sent. The handle being dropped is the signal.
        let _ = self.rx.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn dropping_handle_fires_signal() {
        let (handle, signal) = shutdown_signal();
        let waiter = tokio::spawn(signal.wait());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("Signal never fired")
            .expect("Waiter panicked");
    }
}
