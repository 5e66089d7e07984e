use tokio::sync::watch;

/// Last-known connectivity state with transition fan-out.
///
/// "Online" is a hint from the host signal or the health probe, not a
/// guarantee; the submission path still has to handle transport failures
/// on its own.
pub struct ConnectivityMonitor {
    sender: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (sender, _) = watch::channel(initially_online);
        Self { sender }
    }

    /// Current best-known state.
    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    /// Feed a reading from the host or the probe. Watchers wake only on
    /// actual transitions; repeated readings of the same state are
    /// absorbed. Returns true when the state changed.
    pub fn set_online(&self, online: bool) -> bool {
        self.sender.send_if_modified(|state| {
            if *state == online {
                false
            } else {
                *state = online;
                true
            }
        })
    }

    /// New receiver observing transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_the_last_fed_state() {
        let monitor = ConnectivityMonitor::new(true);
        assert!(monitor.is_online());

        assert!(monitor.set_online(false));
        assert!(!monitor.is_online());
    }

    #[tokio::test]
    async fn repeated_readings_do_not_wake_watchers() {
        let monitor = ConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();

        assert!(!monitor.set_online(true));
        assert!(!rx.has_changed().expect("sender alive"));

        assert!(monitor.set_online(false));
        assert!(rx.has_changed().expect("sender alive"));
        assert!(!*rx.borrow_and_update());
    }
}
