use flume::{Receiver, Sender};

/// Zero-capacity handoff between exactly two parties.
///
/// Neither side buffers: a [`Endpoint::send`] completes only once the peer's
/// [`Endpoint::recv`] has taken the token, and vice versa. Each direction is its own
/// unbuffered lane so that dropping one endpoint disconnects the other instead of
/// leaving it parked forever.
pub struct RendezvousChannel<T = ()> {
    a_to_b: (Sender<T>, Receiver<T>),
    b_to_a: (Sender<T>, Receiver<T>),
}

impl<T> Default for RendezvousChannel<T> {
    fn default() -> Self {
        Self {
            a_to_b: flume::bounded(0),
            b_to_a: flume::bounded(0),
        }
    }
}

impl<T> RendezvousChannel<T> {
    /// Hands out the two endpoints. The channel lives as long as either of them.
    pub fn split(self) -> (Endpoint<T>, Endpoint<T>) {
        let (a_tx, b_rx) = self.a_to_b;
        let (b_tx, a_rx) = self.b_to_a;
        let a = Endpoint { tx: a_tx, rx: a_rx };
        let b = Endpoint { tx: b_tx, rx: b_rx };
        (a, b)
    }
}

/// Thrown once the opposite endpoint has been dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

pub struct Endpoint<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Endpoint<T> {
    /// Suspends until the peer receives `value`.
    #[inline]
    pub async fn send(&self, value: T) -> Result<(), Disconnected> {
        self.tx.send_async(value).await.map_err(|_| Disconnected)
    }

    /// Suspends until the peer sends.
    #[inline]
    pub async fn recv(&self) -> Result<T, Disconnected> {
        self.rx.recv_async().await.map_err(|_| Disconnected)
    }

    /// Always zero: nothing is ever parked in the channel.
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(0)
    }

    /// Returns true if the peer endpoint has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_disconnected()
    }
}

#[cfg(test)]
mod channel_test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity() {
        let (a, b) = RendezvousChannel::<()>::default().split();
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 0);
    }

    /// A send with nobody receiving never completes on its own
    #[tokio::test]
    async fn test_send_waits_for_receiver() {
        let (a, _b) = RendezvousChannel::default().split();
        let pending = tokio::time::timeout(Duration::from_millis(20), a.send(1u8)).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_both_directions() {
        let (a, b) = RendezvousChannel::default().split();
        let peer = tokio::spawn(async move {
            let v = b.recv().await.unwrap();
            b.send(v * 2).await.unwrap();
        });
        a.send(21u32).await.unwrap();
        assert_eq!(a.recv().await, Ok(42));
        peer.await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_disconnects_peer() {
        let (a, b) = RendezvousChannel::<()>::default().split();
        drop(b);
        assert!(a.is_closed());
        assert_eq!(a.send(()).await, Err(Disconnected));
        assert_eq!(a.recv().await, Err(Disconnected));
    }
}
