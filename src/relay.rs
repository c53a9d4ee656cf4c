//! waypoint/src/relay.rs
//! Raw byte pump between two established sockets. No packet interpretation
//! happens past this point.

use tokio::io::{self, AsyncRead, AsyncWrite};

/// Duplex copy with half-close propagation: EOF on either side promptly
/// shuts down the write half of the other, and the copy ends once both
/// directions are closed. The two directions backpressure independently —
/// a write that cannot be accepted suspends only its own direction.
/// Returns the bytes copied client-to-backend and backend-to-client.
pub async fn relay<A, B>(client: &mut A, backend: &mut B) -> io::Result<(u64, u64)>
where
    A: AsyncRead + AsyncWrite + Unpin + ?Sized,
    B: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    io::copy_bidirectional(client, backend).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex, split};
    use tokio::time::timeout;

    #[tokio::test]
    async fn copies_both_directions_and_propagates_close() {
        let (mut client_peer, mut client_side) = duplex(64);
        let (mut backend_peer, mut backend_side) = duplex(64);

        let pump =
            tokio::spawn(async move { relay(&mut client_side, &mut backend_side).await.unwrap() });

        client_peer.write_all(b"hello").await.unwrap();
        let mut buf = [0u8; 5];
        backend_peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello");

        backend_peer.write_all(b"world!").await.unwrap();
        let mut buf = [0u8; 6];
        client_peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"world!");

        // Closing the client side must propagate a shutdown to the backend.
        drop(client_peer);
        assert_eq!(backend_peer.read(&mut [0u8; 8]).await.unwrap(), 0);

        // Once the backend closes too, the pump ends with both counters.
        drop(backend_peer);
        let (up, down) = pump.await.unwrap();
        assert_eq!(up, 5);
        assert_eq!(down, 6);
    }

    #[tokio::test]
    async fn stalled_write_does_not_block_reverse_direction() {
        // Tiny pipes so the client-to-backend write pends quickly.
        let (client_peer, mut client_side) = duplex(16);
        let (mut backend_peer, mut backend_side) = duplex(16);

        let _pump = tokio::spawn(async move {
            let _ = relay(&mut client_side, &mut backend_side).await;
        });

        // Saturate the forward direction: nothing ever drains the backend
        // peer, so the pump's write toward it stays pending.
        let (mut client_read, mut client_write) = split(client_peer);
        tokio::spawn(async move {
            let _ = client_write.write_all(&[0u8; 48]).await;
        });

        // The reverse direction must still make progress.
        backend_peer.write_all(b"reply").await.unwrap();
        let mut buf = [0u8; 5];
        timeout(Duration::from_secs(1), client_read.read_exact(&mut buf))
            .await
            .expect("backend-to-client direction stalled while a forward write was pending")
            .unwrap();
        assert_eq!(&buf, b"reply");
    }
}
