//! Host bridge trait - abstracts over how requests reach the host application.

use crate::protocol::HostRequest;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

/// Outbound side of the connection to the host.
///
/// Sends are fire-and-forget: the host never replies to a request directly,
/// answers arrive later as inbound messages.
pub trait HostBridge {
    fn send(&self, request: HostRequest);
}

impl<B: HostBridge + ?Sized> HostBridge for &B {
    fn send(&self, request: HostRequest) {
        (**self).send(request)
    }
}

/// Bridge backed by an unbounded crossbeam channel.
///
/// The transport drains the paired [`Receiver`] and writes each request to the
/// host socket.
#[derive(Debug, Clone)]
pub struct ChannelBridge {
    tx: Sender<HostRequest>,
}

impl ChannelBridge {
    pub fn new(tx: Sender<HostRequest>) -> Self {
        Self { tx }
    }
}

impl HostBridge for ChannelBridge {
    fn send(&self, request: HostRequest) {
        let event = request.event();
        if self.tx.send(request).is_err() {
            warn!("Host transport is gone, dropping {} request", event);
        }
    }
}

/// Create a bridge and the receiver the transport reads from.
pub fn bridge_channel() -> (ChannelBridge, Receiver<HostRequest>) {
    let (tx, rx) = unbounded();
    (ChannelBridge::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_arrive_in_order() {
        let (bridge, rx) = bridge_channel();
        bridge.send(HostRequest::GetGlobalSettings {
            context: "a".to_string(),
        });
        bridge.send(HostRequest::GetGlobalSettings {
            context: "b".to_string(),
        });

        let contexts: Vec<String> = rx
            .try_iter()
            .map(|request| match request {
                HostRequest::GetGlobalSettings { context } => context,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(contexts, vec!["a", "b"]);
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (bridge, rx) = bridge_channel();
        drop(rx);
        bridge.send(HostRequest::GetGlobalSettings {
            context: "a".to_string(),
        });
    }

    #[test]
    fn test_reference_is_a_bridge() {
        fn ask<B: HostBridge>(bridge: B) {
            bridge.send(HostRequest::GetGlobalSettings {
                context: "r".to_string(),
            });
        }

        let (bridge, rx) = bridge_channel();
        ask(&bridge);
        ask(&bridge);
        assert_eq!(rx.len(), 2);
    }
}
