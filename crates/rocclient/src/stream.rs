//! Periodic streaming reads
//!
//! Lazy streams that re-issue a parameter read on every poll tick.
//! Dropping the stream cancels it; no further requests are made.

use crate::client::RocClient;
use crate::error::Result;
use futures::stream::{self, Stream};
use roctlp::{TlpInstance, TlpValue};
use std::time::Duration;

impl RocClient {
    /// Poll one TLP forever at `poll_interval`.
    pub fn stream_tlp(
        &self,
        tlp: TlpInstance,
        poll_interval: Duration,
    ) -> impl Stream<Item = Result<TlpValue>> + '_ {
        stream::unfold(false, move |ticked| {
            let tlp = tlp.clone();
            async move {
                if ticked {
                    tokio::time::sleep(poll_interval).await;
                }
                Some((self.read_tlp(tlp).await, true))
            }
        })
    }

    /// Poll a fixed list of TLPs forever at `poll_interval`, yielding the
    /// whole list each tick.
    pub fn stream_tlps(
        &self,
        tlps: Vec<TlpInstance>,
        poll_interval: Duration,
    ) -> impl Stream<Item = Result<Vec<TlpValue>>> + '_ {
        stream::unfold(false, move |ticked| {
            let tlps = tlps.clone();
            async move {
                if ticked {
                    tokio::time::sleep(poll_interval).await;
                }
                Some((self.read_tlps(tlps).await, true))
            }
        })
    }
}
