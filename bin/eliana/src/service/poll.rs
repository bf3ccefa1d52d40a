use std::sync::Arc;

use futures_util::future::join_all;
use log::{debug, trace, warn};
use purple_air::Reading;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{Node, Readings, Service, WARM_UP_DELAY};
use crate::{Error, Result};

impl Service {
    pub(super) async fn run(self) {
        let start = Instant::now();

        let warm_up = time::sleep_until(start + WARM_UP_DELAY);
        tokio::pin!(warm_up);
        let mut warmed_up = false;

        let mut interval = time::interval_at(start + self.scan_interval, self.scan_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut warm_up, if !warmed_up => {
                    trace!("warm-up poll");
                    warmed_up = true;
                }
                _ = interval.tick() => {
                    trace!("scheduled poll");
                }
            }

            self.poll().await;
        }
    }

    /// Fetches every registered node and swaps in the new reading set.
    ///
    /// A node that fails to answer with a valid document is left out of the
    /// new set; the others are unaffected.
    pub async fn poll(&self) {
        let nodes: Vec<Node> = self.nodes.lock().await.values().cloned().collect();

        debug!(
            "fetch hosts: {:?}",
            nodes.iter().map(|node| &node.host).collect::<Vec<_>>()
        );

        let results = join_all(nodes.iter().map(|node| self.fetch_reading(node))).await;

        let mut readings = Readings::new();

        for (node, result) in nodes.into_iter().zip(results) {
            match result {
                Ok(reading) => {
                    debug!("got readings for {}: {:?}", node.id, reading);
                    readings.insert(node.id, reading);
                }
                Err(err) => {
                    warn!("bad API response for {} at {}: {}", node.id, node.host, err);
                }
            }
        }

        *self.readings.write().await = Arc::new(readings);

        if self.updates.send(()).is_err() {
            trace!("no update subscribers");
        }
    }

    async fn fetch_reading(&self, node: &Node) -> Result<Reading> {
        let payload = self.api.fetch(&node.host).await?;

        if payload.sensor_id != node.id {
            return Err(Error::SensorMismatch {
                expected: node.id.clone(),
                actual: payload.sensor_id,
            });
        }

        Ok(Reading::from(&payload))
    }
}
