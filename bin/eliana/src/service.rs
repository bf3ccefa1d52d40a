mod poll;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use purple_air::{Field, Reading, SensorApi};
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Delay of the extra poll scheduled when the timer starts.
pub const WARM_UP_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub host: String,
}

pub type Readings = HashMap<String, Reading>;

/// Registry of observed sensors and the cache of their latest readings.
///
/// The poll timer runs only while at least one node is registered. Every
/// poll cycle replaces the whole cache at once and then signals subscribers.
#[derive(Clone)]
pub struct Service {
    api: Arc<dyn SensorApi>,
    scan_interval: Duration,
    nodes: Arc<Mutex<HashMap<String, Node>>>,
    readings: Arc<RwLock<Arc<Readings>>>,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
    updates: broadcast::Sender<()>,
}

impl Service {
    pub fn new(api: Arc<dyn SensorApi>, scan_interval: Duration) -> Self {
        let (updates, _) = broadcast::channel(16);

        Self {
            api,
            scan_interval,
            nodes: Arc::new(Mutex::new(HashMap::new())),
            readings: Arc::new(RwLock::new(Arc::new(Readings::new()))),
            timer: Arc::new(Mutex::new(None)),
            updates,
        }
    }

    pub async fn register(&self, id: &str, label: &str, host: &str) {
        let mut nodes = self.nodes.lock().await;

        if nodes.contains_key(id) {
            debug!("detected duplicate registration: {id}");
            return;
        }

        let node = Node {
            id: id.to_string(),
            label: label.to_string(),
            host: host.to_string(),
        };
        nodes.insert(node.id.clone(), node);

        debug!("registered new node: {id}");

        let mut timer = self.timer.lock().await;

        if timer.is_none() {
            info!("starting background poll: {:?}", self.scan_interval);
            *timer = Some(tokio::spawn(self.clone().run()));
        }
    }

    pub async fn unregister(&self, id: &str) {
        let mut nodes = self.nodes.lock().await;

        if nodes.remove(id).is_none() {
            debug!("detected non-existent unregistration: {id}");
            return;
        }

        debug!("unregistered node: {id}");

        {
            let mut readings = self.readings.write().await;

            if readings.contains_key(id) {
                let mut next = Readings::clone(&readings);
                next.remove(id);
                *readings = Arc::new(next);
            }
        }

        if nodes.is_empty() {
            if let Some(handle) = self.timer.lock().await.take() {
                info!("no more nodes, shutting down background poll");
                handle.abort();
            }
        }
    }

    /// Whether the node made it into the latest poll cycle.
    pub async fn is_registered(&self, id: &str) -> bool {
        self.readings.read().await.contains_key(id)
    }

    pub async fn get_reading(&self, id: &str, field: Field) -> Option<f64> {
        self.readings.read().await.get(id)?.get(field)
    }

    pub async fn reading(&self, id: &str) -> Option<Reading> {
        self.readings.read().await.get(id).copied()
    }

    pub async fn nodes(&self) -> Vec<Node> {
        let nodes = self.nodes.lock().await;

        let mut nodes: Vec<Node> = nodes.values().cloned().collect();
        nodes.sort_by(|lhs, rhs| lhs.id.cmp(&rhs.id));
        nodes
    }

    pub async fn is_polling(&self) -> bool {
        self.timer.lock().await.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.updates.subscribe()
    }
}
