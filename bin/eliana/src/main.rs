use std::sync::Arc;

use eliana::{report, Config, Service};
use purple_air::{Client, SensorApi};

use log::{error, info, warn};
use tokio::signal::unix::{signal, SignalKind};
use tokio::task;

type ErasedError = Box<dyn std::error::Error + Send + Sync + 'static>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), ErasedError> {
    pretty_env_logger::init_timed();

    info!("eliana version {VERSION}");

    let config = Config::from_env()?;
    let client = Arc::new(Client::new(config.request_timeout)?);

    let service = Service::new(client.clone(), config.scan_interval);
    let reporter = task::spawn(report(service.clone(), service.subscribe()));

    let mut registered = vec![];

    for (label, host) in config.sensors {
        let id = match client.identify(&host).await {
            Ok(id) => id,
            Err(err) => {
                error!("unable to connect to {label} at {host}: {err}");
                continue;
            }
        };

        info!("found sensor {id} ({label}) at {host}");

        service.register(&id, &label, &host).await;
        registered.push(id);
    }

    if registered.is_empty() {
        warn!("no sensors to poll");
    }

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = reporter => {},
        _ = sigterm.recv() => { info!("got SIGTERM, exiting...") },
        _ = tokio::signal::ctrl_c() => { info!("got SIGINT, exiting...") },
    };

    for id in registered {
        service.unregister(&id).await;
    }

    Ok(())
}
