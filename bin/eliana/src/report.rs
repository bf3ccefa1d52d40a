use log::{debug, info, warn};
use purple_air::Reading;
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::Service;

pub async fn report(service: Service, mut updates: Receiver<()>) {
    loop {
        match updates.recv().await {
            Ok(()) => report_nodes(&service).await,
            Err(RecvError::Lagged(skipped)) => debug!("skipped {skipped} updates"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn report_nodes(service: &Service) {
    for node in service.nodes().await {
        if !service.is_registered(&node.id).await {
            warn!("{} ({}) is unavailable", node.label, node.id);
            continue;
        }

        if let Some(reading) = service.reading(&node.id).await {
            info!("{}", describe(&node.label, &reading));
        }
    }
}

pub fn describe(label: &str, reading: &Reading) -> String {
    let mut parts = vec![];

    if let Some(aqi) = reading.pm2_5_atm_aqi {
        parts.push(format!("AQI {aqi}"));
    }

    if let Some(aqi) = reading.pm2_5_atm_aqi_epa {
        parts.push(format!("EPA AQI {aqi}"));
    }

    parts.push(format!("PM2.5 {:.1} µg/m³", reading.pm2_5_atm));
    parts.push(format!("{}°F", reading.temp_f));
    parts.push(format!("humidity {}%", reading.humidity));
    parts.push(format!("pressure {:.2} hPa", reading.pressure));

    format!("{label}: {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let reading = Reading {
            humidity: 40.0,
            temp_f: 79.0,
            pressure: 1012.42,
            pm2_5_atm: 20.0,
            pm2_5_atm_aqi: Some(68),
            pm2_5_atm_aqi_epa: Some(53),
        };

        assert_eq!(
            describe("Backyard", &reading),
            "Backyard: AQI 68, EPA AQI 53, PM2.5 20.0 µg/m³, 79°F, humidity 40%, pressure 1012.42 hPa"
        );
    }

    #[test]
    fn test_describe_omits_missing_index() {
        let reading = Reading {
            humidity: 35.0,
            temp_f: 71.5,
            pressure: 1009.0,
            pm2_5_atm: 612.3,
            pm2_5_atm_aqi: None,
            pm2_5_atm_aqi_epa: None,
        };

        assert_eq!(
            describe("Kitchen", &reading),
            "Kitchen: PM2.5 612.3 µg/m³, 71.5°F, humidity 35%, pressure 1009.00 hPa"
        );
    }
}
