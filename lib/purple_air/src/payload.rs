use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::aqi::{calc_aqi, calc_epa_conversion, Category};

/// Subset of the document served by a sensor at `/json`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SensorPayload {
    #[serde(rename = "SensorId")]
    pub sensor_id: String,
    pub current_humidity: f64,
    pub current_temp_f: f64,
    pub pressure: f64,
    #[serde(rename = "pm2_5_atm")]
    pub pm2_5_atm_a: f64,
    #[serde(rename = "pm2_5_atm_b")]
    pub pm2_5_atm_b: f64,
    #[serde(rename = "pm2_5_cf_1")]
    pub pm2_5_cf_1_a: f64,
    #[serde(rename = "pm2_5_cf_1_b")]
    pub pm2_5_cf_1_b: f64,
}

impl SensorPayload {
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reading {
    pub humidity: f64,
    pub temp_f: f64,
    pub pressure: f64,
    pub pm2_5_atm: f64,
    pub pm2_5_atm_aqi: Option<u16>,
    pub pm2_5_atm_aqi_epa: Option<u16>,
}

impl Reading {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Humidity => Some(self.humidity),
            Field::TempF => Some(self.temp_f),
            Field::Pressure => Some(self.pressure),
            Field::Pm2_5Atm => Some(self.pm2_5_atm),
            Field::Pm2_5AtmAqi => self.pm2_5_atm_aqi.map(f64::from),
            Field::Pm2_5AtmAqiEpa => self.pm2_5_atm_aqi_epa.map(f64::from),
        }
    }
}

impl From<&SensorPayload> for Reading {
    fn from(payload: &SensorPayload) -> Self {
        let pm2_5_atm = average(payload.pm2_5_atm_a, payload.pm2_5_atm_b);
        let pm2_5_cf_1 = average(payload.pm2_5_cf_1_a, payload.pm2_5_cf_1_b);

        let corrected = calc_epa_conversion(pm2_5_cf_1, payload.current_humidity);

        Reading {
            humidity: payload.current_humidity,
            temp_f: payload.current_temp_f,
            pressure: payload.pressure,
            pm2_5_atm,
            pm2_5_atm_aqi: calc_aqi(pm2_5_atm, Category::Pm2_5),
            pm2_5_atm_aqi_epa: calc_aqi(corrected, Category::Pm2_5),
        }
    }
}

/// Mean of the two laser counters, to one decimal place. Ties go to even.
fn average(a: f64, b: f64) -> f64 {
    ((a + b) / 2.0 * 10.0).round_ties_even() / 10.0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Humidity,
    TempF,
    Pressure,
    Pm2_5Atm,
    Pm2_5AtmAqi,
    Pm2_5AtmAqiEpa,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Humidity => "humidity",
            Field::TempF => "temp_f",
            Field::Pressure => "pressure",
            Field::Pm2_5Atm => "pm2_5_atm",
            Field::Pm2_5AtmAqi => "pm2_5_atm_aqi",
            Field::Pm2_5AtmAqiEpa => "pm2_5_atm_aqi_epa",
        };

        f.write_str(name)
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "humidity" => Ok(Field::Humidity),
            "temp_f" => Ok(Field::TempF),
            "pressure" => Ok(Field::Pressure),
            "pm2_5_atm" => Ok(Field::Pm2_5Atm),
            "pm2_5_atm_aqi" => Ok(Field::Pm2_5AtmAqi),
            "pm2_5_atm_aqi_epa" => Ok(Field::Pm2_5AtmAqiEpa),
            other => Err(format!("unknown reading field {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "SensorId": "84:f3:eb:7b:c8:ee",
        "DateTime": "2020/09/12T17:22:44z",
        "Geo": "PurpleAir-c8ee",
        "current_temp_f": 79,
        "current_humidity": 40,
        "current_dewpoint_f": 53,
        "pressure": 1012.42,
        "pm2_5_atm": 20.1,
        "pm2_5_atm_b": 19.9,
        "pm2_5_cf_1": 20.31,
        "pm2_5_cf_1_b": 19.7,
        "pm10_0_atm": 25.5
    }"#;

    #[test]
    fn test_parse_payload() {
        let payload = SensorPayload::from_slice(BODY.as_bytes()).unwrap();

        assert_eq!(payload.sensor_id, "84:f3:eb:7b:c8:ee");
        assert_eq!(payload.current_humidity, 40.0);
        assert_eq!(payload.current_temp_f, 79.0);
        assert_eq!(payload.pressure, 1012.42);
        assert_eq!(payload.pm2_5_atm_a, 20.1);
        assert_eq!(payload.pm2_5_cf_1_b, 19.7);
    }

    #[test]
    fn test_parse_payload_missing_field() {
        let body = r#"{"SensorId": "84:f3:eb:7b:c8:ee", "current_humidity": 40}"#;
        assert!(SensorPayload::from_slice(body.as_bytes()).is_err());
    }

    #[test]
    fn test_reading_from_payload() {
        let payload = SensorPayload::from_slice(BODY.as_bytes()).unwrap();
        let reading = Reading::from(&payload);

        assert_eq!(reading.humidity, 40.0);
        assert_eq!(reading.temp_f, 79.0);
        assert_eq!(reading.pressure, 1012.42);
        assert_eq!(reading.pm2_5_atm, 20.0);
        assert_eq!(reading.pm2_5_atm_aqi, Some(68));
        // cf_1 averages to 20.0, corrected to 12.908
        assert_eq!(reading.pm2_5_atm_aqi_epa, Some(53));
    }

    #[test]
    fn test_reading_epa_aqi() {
        let mut payload = SensorPayload::from_slice(BODY.as_bytes()).unwrap();
        payload.current_humidity = 50.0;
        payload.pm2_5_cf_1_a = 30.0;
        payload.pm2_5_cf_1_b = 30.0;

        let reading = Reading::from(&payload);

        // 0.534 * 30 - 0.0844 * 50 + 5.604 = 17.404
        assert_eq!(reading.pm2_5_atm_aqi_epa, Some(62));
    }

    #[test]
    fn test_average_identical_channels() {
        assert_eq!(average(12.34, 12.34), 12.3);
        assert_eq!(average(7.0, 7.0), 7.0);
        assert_eq!(average(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert_eq!(average(1.0, 2.0), 1.5);
        assert_eq!(average(10.02, 10.16), 10.1);
    }

    #[test]
    fn test_average_ties_go_to_even() {
        assert_eq!(average(0.2, 0.3), 0.2);
        assert_eq!(average(0.5, 1.0), 0.8);
        assert_eq!(average(1.0, 1.5), 1.2);
    }

    #[test]
    fn test_field_lookup() {
        let reading = Reading {
            humidity: 40.0,
            temp_f: 79.0,
            pressure: 1012.42,
            pm2_5_atm: 20.0,
            pm2_5_atm_aqi: Some(68),
            pm2_5_atm_aqi_epa: None,
        };

        assert_eq!(reading.get(Field::Humidity), Some(40.0));
        assert_eq!(reading.get(Field::Pm2_5AtmAqi), Some(68.0));
        assert_eq!(reading.get(Field::Pm2_5AtmAqiEpa), None);
    }

    #[test]
    fn test_field_names() {
        for field in [
            Field::Humidity,
            Field::TempF,
            Field::Pressure,
            Field::Pm2_5Atm,
            Field::Pm2_5AtmAqi,
            Field::Pm2_5AtmAqiEpa,
        ] {
            assert_eq!(Field::from_str(&field.to_string()), Ok(field));
        }

        assert!(Field::from_str("pm10_0_atm").is_err());
    }
}
