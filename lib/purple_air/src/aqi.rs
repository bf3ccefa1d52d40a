//! Conversion of particulate concentrations into EPA Air Quality Index values.

use std::fmt;
use std::str::FromStr;

use log::debug;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Breakpoint {
    pub pm_low: f64,
    pub pm_high: f64,
    pub aqi_low: u16,
    pub aqi_high: u16,
}

const fn bp(pm_low: f64, pm_high: f64, aqi_low: u16, aqi_high: u16) -> Breakpoint {
    Breakpoint {
        pm_low,
        pm_high,
        aqi_low,
        aqi_high,
    }
}

const PM2_5_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 12.0, 0, 50),
    bp(12.1, 35.4, 51, 100),
    bp(35.5, 55.4, 101, 150),
    bp(55.5, 150.4, 151, 200),
    bp(150.5, 250.4, 201, 300),
    bp(250.5, 350.4, 301, 400),
    bp(350.5, 500.4, 401, 500),
];

const PM10_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 54.0, 0, 50),
    bp(55.0, 154.0, 51, 100),
    bp(155.0, 254.0, 101, 150),
    bp(255.0, 354.0, 151, 200),
    bp(355.0, 424.0, 201, 300),
    bp(425.0, 504.0, 301, 400),
    bp(505.0, 604.0, 401, 500),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Pm2_5,
    Pm10,
}

impl Category {
    pub fn breakpoints(self) -> &'static [Breakpoint] {
        match self {
            Category::Pm2_5 => &PM2_5_BREAKPOINTS,
            Category::Pm10 => &PM10_BREAKPOINTS,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Pm2_5 => write!(f, "pm2_5"),
            Category::Pm10 => write!(f, "pm10"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown AQI category {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pm2_5" => Ok(Category::Pm2_5),
            "pm10" => Ok(Category::Pm10),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Linear interpolation against the first breakpoint whose inclusive range
/// contains `value`. Rounds half away from zero.
pub fn calc_aqi(value: f64, category: Category) -> Option<u16> {
    let aqi = interpolate(value, category.breakpoints());

    if aqi.is_none() {
        debug!("value {value} did not fall in valid range for type {category}");
    }

    aqi
}

pub fn calc_aqi_by_key(value: f64, key: &str) -> Option<u16> {
    match Category::from_str(key) {
        Ok(category) => calc_aqi(value, category),
        Err(_) => {
            debug!("calc_aqi requested for unknown type: {key}");
            None
        }
    }
}

fn interpolate(value: f64, breakpoints: &[Breakpoint]) -> Option<u16> {
    let bp = breakpoints
        .iter()
        .find(|bp| value >= bp.pm_low && value <= bp.pm_high)?;

    let aqi_range = f64::from(bp.aqi_high - bp.aqi_low);
    let pm_range = bp.pm_high - bp.pm_low;
    let c = value - bp.pm_low;

    let aqi = (aqi_range / pm_range) * c + f64::from(bp.aqi_low);

    Some(aqi.round() as u16)
}

/// EPA correction of PurpleAir PM2.5 (CF=1) data using relative humidity.
///
/// Below 2 µg/m³ the correction is unstable, so the value passes through.
/// The result is floored at zero since a very low concentration combined
/// with a very high humidity yields negative numbers.
pub fn calc_epa_conversion(pm: f64, rh: f64) -> f64 {
    if pm < 2.0 {
        return pm;
    }

    f64::max(0.0, 0.534 * pm - 0.0844 * rh + 5.604)
}
