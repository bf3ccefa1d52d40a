use std::time::Duration;

use async_trait::async_trait;
use chipp_http::{HttpClient, NoInterceptor};
use log::{debug, trace};
use tokio::time::timeout;

use crate::{Result, SensorPayload};

pub fn local_url(host: &str) -> String {
    format!("http://{host}/json")
}

#[async_trait]
pub trait SensorApi: Send + Sync {
    async fn fetch(&self, host: &str) -> Result<SensorPayload>;

    /// One-off connectivity check returning the id the sensor reports.
    async fn identify(&self, host: &str) -> Result<String> {
        let payload = self.fetch(host).await?;
        Ok(payload.sensor_id)
    }
}

pub struct Client {
    http_client: HttpClient<NoInterceptor>,
    timeout: Duration,
}

impl Client {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::new("http://0.0.0.0")?;

        Ok(Self {
            http_client,
            timeout,
        })
    }
}

#[async_trait]
impl SensorApi for Client {
    async fn fetch(&self, host: &str) -> Result<SensorPayload> {
        let url = local_url(host);
        debug!("fetch url: {url}");

        let request = self.http_client.new_request_with_url(url)?;

        let response = self.http_client.perform_request(request, |req, res| {
            if res.status_code == 200 {
                Ok(res.body)
            } else {
                Err((req, res).into())
            }
        });

        let body = timeout(self.timeout, response).await??;
        trace!("response: {}", String::from_utf8_lossy(&body));

        Ok(SensorPayload::from_slice(&body)?)
    }
}
