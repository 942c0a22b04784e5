use crate::{Result, TestInfraError};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

const CONNECT_ATTEMPTS: u32 = 20;
const CONNECT_BACKOFF: Duration = Duration::from_millis(250);

/// A throwaway Redis server. The container stops when this is dropped.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    pub async fn start() -> Result<Self> {
        let container = GenericImage::new("redis", "8.6.0")
            .with_exposed_port(6379_u16.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;
        Ok(Self { container })
    }

    pub async fn host(&self) -> Result<String> {
        let host = self.container.get_host().await?.to_string();

        match host.as_str() {
            "localhost" => Ok(String::from("127.0.0.1")),
            _ => Ok(host),
        }
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(6379).await?)
    }

    pub async fn url(&self) -> Result<String> {
        Ok(format!("redis://{}:{}", self.host().await?, self.port().await?))
    }

    /// Opens a connection, retrying while the server finishes starting.
    pub async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        connect_with_retry(&self.url().await?, CONNECT_ATTEMPTS, CONNECT_BACKOFF).await
    }
}

async fn connect_with_retry(
    url: &str,
    attempts: u32,
    backoff: Duration,
) -> Result<redis::aio::MultiplexedConnection> {
    let client = redis::Client::open(url).map_err(TestInfraError::InvalidUrl)?;
    let mut attempt = 1;

    loop {
        match client.get_multiplexed_async_connection().await {
            Ok(conn) => return Ok(conn),
            Err(last) if attempt >= attempts => {
                return Err(TestInfraError::ConnectRetriesExhausted {
                    attempts: attempt,
                    last,
                });
            }
            Err(_) => {
                attempt += 1;
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
