use crate::error::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

const IMAGE: &str = "redis";
const TAG: &str = "8.6.0";
const PORT: u16 = 6379;

/// A standalone Redis server running in a container.
///
/// The container is removed when this value is dropped.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    /// Starts a Redis server without authentication.
    pub async fn start() -> Result<Self> {
        let container = GenericImage::new(IMAGE, TAG)
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;
        Ok(Self { container })
    }

    /// Starts a Redis server that requires `password`.
    pub async fn start_with_password(password: &str) -> Result<Self> {
        let container = GenericImage::new(IMAGE, TAG)
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .with_cmd(vec![
                "redis-server".to_string(),
                "--requirepass".to_string(),
                password.to_string(),
            ])
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
        Ok(self.container.get_host_port_ipv4(PORT).await?)
    }

    /// Returns `host:port` as seen from the test process.
    pub async fn address(&self) -> Result<String> {
        Ok(format!("{}:{}", self.host().await?, self.port().await?))
    }
}
