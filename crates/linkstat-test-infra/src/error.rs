use thiserror::Error;

/// Failures while bringing up a throwaway Redis server for a test.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to run redis container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("invalid redis url: {0}")]
    InvalidUrl(#[source] redis::RedisError),

    #[error("redis did not accept connections after {attempts} attempts: {last}")]
    ConnectRetriesExhausted {
        attempts: u32,
        #[source]
        last: redis::RedisError,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
