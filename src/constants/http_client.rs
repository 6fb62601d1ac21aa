/// Default HTTP client connection timeout in seconds.
/// Maximum time to wait for establishing a connection.
pub const DEFAULT_HTTP_CLIENT_CONNECT_TIMEOUT_SECONDS: u64 = 5;

/// Default overall timeout for Horizon requests, in seconds.
/// Does not apply to event streams, which stay open indefinitely.
pub const DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS: u64 = 30;

/// Default maximum number of idle connections per host in the connection pool.
pub const DEFAULT_HTTP_CLIENT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default TCP keepalive interval in seconds.
pub const DEFAULT_HTTP_CLIENT_TCP_KEEPALIVE_SECONDS: u64 = 30;
