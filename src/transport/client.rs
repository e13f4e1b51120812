use std::sync::LazyLock;
use std::time::Duration;

/// Shared HTTP client for push-gateway and webhook delivery
///
/// Initialized lazily on first access and reused for every HTTP-based
/// delivery, so connections to the same gateway are pooled across records.
///
/// # Features
/// - **Timeouts**: 30s request timeout, 10s connect timeout (webhook records
///   may override the request timeout per target)
/// - **Compression**: gzip, deflate, brotli and zstd responses
/// - **TLS**: rustls, no OpenSSL dependency
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(concat!("notify-rs/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client")
});
