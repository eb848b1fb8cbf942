pub mod app;
pub mod health;
pub mod logging;
pub mod response;
pub mod server;

pub use app::AppBuilder;
pub use health::health_check;
pub use logging::{
    LogFormat, LoggingConfig, REQUEST_ID_HEADER, RequestId, init_logging,
    structured_logging_middleware,
};
pub use response::{ApiResponse, HealthResponse};
pub use server::{AppConfig, ConfigError, Server, ServerConfig};
