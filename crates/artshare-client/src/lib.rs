pub mod config;
pub mod cookies;
pub mod transport;

pub use config::{ApiConfig, ENV_API_URL};
pub use cookies::SessionCookieJar;
pub use transport::{ClientError, ReqwestTransport};
