pub mod gateway;
pub mod session;

pub use gateway::{ApiGateway, Credential, LoginOutcome};
pub use session::{Session, SessionStore};
