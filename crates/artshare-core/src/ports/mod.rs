pub mod navigator;
pub mod progress;
pub mod session_storage;
pub mod transport;

pub use navigator::{Navigator, NoopNavigator};
pub use progress::{UploadProgress, percent};
pub use session_storage::{MemorySessionStorage, SessionStorage, StorageError};
pub use transport::{
  ApiRequest, ApiResponse, FormField, FormValue, HttpTransport, Method, RequestBody, TransportError,
};
