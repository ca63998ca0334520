pub mod config;
pub mod credentials;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_paths};
pub use credentials::{load_credentials, load_dotenv, CredentialsError, DotenvStatus};
pub use wiring::{wire_app, AppRuntime};
