// routerclients-api: Async wire clients for home router management surfaces
//
// Two transports are covered: the router's local web management API
// (`web`) and an interactive SSH command session (`ssh`). Neither knows
// anything about interfaces or clients as a domain concept -- they move
// bytes, status codes and exit statuses. `routerclients-core` turns
// those into snapshots.

pub mod error;
pub mod shell;
pub mod ssh;
pub mod transport;
pub mod web;

pub use error::Error;
pub use shell::{CommandOutput, CommandShell};
pub use ssh::{SshAuth, SshSession, SshTarget};
pub use transport::{TlsMode, TransportConfig};
pub use web::{AsusWebClient, ClientRecord, SessionToken};
