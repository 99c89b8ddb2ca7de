//! # Routerscope
//!
//! Async SSH session manager and output parser for OpenWrt router
//! diagnostics.
//!
//! Routerscope keeps a registry of authenticated router sessions, runs
//! diagnostic commands against them, and turns the loosely structured text
//! those commands print into typed results. It is meant to sit behind an
//! HTTP API that dispatches requests and serializes the results.
//!
//! ## Features
//!
//! - Async SSH connections via russh, one `exec` channel per command
//! - Per-session command serialization with hard timeouts
//! - Total output parsers: malformed input degrades to defaults, never errors
//! - Read-only diagnostics that degrade per field, firewall changes that
//!   report real failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routerscope::{RouterManager, RouterTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), routerscope::Error> {
//!     let manager = RouterManager::builder().build()?;
//!
//!     let connection = manager
//!         .connect(RouterTarget::new("192.168.1.1", "root", "secret"))
//!         .await?;
//!     let id = connection.connection_id.to_string();
//!
//!     let stats = manager.stats(&id).await?;
//!     println!("cpu {}% mem {}% disk {}%", stats.cpu, stats.memory, stats.storage);
//!
//!     manager.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod diagnostics;
pub mod error;
pub mod manager;
pub mod parse;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use diagnostics::{AuditFinding, AuditStatus, MacAddress, RouterConfig, RouterInfo, SystemStats};
pub use error::{CommandError, Error, Result, TransportError};
pub use manager::{Connection, Health, ManagerBuilder, RouterManager, RouterTarget};
pub use parse::{Device, DeviceStatus};
pub use session::{Session, SessionId, SessionRegistry, SessionSummary};
pub use transport::{AuthMethod, CommandResult, Connector, HostKeyVerification, SshConfig, Transport};
