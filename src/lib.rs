//! # Structural Patterns
//!
//! Three small, independent demonstrations of classic design patterns:
//!
//! - [`flyweight`]: a registry sharing one immutable map element per kind
//! - [`facade`]: a game engine front for render, physics and audio subsystems
//! - [`proxy`]: a caching proxy in front of a data server
//!
//! [`demo::run`] drives all three and writes the transcript. Run it with:
//! ```bash
//! cargo run
//! cargo run -- demo.toml
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod facade;
pub mod flyweight;
pub mod logging;
pub mod proxy;

pub use config::DemoConfig;
pub use error::{ConfigError, DemoError};
pub use facade::GameEngineFacade;
pub use flyweight::{FlyweightRegistry, MapElement, MapElementKind};
pub use proxy::{ConnectPolicy, ProxyServer, RealServer, Server};
