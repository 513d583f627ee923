//! # Retail Service Library
//!
//! Shares one [`retail_core::Store`] between callers, loads configuration
//! and sets up logging. All business rules live in `retail-core`.
//!
//! ## Module Organization
//! ```text
//! retail_service/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── config.rs       ◄─── ServiceConfig (defaults, retail.toml, RETAIL_*)
//! ├── error.rs        ◄─── ServiceError / ErrorCode / ConfigError
//! ├── service.rs      ◄─── RetailService (every store operation, logged)
//! ├── state.rs        ◄─── SharedStore (Arc<Mutex<Store>>)
//! ├── telemetry.rs    ◄─── tracing subscriber setup
//! └── bin/demo.rs     ◄─── retail-demo binary
//! ```
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Service Startup                                      │
//! │                                                                         │
//! │  ServiceConfig::load(path) ──► telemetry::init_tracing(filter)          │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  RetailService::new(config) ──► SharedStore::new(config.to_limits())    │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  service.clone() per caller; all clones see the same store              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use retail_core::{ItemSelection, Money};
//! use retail_service::{RetailService, ServiceConfig};
//!
//! let service = RetailService::new(ServiceConfig::default());
//! service.add_item("Widget", Money::from_cents(999), 5, "Tools").unwrap();
//! service.create_member("Ann").unwrap();
//!
//! let receipt = service.checkout("Ann", &[ItemSelection::new("Widget", 2)]).unwrap();
//! assert_eq!(receipt.total, Money::from_cents(1998));
//! assert_eq!(service.search_item("Widget").unwrap().stock, 3);
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::ServiceConfig;
pub use error::{ConfigError, ErrorCode, ServiceError, ServiceResult};
pub use service::RetailService;
pub use state::SharedStore;
