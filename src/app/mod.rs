//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies and builds match engines
//! wired to them, following hexagonal architecture principles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │        App (DI Container)            │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                       │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Infrastructure (adapters)           │   │
//! │  │  - JsonFileLedger                    │   │
//! │  │  - InMemoryLedger (testing)          │   │
//! │  │  - LedgerObserver                    │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                 │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - PointsLedger, MatchObserver       │   │
//! │  │  - Opponent                          │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                    │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - MatchEngine                       │   │
//! │  │  - PopupScheduler                    │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use xo_break::app::App;
//! use xo_break::adapters::InMemoryLedger;
//! use xo_break::engine::EngineConfig;
//! use xo_break::types::UserId;
//!
//! let app = App::for_testing()
//!     .with_ledger(InMemoryLedger::new())
//!     .with_default_seed(42)
//!     .build();
//! let mut engine = app.create_engine(EngineConfig::new(), &UserId::new("ada"))?;
//! engine.open(30)?;
//! # Ok::<(), xo_break::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{DEFAULT_USER_NAME, Settings};
pub use container::{App, AppBuilder, DEFAULT_LEDGER_PATH};
