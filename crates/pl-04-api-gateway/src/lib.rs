//! # API Gateway
//!
//! HTTP/JSON interface of a procurement ledger node: the contract workflow
//! for clients, the peer endpoints other nodes call, and Prometheus metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        API GATEWAY (pl-04)                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   /api/contracts/*   /api/workflow/*   /api/p2p/*   /metrics      │
//! │            │                 │               │          │         │
//! │   ┌────────┴─────────────────┴───────────────┴──────────┘         │
//! │   │  Middleware: CORS → TraceLayer                                │
//! │   └────────┬─────────────────────────────┬──────────────          │
//! │            ▼                             ▼                        │
//! │     dyn WorkflowApi (pl-02)        dyn SyncApi (pl-03)            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/api/health` | liveness, node id, block and contract counts |
//! | GET | `/api/blocks`, `/api/stats` | chain statistics |
//! | GET/POST | `/api/contracts` | list / create (201, broadcast) |
//! | GET | `/api/workflow/steps` | step template |
//! | GET | `/api/contracts/:id/workflow` | workflow status |
//! | POST | `/api/contracts/:id/validate-step` | approve or reject (broadcast) |
//! | POST | `/api/contracts/:id/audit` | audit observation (broadcast) |
//! | GET | `/api/contracts/by-status/:status` | filter by status |
//! | GET | `/api/contracts/by-role/:role` | filter by role |
//! | GET | `/api/p2p/peers` | active peers |
//! | POST | `/api/p2p/add-peer` | register a peer |
//! | GET | `/api/p2p/get-chain` | full chain snapshot |
//! | POST | `/api/p2p/receive-block` | accept a pushed block |
//! | POST | `/api/p2p/sync` | longest-valid-chain sync round |
//! | GET | `/metrics` | Prometheus text format |
//!
//! Errors are `{"error": "<message>"}` with the status listed in
//! [`domain::error`].

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod service;


pub use domain::config::{CorsConfig, GatewayConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;
