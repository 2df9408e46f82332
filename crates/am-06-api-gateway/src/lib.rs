//! # API Gateway (Subsystem 6)
//!
//! REST surface over the lifecycle and query subsystems.
//!
//! ## Responsibilities
//!
//! - Map routes onto [`AuditLifecycleApi`](am_03_lifecycle::AuditLifecycleApi)
//!   and [`MarketplaceQueryApi`](am_04_projection::MarketplaceQueryApi)
//! - Wrap every response in the `{ success, data?, error? }` envelope
//! - Translate subsystem errors to HTTP status codes
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | GW-1 | Failures answer `success: false` with a message | `domain/error.rs` |
//! | GW-2 | Degraded queries answer 200 with data and an error | `handlers/queries.rs` |
//! | GW-3 | Malformed JSON or query strings answer 400 | `extract.rs` |
//! | GW-4 | Bodies above `max_body_bytes` are refused | `router.rs` |
//!
//! ## Routes
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/api/estimate` | analyzer + estimator |
//! | POST | `/api/audits` | submit a request |
//! | GET | `/api/audits/:id` | fetch a request |
//! | POST | `/api/audits/:id/accept` | claim a request |
//! | POST | `/api/audits/:id/cancel` | withdraw a request |
//! | GET, POST | `/api/audits/:id/findings` | list or record findings |
//! | PUT, DELETE | `/api/findings/:id` | edit or remove a finding |
//! | POST | `/api/owners/:id/start` | begin work |
//! | POST | `/api/owners/:id/results` | complete with evidence |
//! | GET | `/api/marketplace` | visibility-filtered listing |
//! | GET | `/api/dashboard/developer/:wallet` | developer dashboard |
//! | GET | `/api/dashboard/auditor/:wallet` | auditor dashboard |
//! | POST | `/api/developers/:wallet/refresh` | recompute a profile |
//! | GET | `/api/verify/:id` | certificate verification |
//! | GET | `/api/stats` | marketplace statistics |
//! | GET | `/health` | backend reachability |

#![warn(clippy::all)]

pub mod domain;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApiError, ApiResponse, ConfigError, GatewayConfig, GatewayError};
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;
