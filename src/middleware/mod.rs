//! # Middleware
//!
//! The decorator stages every request passes through, outermost first:
//!
//! 1. panic recovery (`panics`): contains faults from everything inside,
//!    answers 500 with `Connection: close`, keeps the process alive
//! 2. request logging (`logging`): observational only, never short-circuits
//! 3. security headers (`headers`): anti-XSS and anti-framing headers on
//!    every response
//! 4. session binding: the `tower-sessions` layer (configured in `routes`)
//! 5. authentication gate (`auth`): applied only to gated routes
//!
//! The ordering is enforced where the layers are stacked, in
//! `routes::router`. Recovery must stay outermost so it sees panics from
//! every later stage, and the header stage must run on every response path.

pub mod auth;
pub mod headers;
pub mod logging;
pub mod panics;
