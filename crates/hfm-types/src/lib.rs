//! Core types for HFM.
//!
//! Foundation crate for the HFM (Hierarchical Free Monads) workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Foundation Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  hfm-types   : AlgebraId, RunId, ErrorCode, TryNew  ◄── HERE │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Engine Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  hfm-engine  : Algebra, Program, Registry, Engine, Config   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Language / Frontend Layer                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  hfm-kitchen : Sandwich, Pizza, CookingMachine languages    │
//! │  hfm-cli     : Command-line runner                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use hfm_types::{AlgebraId, RunId};
//!
//! let sandwich = AlgebraId::new("sandwich");
//! assert_eq!(sandwich.to_string(), "algebra:sandwich");
//!
//! let run = RunId::new();
//! assert_ne!(run, RunId::new());
//! ```

mod construct;
mod error;
mod id;

pub use construct::TryNew;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{AlgebraId, RunId};
