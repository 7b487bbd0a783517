//! # EdgeGuard Test Suite
//!
//! Unified test crate for cross-crate scenarios:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── admission_flows.rs   # End-to-end pipeline behavior
//!     ├── config_env.rs        # Environment override loading
//!     ├── stage_ordering.rs    # Drop attribution across the six orders
//!     ├── energy.rs            # Conservation and exhaustion accounting
//!     └── membership_bounds.rs # Probabilistic-structure behavior under load
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p eg-tests
//!
//! # By category
//! cargo test -p eg-tests integration::stage_ordering
//! ```

#![allow(dead_code)]

pub mod integration;
