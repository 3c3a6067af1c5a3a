//! Backend implementations for the render module
//!
//! The headless backend keeps every resource in host memory and records the
//! calls made against it. It backs the demo binary and the test suites.

/// Host-memory backend that records resource traffic
pub mod headless;

pub use headless::HeadlessBackend;
