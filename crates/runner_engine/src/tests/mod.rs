//! End-to-end session scenarios
