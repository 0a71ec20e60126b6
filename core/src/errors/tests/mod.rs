//! Tests for the error model
