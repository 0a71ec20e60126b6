//! Tests for the user account service
