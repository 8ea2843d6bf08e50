//! Unit tests for e-mail module
