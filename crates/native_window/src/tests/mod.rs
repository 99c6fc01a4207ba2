//! Scenario tests that drive the whole window lifecycle through the headless backend
