// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Advo workspace: a mock completion client and a
//! full engine harness over a temp SQLite database.

pub mod harness;
pub mod mock_client;

pub use advo_engine::VisitorInfo;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_client::MockCompletionClient;
