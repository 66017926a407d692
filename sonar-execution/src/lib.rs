// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generate generic test execution reports in Rust.
//!
//! The generic execution format groups test cases by the source file that declares them. Each
//! test case is either a success (a bare `testCase` element), a failure or a skip:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <testExecutions version="1">
//!     <file path="test/math.spec.js">
//!         <testCase name="Math adds" duration="5"/>
//!     </file>
//! </testExecutions>
//! ```

mod errors;
mod report;
mod serialize;

pub use errors::*;
pub use report::*;
