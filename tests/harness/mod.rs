// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for guestbook abuse simulation.
//!
//! Generators produce sender pools and spam payloads; the tally records
//! what the pipeline decided for each submission.

pub mod generators;
pub mod metrics;
