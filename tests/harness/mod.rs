// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for hostile-input and flood simulation.
//!
//! Provides payload corpora, flood patterns and outcome tallies used to
//! check that the sanitizer and rate limiter hold up under abuse.

pub mod attacks;
pub mod generators;
pub mod metrics;
