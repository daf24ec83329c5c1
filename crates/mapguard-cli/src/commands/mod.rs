// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod check;
