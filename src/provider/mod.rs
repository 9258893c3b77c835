// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Endpoint configuration and the failover endpoint pool
//!
//! - [`PoolConfig`] and [`Endpoint`] describe the configured RPC endpoints
//! - [`EndpointPool`] builds the failover client and the providers over it

mod endpoint;
mod pool;

pub use endpoint::{Endpoint, PoolConfig};
pub use pool::EndpointPool;
