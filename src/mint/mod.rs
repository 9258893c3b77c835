// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Mint submission
//!
//! [`MintMode`] and [`MintCallBuilder`] shape the contract call,
//! [`PreflightValidator`] checks the identity can pay for it, and
//! [`MintOrchestrator`] submits, waits and retries. [`run_identities`] drives
//! a list of keys one after another.

mod identity;
mod mode;
mod orchestrator;
mod preflight;

pub use identity::{key_hint, load_key_file, parse_keys, SigningIdentity};
pub use mode::{
    AuxArgs, CallIntent, CallOutcome, GasFee, GuaranteedArgs, MerkleProof, MintCall,
    MintCallBuilder, MintMode, MintModeKind, Overrides, SignatureArgs,
};
pub use orchestrator::{
    run_identities, AttemptOutcome, IdentityRun, MintOrchestrator, MintReport, MintState,
};
pub use preflight::{resolve_fee, resolve_gas_limit, PreflightReport, PreflightValidator};
