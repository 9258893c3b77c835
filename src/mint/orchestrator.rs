// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Submit, wait, classify, retry
//!
//! One [`MintOrchestrator`] drives one signing identity through the state
//! machine below. Operations run strictly one after another; nothing is in
//! flight concurrently for the same identity.
//!
//! ```text
//! Preflight ──infeasible──▶ Stopped
//!     │
//!     ▼
//! Submitting ──error──▶ TransportFailed ──retry──▶ Submitting
//!     │                       │
//!     ▼                       └──no retry──▶ Stopped
//! AwaitingConfirmation ──error──▶ TransportFailed
//!     │
//!     ├──status 0──▶ Reverted ──retry──▶ Submitting
//!     │                 └──no retry──▶ Stopped
//!     ▼
//! Confirmed
//! ```

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, TxHash};
use serde::Serialize;
use tracing::{debug, error, info, warn, Instrument};

use super::identity::{key_hint, SigningIdentity};
use super::mode::{MintCallBuilder, Overrides};
use super::preflight::{PreflightReport, PreflightValidator};
use crate::chain::ChainClient;
use crate::config::constants::timing::INTER_IDENTITY_PAUSE;
use crate::config::{MintConfig, RetryPolicy};
use crate::errors::{ChainError, MintError};
use crate::explorer::tx_explorer_link;
use crate::spans;
use crate::types::wei::WeiAmount;

/// States of a mint run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MintState {
    /// Checking balance against value plus gas
    Preflight,
    /// Broadcasting the call
    Submitting,
    /// Waiting for the receipt
    AwaitingConfirmation,
    /// Receipt reported success
    Confirmed,
    /// Receipt reported on-chain failure
    Reverted,
    /// Broadcast or receipt wait failed
    TransportFailed,
    /// Given up
    Stopped,
}

impl MintState {
    /// Whether the run ends in this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, MintState::Confirmed | MintState::Stopped)
    }
}

impl fmt::Display for MintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintState::Preflight => "preflight",
            MintState::Submitting => "submitting",
            MintState::AwaitingConfirmation => "awaiting_confirmation",
            MintState::Confirmed => "confirmed",
            MintState::Reverted => "reverted",
            MintState::TransportFailed => "transport_failed",
            MintState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Result of one submit-and-wait attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Mined with success status
    Confirmed(TxHash),
    /// Mined with failure status
    Reverted(TxHash),
    /// Failed before or while broadcasting, or while waiting
    TransportError(ChainError),
}

/// What happened to one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintReport {
    /// Signing address
    pub identity: Address,
    /// `Confirmed` or `Stopped`
    pub final_state: MintState,
    /// Submission attempts made
    pub attempts: u32,
    /// Last broadcast transaction
    pub tx_hash: Option<TxHash>,
    /// Explorer link for a confirmed transaction
    pub explorer_link: Option<String>,
    /// Text of the last failure
    pub last_error: Option<String>,
    /// Preflight result, when preflight completed
    pub preflight: Option<PreflightReport>,
}

impl MintReport {
    fn new(identity: Address) -> Self {
        Self {
            identity,
            final_state: MintState::Preflight,
            attempts: 0,
            tx_hash: None,
            explorer_link: None,
            last_error: None,
            preflight: None,
        }
    }

    /// Whether the mint was confirmed
    pub fn is_confirmed(&self) -> bool {
        self.final_state == MintState::Confirmed
    }
}

/// Drives one identity from preflight to a terminal state
pub struct MintOrchestrator {
    client: Arc<dyn ChainClient>,
    builder: MintCallBuilder,
    identity: Address,
    contract: Address,
    amount: u64,
    price: WeiAmount,
    value: WeiAmount,
    gas_limit: Option<u64>,
    retry: RetryPolicy,
    rpc_urls: String,
    chain_id: Option<u64>,
}

impl MintOrchestrator {
    /// Orchestrator for `identity` using `client` to sign and send
    pub fn new(client: Arc<dyn ChainClient>, config: &MintConfig, identity: Address) -> Self {
        let rpc_urls = config
            .pool
            .endpoints()
            .iter()
            .map(|endpoint| endpoint.url().as_str())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            client,
            builder: MintCallBuilder::new(
                identity,
                config.contract,
                config.function_name.clone(),
                config.amount,
                config.mode.clone(),
            ),
            identity,
            contract: config.contract,
            amount: config.amount,
            price: config.price,
            value: config.value(),
            gas_limit: config.gas_limit,
            retry: config.retry,
            rpc_urls,
            chain_id: config.pool.chain_id(),
        }
    }

    /// Read-only affordability check; sends nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::Chain`] if the balance or fee data cannot be read
    pub async fn preflight(&self) -> Result<PreflightReport, MintError> {
        let report = PreflightValidator::new(Arc::clone(&self.client))
            .validate(&self.builder, self.identity, self.value, self.gas_limit)
            .await?;
        Ok(report)
    }

    /// Run the state machine to `Confirmed` or `Stopped`.
    ///
    /// Never fails: every failure ends in `Stopped` with `last_error` set.
    pub async fn run(&self) -> MintReport {
        let kind = self.builder.mode().kind();
        async {
            let mut report = MintReport::new(self.identity);
            let mut overrides = Overrides::new(self.value);
            let mut outcome: Option<AttemptOutcome> = None;
            let mut state = MintState::Preflight;

            while !state.is_terminal() {
                let next = match state {
                    MintState::Preflight => match self.preflight().await {
                        Ok(preflight) if preflight.feasible => {
                            overrides = preflight.submission_overrides();
                            report.preflight = Some(preflight);
                            MintState::Submitting
                        }
                        Ok(preflight) => {
                            let e = MintError::insufficient_funds(
                                preflight.required_total,
                                preflight.balance,
                            );
                            error!(error = %e, "Preflight failed, not submitting");
                            report.preflight = Some(preflight);
                            report.last_error = Some(e.to_string());
                            MintState::Stopped
                        }
                        Err(e) => {
                            error!(error = %e, "Preflight could not complete");
                            report.last_error = Some(e.to_string());
                            MintState::Stopped
                        }
                    },

                    MintState::Submitting => {
                        report.attempts += 1;
                        info!(
                            identity = %self.identity,
                            mode = %kind,
                            amount = self.amount,
                            price = %self.price,
                            attempt = report.attempts,
                            "Submitting mint"
                        );
                        match self
                            .builder
                            .submit(self.client.as_ref(), &overrides)
                            .instrument(spans::mint_attempt(report.attempts))
                            .await
                        {
                            Ok(tx_hash) => {
                                info!(%tx_hash, "Transaction broadcast");
                                report.tx_hash = Some(tx_hash);
                                MintState::AwaitingConfirmation
                            }
                            Err(e) => {
                                outcome = Some(AttemptOutcome::TransportError(e));
                                MintState::TransportFailed
                            }
                        }
                    }

                    MintState::AwaitingConfirmation => match report.tx_hash {
                        Some(tx_hash) => match self
                            .client
                            .wait_for_receipt(tx_hash)
                            .instrument(spans::mint_attempt(report.attempts))
                            .await
                        {
                            Ok(true) => {
                                outcome = Some(AttemptOutcome::Confirmed(tx_hash));
                                MintState::Confirmed
                            }
                            Ok(false) => {
                                outcome = Some(AttemptOutcome::Reverted(tx_hash));
                                MintState::Reverted
                            }
                            Err(e) => {
                                outcome = Some(AttemptOutcome::TransportError(e));
                                MintState::TransportFailed
                            }
                        },
                        None => MintState::Submitting,
                    },

                    MintState::Reverted | MintState::TransportFailed => {
                        let failure = outcome.take();
                        if let Some(message) = failure.as_ref().and_then(failure_text) {
                            warn!(error = %message, attempt = report.attempts, "Attempt failed");
                            report.last_error = Some(message);
                        }
                        let retry = failure
                            .as_ref()
                            .is_some_and(|failure| self.retry.allows_retry(failure, report.attempts));
                        if retry {
                            debug!(delay_ms = self.retry.retry_delay.as_millis() as u64, "Retrying");
                            tokio::time::sleep(self.retry.retry_delay).await;
                            MintState::Submitting
                        } else {
                            MintState::Stopped
                        }
                    }

                    MintState::Confirmed | MintState::Stopped => state,
                };

                debug!(from = %state, to = %next, "State transition");
                state = next;
            }

            if state == MintState::Confirmed {
                report.last_error = None;
                report.explorer_link = report
                    .tx_hash
                    .and_then(|tx_hash| tx_explorer_link(&self.rpc_urls, self.chain_id, tx_hash));
                info!(
                    tx_hash = ?report.tx_hash,
                    explorer = report.explorer_link.as_deref().unwrap_or("-"),
                    "Mint confirmed"
                );
            }
            report.final_state = state;
            report
        }
        .instrument(spans::mint_identity(self.identity, self.contract, kind))
        .await
    }
}

fn failure_text(outcome: &AttemptOutcome) -> Option<String> {
    match outcome {
        AttemptOutcome::Confirmed(_) => None,
        AttemptOutcome::Reverted(tx_hash) => Some(format!("Transaction {tx_hash} reverted")),
        AttemptOutcome::TransportError(e) => Some(e.to_string()),
    }
}

/// Outcome for one key of a multi-identity run
#[derive(Debug)]
pub struct IdentityRun {
    /// Masked key
    pub key_hint: String,
    /// The report, or why the identity could not start
    pub result: Result<MintReport, MintError>,
}

/// Run every key in order, one at a time, with a short pause between keys.
///
/// A failing key never stops the others. `client_for` builds the signing
/// client for each valid identity.
pub async fn run_identities<F>(
    keys: &[String],
    config: &MintConfig,
    mut client_for: F,
) -> Vec<IdentityRun>
where
    F: FnMut(&SigningIdentity) -> Arc<dyn ChainClient>,
{
    let mut runs = Vec::with_capacity(keys.len());

    for (index, key) in keys.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(INTER_IDENTITY_PAUSE).await;
        }

        let hint = key_hint(key);
        let result = match SigningIdentity::from_hex(key) {
            Ok(identity) => {
                info!(index, identity = %identity.address(), "Processing identity");
                let client = client_for(&identity);
                Ok(MintOrchestrator::new(client, config, identity.address())
                    .run()
                    .await)
            }
            Err(e) => {
                error!(index, key = %hint, error = %e, "Skipping identity");
                Err(MintError::from(e))
            }
        };

        runs.push(IdentityRun {
            key_hint: hint,
            result,
        });
    }

    runs
}
