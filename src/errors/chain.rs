// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while talking to the chain through the endpoint pool.
//!
//! A [`ChainError`] always remembers which operation failed and whether the
//! failure text looks like contract logic rejecting the call (revert-class) or
//! like the transport giving up (everything else).

/// Phrases that mark an error message as revert-class.
///
/// Matching is case-insensitive, so `CALL_EXCEPTION` is covered by
/// `call_exception`.
const REVERT_PHRASES: &[&str] = &["revert", "execution reverted", "call_exception"];

/// Coarse classification of a chain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainErrorClass {
    /// The network answered, and contract logic rejected the call.
    Revert,
    /// Endpoint unreachable, timed out, malformed response, nonce or gas issue.
    Transport,
}

impl ChainErrorClass {
    /// Classify an error message by matching known revert phrases.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mintrelay::ChainErrorClass;
    ///
    /// assert_eq!(
    ///     ChainErrorClass::from_message("server returned an error response: execution reverted: Sold out"),
    ///     ChainErrorClass::Revert
    /// );
    /// assert_eq!(
    ///     ChainErrorClass::from_message("error sending request: connection refused"),
    ///     ChainErrorClass::Transport
    /// );
    /// ```
    pub fn from_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if REVERT_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            ChainErrorClass::Revert
        } else {
            ChainErrorClass::Transport
        }
    }
}

/// Errors that can occur during chain reads, estimates, broadcasts and receipt waits.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The call failed. `class` tells revert-class failures apart from transport failures.
    #[error("{operation} failed: {message}")]
    CallFailed {
        /// Description of the operation that failed (e.g. "eth_estimateGas")
        operation: String,
        /// Rendered error text, used for classification and reporting
        message: String,
        /// Revert or transport
        class: ChainErrorClass,
        /// The underlying provider error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ChainError {
    /// Wrap a provider error, classifying it from its rendered message.
    pub fn call_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        let message = source.to_string();
        ChainError::CallFailed {
            operation: operation.into(),
            class: ChainErrorClass::from_message(&message),
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Build a failure from a bare message, classifying it.
    pub fn from_message(operation: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        ChainError::CallFailed {
            operation: operation.into(),
            class: ChainErrorClass::from_message(&message),
            message,
            source: None,
        }
    }

    /// Classification of this failure
    pub fn class(&self) -> ChainErrorClass {
        match self {
            ChainError::CallFailed { class, .. } => *class,
        }
    }

    /// Whether this failure is revert-class.
    pub fn is_revert(&self) -> bool {
        self.class() == ChainErrorClass::Revert
    }
}
