// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Update-then-reconcile wrapper for locally edited entities.

use std::future::Future;

use crate::error::AppError;

/// A value that may carry local edits the server has not confirmed yet.
///
/// On a failed write the local value is kept and stays unconfirmed; it is
/// never rolled back.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimistic<T> {
    value: T,
    confirmed: bool,
}

impl<T> Optimistic<T> {
    /// Wrap a value known to match the server.
    pub fn confirmed(value: T) -> Self {
        Self {
            value,
            confirmed: true,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Replace with the server's representation.
    pub fn reconcile(&mut self, server: T) {
        self.value = server;
        self.confirmed = true;
    }

    /// Apply `patch` locally, then `send` it and reconcile with the response.
    pub async fn update<P, F, Fut>(&mut self, patch: P, send: F) -> Result<(), AppError>
    where
        P: FnOnce(&mut T),
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        patch(&mut self.value);
        self.confirmed = false;

        let server = send().await?;
        self.reconcile(server);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_takes_server_value() {
        let mut name = Optimistic::confirmed("ada".to_string());

        name.update(
            |v| *v = "Ada L".to_string(),
            || async { Ok("Ada Lovelace".to_string()) },
        )
        .await
        .unwrap();

        assert_eq!(name.value(), "Ada Lovelace");
        assert!(name.is_confirmed());
    }

    #[tokio::test]
    async fn test_failure_keeps_local_value_unconfirmed() {
        let mut name = Optimistic::confirmed("ada".to_string());

        let result = name
            .update(
                |v| *v = "Ada L".to_string(),
                || async { Err(AppError::Backend("HTTP 500".to_string())) },
            )
            .await;

        assert!(matches!(result, Err(AppError::Backend(_))));
        assert_eq!(name.value(), "Ada L");
        assert!(!name.is_confirmed());
    }
}
