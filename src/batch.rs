//! Batched mutations
//!
//! Sends many rows in one streamed call and folds the per-entry
//! acknowledgments into either success or a single [`PartialBatchFailure`].

use futures::StreamExt;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::builders::RowMutation;
use crate::error::{ClientError, FailedMutation, PartialBatchFailure, Result};
use crate::retry::{BackoffPolicy, RetryExecutor};
use crate::status::Status;
use crate::transport::DataClient;
use crate::types::{EntryAck, MutateRowsRequest};

/// Issues one multi-row write and aggregates its acknowledgments.
#[derive(Clone)]
pub struct BatchMutationCoordinator {
    client: Arc<dyn DataClient>,
    table_name: String,
    app_profile_id: Option<String>,
    policy: BackoffPolicy,
}

impl BatchMutationCoordinator {
    pub fn new(client: Arc<dyn DataClient>, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            app_profile_id: None,
            policy: BackoffPolicy::default(),
        }
    }

    pub fn with_app_profile_id(mut self, app_profile_id: Option<String>) -> Self {
        self.app_profile_id = app_profile_id;
        self
    }

    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write every row in one batch.
    ///
    /// Establishing the call is retried under the backoff policy. Once the
    /// acknowledgment stream is open it is consumed to the end without any
    /// transparent retry; an error from the stream is returned as is.
    ///
    /// Every submitted entry must be acknowledged. A stream that ends with
    /// entries still unacknowledged is a [`ClientError::ProtocolViolation`],
    /// even when other entries failed.
    ///
    /// An empty `rows` slice succeeds immediately without contacting the service.
    pub async fn mutate_rows(&self, rows: &[RowMutation]) -> Result<()> {
        if rows.is_empty() {
            debug!(table = %self.table_name, "Empty batch, nothing to send");
            return Ok(());
        }

        let entries = rows
            .iter()
            .map(RowMutation::to_entry)
            .collect::<Result<Vec<_>>>()?;
        let request = MutateRowsRequest {
            table_name: self.table_name.clone(),
            app_profile_id: self.app_profile_id.clone(),
            entries,
        };
        debug!(table = %self.table_name, entries = rows.len(), "Submitting batch write");

        let client = Arc::clone(&self.client);
        let mut executor = RetryExecutor::new(
            move |request: MutateRowsRequest| {
                let client = Arc::clone(&client);
                async move { client.mutate_rows(request).await }
            },
            self.policy.clone(),
        );
        let mut acks = executor.execute(request).await?;

        let mut aggregate = AckAggregate::new(rows);
        while let Some(batch) = acks.next().await {
            for ack in batch?.entries {
                aggregate.record(ack)?;
            }
        }
        aggregate.check_complete()?;

        aggregate.finish().map_err(|failure| {
            warn!(
                table = %self.table_name,
                failed = failure.len(),
                total = rows.len(),
                code = %failure.code,
                "Batch write completed with failed entries"
            );
            ClientError::from(failure)
        })
    }
}

/// Index-keyed record of failed entries for one batch call.
struct AckAggregate<'a> {
    rows: &'a [RowMutation],
    acknowledged: Vec<bool>,
    failures: BTreeMap<usize, FailedMutation>,
    representative: Option<Status>,
}

impl<'a> AckAggregate<'a> {
    fn new(rows: &'a [RowMutation]) -> Self {
        Self {
            rows,
            acknowledged: vec![false; rows.len()],
            failures: BTreeMap::new(),
            representative: None,
        }
    }

    /// Fold one acknowledgment in. OK statuses are ignored; a failing status
    /// is stored under its index and becomes the representative failure,
    /// replacing any earlier one.
    fn record(&mut self, ack: EntryAck) -> Result<()> {
        let row = usize::try_from(ack.index)
            .ok()
            .and_then(|index| self.rows.get(index).map(|row| (index, row)));
        let Some((index, row)) = row else {
            return Err(ClientError::ProtocolViolation(format!(
                "acknowledgment index {} outside batch of {} entries",
                ack.index,
                self.rows.len()
            )));
        };

        self.acknowledged[index] = true;
        if ack.status.is_ok() {
            return Ok(());
        }
        self.representative = Some(ack.status.clone());
        self.failures.insert(
            index,
            FailedMutation {
                row_key: row.row_key().clone(),
                status: ack.status,
            },
        );
        Ok(())
    }

    /// Indices the stream never acknowledged.
    fn unacknowledged(&self) -> Vec<usize> {
        self.acknowledged
            .iter()
            .enumerate()
            .filter_map(|(index, seen)| (!seen).then_some(index))
            .collect()
    }

    fn check_complete(&self) -> Result<()> {
        let missing = self.unacknowledged();
        if missing.is_empty() {
            return Ok(());
        }
        Err(ClientError::ProtocolViolation(format!(
            "acknowledgment stream ended with {} of {} entries unacknowledged: {:?}",
            missing.len(),
            self.rows.len(),
            missing
        )))
    }

    fn finish(self) -> std::result::Result<(), PartialBatchFailure> {
        match self.representative {
            None => Ok(()),
            Some(status) => Err(PartialBatchFailure {
                code: status.code,
                message: status.message,
                failures: self.failures,
            }),
        }
    }
}
