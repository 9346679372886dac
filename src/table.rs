//! Table facade
//!
//! Binds a transport to one table and exposes the data operations with their
//! retry behavior:
//!
//! | Operation | Retries |
//! |---|---|
//! | `mutate_rows` | call establishment, via [`BatchMutationCoordinator`] |
//! | `mutate_row` | whole call, via [`RetryExecutor::execute`] |
//! | `read_rows` / `read_row` | stream establishment, via [`retry_with_backoff`] |
//! | `check_and_mutate_row` | none (not idempotent) |
//! | `read_modify_write_row` | none (not idempotent) |

use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tracing::debug;

use crate::batch::BatchMutationCoordinator;
use crate::builders::{ConditionalMutation, ReadModifyWrite, RowMutation};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::filters::CompileFilter;
use crate::retry::{BackoffPolicy, RetryExecutor, retry_with_backoff};
use crate::transport::{DataClient, RowStream};
use crate::types::{
    CheckAndMutateRowRequest, MutateRowRequest, ReadModifyWriteRowRequest, ReadRowsRequest, Row,
};

#[derive(Clone)]
pub struct Table {
    client: Arc<dyn DataClient>,
    name: String,
    app_profile_id: Option<String>,
    policy: BackoffPolicy,
}

impl Table {
    /// `name` is the fully qualified table path.
    pub fn new(client: Arc<dyn DataClient>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            app_profile_id: None,
            policy: BackoffPolicy::default(),
        }
    }

    /// Table `table_id` within the configured instance, using the
    /// configured app profile and retry settings.
    pub fn from_config(
        client: Arc<dyn DataClient>,
        config: &ClientConfig,
        table_id: &str,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            name: config.table_name(table_id),
            app_profile_id: config.app_profile_id.clone(),
            policy: config.retry.to_policy(),
        })
    }

    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_app_profile_id(mut self, app_profile_id: impl Into<String>) -> Self {
        self.app_profile_id = Some(app_profile_id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    pub fn batch_coordinator(&self) -> BatchMutationCoordinator {
        BatchMutationCoordinator::new(Arc::clone(&self.client), self.name.clone())
            .with_app_profile_id(self.app_profile_id.clone())
            .with_policy(self.policy.clone())
    }

    /// Write several rows in one batch. See [`BatchMutationCoordinator::mutate_rows`].
    pub async fn mutate_rows(&self, rows: &[RowMutation]) -> Result<()> {
        self.batch_coordinator().mutate_rows(rows).await
    }

    /// Write a single row atomically.
    pub async fn mutate_row(&self, row: &RowMutation) -> Result<()> {
        let entry = row.to_entry()?;
        let request = MutateRowRequest {
            table_name: self.name.clone(),
            app_profile_id: self.app_profile_id.clone(),
            row_key: entry.row_key,
            mutations: entry.mutations,
        };
        let client = Arc::clone(&self.client);
        let mut executor = RetryExecutor::new(
            move |request: MutateRowRequest| {
                let client = Arc::clone(&client);
                async move { client.mutate_row(request).await }
            },
            self.policy.clone(),
        );
        executor.execute(request).await
    }

    /// Apply one branch of `mutation` depending on whether its predicate
    /// matches the row. Returns whether the predicate matched, or `None` when
    /// both branches are empty and nothing was sent.
    pub async fn check_and_mutate_row<F: CompileFilter>(
        &self,
        row_key: impl Into<Bytes>,
        mutation: &ConditionalMutation<F>,
    ) -> Result<Option<bool>> {
        mutation.validate()?;
        if !mutation.has_mutations() {
            debug!(table = %self.name, "Conditional mutation has no branches, skipping");
            return Ok(None);
        }
        let request = CheckAndMutateRowRequest {
            table_name: self.name.clone(),
            app_profile_id: self.app_profile_id.clone(),
            row_key: row_key.into(),
            predicate_filter: mutation.compile_predicate(),
            true_mutations: mutation.compile_true_branch(),
            false_mutations: mutation.compile_false_branch(),
        };
        let response = self.client.check_and_mutate_row(request).await?;
        Ok(Some(response.predicate_matched))
    }

    /// Apply the rules and return the new contents of the touched cells.
    /// With no rules nothing is sent and an empty row is returned.
    pub async fn read_modify_write_row(&self, rmw: &ReadModifyWrite) -> Result<Row> {
        rmw.validate()?;
        if rmw.is_empty() {
            debug!(table = %self.name, "Read-modify-write has no rules, skipping");
            return Ok(Row::new(rmw.row_key().clone()));
        }
        let request = ReadModifyWriteRowRequest {
            table_name: self.name.clone(),
            app_profile_id: self.app_profile_id.clone(),
            row_key: rmw.row_key().clone(),
            rules: rmw.compile_rules(),
        };
        self.client.read_modify_write_row(request).await
    }

    /// Stream rows by key (all rows when `row_keys` is empty).
    pub async fn read_rows(
        &self,
        row_keys: Vec<Bytes>,
        filter: Option<&dyn CompileFilter>,
        rows_limit: Option<u64>,
    ) -> Result<RowStream> {
        let request = ReadRowsRequest {
            table_name: self.name.clone(),
            app_profile_id: self.app_profile_id.clone(),
            row_keys,
            filter: filter.map(|f| f.compile()),
            rows_limit,
        };
        let client = &self.client;
        retry_with_backoff(&self.policy, || client.read_rows(request.clone())).await
    }

    /// Read one row, or `None` when it does not exist or the filter removed
    /// every cell.
    pub async fn read_row(
        &self,
        row_key: impl Into<Bytes>,
        filter: Option<&dyn CompileFilter>,
    ) -> Result<Option<Row>> {
        let mut rows = self.read_rows(vec![row_key.into()], filter, Some(1)).await?;
        rows.next().await.transpose()
    }
}
