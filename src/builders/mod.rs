//! Request builders
//!
//! Accumulate mutations, conditions and read-modify-write rules and compile
//! them into wire payloads. Builders hold data only; sending and retrying is
//! done by [`crate::table::Table`] and [`crate::batch::BatchMutationCoordinator`].

pub mod conditional;
pub mod mutation;
pub mod read_modify_write;

pub use conditional::ConditionalMutation;
pub use mutation::{CompileMutations, MutationSet, RowMutation};
pub use read_modify_write::ReadModifyWrite;

use crate::defaults::limits::MAX_MUTATIONS;
use crate::error::{ClientError, Result};

pub(crate) fn check_mutation_count(what: &str, count: usize) -> Result<()> {
    if count > MAX_MUTATIONS {
        return Err(ClientError::InvalidInput(format!(
            "{what} has {count} mutations, more than the maximum of {MAX_MUTATIONS}"
        )));
    }
    Ok(())
}
