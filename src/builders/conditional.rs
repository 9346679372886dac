//! Check-and-mutate requests

use super::check_mutation_count;
use super::mutation::{CompileMutations, MutationSet};
use crate::error::Result;
use crate::filters::{CompileFilter, RowFilter};
use crate::types::{Mutation, WireRowFilter};

/// A predicate plus the mutations to apply when it does or does not match.
///
/// Either branch may be left unset, in which case it compiles to an empty
/// mutation list.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalMutation<F = RowFilter> {
    predicate: F,
    true_mutations: Option<MutationSet>,
    false_mutations: Option<MutationSet>,
}

impl<F: CompileFilter> ConditionalMutation<F> {
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            true_mutations: None,
            false_mutations: None,
        }
    }

    /// Mutations applied when the predicate matches at least one cell.
    pub fn with_true_mutations(mut self, mutations: MutationSet) -> Self {
        self.true_mutations = Some(mutations);
        self
    }

    /// Mutations applied when the predicate matches nothing.
    pub fn with_false_mutations(mut self, mutations: MutationSet) -> Self {
        self.false_mutations = Some(mutations);
        self
    }

    pub fn predicate(&self) -> &F {
        &self.predicate
    }

    pub fn compile_predicate(&self) -> WireRowFilter {
        self.predicate.compile()
    }

    pub fn compile_true_branch(&self) -> Vec<Mutation> {
        self.true_mutations
            .as_ref()
            .map(CompileMutations::compile)
            .unwrap_or_default()
    }

    pub fn compile_false_branch(&self) -> Vec<Mutation> {
        self.false_mutations
            .as_ref()
            .map(CompileMutations::compile)
            .unwrap_or_default()
    }

    /// Whether either branch would change anything.
    pub fn has_mutations(&self) -> bool {
        let non_empty = |set: &Option<MutationSet>| set.as_ref().is_some_and(|s| !s.is_empty());
        non_empty(&self.true_mutations) || non_empty(&self.false_mutations)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let len = |set: &Option<MutationSet>| set.as_ref().map_or(0, MutationSet::len);
        check_mutation_count("true branch", len(&self.true_mutations))?;
        check_mutation_count("false branch", len(&self.false_mutations))
    }
}
