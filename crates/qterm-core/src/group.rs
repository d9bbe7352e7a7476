//! Grouping of terms whose qubits nest inside one parent term.
//!
//! [`TermGroup::from_terms`] buckets terms by arity and walks the buckets
//! from the widest to the narrowest. Each term joins the first group (in
//! creation order) whose qubit set contains its qubits, or seeds a new
//! group. The first-fit order fixes the merge order downstream, so it is
//! kept exactly.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::TermResult;
use crate::term::{HamiltonianId, Term};

/// Per-Hamiltonian coefficient applied to members during collapse.
pub type CoefficientOverrides = FxHashMap<HamiltonianId, Complex64>;

/// Terms that collapse into a single merged term.
///
/// The first member is the parent; the merged term uses its qubit order.
#[derive(Debug, Clone)]
pub struct TermGroup {
    members: Vec<Arc<Term>>,
    target_qubits: BTreeSet<usize>,
    merged: OnceLock<Term>,
}

impl TermGroup {
    /// Start a group seeded by `term`.
    pub fn new(term: Arc<Term>) -> Self {
        let target_qubits = term.target_qubits().iter().copied().collect();
        Self {
            members: vec![term],
            target_qubits,
            merged: OnceLock::new(),
        }
    }

    /// Append a member and drop the cached merged term.
    pub fn append(&mut self, term: Arc<Term>) {
        self.target_qubits.extend(term.target_qubits().iter().copied());
        self.members.push(term);
        self.merged = OnceLock::new();
    }

    /// True if every qubit of `term` is already covered by the group.
    pub fn can_append(&self, term: &Term) -> bool {
        term.target_qubits()
            .iter()
            .all(|q| self.target_qubits.contains(q))
    }

    /// Partition `terms` into groups, widest terms first.
    pub fn from_terms<I>(terms: I) -> Vec<TermGroup>
    where
        I: IntoIterator<Item = Arc<Term>>,
    {
        let mut orders: BTreeMap<usize, Vec<Arc<Term>>> = BTreeMap::new();
        let mut n_terms = 0usize;
        for term in terms {
            orders.entry(term.len()).or_default().push(term);
            n_terms += 1;
        }

        let mut groups: Vec<TermGroup> = Vec::new();
        for bucket in orders.into_values().rev() {
            for child in bucket {
                match groups.iter_mut().find(|g| g.can_append(&child)) {
                    Some(group) => group.append(child),
                    None => groups.push(TermGroup::new(child)),
                }
            }
        }

        debug!(n_terms, n_groups = groups.len(), "grouped Hamiltonian terms");
        groups
    }

    /// Members in append order; the first is the parent.
    pub fn members(&self) -> &[Arc<Term>] {
        &self.members
    }

    /// The parent (first) member.
    pub fn parent(&self) -> &Term {
        &self.members[0]
    }

    /// Union of the members' qubits.
    pub fn target_qubits(&self) -> &BTreeSet<usize> {
        &self.target_qubits
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: a group holds at least its seed. Kept alongside
    /// [`TermGroup::len`] for the `len_without_is_empty` lint.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Merged term without overrides, cached until the next `append`.
    pub fn term(&self) -> TermResult<&Term> {
        if let Some(term) = self.merged.get() {
            return Ok(term);
        }
        let term = self.to_term(&CoefficientOverrides::default())?;
        Ok(self.merged.get_or_init(|| term))
    }

    /// Sum of all members as one term on the parent's qubits.
    ///
    /// A member whose owner has an entry in `overrides` is scaled by it;
    /// other members are used as they are.
    pub fn to_term(&self, overrides: &CoefficientOverrides) -> TermResult<Term> {
        let mut merged = scaled_member(&self.members[0], overrides).into_owned();
        for term in &self.members[1..] {
            merged = merged.merge(&scaled_member(term, overrides))?;
        }
        Ok(merged)
    }
}

fn scaled_member<'a>(term: &'a Term, overrides: &CoefficientOverrides) -> Cow<'a, Term> {
    match term.owner().and_then(|id| overrides.get(&id)) {
        Some(&k) => Cow::Owned(term.scaled(k)),
        None => Cow::Borrowed(term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Matrix;
    use crate::symbol::Pauli;

    fn term(qubits: &[i64]) -> Arc<Term> {
        let dim = 1 << qubits.len();
        Arc::new(Term::new(Matrix::eye(dim), qubits).unwrap())
    }

    #[test]
    fn widest_terms_seed_groups() {
        let groups = TermGroup::from_terms(vec![term(&[0]), term(&[0, 1]), term(&[1])]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].parent().target_qubits(), &[0, 1]);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn first_fit_prefers_earlier_groups() {
        // (1,) fits in both (0,1) and (1,2); it must join the first one.
        let groups =
            TermGroup::from_terms(vec![term(&[0, 1]), term(&[1, 2]), term(&[1])]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn append_invalidates_cached_term() {
        let x0 = Arc::new(Term::new(Pauli::X.matrix(), &[0]).unwrap());
        let mut group = TermGroup::new(x0.clone());
        let before = group.term().unwrap().matrix().clone();
        group.append(x0);
        let after = group.term().unwrap().matrix().clone();
        assert_eq!(after, &before * Complex64::new(2.0, 0.0));
    }

    #[test]
    fn overrides_scale_by_owner() {
        let owner = HamiltonianId::fresh();
        let owned = Arc::new(Term::new(Pauli::Z.matrix(), &[0]).unwrap().with_owner(owner));
        let free = Arc::new(Term::new(Pauli::Z.matrix(), &[0]).unwrap());
        let mut group = TermGroup::new(owned);
        group.append(free);

        let mut overrides = CoefficientOverrides::default();
        overrides.insert(owner, Complex64::new(3.0, 0.0));
        let merged = group.to_term(&overrides).unwrap();
        assert_eq!(merged.matrix(), &(Pauli::Z.matrix() * Complex64::new(4.0, 0.0)));
    }

    #[test]
    fn seeded_group_is_never_empty() {
        let group = TermGroup::new(term(&[0]));
        assert_eq!(group.len(), 1);
        assert!(!group.is_empty());
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(TermGroup::from_terms(Vec::new()).is_empty());
    }
}
