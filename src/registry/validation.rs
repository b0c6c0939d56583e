//! Registration checks using Validation.
//!
//! All problems with an id list are collected in one pass instead of
//! stopping at the first, so a host sees every duplicate at once.

use super::error::RegistryError;
use crate::core::StateId;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check an id list for emptiness and duplicates.
///
/// Each duplicated id is reported once, in the order its second occurrence
/// appears.
pub fn validate_ids<I: StateId>(ids: &[I]) -> Validation<(), NonEmptyVec<RegistryError>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<RegistryError>>> = Vec::new();

    let non_empty = if ids.is_empty() {
        Validation::fail(RegistryError::EmptyRegistration)
    } else {
        Validation::success(())
    };
    checks.push(non_empty);

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for id in ids {
        if !seen.insert(*id) && reported.insert(*id) {
            checks.push(Validation::fail(RegistryError::DuplicateState {
                state: id.name().to_string(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestId {
        Boot,
        Menu,
        Level,
    }

    impl StateId for TestId {
        fn name(&self) -> &str {
            match self {
                Self::Boot => "Boot",
                Self::Menu => "Menu",
                Self::Level => "Level",
            }
        }
    }

    #[test]
    fn distinct_ids_pass() {
        let result = validate_ids(&[TestId::Boot, TestId::Menu, TestId::Level]);
        assert!(result.is_success());
    }

    #[test]
    fn empty_list_fails() {
        let result = validate_ids::<TestId>(&[]);

        match result {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, RegistryError::EmptyRegistration)));
            }
            Validation::Success(_) => panic!("Expected failure, got success"),
        }
    }

    #[test]
    fn accumulates_every_duplicate() {
        let result = validate_ids(&[
            TestId::Boot,
            TestId::Menu,
            TestId::Boot,
            TestId::Level,
            TestId::Menu,
            TestId::Boot,
        ]);

        match result {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                let names: Vec<String> = errors
                    .iter()
                    .map(|e| match e {
                        RegistryError::DuplicateState { state } => state.clone(),
                        other => panic!("unexpected violation {other:?}"),
                    })
                    .collect();
                assert_eq!(names, vec!["Boot".to_string(), "Menu".to_string()]);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
