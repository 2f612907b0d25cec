//! Constraints spanning several parameters
//!
//! Each constraint is a pure predicate over which parameters are currently
//! set; constraints can run in any order.

use crate::core::{KnnError, Result};
use crate::options::ParameterSet;

/// Rule over the joint state of several parameters
pub trait GlobalParameterConstraint: Send + Sync {
    /// Check the rule against the given parameters
    fn test(&self, parameters: &ParameterSet) -> Result<()>;

    /// Human-readable statement of the rule
    fn description(&self) -> String;
}

/// At least one of the listed parameters has to be set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneMustBeSet {
    names: Vec<String>,
}

impl OneMustBeSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl GlobalParameterConstraint for OneMustBeSet {
    fn test(&self, parameters: &ParameterSet) -> Result<()> {
        if self.names.iter().any(|name| parameters.is_set(name)) {
            return Ok(());
        }
        Err(KnnError::ConstraintViolation {
            message: self.description(),
            parameters: self.names.clone(),
        })
    }

    fn description(&self) -> String {
        format!(
            "At least one of the parameters {} has to be set.",
            names_to_string(&self.names)
        )
    }
}

/// At most one of the listed parameters may be set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlyOneIsAllowedToBeSet {
    names: Vec<String>,
}

impl OnlyOneIsAllowedToBeSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl GlobalParameterConstraint for OnlyOneIsAllowedToBeSet {
    fn test(&self, parameters: &ParameterSet) -> Result<()> {
        let set: Vec<String> = self
            .names
            .iter()
            .filter(|name| parameters.is_set(name))
            .cloned()
            .collect();

        if set.len() > 1 {
            return Err(KnnError::ConstraintViolation {
                message: format!(
                    "{} Parameters currently set: {}",
                    self.description(),
                    names_to_string(&set)
                ),
                parameters: set,
            });
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Only one of the parameters {} is allowed to be set.",
            names_to_string(&self.names)
        )
    }
}

/// Run every constraint, stopping at the first violation
pub fn validate(
    parameters: &ParameterSet,
    constraints: &[Box<dyn GlobalParameterConstraint>],
) -> Result<()> {
    for constraint in constraints {
        constraint.test(parameters)?;
    }
    Ok(())
}

fn names_to_string(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(set: &[&str], unset: &[&str]) -> ParameterSet {
        let mut params = ParameterSet::new();
        for name in unset {
            params.declare(*name, "");
        }
        for name in set {
            params.set(*name, "x");
        }
        params
    }

    #[test]
    fn test_one_must_be_set_fails_when_none_set() {
        let constraint = OneMustBeSet::new(["p1", "p2"]);
        match constraint.test(&params(&[], &["p1", "p2"])) {
            Err(KnnError::ConstraintViolation {
                message,
                parameters,
            }) => {
                assert_eq!(message, "At least one of the parameters [p1, p2] has to be set.");
                assert_eq!(parameters, vec!["p1", "p2"]);
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn test_one_must_be_set_passes_when_one_set() {
        let constraint = OneMustBeSet::new(["p1", "p2"]);
        assert!(constraint.test(&params(&["p2"], &["p1"])).is_ok());
        assert!(constraint.test(&params(&["p1", "p2"], &[])).is_ok());
    }

    #[test]
    fn test_only_one_fails_and_names_the_set_ones() {
        let constraint = OnlyOneIsAllowedToBeSet::new(["p1", "p2", "p3"]);
        match constraint.test(&params(&["p1", "p2"], &["p3"])) {
            Err(KnnError::ConstraintViolation {
                message,
                parameters,
            }) => {
                assert_eq!(parameters, vec!["p1", "p2"]);
                assert!(message.contains("Parameters currently set: [p1, p2]"));
                assert!(message.starts_with("Only one of the parameters [p1, p2, p3]"));
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn test_only_one_passes_with_zero_or_one() {
        let constraint = OnlyOneIsAllowedToBeSet::new(["p1", "p2"]);
        assert!(constraint.test(&params(&["p1"], &["p2"])).is_ok());
        assert!(constraint.test(&params(&[], &["p1", "p2"])).is_ok());
    }

    #[test]
    fn test_validate_runs_all_constraints() {
        let constraints: Vec<Box<dyn GlobalParameterConstraint>> = vec![
            Box::new(OneMustBeSet::new(["a", "b"])),
            Box::new(OnlyOneIsAllowedToBeSet::new(["a", "b"])),
        ];

        assert!(validate(&params(&["a"], &["b"]), &constraints).is_ok());
        assert!(validate(&params(&[], &["a", "b"]), &constraints).is_err());

        let err = validate(&params(&["a", "b"], &[]), &constraints).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("Only one"));
    }
}
