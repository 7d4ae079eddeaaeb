//! Common error infrastructure for game-core.
//!
//! Shared severity classification lives here together with the
//! planner's error type.
//!
//! Planner errors never abort a tick: the caller logs them and retries the
//! same task on the next update.

use crate::state::{Position, Product};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary conditions that may succeed on retry
/// - **Validation**: invalid input that should be rejected without retry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: no buildable tile right now, prerequisite unit still busy
    Recoverable,
    /// Examples: product without a recipe
    Validation,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all game-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Reasons the planner could not start production of a product.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("no buildable tile for {product} within {radius} of {origin}")]
    NoBuildableTile {
        product: Product,
        origin: Position,
        radius: u32,
    },

    #[error("no recipe for {0}")]
    MissingRecipe(Product),

    #[error("requirements for {0} are not available")]
    Infeasible(Product),
}

impl GameError for PlannerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            PlannerError::NoBuildableTile { .. } | PlannerError::Infeasible(_) => {
                ErrorSeverity::Recoverable
            }
            PlannerError::MissingRecipe(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PlannerError::NoBuildableTile { .. } => "PLANNER_NO_BUILDABLE_TILE",
            PlannerError::MissingRecipe(_) => "PLANNER_MISSING_RECIPE",
            PlannerError::Infeasible(_) => "PLANNER_INFEASIBLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StructureKind;

    #[test]
    fn placement_failures_are_retried() {
        let error = PlannerError::NoBuildableTile {
            product: Product::Structure(StructureKind::Smithy),
            origin: Position::new(4, 4),
            radius: 1,
        };
        assert!(error.severity().is_recoverable());
        assert_eq!(error.error_code(), "PLANNER_NO_BUILDABLE_TILE");
        assert_eq!(
            error.to_string(),
            "no buildable tile for structure:smithy within 1 of (4, 4)"
        );
    }

    #[test]
    fn missing_recipe_is_not_retried() {
        let error = PlannerError::MissingRecipe(Product::Structure(StructureKind::Refinery));
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(error.severity().as_str(), "validation");
        assert_eq!(error.error_code(), "PLANNER_MISSING_RECIPE");
    }
}
