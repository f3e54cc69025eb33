//! Nullability comparison of two types' list and non-null wrappers.

use apollo_compiler::ast::Type;
#[cfg(test)]
use strum_macros::EnumIter;

/// The direction in which `lhs` may differ from `rhs`.
///
/// "Stricter" means non-null. The strict rules (`Looser`, `Stricter`) need at least one
/// position to actually differ; the others also accept identical wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(EnumIter))]
pub(crate) enum NadelTypeWrappingRule {
    LhsMustBeLooser,
    LhsMustBeLooserOrSame,
    LhsMustBeStricter,
    LhsMustBeStricterOrSame,
    RhsMustBeLooser,
    RhsMustBeLooserOrSame,
    RhsMustBeStricter,
    RhsMustBeStricterOrSame,
}

impl NadelTypeWrappingRule {
    /// The same constraint with the sides swapped.
    fn mirrored(self) -> Self {
        match self {
            Self::LhsMustBeLooser => Self::RhsMustBeLooser,
            Self::LhsMustBeLooserOrSame => Self::RhsMustBeLooserOrSame,
            Self::LhsMustBeStricter => Self::RhsMustBeStricter,
            Self::LhsMustBeStricterOrSame => Self::RhsMustBeStricterOrSame,
            Self::RhsMustBeLooser => Self::LhsMustBeLooser,
            Self::RhsMustBeLooserOrSame => Self::LhsMustBeLooserOrSame,
            Self::RhsMustBeStricter => Self::LhsMustBeStricter,
            Self::RhsMustBeStricterOrSame => Self::LhsMustBeStricterOrSame,
        }
    }

    /// Compares per-position non-null flags, lhs against rhs.
    fn holds(self, lhs: &[bool], rhs: &[bool]) -> bool {
        let pairs = || lhs.iter().zip(rhs);
        match self {
            Self::LhsMustBeLooserOrSame => pairs().all(|(l, r)| !*l || *r),
            Self::LhsMustBeStricterOrSame => pairs().all(|(l, r)| *l || !*r),
            Self::LhsMustBeLooser => {
                Self::LhsMustBeLooserOrSame.holds(lhs, rhs) && pairs().any(|(l, r)| l != r)
            }
            Self::LhsMustBeStricter => {
                Self::LhsMustBeStricterOrSame.holds(lhs, rhs) && pairs().any(|(l, r)| l != r)
            }
            Self::RhsMustBeLooser
            | Self::RhsMustBeLooserOrSame
            | Self::RhsMustBeStricter
            | Self::RhsMustBeStricterOrSame => self.mirrored().holds(rhs, lhs),
        }
    }
}

/// Non-null flag of each wrapping layer, innermost (the named type) first.
fn nullability(ty: &Type) -> Vec<bool> {
    let mut layers = Vec::new();
    let mut current = ty;
    loop {
        layers.push(current.is_non_null());
        match current {
            Type::List(inner) | Type::NonNullList(inner) => current = inner,
            Type::Named(_) | Type::NonNullNamed(_) => break,
        }
    }
    layers.reverse();
    layers
}

/// Whether `lhs` and `rhs` have the same list cardinality and every layer's nullability
/// satisfies `rule`. The named types are ignored.
pub(crate) fn is_type_wrapping_valid(lhs: &Type, rhs: &Type, rule: NadelTypeWrappingRule) -> bool {
    let lhs = nullability(lhs);
    let rhs = nullability(rhs);
    lhs.len() == rhs.len() && rule.holds(&lhs, &rhs)
}
