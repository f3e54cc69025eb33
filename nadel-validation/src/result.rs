//! The outcome of validating (part of) a schema.

use crate::error::NadelSchemaValidationError;
use crate::error::NadelSchemaValidationErrors;
use crate::instructions::NadelInstruction;
use crate::instructions::NadelInstructions;

/// Either nothing, a single error or instruction, or a flat list of those.
///
/// Results combine through [`NadelSchemaValidationResult::and`], [`FromIterator`] and [`Extend`].
/// Combining always flattens: a `Composite` only ever holds `Error` and `Instruction` leaves, in
/// the order they were produced, so callers never deal with nesting.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NadelSchemaValidationResult {
    #[default]
    Ok,
    Error(NadelSchemaValidationError),
    Instruction(NadelInstruction),
    Composite(Vec<NadelSchemaValidationResult>),
}

impl NadelSchemaValidationResult {
    pub const fn ok() -> Self {
        Self::Ok
    }

    /// `true` if any leaf is an error.
    pub fn is_error(&self) -> bool {
        self.leaves()
            .iter()
            .any(|leaf| matches!(leaf, Self::Error(_)))
    }

    pub fn errors(&self) -> impl Iterator<Item = &NadelSchemaValidationError> {
        self.leaves().iter().filter_map(|leaf| match leaf {
            Self::Error(error) => Some(error),
            _ => None,
        })
    }

    pub fn instructions(&self) -> impl Iterator<Item = &NadelInstruction> {
        self.leaves().iter().filter_map(|leaf| match leaf {
            Self::Instruction(instruction) => Some(instruction),
            _ => None,
        })
    }

    /// Combines two results, keeping `self`'s leaves first.
    pub fn and(self, other: impl Into<Self>) -> Self {
        [self, other.into()].into_iter().collect()
    }

    /// Splits the result into errors, or the instructions if there were none.
    pub fn into_blueprint(self) -> Result<NadelInstructions, NadelSchemaValidationErrors> {
        let mut errors = Vec::new();
        let mut instructions = Vec::new();
        for leaf in self.into_leaves() {
            match leaf {
                Self::Error(error) => errors.push(error),
                Self::Instruction(instruction) => instructions.push(instruction),
                Self::Ok | Self::Composite(_) => {}
            }
        }
        if errors.is_empty() {
            Ok(instructions.into_iter().collect())
        } else {
            Err(NadelSchemaValidationErrors { errors })
        }
    }

    fn leaves(&self) -> &[Self] {
        match self {
            Self::Ok => &[],
            Self::Composite(leaves) => leaves,
            leaf => std::slice::from_ref(leaf),
        }
    }

    fn into_leaves(self) -> Vec<Self> {
        match self {
            Self::Ok => Vec::new(),
            Self::Composite(leaves) => leaves,
            leaf => vec![leaf],
        }
    }

    fn from_leaves(mut leaves: Vec<Self>) -> Self {
        match leaves.len() {
            0 => Self::Ok,
            1 => leaves.pop().unwrap_or_default(),
            _ => Self::Composite(leaves),
        }
    }
}

impl FromIterator<NadelSchemaValidationResult> for NadelSchemaValidationResult {
    fn from_iter<T: IntoIterator<Item = NadelSchemaValidationResult>>(iter: T) -> Self {
        Self::from_leaves(iter.into_iter().flat_map(Self::into_leaves).collect())
    }
}

impl Extend<NadelSchemaValidationResult> for NadelSchemaValidationResult {
    fn extend<T: IntoIterator<Item = NadelSchemaValidationResult>>(&mut self, iter: T) {
        let mut leaves = std::mem::take(self).into_leaves();
        leaves.extend(iter.into_iter().flat_map(Self::into_leaves));
        *self = Self::from_leaves(leaves);
    }
}

impl From<NadelSchemaValidationError> for NadelSchemaValidationResult {
    fn from(error: NadelSchemaValidationError) -> Self {
        Self::Error(error)
    }
}

impl From<NadelInstruction> for NadelSchemaValidationResult {
    fn from(instruction: NadelInstruction) -> Self {
        Self::Instruction(instruction)
    }
}

impl From<Vec<NadelSchemaValidationError>> for NadelSchemaValidationResult {
    fn from(errors: Vec<NadelSchemaValidationError>) -> Self {
        errors.into_iter().map(Self::from).collect()
    }
}

impl<T: Into<Self>> From<Option<T>> for NadelSchemaValidationResult {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
