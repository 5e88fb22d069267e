//! Decision model: pending random choices and forced selections.
//!
//! A logic engine announces every random choice it is about to make with a
//! `context` string ("reel1 spin", "pick bonus", ...). The full
//! `DecisionDefinition` is only built on demand through `DeferredDefinition`,
//! so the common "no maker applies" path never pays for it.

use std::cell::OnceCell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Description of a pending random decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDefinition {
    /// Kind/location of the decision, e.g. "reel1 spin".
    pub context: String,

    /// Labels of the selectable values (for a reel: the strip symbols).
    pub options: Vec<String>,
}

impl DecisionDefinition {
    pub fn new(context: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            context: context.into(),
            options,
        }
    }

    /// First option index labelled `label`.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o == label)
    }

    pub fn label(&self, selection: usize) -> Option<&str> {
        self.options.get(selection).map(String::as_str)
    }
}

/// A forced selection: index into `DecisionDefinition::options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub selection: usize,
}

impl Decision {
    pub fn select(selection: usize) -> Self {
        Self { selection }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select({})", self.selection)
    }
}

/// Lazily materialized `DecisionDefinition`.
///
/// The producer runs at most once, on the first `get()`.
pub struct DeferredDefinition<'a> {
    factory: &'a dyn Fn() -> DecisionDefinition,
    cell: OnceCell<DecisionDefinition>,
}

impl<'a> DeferredDefinition<'a> {
    pub fn new(factory: &'a dyn Fn() -> DecisionDefinition) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> &DecisionDefinition {
        self.cell.get_or_init(|| (self.factory)())
    }

    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for DeferredDefinition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredDefinition")
            .field("definition", &self.cell.get())
            .finish()
    }
}
