//! Structural editing of source documents.
//!
//! A [`Document`] owns the text of a file and its parse tree, and hands out
//! [`NodeId`] wrappers for nodes of that tree. Every edit is a plain text
//! replacement followed by a complete re-parse; wrappers are then carried
//! over to the new tree where the edit left their nodes intact, and
//! forgotten everywhere else.

mod capabilities;
mod document;
pub mod error;
mod liveness;
pub mod manipulator;
mod operations;
mod reconcile;
mod registry;
mod replacer;
mod settings;

pub use capabilities::{
    BodyOwner, Capabilities, MemberContainer, ModifierOwner, Scope, Separator,
    StatementContainer, capabilities,
};
pub use document::{Document, Live};
pub use error::EditError;
pub use liveness::{LastKnown, LivenessTracker};
pub use manipulator::{
    EditRequest, Insertion, RemoveChildren, TextManipulator, TrimOptions, Unwrap,
};
pub use registry::{NodeData, NodeId, WrapperRegistry};
pub use replacer::{DocumentReplacer, Parsed, ReferenceParser, SourceParser};
pub use settings::{IndentationText, ManipulationSettings, NewLineKind};

pub use parsing::ParseError;
pub use syntax::{SyntaxKind, TextRange, TextSize};
