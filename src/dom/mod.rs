//! Host-document model
//!
//! The caption pipeline observes an external page it does not own. This
//! module models that collaborator as an in-process node tree the host keeps
//! mutating while the pipeline runs:
//! - Element/text nodes held in an arena behind a cloneable `Document` handle
//! - `NodeId` weak references, resolved (and re-checked) at point of use
//! - Change notifications broadcast to any number of subscribers

mod mutation;
mod node;

pub use mutation::{Mutation, MutationKind};
pub use node::{Document, NodeId};
