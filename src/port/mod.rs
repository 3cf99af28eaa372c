//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where external collaborators plug in: the
//! reference-data service and the optional narrative-generation
//! capability. Adapters in `infrastructure` implement them; nothing in
//! the core constructs a network client as a side effect of being
//! referenced — implementations are built explicitly and injected by the
//! caller.

pub mod narrative;
pub mod reference;

pub use narrative::{NarrativeClient, NullNarrative};
pub use reference::ReferenceData;
