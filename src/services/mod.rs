//! Leaf services: canonicalization, fingerprinting, persistence, and the
//! thin I/O collaborators (portal, notifier, report)

pub mod canonicalizer;
pub mod fingerprinter;
pub mod notifier;
pub mod portal_client;
pub mod report;
pub mod snapshot_store;
