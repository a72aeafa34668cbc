//! Persistence collaborator contract.
//!
//! The core delegates durable storage to a per-document repository with
//! partial-field updates and no multi-field transactions. The contract is
//! deliberately small: the reconciliation logic upstream produces exactly
//! one update payload per transition, so the repository never has to
//! coordinate writes.

mod memory;
mod repository;

pub use memory::MemoryRepository;
pub use repository::{encode_document, BottleRepository};
