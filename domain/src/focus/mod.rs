//! Focus-session domain logic: chunking, insight notes, consensus.

pub mod chunk;
pub mod consensus;
pub mod insight;
