mod fingerprint;
pub(crate) mod mpi;
mod packet;

pub use self::{fingerprint::Fingerprint, packet::*};
