/*!
Signing and verification.

All signers hash the payload first and hand only the digest to the
engine. Signatures travel in a [`SignatureEnvelope`] that names the hash
algorithm, so a verifier can follow whatever algorithm the signer used.
*/

mod base;
mod oneshot;
mod sequential;
mod stream;

pub use self::base::{SignatureEnvelope, SignerBase};
pub use self::oneshot::Signer;
pub use self::sequential::{SequentialSigner, SignerState};
pub use self::stream::StreamSigner;
