/*!
Signing of [`DataSource`] contents.

Drains the source through a [`SequentialSigner`], so memory use stays at one
chunk plus the hash state.
*/

use tracing::debug;

use crate::core::engine::HashAlgorithm;
use crate::core::error::Result;
use crate::core::stream::DataSource;
use super::sequential::SequentialSigner;

/// Signs and verifies whatever a [`DataSource`] produces.
#[derive(Debug, Default)]
pub struct StreamSigner {
    signer: SequentialSigner,
}

impl StreamSigner {
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self { signer: SequentialSigner::new(hash_algorithm) }
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.signer.hash_algorithm()
    }

    fn feed(&mut self, source: &mut dyn DataSource) -> Result<u64> {
        let mut total = 0u64;
        while source.has_data() {
            let chunk = source.read()?;
            total += chunk.len() as u64;
            self.signer.update(&chunk)?;
        }
        Ok(total)
    }

    /// Drain `source` and sign everything it produced
    pub fn sign(
        &mut self,
        source: &mut dyn DataSource,
        private_key: &[u8],
        password: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        self.signer.start_signing();
        let total = self.feed(source)?;
        debug!(bytes = total, "stream signed");
        self.signer.sign(private_key, password)
    }

    /// Drain `source` and check it against `signature`
    pub fn verify(&mut self, source: &mut dyn DataSource, signature: &[u8], public_key: &[u8]) -> Result<bool> {
        self.signer.start_verifying(signature)?;
        let total = self.feed(source)?;
        debug!(bytes = total, "stream verified");
        self.signer.verify(public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::SignatureAlgorithm;
    use crate::core::key_pair::KeyPair;
    use crate::core::signer::Signer;
    use crate::core::stream::{BytesDataSource, StreamDataSource};
    use std::io::Cursor;

    #[test]
    fn test_stream_signature_matches_one_shot() -> Result<()> {
        let keys = KeyPair::generate(SignatureAlgorithm::Dilithium2);
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

        let mut signer = StreamSigner::new(HashAlgorithm::Sha256);
        let mut source = BytesDataSource::new(data.clone(), 333);
        let signature = signer.sign(&mut source, keys.private_key(), None)?;

        assert!(Signer::default().verify(&data, &signature, keys.public_key())?);

        let mut stream = StreamDataSource::new(Cursor::new(data), 1024);
        assert!(signer.verify(&mut stream, &signature, keys.public_key())?);
        Ok(())
    }
}
