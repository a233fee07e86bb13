use std::env;
use std::fs::File;

use pqc_toolkit::{
    BytesDataSource, CryptoConfig, DataSource, KeyPair, Result, StreamDataSource, StreamSigner,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("PQC Toolkit Stream Signing Example");
    println!("==================================");

    let config = CryptoConfig::default();
    config.validate()?;

    println!("Generating {} key pair...", config.signature.name());
    let keys = KeyPair::generate_with_password(config.signature, b"example password")?;

    let path = env::args().nth(1);
    let mut source: Box<dyn DataSource> = match &path {
        Some(path) => {
            println!("Signing file {}", path);
            Box::new(StreamDataSource::new(File::open(path)?, config.chunk_size))
        }
        None => {
            println!("No file given, signing 1 MiB of generated data");
            let data: Vec<u8> = (0..1 << 20).map(|i: u32| (i % 253) as u8).collect();
            Box::new(BytesDataSource::new(data, config.chunk_size))
        }
    };

    let mut signer = StreamSigner::new(config.hash);
    let signature = signer.sign(source.as_mut(), keys.private_key(), Some(b"example password".as_slice()))?;
    println!("Signature envelope: {} bytes ({})", signature.len(), config.hash.name());

    let mut source: Box<dyn DataSource> = match &path {
        Some(path) => Box::new(StreamDataSource::new(File::open(path)?, config.chunk_size)),
        None => {
            let data: Vec<u8> = (0..1 << 20).map(|i: u32| (i % 253) as u8).collect();
            Box::new(BytesDataSource::new(data, config.chunk_size))
        }
    };
    let valid = signer.verify(source.as_mut(), &signature, keys.public_key())?;
    println!("Verification result: {}", valid);

    Ok(())
}
