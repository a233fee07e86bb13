use pqc_toolkit::{
    BytesDataSink, BytesDataSource, KeyPair, Result, StreamCipher, DEFAULT_CHUNK_SIZE,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("PQC Toolkit Stream Cipher Example");
    println!("=================================");

    let recipient = KeyPair::generate_recipient();
    let mut cipher = StreamCipher::new();
    cipher.add_key_recipient(b"alice", recipient.public_key())?;
    cipher.add_password_recipient(b"shared secret")?;

    let message = b"Streaming data protected for a Kyber recipient and a password.".repeat(1000);
    println!("Encrypting {} bytes...", message.len());

    let mut source = BytesDataSource::new(message.clone(), DEFAULT_CHUNK_SIZE);
    let mut sink = BytesDataSink::new();
    cipher.encrypt(&mut source, &mut sink)?;
    let encrypted = sink.into_bytes();
    println!("Ciphertext: {} bytes", encrypted.len());

    let mut source = BytesDataSource::new(encrypted.clone(), DEFAULT_CHUNK_SIZE);
    let mut sink = BytesDataSink::new();
    cipher.decrypt_with_key(&mut source, &mut sink, b"alice", recipient.private_key())?;
    println!("Decrypted with key: {}", sink.bytes() == message.as_slice());

    let mut source = BytesDataSource::new(encrypted, DEFAULT_CHUNK_SIZE);
    let mut sink = BytesDataSink::new();
    cipher.decrypt_with_password(&mut source, &mut sink, b"shared secret")?;
    println!("Decrypted with password: {}", sink.bytes() == message.as_slice());

    Ok(())
}
