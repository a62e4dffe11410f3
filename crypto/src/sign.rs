//! Ed25519 message and block signing.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use quorum_types::{Block, BlockSignature, KeyPair, PrivateKey, PublicKey, Signature};

/// Sign a message with a private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Malformed public keys verify as `false`.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}

/// Sign a block's hash, producing a signature ready for
/// [`Block::add_signature`].
pub fn sign_block(block: &Block, keypair: &KeyPair) -> BlockSignature {
    BlockSignature::new(
        keypair.public,
        sign_message(block.hash.as_bytes(), &keypair.private),
    )
}

/// Check that `signature` is a valid signature of `block.hash` by its key.
pub fn verify_block_signature(block: &Block, signature: &BlockSignature) -> bool {
    verify_signature(
        block.hash.as_bytes(),
        &signature.signed_data,
        &signature.public_key,
    )
}
