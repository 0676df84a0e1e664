//! Password-based encryption, for people who would rather not think about cryptography.
//!
//! If you want to encrypt something so that only someone who knows the same password can
//! decrypt it, then FriendlyBox is for you.
//!
//! A [`Cryptographer`] encrypts and decrypts byte strings.  The password is stretched into a key
//! with PBKDF2-HMAC-SHA256 (using a salt and iteration count fixed when the [`Cryptographer`] is
//! created), and that key is used to produce a [Fernet](https://github.com/fernet/spec) token,
//! which provides both encryption and tamper detection.  Anything that goes wrong on decryption
//! -- wrong password, wrong salt, corrupted or truncated ciphertext -- is reported as
//! [`Error::Decryption`], and nothing more specific, so you don't have to care what's going on
//! underneath.
//!
//! ```rust
//! use friendly_box::{Cryptographer, Error};
//! # fn main() -> Result<(), Error> {
//!
//! let cryptographer = Cryptographer::new(b"", 1)?;
//!
//! let ciphertext = cryptographer.encrypt(b"secured data", b"MySecur3Pas5w0rd")?;
//! assert_eq!(
//!     b"secured data".to_vec(),
//!     cryptographer.decrypt(&ciphertext, b"MySecur3Pas5w0rd")?
//! );
//! # Ok(())
//! # }
//! ```
//!
//! (In real life, use more than one iteration.  The [`Default`] is 100,000.)
//!
//! # Encrypting Values
//!
//! If the thing you want to encrypt isn't a byte string, a [`FriendlyCryptographer`] will
//! serialize it for you, using a [`Codec`] ([`Cbor`] by default, or [`Json`]).  It'll serialize
//! the password, too, so the password can be a string, a number, a tuple, or just about anything
//! else that implements [`serde::Serialize`].
//!
//! There's a catch with that last part: equal values don't always serialize to identical bytes
//! (`HashSet` is the usual culprit), and a password that serializes differently is a different
//! password.  Stick to strings, numbers, and ordered collections for passwords, and you'll be
//! fine.  See [`Codec`] for the gory details.
//!
//! # Salts
//!
//! A salt stops an attacker from precomputing keys for likely passwords.  It isn't secret, but
//! it isn't stored in the ciphertext either, so if you use one (and you should), keep it next to
//! your ciphertexts.  [`generate_salt`] will make you one.
mod codec;
mod cryptographer;
mod envelope;
mod error;
mod friendly;

pub use ::ciborium;

pub use codec::{Cbor, Codec, CodecError, Json};
pub use cryptographer::{Cryptographer, DEFAULT_ITERATIONS};
pub use envelope::Envelope;
pub use error::Error;
pub use friendly::FriendlyCryptographer;

mod kdf;
mod key;

pub use key::{Key, generate_salt};
