type Cause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error, thiserror_ext::Construct)]
#[non_exhaustive]
pub enum Error {
	#[error("failed to decrypt ciphertext")]
	Decryption,

	#[error("invalid configuration: {0}")]
	Configuration(String),

	#[error("failed to serialize {element}: {cause}")]
	Serialization { element: String, cause: Cause },

	#[error("failed to deserialize plaintext: {cause}")]
	Deserialization { cause: Cause },

	#[error("CAN'T HAPPEN: {0}")]
	Insanity(String),

	#[error("invalid envelope: {0}")]
	InvalidEnvelope(String),
}
