use sha2::Sha256;

use super::Key;

pub(crate) fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Key {
	let mut output = Box::new([0u8; 32]);

	pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output[..]);

	output.into()
}
