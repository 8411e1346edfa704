use md5::{Digest, Md5};

/// Fixed salt mixed into every password before hashing. Changing it would
/// orphan every hash already stored in the users table.
pub(crate) const SALT: &str = "NJFU";

/// Hex MD5 digest of `SALT + plain`. Registration and login must produce
/// the same digest for the same password.
pub fn hash_password(plain: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(SALT.as_bytes());
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}
