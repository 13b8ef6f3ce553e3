pub mod sha256;

pub use self::sha256::Sha256Hash;
