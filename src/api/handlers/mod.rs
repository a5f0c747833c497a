pub mod health;
pub use self::health::health;

pub mod whoami;
pub use self::whoami::whoami;
