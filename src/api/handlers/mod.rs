pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod session;
pub use self::session::{logout, me};

pub mod users;
pub use self::users::list_users;

pub mod types;
