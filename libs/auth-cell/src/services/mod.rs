pub mod login;
pub mod session;

pub use login::LoginService;
pub use session::{SessionStore, ADMIN_TOKEN_KEY};
