pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod userinfo;

pub use login::LoginUseCase;
pub use logout::LogoutUseCase;
pub use refresh_token::RefreshTokenUseCase;
pub use userinfo::UserInfoUseCase;
