pub mod auth_dto;

pub use auth_dto::{
    LoginRequest, LoginResponse, LoginUserResponse,
    RefreshTokenRequest, RefreshTokenResponse,
    UserInfoResponse, TokenInfo,
};
