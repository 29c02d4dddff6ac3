pub mod movie;
pub mod ranking;
pub mod user;

pub use movie::{AdminReviewRequest, AdminReviewResponse, Genre, Movie, NewMovie};
pub use ranking::{Classification, ClassificationRequest, Ranking, RankingEntry, SENTINEL_RANK};
pub use user::{
    normalize_email, LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, Role, User,
    UserResponse,
};
