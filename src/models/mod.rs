pub mod business;
pub mod meta;
pub mod notification;
pub mod user;

pub use business::{
    Business, BusinessCategory, BusinessFilter, CategoryMatch, CreateBusinessRequest, SortField,
    SortOrder, UpdateBusinessRequest,
};
pub use meta::{Category, Country, SeedOutcome, State};
pub use notification::{NewNotification, Notification, NotificationType};
pub use user::{
    ForgotPasswordRequest, LoginRequest, PublicUser, RegisterRequest, ResetPasswordRequest,
    UpdateUserRequest, User, UserProfile, UserType,
};
