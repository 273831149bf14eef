//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Steps that must share a caller's
//! transaction take `&mut PgConnection` instead.

pub mod company_repo;
pub mod email_verification_repo;
pub mod form_field_repo;
pub mod queue_session_repo;
pub mod queue_ticket_repo;
pub mod room_repo;
pub mod user_profile_repo;
pub mod user_repo;
pub mod user_session_repo;

pub use company_repo::CompanyRepo;
pub use email_verification_repo::EmailVerificationRepo;
pub use form_field_repo::FormFieldRepo;
pub use queue_session_repo::QueueSessionRepo;
pub use queue_ticket_repo::QueueTicketRepo;
pub use room_repo::RoomRepo;
pub use user_profile_repo::UserProfileRepo;
pub use user_repo::UserRepo;
pub use user_session_repo::UserSessionRepo;
