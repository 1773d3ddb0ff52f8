pub mod session;

pub use session::PgSessionRepository;
