pub mod reset;

pub use reset::LoggingResetTokenNotifier;
