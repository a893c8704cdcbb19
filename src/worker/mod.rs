pub mod expiration_sweeper;

pub use expiration_sweeper::ExpirationSweeper;
