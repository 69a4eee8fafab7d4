//! HTTP client for the remote user profile service.
//!
//! # Example
//!
//! ```no_run
//! use warden_client::{ProfileClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = ProfileClient::builder()
//!     .base_url("https://api.example.com")
//!     .build()?;
//!
//! let profile = client.fetch_user_profile(42).await?;
//! println!("{}", profile);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{ClientBuilder, DEFAULT_USER_AGENT, ProfileClient};
pub use error::{Error, Result};
