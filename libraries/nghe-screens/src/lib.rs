//! Nghe - Screen State
//!
//! Presentation-independent state holders for the Nghe client screens.
//!
//! Each screen publishes its state through a `tokio::sync::watch` channel
//! and exposes async actions that talk to the [`MusicRepository`]. A UI layer
//! renders the state and spawns the actions; nothing here draws anything.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = AppContext::new(repository, session, player);
//! ctx.spawn_logout_listener()?;
//!
//! let (home, mut messages) = ctx.home_screen();
//! home.refresh().await;
//! while let Some(message) = messages.recv().await {
//!     println!("{}", message);
//! }
//! ```
//!
//! [`MusicRepository`]: nghe_client::MusicRepository

#![forbid(unsafe_code)]

mod auth;
mod context;
mod error;
mod home;
mod pager;
mod playback;
mod playlist_detail;
mod search;

pub use auth::{AuthScreen, AuthState};
pub use context::{AppContext, Navigator, RepositoryStreamResolver, Route, DEFAULT_SEARCH_DEBOUNCE};
pub use error::{Result, ScreenError};
pub use home::{HomeScreen, HomeState};
pub use playback::NO_SONGS_MESSAGE;
pub use playlist_detail::{PlaylistDetailScreen, PlaylistDetailState};
pub use search::{SearchScreen, SearchState};
