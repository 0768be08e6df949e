//! Nghe Core
//!
//! Domain types shared by every Nghe crate: songs, playlists, search results
//! and users, exactly as the streaming server sends them.
//!
//! # Example
//!
//! ```rust
//! use nghe_core::{thumbnails_from_songs, Song, SongId};
//!
//! let songs = vec![Song {
//!     id: SongId::new(1),
//!     title: "Intro".to_string(),
//!     duration_seconds: 95,
//!     artist_name: "Band".to_string(),
//!     cover_art_url: Some("https://cdn.example.com/1.jpg".to_string()),
//! }];
//!
//! assert_eq!(thumbnails_from_songs(&songs), vec!["https://cdn.example.com/1.jpg"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

pub use types::{
    thumbnails_from_songs, PlaylistDetail, PlaylistId, PlaylistSummary, SearchResults, Song,
    SongId, User, MAX_THUMBNAILS,
};
