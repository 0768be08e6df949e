//! Subcommands and their text output

use crate::config::AppConfig;
use crate::error::Result;
use crate::player;
use clap::Subcommand;
use nghe_client::MusicRepository;
use nghe_core::{PlaylistDetail, PlaylistId, PlaylistSummary, SearchResults, Song, SongId};
use nghe_playback::format_clock;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "NGHE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "NGHE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// List your playlists
    Playlists {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// List the song catalog
    Songs {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show a playlist and its songs
    Playlist { id: PlaylistId },
    /// Search songs and playlists
    Search { query: String },
    /// Print the audio URL a song redirects to
    StreamUrl { song_id: SongId },
    CreatePlaylist { name: String },
    RenamePlaylist { id: PlaylistId, name: String },
    DeletePlaylist { id: PlaylistId },
    /// Add a song to a playlist
    AddSong { playlist: PlaylistId, song: SongId },
    /// Remove a song from a playlist
    RemoveSong { playlist: PlaylistId, song: SongId },
    /// Switch a playlist between public and private
    TogglePrivacy { id: PlaylistId },
    /// Queue a playlist and print the first stream the player prepares
    Play {
        playlist: PlaylistId,
        #[arg(long, default_value_t = 0)]
        start: usize,
    },
    /// Show the effective configuration
    Config,
}

/// Run one command and return what to print
pub async fn execute(
    command: Command,
    repository: Arc<dyn MusicRepository>,
    config: &AppConfig,
) -> Result<String> {
    let output = match command {
        Command::Login { username, password } => {
            repository.login(&username, &password).await?;
            info!(username = %username, "Session saved");
            format!("Logged in as {}", username)
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let user = repository.register(&username, &email, &password).await?;
            format!("Registered {} (id {})", user.username, user.id)
        }
        Command::Logout => {
            repository.logout().await?;
            "Logged out".to_string()
        }
        Command::Playlists { page } => render_playlists(&repository.my_playlists(page).await?),
        Command::Songs { page } => render_songs(&repository.all_songs(page).await?),
        Command::Playlist { id } => render_detail(&repository.playlist_detail(id).await?),
        Command::Search { query } => render_search(&repository.search(&query).await?),
        Command::StreamUrl { song_id } => repository.song_stream_url(song_id).await?,
        Command::CreatePlaylist { name } => {
            let created = repository.create_playlist(&name).await?;
            format!("Created playlist '{}' (id {})", created.name, created.id)
        }
        Command::RenamePlaylist { id, name } => {
            repository.rename_playlist(id, &name).await?;
            format!("Renamed playlist {} to '{}'", id, name)
        }
        Command::DeletePlaylist { id } => {
            repository.delete_playlist(id).await?;
            format!("Deleted playlist {}", id)
        }
        Command::AddSong { playlist, song } => {
            let detail = repository.add_song_to_playlist(playlist, song).await?;
            format!(
                "Added song {} to '{}' ({} songs)",
                song,
                detail.name,
                detail.songs.len()
            )
        }
        Command::RemoveSong { playlist, song } => {
            repository.remove_song_from_playlist(playlist, song).await?;
            format!("Removed song {} from playlist {}", song, playlist)
        }
        Command::TogglePrivacy { id } => {
            repository.toggle_privacy(id).await?;
            format!("Changed visibility of playlist {}", id)
        }
        Command::Play { playlist, start } => {
            let outcome = player::play_once(repository, config, playlist, start).await?;
            let item = &outcome.item;
            let mut out = format!(
                "Now playing: {} - {}\n{}",
                item.metadata.title, item.metadata.artist, item.uri
            );
            if let Some(color) = outcome.color {
                let _ = write!(out, "\nArtwork color: {}", color);
            }
            out
        }
        Command::Config => config.to_toml()?,
    };
    Ok(output)
}

pub fn render_songs(songs: &[Song]) -> String {
    if songs.is_empty() {
        return "No songs".to_string();
    }
    let mut out = String::new();
    for song in songs {
        let _ = writeln!(
            out,
            "{:>6}  {}  {} - {}",
            song.id,
            format_clock(song.duration()),
            song.title,
            song.artist_name
        );
    }
    out.trim_end().to_string()
}

pub fn render_playlists(playlists: &[PlaylistSummary]) -> String {
    if playlists.is_empty() {
        return "No playlists".to_string();
    }
    let mut out = String::new();
    for playlist in playlists {
        let _ = writeln!(
            out,
            "{:>6}  {} ({}, {})",
            playlist.id,
            playlist.name,
            playlist.owner_username,
            visibility(playlist.is_public)
        );
    }
    out.trim_end().to_string()
}

pub fn render_detail(detail: &PlaylistDetail) -> String {
    format!(
        "{} by {} ({})\n{}",
        detail.name,
        detail.owner_username,
        visibility(detail.is_public),
        render_songs(&detail.songs)
    )
}

pub fn render_search(results: &SearchResults) -> String {
    if results.is_empty() {
        return "No results".to_string();
    }
    format!(
        "Songs:\n{}\n\nPlaylists:\n{}",
        render_songs(&results.songs),
        render_playlists(&results.playlists)
    )
}

fn visibility(is_public: bool) -> &'static str {
    if is_public {
        "public"
    } else {
        "private"
    }
}
