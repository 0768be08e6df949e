mod ids;
mod playlist;
mod search;
mod song;
mod user;

pub use ids::{PlaylistId, SongId};
pub use playlist::{thumbnails_from_songs, PlaylistDetail, PlaylistSummary, MAX_THUMBNAILS};
pub use search::SearchResults;
pub use song::Song;
pub use user::User;

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` the same way as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
