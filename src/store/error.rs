use std::path::PathBuf;

use snafu::{Location, Snafu};

use crate::media::MAX_THUMBNAIL_BYTES;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    /// could not reach the remote store
    Connection {
        url: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// remote store rejected the operation
    Query {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// remote store returned a record that could not be deserialized
    Deserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// remote store returned no record for a write that expected one
    EmptyResponse {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "thumbnail is {size} bytes, over the {MAX_THUMBNAIL_BYTES} byte per-record ceiling"
    ))]
    OversizedThumbnail {
        size: usize,
        #[snafu(implicit)]
        location: Location,
    },

    /// could not read or write a cache file
    CacheIo {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cache file {} holds invalid JSON: {source}", path.display()))]
    CacheSerde {
        path: PathBuf,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// payload could not be serialized for storage
    Serialize {
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
