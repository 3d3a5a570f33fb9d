//! Hand-off of playback to the host operating system. The jukebox does not
//! decode audio itself; a song's `resource` is passed to the platform opener
//! and whatever player is registered for it takes over.

use thiserror::Error;

/// Problems starting playback. Blank resources are caught before touching the
/// launcher so the footer can give a precise message.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("song has no playable resource")]
    MissingResource,
    #[error("could not start a player for '{resource}': {source}")]
    Launcher {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}

/// Ask the host OS to play `resource` (a file path or URL).
pub fn play_resource(resource: &str) -> Result<(), PlaybackError> {
    let resource = resource.trim();
    if resource.is_empty() {
        return Err(PlaybackError::MissingResource);
    }

    open::that(resource).map_err(|source| PlaybackError::Launcher {
        resource: resource.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_resource_is_rejected_before_launching() {
        assert!(matches!(
            play_resource("   "),
            Err(PlaybackError::MissingResource)
        ));
    }
}
