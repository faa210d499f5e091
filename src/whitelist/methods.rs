//! Default Transmission RPC whitelist.
//!
//! Every location-bearing argument is confined to the configured download
//! prefix. Session settings that would let a caller run scripts, move the
//! incomplete directory or rebind the peer port are left out on purpose.

use super::arguments::ArgumentsValidator;
use super::field::FieldValidator::{self, Any};

/// `(method, validator)` pairs for every whitelisted method.
pub fn default_methods(download_prefix: &str) -> Vec<(&'static str, ArgumentsValidator)> {
    vec![
        ("torrent-start", torrent_action()),
        ("torrent-start-now", torrent_action()),
        ("torrent-stop", torrent_action()),
        ("torrent-verify", torrent_action()),
        ("torrent-reannounce", torrent_action()),
        ("torrent-set", torrent_set(download_prefix)),
        ("torrent-get", torrent_get()),
        ("torrent-add", torrent_add(download_prefix)),
        ("torrent-remove", torrent_remove()),
        ("torrent-set-location", torrent_set_location(download_prefix)),
        ("session-set", session_set(download_prefix)),
        ("session-get", session_get()),
        ("session-stats", ArgumentsValidator::empty()),
        ("blocklist-update", ArgumentsValidator::empty()),
        ("port-test", port_test()),
        ("session-close", ArgumentsValidator::empty()),
        ("queue-move-top", torrent_action()),
        ("queue-move-up", torrent_action()),
        ("queue-move-down", torrent_action()),
        ("queue-move-bottom", torrent_action()),
        ("free-space", free_space()),
        ("group-set", group_set()),
        ("group-get", group_get()),
    ]
}

fn location(download_prefix: &str) -> FieldValidator {
    FieldValidator::prefixed_location(download_prefix)
}

fn torrent_action() -> ArgumentsValidator {
    ArgumentsValidator::new([("ids", Any)])
}

fn torrent_set(download_prefix: &str) -> ArgumentsValidator {
    ArgumentsValidator::new([
        ("bandwidthPriority", Any),
        ("downloadLimit", Any),
        ("downloadLimited", Any),
        ("files-unwanted", Any),
        ("files-wanted", Any),
        ("group", Any),
        ("honorsSessionLimits", Any),
        ("ids", Any),
        ("labels", Any),
        ("location", location(download_prefix)),
        ("peer-limit", Any),
        ("priority-high", Any),
        ("priority-low", Any),
        ("priority-normal", Any),
        ("queuePosition", Any),
        ("seedIdleLimit", Any),
        ("seedIdleMode", Any),
        ("seedRatioLimit", Any),
        ("seedRatioMode", Any),
        ("sequentialDownload", Any),
        ("trackerList", Any),
        ("uploadLimit", Any),
        ("uploadLimited", Any),
    ])
}

fn torrent_get() -> ArgumentsValidator {
    ArgumentsValidator::new([("ids", Any), ("fields", Any), ("format", Any)])
}

fn torrent_add(download_prefix: &str) -> ArgumentsValidator {
    ArgumentsValidator::new([
        ("cookies", Any),
        ("download-dir", location(download_prefix)),
        ("filename", Any),
        ("labels", Any),
        ("metainfo", Any),
        ("paused", Any),
        ("peer-limit", Any),
        ("bandwidthPriority", Any),
        ("files-wanted", Any),
        ("files-unwanted", Any),
        ("priority-high", Any),
        ("priority-low", Any),
        ("priority-normal", Any),
    ])
}

fn torrent_remove() -> ArgumentsValidator {
    ArgumentsValidator::new([("ids", Any), ("delete-local-data", Any)])
}

fn torrent_set_location(download_prefix: &str) -> ArgumentsValidator {
    ArgumentsValidator::new([
        ("ids", Any),
        ("location", location(download_prefix)),
        ("move", Any),
    ])
}

fn session_set(download_prefix: &str) -> ArgumentsValidator {
    ArgumentsValidator::new([
        ("alt-speed-down", Any),
        ("alt-speed-enabled", Any),
        ("alt-speed-time-begin", Any),
        ("alt-speed-time-day", Any),
        ("alt-speed-time-enabled", Any),
        ("alt-speed-time-end", Any),
        ("alt-speed-up", Any),
        ("blocklist-enabled", Any),
        ("blocklist-url", Any),
        ("cache-size-mb", Any),
        ("default-trackers", Any),
        ("dht-enabled", Any),
        ("download-dir", location(download_prefix)),
        ("download-queue-enabled", Any),
        ("download-queue-size", Any),
        ("encryption", Any),
        ("idle-seeding-limit-enabled", Any),
        ("idle-seeding-limit", Any),
        ("lpd-enabled", Any),
        ("peer-limit-global", Any),
        ("peer-limit-per-torrent", Any),
        ("pex-enabled", Any),
        ("port-forwarding-enabled", Any),
        ("queue-stalled-enabled", Any),
        ("queue-stalled-minutes", Any),
        ("rename-partial-files", Any),
        ("seed-queue-enabled", Any),
        ("seed-queue-size", Any),
        ("seedRatioLimit", Any),
        ("seedRatioLimited", Any),
        ("speed-limit-down-enabled", Any),
        ("speed-limit-down", Any),
        ("speed-limit-up-enabled", Any),
        ("speed-limit-up", Any),
        ("start-added-torrents", Any),
        ("trash-original-torrent-files", Any),
        ("utp-enabled", Any),
    ])
}

fn session_get() -> ArgumentsValidator {
    ArgumentsValidator::new([("fields", Any)])
}

fn port_test() -> ArgumentsValidator {
    ArgumentsValidator::new([("ipProtocol", Any)])
}

fn free_space() -> ArgumentsValidator {
    ArgumentsValidator::new([("path", Any)])
}

fn group_set() -> ArgumentsValidator {
    ArgumentsValidator::new([
        ("honorsSessionLimits", Any),
        ("name", Any),
        ("speed-limit-down-enabled", Any),
        ("speed-limit-down", Any),
        ("speed-limit-up-enabled", Any),
        ("speed-limit-up", Any),
    ])
}

fn group_get() -> ArgumentsValidator {
    ArgumentsValidator::new([("group", Any)])
}
