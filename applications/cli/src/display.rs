//! Plain-text rendering of player state

use explayer_core::format_time;
use explayer_playback::{PlaybackStatus, Player};
use std::fmt::Write;

pub fn status_label(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Stopped => "stopped",
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Paused => "paused",
    }
}

/// One line per track: marker, index, favorite star, title, artist, duration
pub fn playlist(player: &Player) -> String {
    let model = player.playlist();
    if model.is_empty() {
        return "Playlist is empty\n".to_string();
    }

    let mut out = String::new();
    for (index, track) in model.tracks().iter().enumerate() {
        let marker = if model.current_index() == Some(index) { '>' } else { ' ' };
        let star = if model.is_favorite(&track.id) { '*' } else { ' ' };
        let duration = track
            .duration()
            .map_or_else(|| "--:--".to_string(), |d| format_time(d.as_secs_f64()));
        let _ = writeln!(
            out,
            "{marker}{index:>3} {star} {} - {} [{duration}]  {}",
            track.title, track.artist, track.id
        );
    }
    out
}

/// Favorites in playlist order
pub fn favorites(player: &Player) -> String {
    let favorites = player.playlist().favorite_tracks();
    if favorites.is_empty() {
        return "No favorites\n".to_string();
    }

    let mut out = String::new();
    for track in favorites {
        let _ = writeln!(out, "* {} - {}  {}", track.title, track.artist, track.id);
    }
    out
}

/// Transport summary
pub fn status(player: &Player) -> String {
    let transport = player.transport();
    let mut out = String::new();

    match player.current_track() {
        Some(track) => {
            let _ = writeln!(out, "Track:    {} - {}", track.title, track.artist);
        }
        None => out.push_str("Track:    none\n"),
    }

    let elapsed = format_time(transport.position());
    let total = transport
        .duration()
        .or_else(|| player.current_track().and_then(|t| t.duration()))
        .map_or_else(|| "--:--".to_string(), |d| format_time(d.as_secs_f64()));
    let volume = transport.volume();

    let _ = writeln!(out, "Status:   {}", status_label(player.status()));
    let _ = writeln!(out, "Position: {elapsed} / {total}");
    let _ = writeln!(
        out,
        "Shuffle:  {}",
        if transport.is_shuffled() { "on" } else { "off" }
    );
    let _ = writeln!(out, "Repeat:   {}", transport.repeat_mode());
    let _ = writeln!(
        out,
        "Volume:   {}%{}",
        volume.level(),
        if volume.is_muted() { " (muted)" } else { "" }
    );
    let _ = writeln!(
        out,
        "Tracks:   {} ({} favorites)",
        player.playlist().len(),
        player.playlist().favorite_count()
    );
    out
}
