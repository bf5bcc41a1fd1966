//! Background music catalog.

use serde::Serialize;

/// Free Music Archive storage URL for `$path`.
macro_rules! fma_url {
    ($($path:literal),+) => {
        concat!(
            "https://files.freemusicarchive.org/storage-freemusicarchive-org/music/",
            $($path),+
        )
    };
}

const FMA_BASE: &str = fma_url!("");

/// A selectable background track. An empty `url` means no music.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MusicTrack {
    pub name: &'static str,
    pub url: &'static str,
    /// Other names stored in older project documents.
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

/// Built-in tracks. The first entry is the silent default.
pub const MUSIC_TRACKS: &[MusicTrack] = &[
    MusicTrack {
        name: "None",
        url: "",
        aliases: &["Ninguna"],
    },
    MusicTrack {
        name: "Calm Ambient",
        url: fma_url!("Music_for_Videos/Kie_LoKaz/The_Architect/Kie_LoKaz_-_05_-_The_Architect.mp3"),
        aliases: &["Ambient Tranquilo"],
    },
    MusicTrack {
        name: "Energetic Corporate",
        url: fma_url!("no_curator/Monplaisir/Antigravity/Monplaisir_-_04_-_Antigravity.mp3"),
        aliases: &["Corporativo Enérgico"],
    },
    MusicTrack {
        name: "Modern Lounge",
        url: fma_url!(
            "ccCommunity/Chad_Crouch/Field_Report_Volume_III_The_Cali_Sessions/",
            "Chad_Crouch_-_21_-_Shipping_Lanes.mp3"
        ),
        aliases: &["Lounge Moderno"],
    },
];

impl MusicTrack {
    /// The silent track.
    pub fn none() -> &'static MusicTrack {
        &MUSIC_TRACKS[0]
    }

    /// Look up a track by name or alias (case-insensitive). Unknown names
    /// fall back to `None`.
    pub fn find_by_name(name: &str) -> &'static MusicTrack {
        let wanted = name.trim().to_lowercase();
        MUSIC_TRACKS
            .iter()
            .find(|t| t.names().any(|n| n.to_lowercase() == wanted))
            .unwrap_or_else(Self::none)
    }

    fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    pub fn is_none(&self) -> bool {
        self.url.is_empty()
    }

    /// Whether the track is hosted on the public music archive.
    pub fn is_archive_hosted(&self) -> bool {
        self.url.starts_with(FMA_BASE)
    }
}
