use std::collections::HashSet;

/// A COMM frame payload. ID3 allows several comments per tag, told apart
/// by `(lang, description)`, so both are carried alongside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordComment {
    pub lang: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

/// Everything written to one sample file. Numeric fields (track, disc,
/// year, bpm) are kept as strings and written verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Relative to the base directory.
    pub path: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
    pub album: &'static str,

    pub album_artist: &'static str,
    pub genre: &'static str,
    pub track: &'static str,
    pub disc: &'static str,
    pub year: &'static str,
    pub composer: &'static str,
    pub publisher: &'static str,
    pub copyright: &'static str,
    pub bpm: &'static str,
    pub key: &'static str,
    pub isrc: &'static str,
    pub encoder: &'static str,
    pub comment: RecordComment,
}

const ESSENTIALS: MetadataRecord = MetadataRecord {
    path: "",
    title: "",
    artist: "",
    album: "Radio Essentials",
    album_artist: "WXYZ Radio",
    genre: "Radio",
    track: "",
    disc: "1/2",
    year: "2024",
    composer: "WXYZ Creative Services",
    publisher: "WXYZ Radio Productions",
    copyright: "(C) 2024 WXYZ Radio",
    bpm: "",
    key: "",
    isrc: "",
    encoder: "LAME 3.100",
    comment: RecordComment {
        lang: "eng",
        description: "",
        text: "",
    },
};

const JINGLES: MetadataRecord = MetadataRecord {
    album: "Radio Jingles",
    disc: "2/2",
    genre: "Jingle",
    ..ESSENTIALS
};

/// The ten bundled samples, root folder first, then `subfolder/`.
pub const SAMPLE_RECORDS: [MetadataRecord; 10] = [
    MetadataRecord {
        path: "sample-audio/01-welcome.mp3",
        title: "Welcome",
        artist: "DJ Rockstar",
        track: "1/5",
        bpm: "120",
        key: "C",
        isrc: "USWXY2400001",
        comment: RecordComment {
            text: "Opening sweeper for the morning show",
            ..ESSENTIALS.comment
        },
        ..ESSENTIALS
    },
    MetadataRecord {
        path: "sample-audio/02-station-id.mp3",
        title: "Station ID",
        artist: "WXYZ Radio",
        track: "2/5",
        bpm: "128",
        key: "G",
        isrc: "USWXY2400002",
        comment: RecordComment {
            text: "Legal ID, top of the hour",
            ..ESSENTIALS.comment
        },
        ..ESSENTIALS
    },
    MetadataRecord {
        path: "sample-audio/03-weather.mp3",
        title: "Weather Update",
        artist: "News Team",
        track: "3/5",
        bpm: "96",
        key: "F",
        isrc: "USWXY2400003",
        comment: RecordComment {
            text: "Bed for the weather read",
            ..ESSENTIALS.comment
        },
        ..ESSENTIALS
    },
    MetadataRecord {
        path: "sample-audio/04-news-intro.mp3",
        title: "News Intro",
        artist: "News Team",
        track: "4/5",
        bpm: "110",
        key: "Dm",
        isrc: "USWXY2400004",
        comment: RecordComment {
            text: "Intro stinger for the newscast",
            ..ESSENTIALS.comment
        },
        ..ESSENTIALS
    },
    MetadataRecord {
        path: "sample-audio/05-commercial-break.mp3",
        title: "Commercial Break",
        artist: "Ad Department",
        track: "5/5",
        bpm: "124",
        key: "A",
        isrc: "USWXY2400005",
        comment: RecordComment {
            text: "Into-break bumper",
            ..ESSENTIALS.comment
        },
        ..ESSENTIALS
    },
    MetadataRecord {
        path: "sample-audio/subfolder/06-time-check.mp3",
        title: "Time Check",
        artist: "DJ Rockstar",
        track: "1/4",
        bpm: "118",
        key: "E",
        isrc: "USWXY2400006",
        comment: RecordComment {
            text: "Short time-check jingle",
            ..JINGLES.comment
        },
        ..JINGLES
    },
    MetadataRecord {
        path: "sample-audio/subfolder/07-traffic.mp3",
        title: "Traffic Report",
        artist: "Traffic Watch",
        track: "2/4",
        bpm: "132",
        key: "Bb",
        isrc: "USWXY2400007",
        comment: RecordComment {
            text: "Traffic bed, loops cleanly",
            ..JINGLES.comment
        },
        ..JINGLES
    },
    MetadataRecord {
        path: "sample-audio/subfolder/08-jinglereallylongnamereallylongnamereallylongname.mp3",
        title: "Super Long Jingle Name For Testing",
        artist: "The Extended Artists Collective",
        album: "The Album With A Really Long Name",
        album_artist: "The Extended Artists Collective",
        track: "1/1",
        disc: "1/1",
        bpm: "100",
        key: "Ab",
        isrc: "USWXY2400008",
        comment: RecordComment {
            text: "Exercises long names in list and now-playing views",
            ..JINGLES.comment
        },
        ..JINGLES
    },
    MetadataRecord {
        path: "sample-audio/subfolder/09-outro.mp3",
        title: "Outro",
        artist: "DJ Rockstar",
        track: "3/4",
        bpm: "90",
        key: "C",
        isrc: "USWXY2400009",
        comment: RecordComment {
            text: "End-of-show outro",
            ..JINGLES.comment
        },
        ..JINGLES
    },
    MetadataRecord {
        path: "sample-audio/subfolder/10-test-tone.mp3",
        title: "Test Tone",
        artist: "Engineering",
        genre: "Test",
        track: "4/4",
        bpm: "60",
        key: "A",
        isrc: "USWXY2400010",
        comment: RecordComment {
            text: "1 kHz reference tone at -18 dBFS",
            ..JINGLES.comment
        },
        ..JINGLES
    },
];

pub fn sample_records() -> &'static [MetadataRecord] {
    &SAMPLE_RECORDS
}

/// Paths that appear more than once, in order of their second appearance.
/// Uniqueness is not enforced; callers only warn.
pub fn duplicate_paths(records: &[MetadataRecord]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for record in records {
        if !seen.insert(record.path) && !dups.contains(&record.path) {
            dups.push(record.path);
        }
    }
    dups
}
