use anyhow::Context;
use clap::ValueEnum;
use id3::{frame::Comment, Content, Encoding, ErrorKind, Frame, Tag, TagLike, Version};
use std::path::Path;

use crate::catalog::MetadataRecord;

/// Which fields of a record get written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Title, artist and album only.
    Minimal,
    /// Every field in the record, including the comment.
    Extended,
}

/// What happens to frames already present in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateMode {
    /// Delete every existing frame before writing, so nothing stale survives.
    Replace,
    /// Keep frames the record does not set.
    Merge,
}

impl Variant {
    pub fn default_mode(self) -> UpdateMode {
        match self {
            Variant::Minimal => UpdateMode::Merge,
            Variant::Extended => UpdateMode::Replace,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Minimal => "minimal",
            Variant::Extended => "extended",
        }
    }
}

impl UpdateMode {
    pub fn name(self) -> &'static str {
        match self {
            UpdateMode::Replace => "replace",
            UpdateMode::Merge => "merge",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagOptions {
    pub variant: Variant,
    pub mode: UpdateMode,
    pub version: Version,
    pub dry_run: bool,
}

impl TagOptions {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            mode: variant.default_mode(),
            version: Version::Id3v24,
            dry_run: false,
        }
    }

    /// v2.4 stores text as UTF-8; v2.3 has no UTF-8 so falls back to UTF-16.
    pub fn encoding(&self) -> Encoding {
        match self.version {
            Version::Id3v24 => Encoding::UTF8,
            _ => Encoding::UTF16,
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    /// The file had no ID3 header and a fresh tag was created.
    pub created: bool,
    /// Frames removed before writing (replace mode only).
    pub cleared: usize,
    /// Frame ids written, in write order.
    pub frames: Vec<String>,
    pub written: bool,
    /// A trailing ID3v1 tag was stripped (replace mode only).
    pub removed_v1: bool,
}

fn year_frame_id(version: Version) -> &'static str {
    match version {
        Version::Id3v24 => "TDRC",
        _ => "TYER",
    }
}

/// Text frames for `record` under `variant`, as `(frame id, value)`.
pub fn text_frames(
    record: &MetadataRecord,
    variant: Variant,
    version: Version,
) -> Vec<(&'static str, &'static str)> {
    let mut frames = vec![
        ("TIT2", record.title),
        ("TPE1", record.artist),
        ("TALB", record.album),
    ];
    if variant == Variant::Extended {
        frames.extend([
            ("TPE2", record.album_artist),
            ("TCON", record.genre),
            ("TRCK", record.track),
            ("TPOS", record.disc),
            (year_frame_id(version), record.year),
            ("TCOM", record.composer),
            ("TPUB", record.publisher),
            ("TCOP", record.copyright),
            ("TBPM", record.bpm),
            ("TKEY", record.key),
            ("TSRC", record.isrc),
            ("TSSE", record.encoder),
        ]);
    }
    frames
}

/// Load the tag stored in `path`. A file without an ID3 header yields an
/// empty tag and `true`; any other read failure is an error.
pub fn load_or_create(path: &Path) -> anyhow::Result<(Tag, bool)> {
    match Tag::read_from_path(path) {
        Ok(tag) => Ok((tag, false)),
        Err(id3::Error {
            kind: ErrorKind::NoTag,
            ..
        }) => Ok((Tag::new(), true)),
        Err(e) => Err(e).context("reading ID3 tag"),
    }
}

/// Remove every frame from `tag`, returning how many were dropped.
pub fn clear_frames(tag: &mut Tag) -> usize {
    let mut ids: Vec<String> = tag.frames().map(|f| f.id().to_string()).collect();
    let count = ids.len();
    ids.dedup();
    for id in ids {
        tag.remove(&id);
    }
    count
}

/// Set every frame the record declares. Same-id frames (and for COMM the
/// same language and description) are replaced, not duplicated.
pub fn apply_record(tag: &mut Tag, record: &MetadataRecord, options: &TagOptions) -> Vec<String> {
    let encoding = options.encoding();
    let mut written = Vec::new();

    for (id, value) in text_frames(record, options.variant, options.version) {
        tag.add_frame(Frame::text(id, value).set_encoding(Some(encoding)));
        written.push(id.to_string());
    }

    if options.variant == Variant::Extended {
        let comment = record.comment;
        let frame = Frame::with_content(
            "COMM",
            Content::Comment(Comment {
                lang: comment.lang.to_string(),
                description: comment.description.to_string(),
                text: comment.text.to_string(),
            }),
        )
        .set_encoding(Some(encoding));
        tag.add_frame(frame);
        written.push("COMM".to_string());
    }

    written
}

/// Load, update and persist the tag of a single file.
pub fn tag_file(
    path: &Path,
    record: &MetadataRecord,
    options: &TagOptions,
) -> anyhow::Result<TagReport> {
    let (mut tag, created) = load_or_create(path)?;

    let cleared = match options.mode {
        UpdateMode::Replace => clear_frames(&mut tag),
        UpdateMode::Merge => 0,
    };

    let frames = apply_record(&mut tag, record, options);

    let mut removed_v1 = false;
    if !options.dry_run {
        tag.write_to_path(path, options.version).context("writing ID3 tag")?;
        if options.mode == UpdateMode::Replace {
            removed_v1 = id3::v1::Tag::remove_from_path(path).context("removing ID3v1 tag")?;
        }
    }

    Ok(TagReport {
        created,
        cleared,
        frames,
        written: !options.dry_run,
        removed_v1,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::SAMPLE_RECORDS;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// A few MPEG frame-sync bytes, enough for the tagger to treat as audio.
    pub(crate) fn write_fake_mp3(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut data = vec![0xFF, 0xFB, 0x90, 0x64];
        data.extend(std::iter::repeat(0u8).take(412));
        std::fs::write(path, data).unwrap();
    }

    /// An ID3 header with an unsupported major version, followed by junk.
    pub(crate) fn write_corrupt_mp3(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut data = b"ID3".to_vec();
        data.extend([0x09, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]);
        data.extend([0xAB; 64]);
        data.extend([0xFF, 0xFB, 0x90, 0x64]);
        std::fs::write(path, data).unwrap();
    }

    /// Appends a 128-byte ID3v1 block titled "Old v1 Title".
    fn append_v1_tag(path: &Path) {
        let mut block = b"TAG".to_vec();
        let mut title = b"Old v1 Title".to_vec();
        title.resize(30, 0);
        block.extend(title);
        block.resize(127, 0);
        block.push(12);
        let mut data = std::fs::read(path).unwrap();
        data.extend(block);
        std::fs::write(path, data).unwrap();
    }

    fn has_v1_tag(path: &Path) -> bool {
        let data = std::fs::read(path).unwrap();
        data.len() >= 128 && &data[data.len() - 128..data.len() - 125] == b"TAG"
    }

    /// Text encoding byte that follows the 10-byte header of frame `id`.
    fn raw_encoding_byte(path: &Path, id: &[u8; 4]) -> u8 {
        let data = std::fs::read(path).unwrap();
        let pos = data
            .windows(4)
            .position(|w| w == id)
            .expect("frame id present in file");
        data[pos + 10]
    }

    pub(crate) fn text(tag: &Tag, id: &str) -> Option<String> {
        tag.get(id)
            .and_then(|f| f.content().text())
            .map(str::to_string)
    }

    fn scratch(name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        write_fake_mp3(&path);
        (dir, path)
    }

    #[test]
    fn test_default_modes() {
        assert_eq!(Variant::Minimal.default_mode(), UpdateMode::Merge);
        assert_eq!(Variant::Extended.default_mode(), UpdateMode::Replace);
        assert_eq!(TagOptions::new(Variant::Extended).encoding(), Encoding::UTF8);
    }

    #[test]
    fn test_text_frames_minimal() {
        let frames = text_frames(&SAMPLE_RECORDS[0], Variant::Minimal, Version::Id3v24);
        assert_eq!(
            frames,
            vec![
                ("TIT2", "Welcome"),
                ("TPE1", "DJ Rockstar"),
                ("TALB", "Radio Essentials")
            ]
        );
    }

    #[test]
    fn test_text_frames_year_follows_version() {
        let v24 = text_frames(&SAMPLE_RECORDS[0], Variant::Extended, Version::Id3v24);
        let v23 = text_frames(&SAMPLE_RECORDS[0], Variant::Extended, Version::Id3v23);
        assert!(v24.contains(&("TDRC", "2024")));
        assert!(v23.contains(&("TYER", "2024")));
        assert_eq!(v24.len(), 15);
    }

    #[test]
    fn test_no_header_creates_empty_tag() {
        let (_dir, path) = scratch("a.mp3");
        let (tag, created) = load_or_create(&path).unwrap();
        assert!(created);
        assert_eq!(tag.frames().count(), 0);
    }

    #[test]
    fn test_corrupt_header_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.mp3");
        write_corrupt_mp3(&path);
        assert!(load_or_create(&path).is_err());
    }

    #[test]
    fn test_minimal_round_trip() {
        let (_dir, path) = scratch("a.mp3");
        let record = MetadataRecord {
            path: "a.mp3",
            ..SAMPLE_RECORDS[0]
        };
        let report = tag_file(&path, &record, &TagOptions::new(Variant::Minimal)).unwrap();
        assert!(report.created);
        assert!(report.written);
        assert_eq!(report.frames, vec!["TIT2", "TPE1", "TALB"]);

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.title(), Some("Welcome"));
        assert_eq!(tag.artist(), Some("DJ Rockstar"));
        assert_eq!(tag.album(), Some("Radio Essentials"));
        assert!(tag.get("TBPM").is_none());
    }

    #[test]
    fn test_extended_round_trip() {
        let (_dir, path) = scratch("b.mp3");
        let record = SAMPLE_RECORDS[7];
        tag_file(&path, &record, &TagOptions::new(Variant::Extended)).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.title(), Some(record.title));
        assert_eq!(text(&tag, "TPE2").as_deref(), Some(record.album_artist));
        assert_eq!(text(&tag, "TCON").as_deref(), Some(record.genre));
        assert_eq!(text(&tag, "TRCK").as_deref(), Some("1/1"));
        assert_eq!(text(&tag, "TPOS").as_deref(), Some("1/1"));
        assert_eq!(text(&tag, "TBPM").as_deref(), Some("100"));
        assert_eq!(text(&tag, "TKEY").as_deref(), Some("Ab"));
        assert_eq!(text(&tag, "TSRC").as_deref(), Some("USWXY2400008"));
        assert_eq!(text(&tag, "TSSE").as_deref(), Some("LAME 3.100"));
        assert_eq!(text(&tag, "TCOP").as_deref(), Some(record.copyright));

        let comments: Vec<_> = tag.comments().collect();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].lang, "eng");
        assert_eq!(comments[0].text, record.comment.text);
    }

    #[test]
    fn test_merge_keeps_unset_frames() {
        let (_dir, path) = scratch("c.mp3");
        let mut existing = Tag::new();
        existing.set_text("TCON", "Old Genre");
        existing.set_title("Old Title");
        existing.write_to_path(&path, Version::Id3v24).unwrap();

        let options = TagOptions::new(Variant::Minimal);
        let report = tag_file(&path, &SAMPLE_RECORDS[1], &options).unwrap();
        assert!(!report.created);
        assert_eq!(report.cleared, 0);

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.title(), Some("Station ID"));
        assert_eq!(text(&tag, "TCON").as_deref(), Some("Old Genre"));
        assert_eq!(tag.frames().filter(|f| f.id() == "TIT2").count(), 1);
    }

    #[test]
    fn test_replace_drops_stale_frames() {
        let (_dir, path) = scratch("d.mp3");
        let mut existing = Tag::new();
        existing.set_text("TMOO", "Stale");
        existing.set_title("Old Title");
        existing.write_to_path(&path, Version::Id3v24).unwrap();

        let options = TagOptions {
            mode: UpdateMode::Replace,
            ..TagOptions::new(Variant::Minimal)
        };
        let report = tag_file(&path, &SAMPLE_RECORDS[1], &options).unwrap();
        assert_eq!(report.cleared, 2);

        let tag = Tag::read_from_path(&path).unwrap();
        assert!(tag.get("TMOO").is_none());
        assert_eq!(tag.frames().count(), 3);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let (_dir, path) = scratch("e.mp3");
        let options = TagOptions::new(Variant::Extended);

        tag_file(&path, &SAMPLE_RECORDS[3], &options).unwrap();
        let once: Vec<Frame> = Tag::read_from_path(&path).unwrap().frames().cloned().collect();
        let report = tag_file(&path, &SAMPLE_RECORDS[3], &options).unwrap();
        let twice: Vec<Frame> = Tag::read_from_path(&path).unwrap().frames().cloned().collect();

        assert_eq!(report.cleared, 16);
        assert_eq!(once.len(), 16);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_comment_with_other_description_survives_merge() {
        let (_dir, path) = scratch("f.mp3");
        let mut existing = Tag::new();
        existing.add_frame(Comment {
            lang: "eng".to_string(),
            description: "notes".to_string(),
            text: "keep me".to_string(),
        });
        existing.write_to_path(&path, Version::Id3v24).unwrap();

        let options = TagOptions {
            mode: UpdateMode::Merge,
            ..TagOptions::new(Variant::Extended)
        };
        tag_file(&path, &SAMPLE_RECORDS[0], &options).unwrap();
        tag_file(&path, &SAMPLE_RECORDS[0], &options).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        let mut descriptions: Vec<_> = tag.comments().map(|c| c.description.clone()).collect();
        descriptions.sort();
        assert_eq!(descriptions, vec!["".to_string(), "notes".to_string()]);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let (_dir, path) = scratch("g.mp3");
        let before = std::fs::read(&path).unwrap();
        let options = TagOptions {
            dry_run: true,
            ..TagOptions::new(Variant::Extended)
        };
        let report = tag_file(&path, &SAMPLE_RECORDS[0], &options).unwrap();
        assert!(!report.written);
        assert_eq!(report.frames.len(), 16);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_id3v23_round_trip() {
        let (_dir, path) = scratch("h.mp3");
        let options = TagOptions {
            version: Version::Id3v23,
            ..TagOptions::new(Variant::Extended)
        };
        tag_file(&path, &SAMPLE_RECORDS[5], &options).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.version(), Version::Id3v23);
        assert_eq!(tag.title(), Some("Time Check"));
        assert_eq!(tag.year(), Some(2024));
    }

    #[test]
    fn test_frames_carry_utf8_encoding_in_v24() {
        let (_dir, path) = scratch("i.mp3");
        tag_file(&path, &SAMPLE_RECORDS[0], &TagOptions::new(Variant::Extended)).unwrap();

        assert_eq!(raw_encoding_byte(&path, b"TIT2"), 0x03);
        assert_eq!(raw_encoding_byte(&path, b"TSRC"), 0x03);
        assert_eq!(raw_encoding_byte(&path, b"COMM"), 0x03);
    }

    #[test]
    fn test_frames_carry_utf16_encoding_in_v23() {
        let (_dir, path) = scratch("j.mp3");
        let options = TagOptions {
            version: Version::Id3v23,
            ..TagOptions::new(Variant::Extended)
        };
        tag_file(&path, &SAMPLE_RECORDS[0], &options).unwrap();

        assert_eq!(raw_encoding_byte(&path, b"TIT2"), 0x01);
        assert_eq!(raw_encoding_byte(&path, b"COMM"), 0x01);
    }

    #[test]
    fn test_replace_strips_trailing_v1_tag() {
        let (_dir, path) = scratch("k.mp3");
        append_v1_tag(&path);
        assert!(has_v1_tag(&path));

        let options = TagOptions::new(Variant::Extended);
        let report = tag_file(&path, &SAMPLE_RECORDS[0], &options).unwrap();
        assert!(report.removed_v1);
        assert!(!has_v1_tag(&path));
        assert_eq!(Tag::read_from_path(&path).unwrap().title(), Some("Welcome"));
    }

    #[test]
    fn test_merge_keeps_trailing_v1_tag() {
        let (_dir, path) = scratch("l.mp3");
        append_v1_tag(&path);

        let options = TagOptions::new(Variant::Minimal);
        let report = tag_file(&path, &SAMPLE_RECORDS[0], &options).unwrap();
        assert!(!report.removed_v1);
        assert!(has_v1_tag(&path));
    }
}
