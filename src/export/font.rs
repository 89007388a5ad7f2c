use crate::error::{ExportError, FontError};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use ttf_parser::{Face, GlyphId, name_id};

/// TrueType files tried after the configured ones, in order.
pub const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansDevanagari-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansBengali-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansThai-Regular.ttf",
    "/usr/share/fonts/truetype/lohit-devanagari/Lohit-Devanagari.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/gnu-free/FreeSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\Nirmala.ttf",
    "C:\\Windows\\Fonts\\mangal.ttf",
];

const CMAP_HEADER: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo <<
/Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
";

const CMAP_FOOTER: &str = "endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

const BFCHAR_CHUNK: usize = 100;

/// A single TrueType font kept in memory for embedding.
#[derive(Debug, Clone)]
pub struct FontFile {
    name: String,
    data: Vec<u8>,
}

impl FontFile {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_bytes(&stem, data)
    }

    /// Checks that `data` is a single TrueType-outline font. `fallback_name`
    /// is used when the font carries no PostScript name.
    pub fn from_bytes(fallback_name: &str, data: Vec<u8>) -> Result<Self, FontError> {
        if ttf_parser::fonts_in_collection(&data).is_some() {
            return Err(FontError::Unsupported {
                name: fallback_name.to_string(),
                reason: "font collections cannot be embedded".to_string(),
            });
        }
        let name = {
            let face = Face::parse(&data, 0).map_err(|e| FontError::Parse {
                name: fallback_name.to_string(),
                reason: e.to_string(),
            })?;
            if face.tables().cff.is_some() {
                return Err(FontError::Unsupported {
                    name: fallback_name.to_string(),
                    reason: "only TrueType outlines are supported".to_string(),
                });
            }
            postscript_name(&face).unwrap_or_else(|| sanitize_name(fallback_name))
        };
        Ok(Self { name, data })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn postscript_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
        .find_map(|n| n.to_string())
        .map(|n| sanitize_name(&n))
}

/// PDF names for base fonts may not contain spaces or delimiters.
fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if name.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        name
    }
}

/// Ordered fonts for PDF text. A character is drawn with the first font
/// that has a glyph for it.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    files: Vec<FontFile>,
}

impl FontSet {
    pub fn new(files: Vec<FontFile>) -> Self {
        Self { files }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `preferred` first, then whatever of [`SYSTEM_FONTS`] exists.
    /// Unreadable or unsupported files are logged and skipped.
    pub fn discover(preferred: &[PathBuf]) -> Self {
        let mut files: Vec<FontFile> = Vec::new();
        let system = SYSTEM_FONTS.iter().map(PathBuf::from);
        for path in preferred.iter().cloned().chain(system) {
            if !path.is_file() {
                if preferred.contains(&path) {
                    log::warn!("PDF font {} not found", path.display());
                }
                continue;
            }
            match FontFile::load(&path) {
                Ok(file) if files.iter().any(|f| f.name == file.name) => {}
                Ok(file) => {
                    log::info!("PDF font {} loaded from {}", file.name, path.display());
                    files.push(file);
                }
                Err(e) => log::warn!("Skipping PDF font: {}", e),
            }
        }
        Self { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Consecutive glyphs drawn with the same font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GlyphRun {
    pub font: usize,
    pub glyphs: Vec<u16>,
}

impl GlyphRun {
    /// Two-byte big-endian glyph ids, as Identity-H expects.
    pub fn encoded(&self) -> Vec<u8> {
        self.glyphs.iter().flat_map(|g| g.to_be_bytes()).collect()
    }
}

pub(crate) fn resource_name(font: usize) -> String {
    format!("U{}", font)
}

/// Maps text to glyph ids across a [`FontSet`] and remembers which glyphs
/// were used, so only those get widths and ToUnicode entries.
pub(crate) struct GlyphMapper<'a> {
    files: &'a [FontFile],
    faces: Vec<Face<'a>>,
    used: Vec<BTreeMap<u16, char>>,
    missing: BTreeSet<char>,
}

impl<'a> GlyphMapper<'a> {
    pub fn new(set: &'a FontSet) -> Result<Self, ExportError> {
        let faces = set
            .files
            .iter()
            .map(|file| {
                Face::parse(&file.data, 0).map_err(|e| FontError::Parse {
                    name: file.name.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            files: &set.files,
            used: vec![BTreeMap::new(); faces.len()],
            faces,
            missing: BTreeSet::new(),
        })
    }

    fn lookup(&self, c: char, current: Option<usize>) -> Option<(usize, u16)> {
        if let Some(font) = current {
            if let Some(glyph) = self.faces[font].glyph_index(c) {
                return Some((font, glyph.0));
            }
        }
        self.faces
            .iter()
            .enumerate()
            .find_map(|(font, face)| face.glyph_index(c).map(|g| (font, g.0)))
    }

    pub fn runs(&mut self, text: &str) -> Vec<GlyphRun> {
        let mut runs: Vec<GlyphRun> = Vec::new();
        for c in text.chars() {
            let c = if c == '\t' { ' ' } else { c };
            if c.is_control() || self.faces.is_empty() {
                continue;
            }
            let current = runs.last().map(|run| run.font);
            let (font, glyph) = match self.lookup(c, current) {
                Some(found) => found,
                None => {
                    self.missing.insert(c);
                    (current.unwrap_or(0), 0)
                }
            };
            self.used[font].entry(glyph).or_insert(c);
            match runs.last_mut() {
                Some(run) if run.font == font => run.glyphs.push(glyph),
                _ => runs.push(GlyphRun {
                    font,
                    glyphs: vec![glyph],
                }),
            }
        }
        runs
    }

    /// Characters no font could draw.
    pub fn missing(&self) -> &BTreeSet<char> {
        &self.missing
    }

    /// Adds every used font to `doc` and returns the `/Font` resource dictionary.
    pub fn embed(&self, doc: &mut Document) -> Result<Dictionary, ExportError> {
        let mut resources = Dictionary::new();
        for (index, used) in self.used.iter().enumerate() {
            if used.is_empty() {
                continue;
            }
            let font_id = self.embed_font(doc, index, used)?;
            resources.set(resource_name(index), font_id);
        }
        Ok(resources)
    }

    fn embed_font(
        &self,
        doc: &mut Document,
        index: usize,
        used: &BTreeMap<u16, char>,
    ) -> Result<ObjectId, ExportError> {
        let file = &self.files[index];
        let face = &self.faces[index];
        let upem = face.units_per_em();
        let base_font = Object::Name(file.name.clone().into_bytes());

        let mut font_stream = Stream::new(
            dictionary! { "Length1" => Object::Integer(file.data.len() as i64) },
            file.data.clone(),
        );
        font_stream.compress()?;
        let font_file_id = doc.add_object(font_stream);

        let bbox = face.global_bounding_box();
        let ascent = scale(face.ascender(), upem);
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.clone(),
            "Flags" => Object::Integer(32),
            "FontBBox" => Object::Array(vec![
                Object::Integer(scale(bbox.x_min, upem)),
                Object::Integer(scale(bbox.y_min, upem)),
                Object::Integer(scale(bbox.x_max, upem)),
                Object::Integer(scale(bbox.y_max, upem)),
            ]),
            "ItalicAngle" => Object::Integer(0),
            "Ascent" => Object::Integer(ascent),
            "Descent" => Object::Integer(scale(face.descender(), upem)),
            "CapHeight" => Object::Integer(face.capital_height().map(|h| scale(h, upem)).unwrap_or(ascent)),
            "StemV" => Object::Integer(80),
            "FontFile2" => font_file_id,
        });

        let mut widths = Vec::with_capacity(used.len() * 2);
        for glyph in used.keys() {
            let advance = face.glyph_hor_advance(GlyphId(*glyph)).unwrap_or(0);
            widths.push(Object::Integer(*glyph as i64));
            widths.push(Object::Array(vec![Object::Integer(
                advance as i64 * 1000 / upem as i64,
            )]));
        }
        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => base_font.clone(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => Object::Integer(0),
            },
            "FontDescriptor" => descriptor_id,
            "DW" => Object::Integer(1000),
            "W" => Object::Array(widths),
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(used)));
        Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => base_font,
            "Encoding" => "Identity-H",
            "DescendantFonts" => Object::Array(vec![Object::Reference(cid_font_id)]),
            "ToUnicode" => to_unicode_id,
        }))
    }
}

fn scale(value: i16, upem: u16) -> i64 {
    value as i64 * 1000 / upem as i64
}

fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> Vec<u8> {
    let mut cmap = String::from(CMAP_HEADER);
    let entries: Vec<(&u16, &char)> = used.iter().collect();
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (glyph, c) in chunk {
            let mut units = [0u16; 2];
            let target: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, target));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(CMAP_FOOTER);
    cmap.into_bytes()
}

/// Builds a minimal TrueType font (cmap, head, hhea, hmtx, maxp) that maps
/// each of `chars` to its own glyph. There are no outlines.
#[cfg(test)]
pub(crate) fn synthetic_font(chars: &[char]) -> Vec<u8> {
    fn u16be(out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&v.to_be_bytes());
    }
    fn u32be(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_be_bytes());
    }

    let num_glyphs = chars.len() as u16 + 1;

    let mut cmap = Vec::new();
    u16be(&mut cmap, 0);
    u16be(&mut cmap, 1);
    u16be(&mut cmap, 3);
    u16be(&mut cmap, 10);
    u32be(&mut cmap, 12);
    u16be(&mut cmap, 12);
    u16be(&mut cmap, 0);
    u32be(&mut cmap, 16 + 12 * chars.len() as u32);
    u32be(&mut cmap, 0);
    u32be(&mut cmap, chars.len() as u32);
    let mut sorted: Vec<(char, u32)> = chars.iter().copied().zip(1u32..).collect();
    sorted.sort();
    for (c, glyph) in sorted {
        u32be(&mut cmap, c as u32);
        u32be(&mut cmap, c as u32);
        u32be(&mut cmap, glyph);
    }

    let mut head = Vec::new();
    u16be(&mut head, 1);
    u16be(&mut head, 0);
    u32be(&mut head, 0x0001_0000);
    u32be(&mut head, 0);
    u32be(&mut head, 0x5F0F_3CF5);
    u16be(&mut head, 0);
    u16be(&mut head, 1000);
    head.extend_from_slice(&[0; 16]);
    for v in [0i16, -200, 1000, 800] {
        head.extend_from_slice(&v.to_be_bytes());
    }
    u16be(&mut head, 0);
    u16be(&mut head, 8);
    u16be(&mut head, 2);
    u16be(&mut head, 0);
    u16be(&mut head, 0);

    let mut hhea = Vec::new();
    u32be(&mut hhea, 0x0001_0000);
    for v in [800i16, -200, 0] {
        hhea.extend_from_slice(&v.to_be_bytes());
    }
    u16be(&mut hhea, 600);
    hhea.extend_from_slice(&[0; 22]);
    u16be(&mut hhea, num_glyphs);

    let mut hmtx = Vec::new();
    for _ in 0..num_glyphs {
        u16be(&mut hmtx, 600);
        u16be(&mut hmtx, 0);
    }

    let mut maxp = Vec::new();
    u32be(&mut maxp, 0x0000_5000);
    u16be(&mut maxp, num_glyphs);

    let tables: [(&[u8; 4], Vec<u8>); 5] = [
        (b"cmap", cmap),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"maxp", maxp),
    ];
    let mut font = Vec::new();
    u32be(&mut font, 0x0001_0000);
    u16be(&mut font, tables.len() as u16);
    u16be(&mut font, 64);
    u16be(&mut font, 2);
    u16be(&mut font, 16);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        u32be(&mut font, 0);
        u32be(&mut font, offset as u32);
        u32be(&mut font, data.len() as u32);
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend_from_slice(&body);
    font
}
