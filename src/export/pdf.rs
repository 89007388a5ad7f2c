use crate::display::{OptionMark, RenderedQuestion};
use crate::error::ExportError;
use crate::export::DocumentExporter;
use crate::export::font::{FontSet, GlyphMapper, resource_name};
use crate::utils::wrap_text;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};
use std::collections::BTreeSet;
use std::path::Path;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Page geometry in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl PageSetup {
    /// A4 portrait with 10 mm margins.
    pub fn a4_portrait() -> Self {
        Self {
            width: 210.0 * POINTS_PER_MM,
            height: 297.0 * POINTS_PER_MM,
            margin: 10.0 * POINTS_PER_MM,
            font_size: 11.0,
            line_height: 15.0,
        }
    }

    /// Rough character budget per line at this size.
    fn columns(&self, indent: f32) -> usize {
        let usable = self.width - 2.0 * self.margin - indent;
        ((usable / (self.font_size * 0.5)).floor() as usize).max(10)
    }

    fn lines_per_page(&self) -> usize {
        (((self.height - 2.0 * self.margin) / self.line_height).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ink {
    Black,
    Brown,
    Green,
    SoftGreen,
    Red,
    Grey,
}

#[derive(Debug, Clone, PartialEq)]
struct PdfLine {
    text: String,
    font: Font,
    ink: Ink,
    indent: f32,
}

impl PdfLine {
    fn blank() -> Self {
        Self {
            text: String::new(),
            font: Font::Regular,
            ink: Ink::Black,
            indent: 0.0,
        }
    }
}

fn ink_for(mark: OptionMark) -> Ink {
    match mark {
        OptionMark::None => Ink::Black,
        OptionMark::Selected => Ink::Brown,
        OptionMark::Correct => Ink::Green,
        OptionMark::Incorrect => Ink::Red,
        OptionMark::HighlightCorrect => Ink::SoftGreen,
    }
}

fn ink_operands(ink: Ink) -> Vec<Object> {
    match ink {
        Ink::Black => vec![Object::Real(0.0), Object::Real(0.0), Object::Real(0.0)],
        Ink::Brown => vec![Object::Real(0.55), Object::Real(0.33), Object::Real(0.14)],
        Ink::Green => vec![Object::Real(0.09), Object::Real(0.5), Object::Real(0.24)],
        Ink::SoftGreen => vec![Object::Real(0.35), Object::Real(0.65), Object::Real(0.4)],
        Ink::Red => vec![Object::Real(0.75), Object::Real(0.11), Object::Real(0.11)],
        Ink::Grey => vec![Object::Real(0.22), Object::Real(0.25), Object::Real(0.32)],
    }
}

/// WinAnsiEncoding byte for `c`, the encoding of the standard PDF fonts.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\u{20}'..='\u{7e}' => Some(c as u8),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{20ac}' => Some(0x80),
        '\t' => Some(b' '),
        _ => None,
    }
}

fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().filter_map(win_ansi_byte).collect()
}

/// Characters of `lines` that the standard fonts cannot show, deduplicated.
fn outside_win_ansi(lines: &[PdfLine]) -> String {
    let mut seen = BTreeSet::new();
    lines
        .iter()
        .flat_map(|line| line.text.chars())
        .filter(|c| win_ansi_byte(*c).is_none() && !c.is_control())
        .filter(|c| seen.insert(*c))
        .collect()
}

/// How glyphs reach the page: the built-in Helvetica pair, or embedded
/// TrueType fonts addressed by glyph id.
enum Typeface<'a> {
    Standard,
    Embedded(GlyphMapper<'a>),
}

impl Typeface<'_> {
    fn text_operations(&mut self, line: &PdfLine, size: i64, operations: &mut Vec<Operation>) {
        match self {
            Typeface::Standard => {
                let font_name = match line.font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font_name.as_bytes().to_vec()), Object::Integer(size)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(&line.text))],
                ));
            }
            Typeface::Embedded(mapper) => {
                // Embedded fonts come in one weight; bold is drawn as fill plus stroke.
                let render_mode = match line.font {
                    Font::Regular => 0,
                    Font::Bold => 2,
                };
                operations.push(Operation::new("Tr", vec![Object::Integer(render_mode)]));
                if line.font == Font::Bold {
                    operations.push(Operation::new("w", vec![Object::Real(0.4)]));
                    operations.push(Operation::new("RG", ink_operands(line.ink)));
                }
                for run in mapper.runs(&line.text) {
                    operations.push(Operation::new(
                        "Tf",
                        vec![
                            Object::Name(resource_name(run.font).into_bytes()),
                            Object::Integer(size),
                        ],
                    ));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(run.encoded(), StringFormat::Hexadecimal)],
                    ));
                }
            }
        }
    }

    fn font_resources(&self, doc: &mut Document) -> Result<Dictionary, ExportError> {
        match self {
            Typeface::Standard => {
                let regular_id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                    "Encoding" => "WinAnsiEncoding",
                });
                let bold_id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica-Bold",
                    "Encoding" => "WinAnsiEncoding",
                });
                Ok(dictionary! {
                    "F1" => regular_id,
                    "F2" => bold_id,
                })
            }
            Typeface::Embedded(mapper) => {
                if !mapper.missing().is_empty() {
                    let missing: String = mapper.missing().iter().collect();
                    log::warn!("No PDF font has glyphs for {:?}", missing);
                }
                mapper.embed(doc)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfExporter {
    setup: PageSetup,
    fonts: FontSet,
}

impl PdfExporter {
    pub fn new(setup: PageSetup, fonts: FontSet) -> Self {
        Self { setup, fonts }
    }

    fn push_wrapped(&self, lines: &mut Vec<PdfLine>, text: &str, font: Font, ink: Ink, indent: f32) {
        for piece in wrap_text(text, self.setup.columns(indent)) {
            lines.push(PdfLine {
                text: piece,
                font,
                ink,
                indent,
            });
        }
    }

    fn layout(&self, questions: &[RenderedQuestion]) -> Vec<PdfLine> {
        let mut lines = Vec::new();
        for question in questions {
            self.push_wrapped(
                &mut lines,
                &format!("{}. {}", question.number, question.text),
                Font::Bold,
                Ink::Black,
                0.0,
            );
            for (option, mark) in &question.options {
                self.push_wrapped(&mut lines, &option.labelled(), Font::Regular, ink_for(*mark), 14.0);
            }
            if let Some(feedback) = &question.feedback {
                let selected_ink = if feedback.is_correct { Ink::Green } else { Ink::Red };
                self.push_wrapped(
                    &mut lines,
                    &format!("Your answer: {}", feedback.selected_label()),
                    Font::Regular,
                    selected_ink,
                    14.0,
                );
                self.push_wrapped(
                    &mut lines,
                    &format!("Correct answer: {}", feedback.correct),
                    Font::Regular,
                    Ink::Green,
                    14.0,
                );
                if let Some(explanation) = &feedback.explanation {
                    self.push_wrapped(
                        &mut lines,
                        &format!("Explanation: {}", explanation),
                        Font::Regular,
                        Ink::Grey,
                        14.0,
                    );
                }
            }
            lines.push(PdfLine::blank());
        }
        lines
    }

    fn page_operations(&self, lines: &[PdfLine], typeface: &mut Typeface<'_>) -> Vec<Operation> {
        let setup = &self.setup;
        let mut operations = Vec::new();
        let top = setup.height - setup.margin - setup.font_size;
        let size = setup.font_size.round() as i64;

        for (row, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let x = (setup.margin + line.indent).round() as i64;
            let y = (top - row as f32 * setup.line_height).round() as i64;

            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("rg", ink_operands(line.ink)));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(x), Object::Integer(y)],
            ));
            typeface.text_operations(line, size, &mut operations);
            operations.push(Operation::new("ET", vec![]));
        }
        operations
    }

    /// Builds the PDF in memory. Without embeddable fonts only WinAnsi text
    /// can be written; anything else fails instead of losing characters.
    pub fn render(&self, questions: &[RenderedQuestion]) -> Result<Vec<u8>, ExportError> {
        if questions.is_empty() {
            return Err(ExportError::EmptyQuiz);
        }

        let lines = self.layout(questions);
        let mut typeface = if self.fonts.is_empty() {
            let unsupported = outside_win_ansi(&lines);
            if !unsupported.is_empty() {
                return Err(ExportError::MissingGlyphs(unsupported));
            }
            Typeface::Standard
        } else {
            Typeface::Embedded(GlyphMapper::new(&self.fonts)?)
        };

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for chunk in lines.chunks(self.setup.lines_per_page()) {
            let content = Content {
                operations: self.page_operations(chunk, &mut typeface),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let fonts = typeface.font_resources(&mut doc)?;
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(self.setup.width.round() as i64),
                Object::Integer(self.setup.height.round() as i64),
            ]),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

impl DocumentExporter for PdfExporter {
    fn export(&self, questions: &[RenderedQuestion], path: &Path) -> Result<(), ExportError> {
        let bytes = self.render(questions)?;
        std::fs::write(path, bytes)?;
        log::info!("Exported {} question(s) to {}", questions.len(), path.display());
        Ok(())
    }
}
