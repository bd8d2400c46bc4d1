//! List numbering definitions.
//!
//! Every list, nested ones included, gets its own numbering instance so that adjacent lists
//! stay distinct when the package is read back.

use docx_rs::*;

/// Id 1 is left to the package's default numbering
const FIRST_ID: usize = 2;
const LEVELS: usize = 9;

#[derive(Clone, Debug)]
pub struct ListNumbering {
    next_id: usize,
}

impl Default for ListNumbering {
    fn default() -> Self {
        Self::new()
    }
}

impl ListNumbering {
    pub fn new() -> Self {
        Self { next_id: FIRST_ID }
    }

    fn level(index: usize, ordered: bool) -> Level {
        let (format, text, hanging) = if ordered {
            ("decimal", format!("%{}.", index + 1), 420)
        } else {
            ("bullet", bullet(index).to_string(), 360)
        };
        Level::new(
            index,
            Start::new(1),
            NumberFormat::new(format),
            LevelText::new(text),
            LevelJc::new("left"),
        )
        .indent(
            Some(720 * (index as i32 + 1)),
            Some(SpecialIndentType::Hanging(hanging)),
            None,
            None,
        )
    }

    /// Add a fresh numbering instance and return its id.
    pub fn create(&mut self, docx: Docx, ordered: bool) -> (Docx, usize) {
        let id = self.next_id;
        self.next_id += 1;

        let mut definition = AbstractNumbering::new(id);
        for index in 0..LEVELS {
            definition = definition.add_level(Self::level(index, ordered));
        }

        let docx = docx
            .add_abstract_numbering(definition)
            .add_numbering(Numbering::new(id, id));
        (docx, id)
    }
}

fn bullet(index: usize) -> &'static str {
    match index % 3 {
        0 => "•",
        1 => "○",
        _ => "▪",
    }
}
