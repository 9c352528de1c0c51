use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndentationText {
    TwoSpaces,
    #[default]
    FourSpaces,
    EightSpaces,
    Tab,
}

impl IndentationText {
    pub fn as_str(self) -> &'static str {
        match self {
            IndentationText::TwoSpaces => "  ",
            IndentationText::FourSpaces => "    ",
            IndentationText::EightSpaces => "        ",
            IndentationText::Tab => "\t",
        }
    }

    /// The number of columns one level occupies, a tab counts as four.
    pub fn width(self) -> usize {
        match self {
            IndentationText::TwoSpaces => 2,
            IndentationText::FourSpaces | IndentationText::Tab => 4,
            IndentationText::EightSpaces => 8,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NewLineKind {
    #[default]
    LineFeed,
    CarriageReturnLineFeed,
}

impl NewLineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLineKind::LineFeed => "\n",
            NewLineKind::CarriageReturnLineFeed => "\r\n",
        }
    }
}

/// Controls the text generated by document operations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManipulationSettings {
    pub indentation_text: IndentationText,
    pub new_line_kind: NewLineKind,
}

impl ManipulationSettings {
    pub fn from_json(text: &str) -> Result<ManipulationSettings, serde_json::Error> {
        serde_json::from_str(text)
    }
}
