use std::{fmt, sync::Arc};

use parsing::ParseError;
use rowan::GreenNode;

use crate::EditRequest;

/// A complete parse of a document text.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub root: GreenNode,
    pub errors: Arc<[ParseError]>,
}

/// A parser that turns a complete text into a complete tree.
///
/// Implementations must be total: syntax errors are reported through
/// [`Parsed::errors`], never by failing.
pub trait SourceParser {
    fn parse(&self, file: &str, text: &str) -> Parsed;
}

impl<F> SourceParser for F
where
    F: Fn(&str, &str) -> Parsed,
{
    fn parse(&self, file: &str, text: &str) -> Parsed {
        self(file, text)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceParser;

impl SourceParser for ReferenceParser {
    fn parse(&self, _: &str, text: &str) -> Parsed {
        let (parsed, errors) = parsing::parse_source(text);
        let root = parsed.green().clone();
        Parsed { root, errors }
    }
}

/// Applies edit requests and re-parses the result.
pub struct DocumentReplacer {
    parser: Box<dyn SourceParser>,
}

impl fmt::Debug for DocumentReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentReplacer").finish_non_exhaustive()
    }
}

impl DocumentReplacer {
    pub fn new(parser: impl SourceParser + 'static) -> DocumentReplacer {
        DocumentReplacer { parser: Box::new(parser) }
    }

    pub fn parse(&self, file: &str, text: &str) -> Parsed {
        let _span = tracing::debug_span!("parse", file).entered();
        self.parser.parse(file, text)
    }

    pub fn replace(&self, file: &str, text: &str, request: &EditRequest) -> (String, Parsed) {
        let new_text = request.apply(text);
        let parsed = self.parse(file, &new_text);
        (new_text, parsed)
    }
}
