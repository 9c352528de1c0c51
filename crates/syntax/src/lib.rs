pub mod cst;
mod token_set;

pub use token_set::TokenSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum SyntaxKind {
    // region: trivia
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    // endregion: trivia

    // region: keywords
    /// class
    CLASS,
    /// const
    CONST,
    /// else
    ELSE,
    /// enum
    ENUM,
    /// export
    EXPORT,
    /// function
    FUNCTION,
    /// if
    IF,
    /// let
    LET,
    /// namespace
    NAMESPACE,
    /// private
    PRIVATE,
    /// protected
    PROTECTED,
    /// public
    PUBLIC,
    /// readonly
    READONLY,
    /// return
    RETURN,
    /// static
    STATIC,
    /// var
    VAR,
    // endregion: keywords

    // region: values
    IDENTIFIER,
    /// 0, 1.5
    NUMBER,
    /// "", ''
    STRING,
    // endregion: values

    // region: delimiters
    /// {
    LEFT_CURLY,
    /// }
    RIGHT_CURLY,
    /// (
    LEFT_PARENTHESIS,
    /// )
    RIGHT_PARENTHESIS,
    // endregion: delimiters

    // region: operators
    /// ;
    SEMICOLON,
    /// :
    COLON,
    /// ,
    COMMA,
    /// .
    DOT,
    /// =
    EQUALS,
    /// +
    PLUS,
    /// -
    MINUS,
    /// *
    STAR,
    /// /
    SLASH,
    // endregion: operators

    // region: control
    UNKNOWN,
    END_OF_FILE,
    // endregion: control

    // region: nodes
    SourceFile,
    Modifier,
    Name,
    TypeAnnotation,
    TypeReference,

    VariableStatement,
    VariableDeclaration,
    FunctionDeclaration,
    ParameterList,
    Parameter,

    ClassDeclaration,
    PropertyDeclaration,
    MethodDeclaration,

    EnumDeclaration,
    EnumMember,

    NamespaceDeclaration,
    Block,

    ExpressionStatement,
    ReturnStatement,
    IfStatement,

    NameExpression,
    LiteralExpression,
    CallExpression,
    ArgumentList,
    ParenthesizedExpression,
    BinaryExpression,
    // endregion: nodes

    /// Placeholder for node markers that have not been completed.
    Node,
    ERROR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeScript {}

impl rowan::Language for TypeScript {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        Self(value as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TypeScript>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<TypeScript>;
pub type SyntaxToken = rowan::SyntaxToken<TypeScript>;
pub type SyntaxElement = rowan::SyntaxElement<TypeScript>;

pub use rowan::{TextRange, TextSize};

impl SyntaxKind {
    pub fn is_whitespace_or_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }

    pub fn is_token(self) -> bool {
        self <= SyntaxKind::END_OF_FILE
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns the keyword for an identifier-like `text`.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "class" => SyntaxKind::CLASS,
            "const" => SyntaxKind::CONST,
            "else" => SyntaxKind::ELSE,
            "enum" => SyntaxKind::ENUM,
            "export" => SyntaxKind::EXPORT,
            "function" => SyntaxKind::FUNCTION,
            "if" => SyntaxKind::IF,
            "let" => SyntaxKind::LET,
            "namespace" => SyntaxKind::NAMESPACE,
            "private" => SyntaxKind::PRIVATE,
            "protected" => SyntaxKind::PROTECTED,
            "public" => SyntaxKind::PUBLIC,
            "readonly" => SyntaxKind::READONLY,
            "return" => SyntaxKind::RETURN,
            "static" => SyntaxKind::STATIC,
            "var" => SyntaxKind::VAR,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_modifier_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::EXPORT
                | SyntaxKind::PRIVATE
                | SyntaxKind::PROTECTED
                | SyntaxKind::PUBLIC
                | SyntaxKind::READONLY
                | SyntaxKind::STATIC
        )
    }

    pub fn is_scope_keyword(self) -> bool {
        matches!(self, SyntaxKind::PRIVATE | SyntaxKind::PROTECTED | SyntaxKind::PUBLIC)
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::VariableStatement
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::ClassDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::NamespaceDeclaration
                | SyntaxKind::Block
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::IfStatement
        )
    }
}
