//! Operations available to some node kinds only.
//!
//! Each capability is a small trait, and [`capabilities`] maps every
//! [`SyntaxKind`] to the implementations it supports.

use itertools::Itertools;
use rowan::{NodeOrToken, ast::AstNode};
use syntax::{SyntaxKind, SyntaxNode, TextRange, TextSize, cst};

use crate::{
    Document, EditError, Insertion, NodeId, RemoveChildren, TrimOptions,
    operations::next_significant,
};

/// Nodes that may carry modifier keywords.
pub trait ModifierOwner {
    fn accepts_scope(&self) -> bool;
    fn accepts_export(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Newline,
    Comma,
}

/// Nodes with a braced list of members.
pub trait MemberContainer {
    fn is_member(&self, kind: SyntaxKind) -> bool;
    fn separator(&self) -> Separator;
}

/// Nodes with a list of statements.
pub trait StatementContainer {
    /// Returns the node whose children are the statements.
    fn statement_list(&self, node: &SyntaxNode) -> Option<SyntaxNode>;
}

/// Nodes with a braced body that can be unwrapped.
pub trait BodyOwner {
    fn body(&self, node: &SyntaxNode) -> Option<SyntaxNode>;
}

#[derive(Clone, Copy)]
pub struct Capabilities {
    pub modifiers: Option<&'static dyn ModifierOwner>,
    pub members: Option<&'static dyn MemberContainer>,
    pub statements: Option<&'static dyn StatementContainer>,
    pub body: Option<&'static dyn BodyOwner>,
}

const NONE: Capabilities = Capabilities { modifiers: None, members: None, statements: None, body: None };

struct MemberModifiers;

impl ModifierOwner for MemberModifiers {
    fn accepts_scope(&self) -> bool {
        true
    }

    fn accepts_export(&self) -> bool {
        false
    }
}

struct DeclarationModifiers;

impl ModifierOwner for DeclarationModifiers {
    fn accepts_scope(&self) -> bool {
        false
    }

    fn accepts_export(&self) -> bool {
        true
    }
}

struct ClassMembers;

impl MemberContainer for ClassMembers {
    fn is_member(&self, kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::PropertyDeclaration | SyntaxKind::MethodDeclaration)
    }

    fn separator(&self) -> Separator {
        Separator::Newline
    }
}

struct EnumMembers;

impl MemberContainer for EnumMembers {
    fn is_member(&self, kind: SyntaxKind) -> bool {
        kind == SyntaxKind::EnumMember
    }

    fn separator(&self) -> Separator {
        Separator::Comma
    }
}

/// The node is its own statement list and body.
struct OwnBlock;

impl StatementContainer for OwnBlock {
    fn statement_list(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        Some(node.clone())
    }
}

impl BodyOwner for OwnBlock {
    fn body(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        Some(node.clone())
    }
}

/// The node owns a [`cst::Block`] child.
struct InnerBlock;

fn inner_block(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children().find_map(cst::Block::cast).map(|block| block.syntax().clone())
}

impl StatementContainer for InnerBlock {
    fn statement_list(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        inner_block(node)
    }
}

impl BodyOwner for InnerBlock {
    fn body(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        inner_block(node)
    }
}

pub fn capabilities(kind: SyntaxKind) -> Capabilities {
    match kind {
        SyntaxKind::SourceFile => Capabilities { statements: Some(&OwnBlock), ..NONE },
        SyntaxKind::Block => Capabilities { statements: Some(&OwnBlock), body: Some(&OwnBlock), ..NONE },
        SyntaxKind::NamespaceDeclaration | SyntaxKind::FunctionDeclaration => Capabilities {
            modifiers: Some(&DeclarationModifiers),
            statements: Some(&InnerBlock),
            body: Some(&InnerBlock),
            ..NONE
        },
        SyntaxKind::ClassDeclaration => Capabilities {
            modifiers: Some(&DeclarationModifiers),
            members: Some(&ClassMembers),
            ..NONE
        },
        SyntaxKind::EnumDeclaration => Capabilities {
            modifiers: Some(&DeclarationModifiers),
            members: Some(&EnumMembers),
            ..NONE
        },
        SyntaxKind::VariableStatement => {
            Capabilities { modifiers: Some(&DeclarationModifiers), ..NONE }
        }
        SyntaxKind::PropertyDeclaration | SyntaxKind::MethodDeclaration => {
            Capabilities { modifiers: Some(&MemberModifiers), ..NONE }
        }
        SyntaxKind::Modifier
        | SyntaxKind::Name
        | SyntaxKind::TypeAnnotation
        | SyntaxKind::TypeReference
        | SyntaxKind::VariableDeclaration
        | SyntaxKind::ParameterList
        | SyntaxKind::Parameter
        | SyntaxKind::EnumMember
        | SyntaxKind::ExpressionStatement
        | SyntaxKind::ReturnStatement
        | SyntaxKind::IfStatement
        | SyntaxKind::NameExpression
        | SyntaxKind::LiteralExpression
        | SyntaxKind::CallExpression
        | SyntaxKind::ArgumentList
        | SyntaxKind::ParenthesizedExpression
        | SyntaxKind::BinaryExpression
        | SyntaxKind::Node
        | SyntaxKind::ERROR => NONE,
        SyntaxKind::WHITESPACE
        | SyntaxKind::LINE_COMMENT
        | SyntaxKind::BLOCK_COMMENT
        | SyntaxKind::CLASS
        | SyntaxKind::CONST
        | SyntaxKind::ELSE
        | SyntaxKind::ENUM
        | SyntaxKind::EXPORT
        | SyntaxKind::FUNCTION
        | SyntaxKind::IF
        | SyntaxKind::LET
        | SyntaxKind::NAMESPACE
        | SyntaxKind::PRIVATE
        | SyntaxKind::PROTECTED
        | SyntaxKind::PUBLIC
        | SyntaxKind::READONLY
        | SyntaxKind::RETURN
        | SyntaxKind::STATIC
        | SyntaxKind::VAR
        | SyntaxKind::IDENTIFIER
        | SyntaxKind::NUMBER
        | SyntaxKind::STRING
        | SyntaxKind::LEFT_CURLY
        | SyntaxKind::RIGHT_CURLY
        | SyntaxKind::LEFT_PARENTHESIS
        | SyntaxKind::RIGHT_PARENTHESIS
        | SyntaxKind::SEMICOLON
        | SyntaxKind::COLON
        | SyntaxKind::COMMA
        | SyntaxKind::DOT
        | SyntaxKind::EQUALS
        | SyntaxKind::PLUS
        | SyntaxKind::MINUS
        | SyntaxKind::STAR
        | SyntaxKind::SLASH
        | SyntaxKind::UNKNOWN
        | SyntaxKind::END_OF_FILE => NONE,
    }
}

pub(crate) fn unsupported(operation: &'static str, kind: SyntaxKind) -> EditError {
    EditError::Unsupported { operation, kind }
}

/// Returns the ranges of a node's own `{` and `}` tokens.
pub(crate) fn braces(node: &SyntaxNode) -> Option<(TextRange, TextRange)> {
    let mut tokens = node.children_with_tokens().filter_map(NodeOrToken::into_token);
    let left = tokens.find(|token| token.kind() == SyntaxKind::LEFT_CURLY)?;
    let right = tokens.find(|token| token.kind() == SyntaxKind::RIGHT_CURLY)?;
    Some((left.text_range(), right.text_range()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Public,
    Protected,
    Private,
}

impl Scope {
    pub fn keyword(self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::Protected => "protected",
            Scope::Private => "private",
        }
    }

    fn from_kind(kind: SyntaxKind) -> Option<Scope> {
        match kind {
            SyntaxKind::PUBLIC => Some(Scope::Public),
            SyntaxKind::PROTECTED => Some(Scope::Protected),
            SyntaxKind::PRIVATE => Some(Scope::Private),
            _ => None,
        }
    }
}

fn modifiers(node: &SyntaxNode) -> impl Iterator<Item = (SyntaxKind, TextRange)> {
    node.children().filter_map(cst::Modifier::cast).filter_map(|modifier| {
        let kind = modifier.keyword_kind()?;
        Some((kind, modifier.syntax().text_range()))
    })
}

/// Removes a modifier together with the spaces after it.
fn remove_modifier(range: TextRange) -> RemoveChildren {
    let trim = TrimOptions { following_spaces: true, ..TrimOptions::default() };
    RemoveChildren::new(range, trim)
}

impl Document {
    fn modifier_owner(
        &self,
        id: NodeId,
        operation: &'static str,
        accepts: impl Fn(&dyn ModifierOwner) -> bool,
    ) -> Result<SyntaxNode, EditError> {
        let node = self.node(id)?;
        let kind = node.kind();
        match capabilities(kind).modifiers {
            Some(owner) if accepts(owner) => Ok(node.syntax().clone()),
            _ => Err(unsupported(operation, kind)),
        }
    }

    /// Returns the explicit scope of a class member, `None` when implicitly public.
    pub fn scope(&self, id: NodeId) -> Result<Option<Scope>, EditError> {
        let syntax = self.modifier_owner(id, "scope", |owner| owner.accepts_scope())?;
        Ok(modifiers(&syntax).find_map(|(kind, _)| Scope::from_kind(kind)))
    }

    /// Sets or clears the scope modifier. Setting the current scope is a no-op.
    pub fn set_scope(&mut self, id: NodeId, scope: Option<Scope>) -> Result<NodeId, EditError> {
        let _span = tracing::info_span!("set_scope", ?id, ?scope).entered();

        let syntax = self.modifier_owner(id, "set_scope", |owner| owner.accepts_scope())?;
        let existing = modifiers(&syntax).find(|(kind, _)| kind.is_scope_keyword());

        match (existing, scope) {
            (None, None) => return Ok(id),
            (Some((kind, _)), Some(scope)) if Scope::from_kind(kind) == Some(scope) => {
                return Ok(id);
            }
            (Some((_, range)), None) => {
                self.apply(id, &remove_modifier(range))?;
            }
            (Some((_, range)), Some(scope)) => {
                self.apply(id, &Insertion::replace(range, scope.keyword()))?;
            }
            (None, Some(scope)) => {
                let position = scope_position(&syntax);
                let insertion = Insertion::insert(position, format!("{} ", scope.keyword()));
                self.apply(id, &insertion)?;
            }
        }

        Ok(id)
    }

    pub fn is_exported(&self, id: NodeId) -> Result<bool, EditError> {
        let syntax = self.modifier_owner(id, "is_exported", |owner| owner.accepts_export())?;
        Ok(modifiers(&syntax).any(|(kind, _)| kind == SyntaxKind::EXPORT))
    }

    /// Adds or removes the `export` modifier. Setting the current state is a no-op.
    pub fn set_exported(&mut self, id: NodeId, exported: bool) -> Result<NodeId, EditError> {
        let _span = tracing::info_span!("set_exported", ?id, exported).entered();

        let syntax = self.modifier_owner(id, "set_exported", |owner| owner.accepts_export())?;
        let existing = modifiers(&syntax).find(|(kind, _)| *kind == SyntaxKind::EXPORT);

        match (existing, exported) {
            (Some(_), true) | (None, false) => (),
            (Some((_, range)), false) => {
                self.apply(id, &remove_modifier(range))?;
            }
            (None, true) => {
                let position = syntax.text_range().start();
                self.apply(id, &Insertion::insert(position, "export "))?;
            }
        }

        Ok(id)
    }

    /// Inserts a member at `index`, returning the wrapper of the new member.
    pub fn insert_member(
        &mut self,
        id: NodeId,
        index: usize,
        text: &str,
    ) -> Result<NodeId, EditError> {
        let _span = tracing::info_span!("insert_member", ?id, index).entered();

        let node = self.node(id)?;
        let kind = node.kind();
        let start = node.start();
        let syntax = node.syntax().clone();
        let Some(container) = capabilities(kind).members else {
            return Err(unsupported("insert_member", kind));
        };

        let members: Vec<SyntaxNode> =
            syntax.children().filter(|child| container.is_member(child.kind())).collect();
        if index > members.len() {
            return Err(EditError::invalid(format!(
                "member index {index} is out of bounds for {} members",
                members.len()
            )));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(EditError::invalid("member text is empty"));
        }
        let Some((left, right)) = braces(&syntax) else {
            return Err(EditError::invalid(format!("{kind:?} has an unterminated body")));
        };

        let settings = self.settings();
        let newline = settings.new_line_kind.as_str();
        let outer = self.indentation_at(start);
        let inner = format!("{outer}{}", settings.indentation_text.as_str());
        let separated = newline.len() + inner.len();

        let (insertion, offset) = if members.is_empty() {
            let body = TextRange::new(left.end(), right.start());
            let text = format!("{newline}{inner}{text}{newline}{outer}");
            (Insertion::replace(body, text), separated)
        } else if index == 0 {
            let position = members[0].text_range().start();
            let text = match container.separator() {
                Separator::Newline => format!("{text}{newline}{inner}"),
                Separator::Comma => format!("{text},{newline}{inner}"),
            };
            (Insertion::insert(position, text), 0)
        } else {
            let previous = &members[index - 1];
            match container.separator() {
                Separator::Newline => {
                    let position = previous.text_range().end();
                    (Insertion::insert(position, format!("{newline}{inner}{text}")), separated)
                }
                Separator::Comma => match next_significant(previous) {
                    Some(comma) if comma.kind() == SyntaxKind::COMMA => {
                        let position = comma.text_range().end();
                        let text = format!("{newline}{inner}{text},");
                        (Insertion::insert(position, text), separated)
                    }
                    _ => {
                        let position = previous.text_range().end();
                        let text = format!(",{newline}{inner}{text}");
                        (Insertion::insert(position, text), 1 + separated)
                    }
                },
            }
        };

        let position = insertion.position + TextSize::from(offset as u32);
        let expected = TextRange::at(position, TextSize::of(text));
        self.apply(id, &insertion)?;

        Ok(self.stand_in(expected, |kind| container.is_member(kind)))
    }

    /// Inserts statements at `index`, returning the wrappers of the new statements.
    pub fn insert_statements(
        &mut self,
        id: NodeId,
        index: usize,
        statements: &[&str],
    ) -> Result<Vec<NodeId>, EditError> {
        let _span = tracing::info_span!("insert_statements", ?id, index).entered();

        let node = self.node(id)?;
        let kind = node.kind();
        let syntax = node.syntax().clone();
        let Some(container) = capabilities(kind).statements else {
            return Err(unsupported("insert_statements", kind));
        };
        let Some(list) = container.statement_list(&syntax) else {
            return Err(EditError::invalid(format!("{kind:?} has no body")));
        };

        let existing: Vec<SyntaxNode> =
            list.children().filter(|child| child.kind().is_statement()).collect();
        if index > existing.len() {
            return Err(EditError::invalid(format!(
                "statement index {index} is out of bounds for {} statements",
                existing.len()
            )));
        }

        let statements: Vec<&str> = statements.iter().map(|statement| statement.trim()).collect();
        if statements.is_empty() || statements.iter().any(|statement| statement.is_empty()) {
            return Err(EditError::invalid("statement text is empty"));
        }

        let settings = self.settings();
        let newline = settings.new_line_kind.as_str();
        let delimiters = braces(&list);
        let outer = self.indentation_at(list.text_range().start());
        let inner = match delimiters {
            Some(_) => format!("{outer}{}", settings.indentation_text.as_str()),
            None => outer.clone(),
        };
        let separator = format!("{newline}{inner}");
        let joined = statements.iter().join(&separator);

        let (insertion, offset) = if !existing.is_empty() && index == 0 {
            let position = existing[0].text_range().start();
            (Insertion::insert(position, format!("{joined}{separator}")), 0)
        } else if !existing.is_empty() {
            let position = existing[index - 1].text_range().end();
            (Insertion::insert(position, format!("{separator}{joined}")), separator.len())
        } else if let Some((left, right)) = delimiters {
            let body = TextRange::new(left.end(), right.start());
            let text = format!("{separator}{joined}{newline}{outer}");
            (Insertion::replace(body, text), separator.len())
        } else {
            let text = self.text();
            let position = TextSize::of(text);
            let prefix = if text.is_empty() || text.ends_with('\n') { "" } else { newline };
            (Insertion::insert(position, format!("{prefix}{joined}{newline}")), prefix.len())
        };

        let mut position = insertion.position + TextSize::from(offset as u32);
        let mut expected = vec![];
        for statement in &statements {
            let range = TextRange::at(position, TextSize::of(*statement));
            expected.push(range);
            position = range.end() + TextSize::of(separator.as_str());
        }

        self.apply(id, &insertion)?;

        let inserted =
            expected.into_iter().map(|range| self.stand_in(range, SyntaxKind::is_statement));
        Ok(inserted.collect())
    }
}

/// Scope modifiers go after `export` and before any other modifier.
fn scope_position(syntax: &SyntaxNode) -> TextSize {
    let anchor = syntax
        .children_with_tokens()
        .filter(|element| !element.kind().is_whitespace_or_comment())
        .find(|element| match element {
            NodeOrToken::Node(node) => cst::Modifier::cast(node.clone())
                .and_then(|modifier| modifier.keyword_kind())
                .is_none_or(|kind| kind != SyntaxKind::EXPORT),
            NodeOrToken::Token(_) => true,
        });
    anchor.map_or(syntax.text_range().start(), |element| element.text_range().start())
}
