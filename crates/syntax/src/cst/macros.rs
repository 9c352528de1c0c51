/// Declares a typed view for each listed node kind.
macro_rules! cst_nodes {
    ($($kind:ident),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct $kind {
                node: crate::SyntaxNode,
            }

            impl rowan::ast::AstNode for $kind {
                type Language = crate::TypeScript;

                fn can_cast(kind: crate::SyntaxKind) -> bool {
                    kind == crate::SyntaxKind::$kind
                }

                fn cast(node: crate::SyntaxNode) -> Option<$kind> {
                    Self::can_cast(node.kind()).then_some($kind { node })
                }

                fn syntax(&self) -> &crate::SyntaxNode {
                    &self.node
                }
            }
        )+
    };
}

/// Declares a view over several node kinds, along with a view for each kind.
macro_rules! cst_union {
    ($union:ident { $($kind:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $union {
            $($kind($kind),)+
        }

        cst_nodes!($($kind),+);

        impl rowan::ast::AstNode for $union {
            type Language = crate::TypeScript;

            fn can_cast(kind: crate::SyntaxKind) -> bool {
                matches!(kind, $(crate::SyntaxKind::$kind)|+)
            }

            fn cast(node: crate::SyntaxNode) -> Option<$union> {
                let view = match node.kind() {
                    $(crate::SyntaxKind::$kind => $union::$kind($kind { node }),)+
                    _ => return None,
                };
                Some(view)
            }

            fn syntax(&self) -> &crate::SyntaxNode {
                match self {
                    $($union::$kind(view) => view.syntax(),)+
                }
            }
        }
    };
}

/// Declares accessors on a view.
///
/// * `child Kind` returns the first child node of that view;
/// * `children Kind` returns every child node of that view;
/// * `token KIND` returns the first direct token of that kind;
/// * `tokens KIND` returns every direct token of that kind;
/// * `token_in SET` returns the first direct token in a [`TokenSet`];
/// * `kind_in SET` returns the kind of that token.
///
/// [`TokenSet`]: crate::TokenSet
macro_rules! cst_accessors {
    ($view:ident { $($name:ident -> $shape:ident $target:ident),+ $(,)? }) => {
        impl $view {
            $(cst_accessors!(@$shape $name $target);)+
        }
    };
    (@child $name:ident $child:ident) => {
        pub fn $name(&self) -> Option<$child> {
            rowan::ast::support::child(self.syntax())
        }
    };
    (@children $name:ident $child:ident) => {
        pub fn $name(&self) -> rowan::ast::AstChildren<$child> {
            rowan::ast::support::children(self.syntax())
        }
    };
    (@token $name:ident $token:ident) => {
        pub fn $name(&self) -> Option<crate::SyntaxToken> {
            rowan::ast::support::token(self.syntax(), crate::SyntaxKind::$token)
        }
    };
    (@tokens $name:ident $token:ident) => {
        pub fn $name(&self) -> impl Iterator<Item = crate::SyntaxToken> {
            direct_tokens(self.syntax()).filter(|token| token.kind() == crate::SyntaxKind::$token)
        }
    };
    (@token_in $name:ident $set:ident) => {
        pub fn $name(&self) -> Option<crate::SyntaxToken> {
            direct_tokens(self.syntax()).find(|token| $set.contains(token.kind()))
        }
    };
    (@kind_in $name:ident $set:ident) => {
        pub fn $name(&self) -> Option<crate::SyntaxKind> {
            direct_tokens(self.syntax()).map(|token| token.kind()).find(|&kind| $set.contains(kind))
        }
    };
}
