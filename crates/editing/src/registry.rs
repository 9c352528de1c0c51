//! Maps parse nodes of one generation to their wrappers.

use std::sync::atomic::{AtomicU32, Ordering};

use la_arena::{Arena, Idx};
use ordered::OrderedIndex;
use rustc_hash::FxHashMap;
use syntax::{SyntaxKind, SyntaxNode, TextRange};

static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(0);

/// A handle to a node wrapper, only meaningful to the document that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    registry: u32,
    pub(crate) index: Idx<NodeData>,
}

/// The storage behind a node wrapper.
///
/// `syntax` is `None` once the wrapper is forgotten.
#[derive(Debug)]
pub struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) syntax: Option<SyntaxNode>,
    pub(crate) parent: Option<NodeId>,
    /// Position among the parent's child nodes, tokens excluded.
    pub(crate) ordinal: u32,
    pub(crate) children: OrderedIndex<u32, ChildSlot>,
}

/// A materialized child, keyed by its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChildSlot {
    pub(crate) ordinal: u32,
    pub(crate) id: NodeId,
}

pub(crate) fn children_index() -> OrderedIndex<u32, ChildSlot> {
    OrderedIndex::by_key(|slot: &ChildSlot| slot.ordinal)
}

#[derive(Debug)]
pub struct WrapperRegistry {
    tag: u32,
    arena: Arena<NodeData>,
    generations: FxHashMap<u64, FxHashMap<SyntaxNode, NodeId>>,
}

impl Default for WrapperRegistry {
    fn default() -> WrapperRegistry {
        let tag = NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed);
        WrapperRegistry { tag, arena: Arena::default(), generations: FxHashMap::default() }
    }
}

impl WrapperRegistry {
    /// Whether `id` was issued by this registry.
    pub fn owns(&self, id: NodeId) -> bool {
        id.registry == self.tag
    }

    pub fn get(&self, version: u64, syntax: &SyntaxNode) -> Option<NodeId> {
        self.generations.get(&version)?.get(syntax).copied()
    }

    /// Returns the wrapper for `syntax`, creating it on first access.
    ///
    /// Within one generation, the same node always yields the same wrapper.
    pub(crate) fn get_or_create(
        &mut self,
        version: u64,
        syntax: SyntaxNode,
        parent: Option<NodeId>,
        ordinal: u32,
    ) -> NodeId {
        let generation = self.generations.entry(version).or_default();
        if let Some(&id) = generation.get(&syntax) {
            return id;
        }

        let kind = syntax.kind();
        let range = syntax.text_range();
        let children = children_index();
        let index = self.arena.alloc(NodeData {
            kind,
            range,
            syntax: Some(syntax.clone()),
            parent,
            ordinal,
            children,
        });
        let id = NodeId { registry: self.tag, index };
        generation.insert(syntax, id);

        if let Some(parent) = parent {
            self.arena[parent.index].children.set(ChildSlot { ordinal, id });
        }

        tracing::trace!(?id, ?kind, version, "Created wrapper");
        id
    }

    /// Points `id` at its counterpart in the generation `version`.
    pub(crate) fn rebind(&mut self, version: u64, id: NodeId, syntax: SyntaxNode) {
        let data = &mut self.arena[id.index];
        data.range = syntax.text_range();
        data.syntax = Some(syntax.clone());
        self.generations.entry(version).or_default().insert(syntax, id);
    }

    pub(crate) fn unbind(&mut self, version: u64, syntax: &SyntaxNode) {
        if let Some(generation) = self.generations.get_mut(&version) {
            generation.remove(syntax);
        }
    }

    /// Removes `id` from its parent's materialized children.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let data = &self.arena[id.index];
        let slot = ChildSlot { ordinal: data.ordinal, id };
        if let Some(parent) = data.parent {
            let children = &mut self.arena[parent.index].children;
            if children.get(&slot.ordinal) == Some(&slot) {
                children.remove_by_value(&slot);
            }
        }
    }

    /// Releases every wrapper cached for a superseded parse.
    pub fn drop_generation(&mut self, version: u64) {
        if let Some(generation) = self.generations.remove(&version) {
            tracing::trace!(version, released = generation.len(), "Dropped generation");
        }
    }

    /// Panics if `id` belongs to another registry; see [`WrapperRegistry::owns`].
    pub fn data(&self, id: NodeId) -> &NodeData {
        assert!(self.owns(id), "{id:?} belongs to another registry");
        &self.arena[id.index]
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        assert!(self.owns(id), "{id:?} belongs to another registry");
        &mut self.arena[id.index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        let tag = self.tag;
        self.arena.iter().map(move |(index, data)| (NodeId { registry: tag, index }, data))
    }
}

impl NodeData {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
