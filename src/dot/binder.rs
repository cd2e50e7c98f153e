//! Binder: symbol tables, color table, and tree annotations
//!
//!     The binder performs one depth-first pre-order walk over the parsed
//!     tree. For every node it assigns the `parent` back-reference and the
//!     `graph_context` bitmask captured *before* entering the node, so each
//!     node sees the strictness and direction of its nearest enclosing
//!     graph (the root graph node itself carries no context). All mutable
//!     walk state lives in an explicit [`BindContext`] threaded through the
//!     recursion; separate files can be bound concurrently.
//!
//! Symbol Rules
//!
//!     Node identifiers share one flat global table across the whole file;
//!     DOT node names are not subgraph-scoped. The graph's own identifier
//!     lands in that same table, an observed quirk of the grammar's flat
//!     namespace, kept as-is. Attribute names from assignments carried by a
//!     node statement are filed as member symbols under that node's
//!     [`TypeSymbol`]; assignments carried by edge, subgraph, or attribute
//!     statements have no resolvable carrier and are left unfiled.
//!
//!     The first textual occurrence of a name becomes the symbol's
//!     `first_mention`; later occurrences append to `references` in source
//!     order. Binding the same file twice is not supported and would
//!     duplicate references.
//!
//! Color Harvesting
//!
//!     Assignments whose left side is `color`, `fillcolor`, `bgcolor`, or
//!     `fontcolor` (and `ID = ID` statements whose left side is `color`)
//!     record the right side's raw text in the color table, provided the
//!     right subtree is error-free. When a node statement carries the
//!     assignment, recording is keyed per carrier symbol and attribute
//!     name, so a later assignment of the same attribute on the same node
//!     replaces the earlier value; carrier-less assignments are filed by
//!     value text alone.

use std::collections::HashMap;

use super::ast::{children, ContextFlags, NodeData, NodeId, SourceFile};
use super::token::SyntaxKind;

/// Attribute names whose assigned values are harvested into the color table.
const COLOR_ATTRIBUTES: [&str; 4] = ["color", "fillcolor", "bgcolor", "fontcolor"];

/// Index of a symbol in the [`SymbolStore`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named symbol with its first mention, all later references, and an
/// optional member table (attribute namespace) created lazily.
#[derive(Debug)]
pub struct TypeSymbol {
    pub name: String,
    pub first_mention: NodeId,
    pub references: Vec<NodeId>,
    pub members: Option<SymbolTable>,
}

/// Arena of all symbols created while binding one file.
#[derive(Debug, Default)]
pub struct SymbolStore {
    symbols: Vec<TypeSymbol>,
}

impl SymbolStore {
    pub fn symbol(&self, id: SymbolId) -> &TypeSymbol {
        &self.symbols[id.index()]
    }

    fn symbol_mut(&mut self, id: SymbolId) -> &mut TypeSymbol {
        &mut self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn create(&mut self, name: &str, first_mention: NodeId) -> SymbolId {
        self.symbols.push(TypeSymbol {
            name: name.to_string(),
            first_mention,
            references: Vec::new(),
            members: None,
        });
        SymbolId((self.symbols.len() - 1) as u32)
    }
}

/// Case-sensitive mapping from identifier text to its [`TypeSymbol`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Resolves a name to its symbol, recording the occurrence: the first
    /// mention creates the symbol, later mentions append a reference.
    fn ensure(&mut self, store: &mut SymbolStore, name: &str, node: NodeId) -> SymbolId {
        match self.entries.get(name) {
            Some(&id) => {
                store.symbol_mut(id).references.push(node);
                id
            }
            None => {
                let id = store.create(name, node);
                self.entries.insert(name.to_string(), id);
                id
            }
        }
    }
}

/// One harvested color usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorInfo {
    /// The identifier node carrying the color value.
    pub node: NodeId,
}

/// Color values harvested from attribute assignments, keyed by raw value
/// text.
///
/// A later recording for the same carrier and attribute replaces the
/// earlier one, so repeated `color=` assignments on one node keep only the
/// last value. Values without a carrier symbol are recorded by text alone
/// and never evict each other.
#[derive(Debug, Default)]
pub struct ColorTable {
    entries: HashMap<String, ColorInfo>,
    by_attribute: HashMap<String, String>,
}

impl ColorTable {
    pub fn get(&self, value: &str) -> Option<&ColorInfo> {
        self.entries.get(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColorInfo)> {
        self.entries.iter().map(|(value, info)| (value.as_str(), info))
    }

    fn record(&mut self, attribute_key: Option<String>, value: String, node: NodeId) {
        if let Some(key) = attribute_key {
            if let Some(old_value) = self.by_attribute.insert(key, value.clone()) {
                if old_value != value {
                    self.entries.remove(&old_value);
                }
            }
        }
        self.entries.insert(value, ColorInfo { node });
    }
}

/// Mutable state of one bind walk.
#[derive(Default)]
struct BindContext {
    store: SymbolStore,
    global: SymbolTable,
    colors: ColorTable,
}

/// Annotates the tree in place and attaches symbol and color tables to the
/// file.
///
/// Must be called exactly once per parsed file, before [`check`]; binding
/// twice duplicates symbol references.
///
/// [`check`]: crate::dot::checker::check
pub fn bind(file: &mut SourceFile) {
    let Some(root) = file.graph else {
        return;
    };
    let mut context = BindContext::default();
    bind_node(file, &mut context, root, None, ContextFlags::NONE);
    file.symbols = context.store;
    file.global_symbols = Some(context.global);
    file.colors = Some(context.colors);
}

fn bind_node(
    file: &mut SourceFile,
    context: &mut BindContext,
    id: NodeId,
    parent: Option<NodeId>,
    inherited: ContextFlags,
) {
    {
        let node = file.node_mut(id);
        node.parent = parent;
        node.graph_context = inherited;
    }

    let child_context = match file.node(id).kind {
        SyntaxKind::DirectedGraph | SyntaxKind::UndirectedGraph => {
            graph_child_context(file, id)
        }
        _ => inherited,
    };

    match file.node(id).kind {
        SyntaxKind::DirectedGraph | SyntaxKind::UndirectedGraph => {
            // The graph's own id shares the node-identifier namespace.
            if let NodeData::Graph { id: Some(graph_id), .. } = &file.node(id).data {
                let graph_id = *graph_id;
                register_identifier(file, context, graph_id, graph_id);
            }
        }
        SyntaxKind::NodeId => {
            if let NodeData::NodeId { id: inner, .. } = &file.node(id).data {
                let inner = *inner;
                if let Some(symbol) = register_identifier(file, context, inner, inner) {
                    file.node_mut(id).symbol = Some(symbol);
                }
            }
        }
        SyntaxKind::QuotedTextIdentifier => {
            let joined = file.identifier_text(id);
            if let NodeData::QuotedTextIdentifier { concatenation, .. } =
                &mut file.node_mut(id).data
            {
                *concatenation = joined;
            }
        }
        SyntaxKind::Assignment => bind_assignment(file, context, id),
        SyntaxKind::IdEqualsIdStatement => {
            if let NodeData::IdEqualsIdStatement { left, right, .. } = &file.node(id).data {
                let (left, right) = (*left, *right);
                harvest_color(file, context, left, right, None, &["color"]);
            }
        }
        _ => {}
    }

    for child in children(file, id) {
        bind_node(file, context, child, Some(id), child_context);
    }
}

/// Context a graph node passes down to its statements.
fn graph_child_context(file: &SourceFile, id: NodeId) -> ContextFlags {
    let node = file.node(id);
    let mut flags = match node.kind {
        SyntaxKind::DirectedGraph => ContextFlags::DIRECTED,
        _ => ContextFlags::UNDIRECTED,
    };
    if let NodeData::Graph { strict: Some(_), .. } = &node.data {
        flags |= ContextFlags::STRICT;
    }
    flags
}

/// Files an identifier node under the global table and annotates it with
/// its symbol. Missing (synthesized) identifiers are skipped.
fn register_identifier(
    file: &mut SourceFile,
    context: &mut BindContext,
    identifier: NodeId,
    occurrence: NodeId,
) -> Option<SymbolId> {
    let Some(name) = file.identifier_text(identifier) else {
        debug_assert!(false, "expected an identifier-shaped node");
        return None;
    };
    if name.is_empty() {
        return None;
    }
    let symbol = context.global.ensure(&mut context.store, &name, occurrence);
    file.node_mut(identifier).symbol = Some(symbol);
    Some(symbol)
}

fn bind_assignment(file: &mut SourceFile, context: &mut BindContext, id: NodeId) {
    let NodeData::Assignment { left, right, .. } = &file.node(id).data else {
        return;
    };
    let (left, right) = (*left, *right);

    // Member registration applies only to assignments carried by a node
    // statement; edge, subgraph, and attribute statement carriers stay
    // unresolved.
    let statement = file
        .node(id)
        .parent
        .and_then(|container| file.node(container).parent);
    let mut carrier = None;
    if let Some(statement) = statement {
        if file.node(statement).kind == SyntaxKind::NodeStatement {
            if let NodeData::NodeStatement { id: node_id, .. } = &file.node(statement).data {
                carrier = file.node(*node_id).symbol;
            }
        }
    }
    if let Some(carrier) = carrier {
        if let Some(name) = file.identifier_text(left) {
            if !name.is_empty() {
                let member = ensure_member(&mut context.store, carrier, &name, left);
                file.node_mut(left).symbol = Some(member);
            }
        } else {
            debug_assert!(false, "expected an identifier-shaped node");
        }
    }

    harvest_color(file, context, left, right, carrier, &COLOR_ATTRIBUTES);
}

/// Resolves a member name under a carrier symbol, creating the member
/// table on first use.
fn ensure_member(
    store: &mut SymbolStore,
    carrier: SymbolId,
    name: &str,
    node: NodeId,
) -> SymbolId {
    let mut members = store.symbol_mut(carrier).members.take().unwrap_or_default();
    let member = members.ensure(store, name, node);
    store.symbol_mut(carrier).members = Some(members);
    member
}

fn harvest_color(
    file: &SourceFile,
    context: &mut BindContext,
    left: NodeId,
    right: NodeId,
    carrier: Option<SymbolId>,
    attributes: &[&str],
) {
    let Some(name) = file.identifier_text(left) else {
        return;
    };
    let name = name.to_ascii_lowercase();
    if !attributes.contains(&name.as_str()) {
        return;
    }
    if file.subtree_has_errors(right) {
        return;
    }
    let Some(value) = file.identifier_text(right) else {
        return;
    };
    if value.is_empty() {
        return;
    }
    let key = carrier.map(|carrier| format!("{}#{name}", carrier.index()));
    context.colors.record(key, value, right);
}
