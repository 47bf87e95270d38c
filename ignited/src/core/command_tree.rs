//! Immutable command tree with a per-node bootstrap capability.
//!
//! The tree mirrors the clap definition. Nodes live in an arena and refer to
//! their parent by index, so a parent link is a lookup and never an owner.

use super::skip::should_skip;

/// Index of a node within its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Whether the bootstrap pipeline must run before this command's body.
    pub requires_bootstrap: bool,
}

#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Build the tree from a clap command.
    ///
    /// Pass a command that went through `clap::Command::build` so that the
    /// generated `help` subcommand is part of the tree.
    pub fn from_clap(command: &clap::Command) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(command, None);
        tree
    }

    fn insert(&mut self, command: &clap::Command, parent: Option<NodeId>) -> NodeId {
        let name = command.get_name().to_string();
        let requires_bootstrap = match parent {
            Some(parent) => !should_skip(&name, &self.nodes[parent.0].name),
            None => true,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode {
            name,
            parent,
            children: Vec::new(),
            requires_bootstrap,
        });
        for sub in command.get_subcommands() {
            let child = self.insert(sub, Some(id));
            self.nodes[id.0].children.push(child);
        }
        id
    }

    pub fn root(&self) -> &CommandNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, node: &CommandNode) -> Option<&CommandNode> {
        node.parent.map(|id| self.node(id))
    }

    pub fn children<'a>(&'a self, node: &'a CommandNode) -> impl Iterator<Item = &'a CommandNode> {
        node.children.iter().map(|id| self.node(*id))
    }

    /// Resolve a path of names below the root, e.g. `["gitops"]`.
    ///
    /// An empty path resolves to the root.
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        let mut current = self.root();
        for name in path {
            current = self.children(current).find(|child| child.name == *name)?;
        }
        Some(current)
    }

    /// All nodes in depth-first insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandNode> {
        self.nodes.iter()
    }
}
