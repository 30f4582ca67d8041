//! Ownership tree: a workspace owns packages, packages own elements and
//! sub-packages.
//!
//! All nodes live in the workspace's arena and are addressed by [`NodeId`].
//! The owner back-reference is an arena handle, so the tree only ever owns
//! top-down. A node that is created but not appended anywhere is *floating*
//! and has no path.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;

use super::element::{Element, Kind, Metadata, describe_kinds};
use super::reference::ReferencePath;
use crate::error::{ArxmlError, Result};

/// Handle to a node inside one workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Non-owning back-reference from a node to its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Top-level package owned directly by the workspace
    Workspace,
    Package(NodeId),
}

#[derive(Debug)]
struct Node {
    name: String,
    metadata: Metadata,
    owner: Option<Owner>,
    body: Body,
}

#[derive(Debug)]
enum Body {
    Package(Children),
    Element(Box<dyn Element>),
}

/// Direct children of a container. Elements and packages share one name
/// index.
#[derive(Debug, Default)]
struct Children {
    elements: Vec<NodeId>,
    packages: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl Node {
    fn children(&self) -> Option<&Children> {
        match &self.body {
            Body::Package(children) => Some(children),
            Body::Element(_) => None,
        }
    }

    fn is_package(&self) -> bool {
        matches!(self.body, Body::Package(_))
    }

    fn kind(&self) -> Kind {
        match &self.body {
            Body::Package(_) => Kind::PACKAGE,
            Body::Element(element) => element.kind(),
        }
    }
}

/// Root of the ownership tree (one loaded document or an application model)
#[derive(Debug, Default)]
pub struct Workspace {
    nodes: Vec<Option<Node>>,
    top: Children,
    package_map: BTreeMap<String, String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workspace with a role → package path map (e.g. `"BaseType"` →
    /// `"/DataTypes/BaseTypes"`)
    pub fn with_package_map(package_map: BTreeMap<String, String>) -> Self {
        Self {
            package_map,
            ..Self::default()
        }
    }

    pub fn package_map(&self) -> &BTreeMap<String, String> {
        &self.package_map
    }

    pub fn set_package_map(&mut self, package_map: BTreeMap<String, String>) {
        self.package_map = package_map;
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(ArxmlError::UnknownNode)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(ArxmlError::UnknownNode)
    }

    fn alloc(&mut self, name: String, metadata: Metadata, body: Body) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            name,
            metadata,
            owner: None,
            body,
        }));
        id
    }

    fn children_of(&self, owner: Owner) -> Result<&Children> {
        match owner {
            Owner::Workspace => Ok(&self.top),
            Owner::Package(id) => {
                let node = self.node(id)?;
                node.children().ok_or_else(|| ArxmlError::NotAPackage {
                    name: node.name.clone(),
                })
            }
        }
    }

    fn children_of_mut(&mut self, owner: Owner) -> Result<&mut Children> {
        match owner {
            Owner::Workspace => Ok(&mut self.top),
            Owner::Package(id) => {
                let node = self.node_mut(id)?;
                match &mut node.body {
                    Body::Package(children) => Ok(children),
                    Body::Element(_) => Err(ArxmlError::NotAPackage {
                        name: node.name.clone(),
                    }),
                }
            }
        }
    }

    /// Label used in duplicate-name errors
    fn owner_label(&self, owner: Owner) -> String {
        match owner {
            Owner::Workspace => "/".to_string(),
            Owner::Package(id) => self
                .compute_path(id)
                .or_else(|| self.name(id).map(str::to_string))
                .unwrap_or_default(),
        }
    }

    /// Create a floating, empty package
    pub fn create_package(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(
            name.into(),
            Metadata::default(),
            Body::Package(Children::default()),
        )
    }

    /// Create a floating element
    pub fn create_element<E: Element>(&mut self, name: impl Into<String>, element: E) -> NodeId {
        self.create_element_with(name, Metadata::default(), Box::new(element))
    }

    /// Create a floating element from a boxed payload
    pub fn create_element_with(
        &mut self,
        name: impl Into<String>,
        metadata: Metadata,
        element: Box<dyn Element>,
    ) -> NodeId {
        self.alloc(name.into(), metadata, Body::Element(element))
    }

    /// Create a package and attach it in one step. The name is checked before
    /// anything is allocated, so a collision leaves the arena unchanged.
    pub fn add_package(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        metadata: Metadata,
    ) -> Result<NodeId> {
        let owner = parent.map_or(Owner::Workspace, Owner::Package);
        let name = name.into();
        self.check_vacant(owner, &name)?;
        let id = self.alloc(name, metadata, Body::Package(Children::default()));
        self.attach(owner, id)?;
        Ok(id)
    }

    /// Create an element and append it to `package` in one step
    pub fn add_element(
        &mut self,
        package: NodeId,
        name: impl Into<String>,
        metadata: Metadata,
        element: Box<dyn Element>,
    ) -> Result<NodeId> {
        let owner = Owner::Package(package);
        let name = name.into();
        self.check_vacant(owner, &name)?;
        let id = self.alloc(name, metadata, Body::Element(element));
        self.attach(owner, id)?;
        Ok(id)
    }

    fn check_vacant(&self, owner: Owner, name: &str) -> Result<()> {
        if self.children_of(owner)?.index.contains_key(name) {
            return Err(ArxmlError::DuplicateName {
                name: name.to_string(),
                container: self.owner_label(owner),
            });
        }
        Ok(())
    }

    /// Append a floating node to a package
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.attach(Owner::Package(parent), child)
    }

    /// Append a floating package at the top level
    pub fn append_package(&mut self, child: NodeId) -> Result<()> {
        self.attach(Owner::Workspace, child)
    }

    fn attach(&mut self, owner: Owner, child: NodeId) -> Result<()> {
        let node = self.node(child)?;
        let name = node.name.clone();
        let is_package = node.is_package();
        if node.owner.is_some() {
            return Err(ArxmlError::AlreadyAttached { name });
        }

        match owner {
            Owner::Workspace if !is_package => {
                return Err(ArxmlError::InvalidChild {
                    details: format!("element '{}' cannot be a top-level node", name),
                });
            }
            Owner::Package(parent) if parent == child || self.is_ancestor(child, parent) => {
                return Err(ArxmlError::CyclicContainment { name });
            }
            _ => {}
        }

        self.check_vacant(owner, &name)?;
        let children = self.children_of_mut(owner)?;
        children.index.insert(name, child);
        if is_package {
            children.packages.push(child);
        } else {
            children.elements.push(child);
        }
        self.node_mut(child)?.owner = Some(owner);
        Ok(())
    }

    /// True when `ancestor` appears on the owner chain of `node`
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.owner(node);
        while let Some(Owner::Package(id)) = current {
            if id == ancestor {
                return true;
            }
            current = self.owner(id);
        }
        false
    }

    /// Detach a node from its owner; it becomes floating. Detaching a
    /// floating node is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        let Some(owner) = node.owner else {
            return Ok(());
        };
        let name = node.name.clone();

        let children = self.children_of_mut(owner)?;
        children.elements.retain(|c| *c != id);
        children.packages.retain(|c| *c != id);
        if children.index.get(&name) == Some(&id) {
            children.index.remove(&name);
        }
        self.node_mut(id)?.owner = None;
        self.reindex(owner, &name)?;
        Ok(())
    }

    /// Point the index entry for `name` at the first child carrying it, if
    /// the entry is vacant. Only needed after unchecked renames.
    fn reindex(&mut self, owner: Owner, name: &str) -> Result<()> {
        let children = self.children_of(owner)?;
        if children.index.contains_key(name) {
            return Ok(());
        }
        let candidate = children
            .packages
            .iter()
            .chain(children.elements.iter())
            .copied()
            .find(|c| self.name(*c) == Some(name));
        if let Some(candidate) = candidate {
            self.children_of_mut(owner)?
                .index
                .insert(name.to_string(), candidate);
        }
        Ok(())
    }

    /// Detach a node and drop it together with everything it owns
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take)
                && let Body::Package(children) = node.body
            {
                pending.extend(children.packages);
                pending.extend(children.elements);
            }
        }
        Ok(())
    }

    /// Rename a node, rejecting a collision with one of its siblings
    pub fn rename(&mut self, id: NodeId, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        if let Some(owner) = self.node(id)?.owner
            && let Some(existing) = self.children_of(owner)?.index.get(&new_name)
            && *existing != id
        {
            return Err(ArxmlError::DuplicateName {
                name: new_name,
                container: self.owner_label(owner),
            });
        }
        self.set_name(id, new_name)
    }

    /// Rename without checking siblings. The name index keeps pointing at
    /// the first node that claimed a name.
    pub fn set_name(&mut self, id: NodeId, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        let node = self.node_mut(id)?;
        let old_name = std::mem::replace(&mut node.name, new_name.clone());
        let Some(owner) = node.owner else {
            return Ok(());
        };

        let children = self.children_of_mut(owner)?;
        if children.index.get(&old_name) == Some(&id) {
            children.index.remove(&old_name);
        }
        children.index.entry(new_name).or_insert(id);
        self.reindex(owner, &old_name)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).ok().map(|node| node.name.as_str())
    }

    pub fn metadata(&self, id: NodeId) -> Option<&Metadata> {
        self.node(id).ok().map(|node| &node.metadata)
    }

    pub fn metadata_mut(&mut self, id: NodeId) -> Option<&mut Metadata> {
        self.node_mut(id).ok().map(|node| &mut node.metadata)
    }

    pub fn kind(&self, id: NodeId) -> Option<Kind> {
        self.node(id).ok().map(Node::kind)
    }

    pub fn owner(&self, id: NodeId) -> Option<Owner> {
        self.node(id).ok().and_then(|node| node.owner)
    }

    pub fn is_package(&self, id: NodeId) -> bool {
        self.node(id).is_ok_and(Node::is_package)
    }

    /// Payload of an element node
    pub fn element_dyn(&self, id: NodeId) -> Option<&dyn Element> {
        match &self.node(id).ok()?.body {
            Body::Element(element) => Some(element.as_ref()),
            Body::Package(_) => None,
        }
    }

    /// Typed payload of an element node
    pub fn element<E: Element>(&self, id: NodeId) -> Option<&E> {
        self.element_dyn(id)?.as_any().downcast_ref::<E>()
    }

    pub fn element_mut<E: Element>(&mut self, id: NodeId) -> Option<&mut E> {
        match &mut self.node_mut(id).ok()?.body {
            Body::Element(element) => element.as_any_mut().downcast_mut::<E>(),
            Body::Package(_) => None,
        }
    }

    /// Top-level packages in insertion order
    pub fn packages(&self) -> &[NodeId] {
        &self.top.packages
    }

    /// Sub-packages of a package in insertion order
    pub fn child_packages(&self, package: NodeId) -> &[NodeId] {
        self.node(package)
            .ok()
            .and_then(Node::children)
            .map_or(&[], |children| children.packages.as_slice())
    }

    /// Elements of a package in insertion order
    pub fn elements(&self, package: NodeId) -> &[NodeId] {
        self.node(package)
            .ok()
            .and_then(Node::children)
            .map_or(&[], |children| children.elements.as_slice())
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a node by path from the workspace root. A leading `/` is
    /// optional.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.find_at(Owner::Workspace, path)
    }

    /// Look up a node by path relative to a package
    pub fn find_in(&self, package: NodeId, path: &str) -> Option<NodeId> {
        self.find_at(Owner::Package(package), path)
    }

    fn find_at(&self, owner: Owner, path: &str) -> Option<NodeId> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let (head, rest) = path.split_once('/').unwrap_or((path, ""));
        let id = *self.children_of(owner).ok()?.index.get(head)?;
        if rest.is_empty() {
            Some(id)
        } else if self.is_package(id) {
            self.find_at(Owner::Package(id), rest)
        } else {
            None
        }
    }

    /// Create every missing package along `path` and return the deepest one
    pub fn make_packages(&mut self, path: &str) -> Result<NodeId> {
        self.make_packages_at(Owner::Workspace, path)
    }

    /// Like [`Workspace::make_packages`], relative to a package
    pub fn make_packages_in(&mut self, package: NodeId, path: &str) -> Result<NodeId> {
        self.make_packages_at(Owner::Package(package), path)
    }

    fn make_packages_at(&mut self, owner: Owner, path: &str) -> Result<NodeId> {
        let mut current = owner;
        let mut deepest = None;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let existing = self.children_of(current)?.index.get(segment).copied();
            let id = match existing {
                Some(id) if self.is_package(id) => id,
                Some(_) => {
                    return Err(ArxmlError::NotAPackage {
                        name: segment.to_string(),
                    });
                }
                None => {
                    let id = self.create_package(segment);
                    self.attach(current, id)?;
                    id
                }
            };
            current = Owner::Package(id);
            deepest = Some(id);
        }
        deepest.ok_or_else(|| ArxmlError::InvalidChild {
            details: format!("package path '{}' is empty", path),
        })
    }

    /// Direct child elements whose names are in `names`, in insertion order.
    /// The iterator is `Clone`, so it can be restarted.
    pub fn filter<'a>(
        &'a self,
        package: NodeId,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = NodeId> + Clone + 'a {
        self.elements(package)
            .iter()
            .copied()
            .filter(move |id| self.name(*id).is_some_and(|name| names.contains(&name)))
    }

    /// Direct child elements whose names match `pattern`, in insertion order
    pub fn filter_pattern<'a>(
        &'a self,
        package: NodeId,
        pattern: &'a Regex,
    ) -> impl Iterator<Item = NodeId> + Clone + 'a {
        self.elements(package)
            .iter()
            .copied()
            .filter(move |id| self.name(*id).is_some_and(|name| pattern.is_match(name)))
    }

    /// Absolute path of a node, `None` while any ancestor is floating
    pub fn compute_path(&self, id: NodeId) -> Option<String> {
        let segments = self.path_segments(id)?;
        Some(segments.join("/"))
    }

    /// Root-to-leaf segments, starting with the empty root marker
    fn path_segments(&self, id: NodeId) -> Option<Vec<&str>> {
        let mut node = self.node(id).ok()?;
        let mut segments = vec![node.name.as_str()];
        loop {
            match node.owner? {
                Owner::Workspace => {
                    segments.push("");
                    break;
                }
                Owner::Package(parent) => {
                    node = self.node(parent).ok()?;
                    segments.push(node.name.as_str());
                }
            }
        }
        segments.reverse();
        Some(segments)
    }

    /// Reference to a node, typed with the node's kind
    pub fn reference_to(&self, id: NodeId) -> Option<ReferencePath> {
        let kind = self.kind(id)?;
        let segments = self.path_segments(id)?;
        Some(ReferencePath::computed(&segments, kind))
    }

    /// Resolve a reference lazily against this workspace
    pub fn resolve(&self, reference: &ReferencePath) -> Result<NodeId> {
        let id = self
            .find(reference.as_str())
            .ok_or_else(|| ArxmlError::UnresolvedReference {
                path: reference.to_string(),
            })?;
        if let Some(dest) = reference.dest()
            && let Some(found) = self.kind(id)
            && found != dest
        {
            return Err(ArxmlError::InvalidReferenceKind {
                tag: reference.to_string(),
                found: found.to_string(),
                expected: describe_kinds(&[dest]),
            });
        }
        Ok(id)
    }

    /// Package registered for a role, created on demand
    pub fn package_for(&mut self, role: &str) -> Result<NodeId> {
        let path = self
            .package_map
            .get(role)
            .cloned()
            .ok_or_else(|| ArxmlError::Config(format!("no package mapped for role '{}'", role)))?;
        self.make_packages(&path)
    }

    /// Element `name` inside the package registered for `role`
    pub fn find_element(&self, role: &str, name: &str) -> Option<NodeId> {
        let package = self.find(self.package_map.get(role)?)?;
        self.find_in(package, name)
            .filter(|id| !self.is_package(*id))
    }

    /// Structural equality of two workspaces: same packages and elements in
    /// the same order, with equal names, metadata and payloads
    pub fn content_eq(&self, other: &Workspace) -> bool {
        self.top.packages.len() == other.top.packages.len()
            && self
                .top
                .packages
                .iter()
                .zip(&other.top.packages)
                .all(|(a, b)| self.node_eq(*a, other, *b))
    }

    fn node_eq(&self, id: NodeId, other: &Workspace, other_id: NodeId) -> bool {
        let (Ok(a), Ok(b)) = (self.node(id), other.node(other_id)) else {
            return false;
        };
        if a.name != b.name || a.metadata != b.metadata {
            return false;
        }
        match (&a.body, &b.body) {
            (Body::Element(x), Body::Element(y)) => x.eq_element(y.as_ref()),
            (Body::Package(x), Body::Package(y)) => {
                x.elements.len() == y.elements.len()
                    && x.packages.len() == y.packages.len()
                    && x
                        .elements
                        .iter()
                        .zip(&y.elements)
                        .chain(x.packages.iter().zip(&y.packages))
                        .all(|(p, q)| self.node_eq(*p, other, *q))
            }
            _ => false,
        }
    }
}
