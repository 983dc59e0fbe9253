//! View tree hosting the surface and its overlays.
//!
//! The tree belongs to the host. The bridge only installs the content layout
//! and inserts or removes its own children.

use indexmap::IndexMap;

use crate::error::ViewError;
use crate::surface::SurfaceId;

/// Node identifier in the view tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    /// Frame layout that stacks its children.
    Container,
    /// Native-drawable surface.
    Surface(SurfaceId),
    /// Text label.
    Text(String),
}

impl ViewKind {
    pub fn is_container(&self) -> bool {
        matches!(self, ViewKind::Container)
    }
}

/// Declarative content layout, installed with [`ViewTree::set_content`].
///
/// Only containers are described here; surfaces and labels are inserted at
/// runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutSpec {
    pub anchor: Option<String>,
    pub children: Vec<LayoutSpec>,
}

impl LayoutSpec {
    /// A frame layout with no anchor and no children.
    pub fn frame() -> Self {
        Self::default()
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_child(mut self, child: LayoutSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A node in the view tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub anchor: Option<String>,
    pub parent: Option<ViewId>,
    pub children: Vec<ViewId>,
}

#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: IndexMap<ViewId, ViewNode>,
    content: Option<ViewId>,
    focused: Option<ViewId>,
    next_id: usize,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(&id)
    }

    /// Root of the installed content layout.
    pub fn content(&self) -> Option<ViewId> {
        self.content
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    /// Children of `id` in insertion order. Empty for unknown views.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Surfaces parented directly to `container`.
    pub fn surface_children(&self, container: ViewId) -> impl Iterator<Item = SurfaceId> + '_ {
        self.children(container)
            .iter()
            .filter_map(move |child| match self.nodes.get(child).map(|node| &node.kind) {
                Some(ViewKind::Surface(surface)) => Some(*surface),
                _ => None,
            })
    }

    /// The view currently parenting `surface`, if any.
    pub fn parent_of_surface(&self, surface: SurfaceId) -> Option<ViewId> {
        self.nodes
            .values()
            .find(|node| node.kind == ViewKind::Surface(surface))
            .and_then(|node| node.parent)
    }

    fn alloc_id(&mut self) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace the content layout, removing any previous content.
    pub fn set_content(&mut self, layout: &LayoutSpec) -> ViewId {
        self.clear_content();
        let root = self.build_layout(layout, None);
        self.content = Some(root);
        root
    }

    fn build_layout(&mut self, layout: &LayoutSpec, parent: Option<ViewId>) -> ViewId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            ViewNode {
                kind: ViewKind::Container,
                anchor: layout.anchor.clone(),
                parent,
                children: Vec::new(),
            },
        );

        for child in &layout.children {
            let child_id = self.build_layout(child, Some(id));
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children.push(child_id);
            }
        }

        id
    }

    /// Remove the content layout and everything below it.
    pub fn clear_content(&mut self) {
        if let Some(root) = self.content.take() {
            // The root is always present while `content` points at it.
            let _ = self.remove_view(root);
        }
    }

    /// Depth-first search of the content layout for `anchor`.
    pub fn find_by_anchor(&self, anchor: &str) -> Option<ViewId> {
        let mut stack = vec![self.content?];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(&id)?;
            if node.anchor.as_deref() == Some(anchor) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Append a new child to `parent`.
    ///
    /// A surface may be parented once in the whole tree, and a container
    /// hosts at most one surface.
    pub fn add_view(&mut self, parent: ViewId, kind: ViewKind) -> Result<ViewId, ViewError> {
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(ViewError::UnknownView(parent))?;
        if !parent_node.kind.is_container() {
            return Err(ViewError::NotAContainer(parent));
        }

        if let ViewKind::Surface(surface) = kind {
            if let Some(existing_parent) = self.parent_of_surface(surface) {
                return Err(ViewError::SurfaceAlreadyParented {
                    surface,
                    parent: existing_parent,
                });
            }
            if let Some(hosted) = self.surface_children(parent).next() {
                return Err(ViewError::ContainerOccupied {
                    container: parent,
                    surface: hosted,
                });
            }
        }

        let id = self.alloc_id();
        self.nodes.insert(
            id,
            ViewNode {
                kind,
                anchor: None,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }

        Ok(id)
    }

    /// Remove `id` and its whole subtree.
    pub fn remove_view(&mut self, id: ViewId) -> Result<(), ViewError> {
        let node = self.nodes.get(&id).ok_or(ViewError::UnknownView(id))?;

        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| *child != id);
            }
        }
        if self.content == Some(id) {
            self.content = None;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.nodes.shift_remove(&current) {
                stack.extend(removed.children);
            }
            if self.focused == Some(current) {
                self.focused = None;
            }
        }

        Ok(())
    }

    pub fn request_focus(&mut self, id: ViewId) -> Result<(), ViewError> {
        if !self.nodes.contains_key(&id) {
            return Err(ViewError::UnknownView(id));
        }
        self.focused = Some(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_layout() -> LayoutSpec {
        LayoutSpec::frame().with_child(LayoutSpec::frame().with_anchor("frame_layout"))
    }

    #[test]
    fn set_content_builds_nested_layout() {
        let mut tree = ViewTree::new();
        let root = tree.set_content(&main_layout());

        assert_eq!(tree.len(), 2);
        let frame = tree.find_by_anchor("frame_layout").unwrap();
        assert_eq!(tree.children(root), &[frame]);
        assert_eq!(tree.get(frame).unwrap().parent, Some(root));
    }

    #[test]
    fn set_content_replaces_previous_layout() {
        let mut tree = ViewTree::new();
        tree.set_content(&main_layout());
        tree.set_content(&LayoutSpec::frame());

        assert_eq!(tree.len(), 1);
        assert!(tree.find_by_anchor("frame_layout").is_none());
    }

    #[test]
    fn missing_anchor_is_none() {
        let mut tree = ViewTree::new();
        assert!(tree.find_by_anchor("frame_layout").is_none());
        tree.set_content(&LayoutSpec::frame().with_anchor("other"));
        assert!(tree.find_by_anchor("frame_layout").is_none());
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = ViewTree::new();
        let root = tree.set_content(&LayoutSpec::frame());

        let surface = tree.add_view(root, ViewKind::Surface(SurfaceId(1))).unwrap();
        let label = tree
            .add_view(root, ViewKind::Text("hello".to_string()))
            .unwrap();

        assert_eq!(tree.children(root), &[surface, label]);
    }

    #[test]
    fn container_hosts_one_surface() {
        let mut tree = ViewTree::new();
        let root = tree.set_content(&LayoutSpec::frame());
        tree.add_view(root, ViewKind::Surface(SurfaceId(1))).unwrap();

        assert_eq!(
            tree.add_view(root, ViewKind::Surface(SurfaceId(2))),
            Err(ViewError::ContainerOccupied {
                container: root,
                surface: SurfaceId(1)
            })
        );
    }

    #[test]
    fn surface_is_parented_once() {
        let mut tree = ViewTree::new();
        let root = tree.set_content(&main_layout());
        let frame = tree.find_by_anchor("frame_layout").unwrap();
        tree.add_view(frame, ViewKind::Surface(SurfaceId(7))).unwrap();

        assert_eq!(
            tree.add_view(root, ViewKind::Surface(SurfaceId(7))),
            Err(ViewError::SurfaceAlreadyParented {
                surface: SurfaceId(7),
                parent: frame
            })
        );
    }

    #[test]
    fn only_containers_take_children() {
        let mut tree = ViewTree::new();
        let root = tree.set_content(&LayoutSpec::frame());
        let label = tree.add_view(root, ViewKind::Text("x".to_string())).unwrap();

        assert_eq!(
            tree.add_view(label, ViewKind::Container),
            Err(ViewError::NotAContainer(label))
        );
        assert_eq!(
            tree.add_view(ViewId(99), ViewKind::Container),
            Err(ViewError::UnknownView(ViewId(99)))
        );
    }

    #[test]
    fn remove_view_drops_subtree_and_focus() {
        let mut tree = ViewTree::new();
        let root = tree.set_content(&main_layout());
        let frame = tree.find_by_anchor("frame_layout").unwrap();
        let surface = tree.add_view(frame, ViewKind::Surface(SurfaceId(1))).unwrap();
        tree.request_focus(surface).unwrap();

        tree.remove_view(frame).unwrap();

        assert!(!tree.contains(surface));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.focused(), None);
        assert_eq!(tree.parent_of_surface(SurfaceId(1)), None);
    }

    #[test]
    fn clear_content_empties_tree() {
        let mut tree = ViewTree::new();
        tree.set_content(&main_layout());
        tree.clear_content();

        assert!(tree.is_empty());
        assert_eq!(tree.content(), None);
    }
}
