//! The toolbox: a tree of categories whose selected entry feeds the flyout.

mod flyout;

pub use flyout::Flyout;

use crate::definition::{ToolboxDefinition, ToolboxItem, ToolboxKind};
use crate::error::DefinitionError;

/// A node of the toolbox tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    blocks: Vec<String>,
    children: Vec<Category>,
    expanded: bool,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blocks: Vec::new(),
            children: Vec::new(),
            expanded: false,
        }
    }

    pub fn with_block(mut self, type_name: &str) -> Self {
        self.blocks.push(type_name.to_string());
        self
    }

    pub fn with_child(mut self, child: Category) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block types shown in the flyout when this category is selected.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn children(&self) -> &[Category] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn from_item(name: &str, contents: &[ToolboxItem], expanded: bool) -> Self {
        let mut category = Category::new(name);
        category.expanded = expanded;
        for item in contents {
            match item {
                ToolboxItem::Block { type_name } => category.blocks.push(type_name.clone()),
                ToolboxItem::Category {
                    name,
                    contents,
                    expanded,
                } => category
                    .children
                    .push(Category::from_item(name, contents, *expanded)),
            }
        }
        category
    }
}

/// The category tree and its selection.
///
/// The selection is a path of child indices from the root level. Moving
/// between categories only visits categories whose ancestors are all
/// expanded, and never wraps around.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toolbox {
    categories: Vec<Category>,
    selected: Option<Vec<usize>>,
    last_selected: Option<Vec<usize>>,
}

impl Toolbox {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            selected: None,
            last_selected: None,
        }
    }

    pub fn from_definition(definition: &ToolboxDefinition) -> Result<Self, DefinitionError> {
        if definition.kind != ToolboxKind::CategoryToolbox {
            return Err(DefinitionError::WrongToolboxKind {
                expected: ToolboxKind::CategoryToolbox.as_str(),
                found: definition.kind.as_str(),
            });
        }
        let mut categories = Vec::with_capacity(definition.contents.len());
        for item in &definition.contents {
            match item {
                ToolboxItem::Category {
                    name,
                    contents,
                    expanded,
                } => categories.push(Category::from_item(name, contents, *expanded)),
                ToolboxItem::Block { type_name } => {
                    return Err(DefinitionError::UncategorizedBlock(type_name.clone()));
                }
            }
        }
        Ok(Self::new(categories))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, path: &[usize]) -> Option<&Category> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.categories.get(*first)?, |c, i| c.children.get(*i))
    }

    fn category_mut(&mut self, path: &[usize]) -> Option<&mut Category> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.categories.get_mut(*first)?, |c, i| c.children.get_mut(*i))
    }

    pub fn selected_path(&self) -> Option<&[usize]> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Category> {
        self.category(self.selected.as_deref()?)
    }

    /// Block types of the selected category; empty when nothing is
    /// selected.
    pub fn selected_blocks(&self) -> &[String] {
        self.selected().map(|c| c.blocks()).unwrap_or_default()
    }

    /// Selects the category at `path`. Returns `false` if it does not exist.
    pub fn select(&mut self, path: &[usize]) -> bool {
        if self.category(path).is_none() {
            return false;
        }
        self.selected = Some(path.to_vec());
        true
    }

    /// Restores the category selected before the last
    /// [`clear_selection`](Self::clear_selection), or selects the first one.
    pub fn select_first_or_restore(&mut self) -> bool {
        if self.selected.is_some() {
            return true;
        }
        if let Some(path) = self.last_selected.clone() {
            if self.select(&path) {
                return true;
            }
        }
        self.select(&[0])
    }

    pub fn clear_selection(&mut self) {
        if let Some(path) = self.selected.take() {
            self.last_selected = Some(path);
        }
    }

    /// Paths of the visible categories in pre-order.
    pub fn visible_paths(&self) -> Vec<Vec<usize>> {
        fn walk(categories: &[Category], prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            for (i, category) in categories.iter().enumerate() {
                prefix.push(i);
                out.push(prefix.clone());
                if category.expanded {
                    walk(&category.children, prefix, out);
                }
                prefix.pop();
            }
        }
        let mut out = Vec::new();
        walk(&self.categories, &mut Vec::new(), &mut out);
        out
    }

    fn step(&mut self, forward: bool) -> bool {
        let Some(current) = self.selected.clone() else {
            return false;
        };
        let visible = self.visible_paths();
        let Some(index) = visible.iter().position(|p| *p == current) else {
            return false;
        };
        let target = if forward {
            index.checked_add(1)
        } else {
            index.checked_sub(1)
        };
        match target.and_then(|i| visible.get(i)) {
            Some(path) => {
                self.selected = Some(path.clone());
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) -> bool {
        self.step(true)
    }

    pub fn select_previous(&mut self) -> bool {
        self.step(false)
    }

    /// Expands the selected category and selects its first child. Returns
    /// `false` on a leaf category.
    pub fn select_child(&mut self) -> bool {
        let Some(mut path) = self.selected.clone() else {
            return false;
        };
        match self.category_mut(&path) {
            Some(category) if category.has_children() => category.expanded = true,
            _ => return false,
        }
        path.push(0);
        self.selected = Some(path);
        true
    }

    /// Collapses the selected category when it is expanded, otherwise
    /// selects its parent. Returns `false` at the root level.
    pub fn select_parent(&mut self) -> bool {
        let Some(mut path) = self.selected.clone() else {
            return false;
        };
        if let Some(category) = self.category_mut(&path) {
            if category.expanded && category.has_children() {
                category.expanded = false;
                return true;
            }
        }
        if path.len() < 2 {
            return false;
        }
        path.pop();
        self.selected = Some(path);
        true
    }
}
