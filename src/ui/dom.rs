//! In-memory document model the interaction layer binds to.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`ElementId`]. Removing an element detaches it from its parent but keeps
//! its slot, so ids held by listeners and timers stay valid.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Native constraint-validation outcome, checked in the order browsers report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Custom(String),
    ValueMissing,
    BadInput,
    RangeUnderflow(String),
    RangeOverflow(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn message(&self) -> String {
        match self {
            Validity::Valid => String::new(),
            Validity::Custom(message) => message.clone(),
            Validity::ValueMissing => "Please fill out this field.".to_string(),
            Validity::BadInput => "Please enter a number.".to_string(),
            Validity::RangeUnderflow(min) => {
                format!("Value must be greater than or equal to {min}.")
            }
            Validity::RangeOverflow(max) => format!("Value must be less than or equal to {max}."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    checked: bool,
    readonly: bool,
    required: bool,
    hidden: bool,
    custom_validity: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn input_type(&self) -> &str {
        self.attr("type").unwrap_or("text")
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|existing| existing != class);
    }

    /// Flips `class` and returns whether it is now present.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.classes.push(class.to_string());
            true
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn custom_validity(&self) -> &str {
        &self.custom_validity
    }

    pub fn set_custom_validity(&mut self, message: impl Into<String>) {
        self.custom_validity = message.into();
    }

    pub fn validity(&self) -> Validity {
        if !self.custom_validity.is_empty() {
            return Validity::Custom(self.custom_validity.clone());
        }

        let value = self.value.trim();
        let empty = match self.input_type() {
            "checkbox" | "radio" => !self.checked,
            _ => value.is_empty(),
        };
        if self.required && empty {
            return Validity::ValueMissing;
        }
        if empty || self.input_type() != "number" {
            return Validity::Valid;
        }

        let Ok(number) = value.parse::<f64>() else {
            return Validity::BadInput;
        };
        if let Some(min) = self.attr("min") {
            if min.parse::<f64>().is_ok_and(|min| number < min) {
                return Validity::RangeUnderflow(min.to_string());
            }
        }
        if let Some(max) = self.attr("max") {
            if max.parse::<f64>().is_ok_and(|max| number > max) {
                return Validity::RangeOverflow(max.to_string());
            }
        }
        Validity::Valid
    }

    pub fn validation_message(&self) -> String {
        self.validity().message()
    }
}

/// Declarative description of an element subtree, appended with [`Document::append`].
#[derive(Debug, Clone)]
pub struct El {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<El>,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Boolean attribute such as `required` or `data-toast`.
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn value(self, value: &str) -> Self {
        self.attr("value", value)
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    body: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = blank("body", None);
        Self {
            nodes: vec![body],
            body: ElementId(0),
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    /// Appends `tree` under `parent`, returning the id of its root.
    pub fn append(&mut self, parent: ElementId, tree: El) -> ElementId {
        let id = ElementId(self.nodes.len());
        let mut element = blank(&tree.tag, Some(parent));
        element.text = tree.text;
        for (name, value) in tree.attrs {
            match name.as_str() {
                "value" => element.value = value.clone(),
                "checked" => element.checked = true,
                "readonly" => element.readonly = true,
                "required" => element.required = true,
                "hidden" => element.hidden = true,
                "class" => {
                    for class in value.split_whitespace() {
                        element.add_class(class);
                    }
                }
                _ => {}
            }
            element.attrs.insert(name, value);
        }
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);

        for child in tree.children {
            self.append(id, child);
        }
        id
    }

    /// Appends to the body.
    pub fn mount(&mut self, tree: El) -> ElementId {
        self.append(self.body, tree)
    }

    /// Detaches `id` from the tree. Returns `false` when it was already detached.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.body {
            return false;
        }
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|child| *child != id);
        true
    }

    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.body {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.nodes[id.0].children
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .find(|candidate| self.element(*candidate).id() == Some(id))
    }

    /// Resolves an element reference of the form `#id` (or a bare id).
    pub fn resolve(&self, reference: &str) -> Option<ElementId> {
        let id = reference.trim();
        let id = id.strip_prefix('#').unwrap_or(id);
        if id.is_empty() {
            return None;
        }
        self.by_id(id)
    }

    /// Connected elements carrying `attr`, in document order.
    pub fn with_attr(&self, attr: &str) -> Vec<ElementId> {
        self.with_attr_in(self.body, attr)
    }

    pub fn with_attr_in(&self, root: ElementId, attr: &str) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.element(*id).has_attr(attr))
            .collect()
    }

    pub fn with_tag_in(&self, root: ElementId, tag: &str) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.element(*id).tag() == tag)
            .collect()
    }

    /// Nearest ancestor (or self) with the given tag.
    pub fn closest(&self, id: ElementId, tag: &str) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if self.element(candidate).tag() == tag {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    pub fn text_content(&self, id: ElementId) -> String {
        let mut text = self.element(id).text.clone();
        for child in self.children(id) {
            text.push_str(&self.text_content(*child));
        }
        text
    }
}

fn blank(tag: &str, parent: Option<ElementId>) -> Element {
    Element {
        tag: tag.to_string(),
        attrs: BTreeMap::new(),
        classes: Vec::new(),
        text: String::new(),
        value: String::new(),
        checked: false,
        readonly: false,
        required: false,
        hidden: false,
        custom_validity: String::new(),
        parent,
        children: Vec::new(),
    }
}
