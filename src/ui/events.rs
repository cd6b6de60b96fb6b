use super::dom::ElementId;
use super::page::Page;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    Change,
    Blur,
    Click,
    Invalid,
    Resize,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Blur => "blur",
            EventKind::Click => "click",
            EventKind::Invalid => "invalid",
            EventKind::Resize => "resize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Window,
    Element(ElementId),
}

#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub kind: EventKind,
    pub target: Target,
}

pub type Handler = Rc<dyn Fn(&mut Page, &Event)>;

pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Page, &Event) + 'static,
{
    Rc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    handler: Handler,
}

/// Listeners keyed by target and event, invoked in registration order.
#[derive(Default)]
pub struct ListenerStore {
    map: HashMap<(Target, EventKind), Vec<Listener>>,
    next_id: u64,
}

impl ListenerStore {
    pub fn add(&mut self, target: Target, kind: EventKind, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.map
            .entry((target, kind))
            .or_default()
            .push(Listener { id, handler });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let mut emptied = None;
        let mut removed = false;
        for (key, listeners) in self.map.iter_mut() {
            if let Some(pos) = listeners.iter().position(|listener| listener.id == id) {
                listeners.remove(pos);
                removed = true;
                if listeners.is_empty() {
                    emptied = Some(*key);
                }
                break;
            }
        }
        if let Some(key) = emptied {
            self.map.remove(&key);
        }
        removed
    }

    /// Snapshot of the handlers for a dispatch, so handlers may add or remove
    /// listeners while running.
    pub fn handlers(&self, target: Target, kind: EventKind) -> Vec<Handler> {
        self.map
            .get(&(target, kind))
            .map(|listeners| {
                listeners
                    .iter()
                    .map(|listener| Rc::clone(&listener.handler))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerStore")
            .field("listeners", &self.len())
            .finish()
    }
}
