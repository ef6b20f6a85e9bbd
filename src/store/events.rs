use crate::message::Message;
use crate::model::{ElementKind, NoteSource};

/// What changed in the store after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    CachesLoaded,
    FocusChanged,
    SearchPublished,
    SelectionChanged,
    SelectionEdited(ElementKind),
    EditingChanged(ElementKind),
    Submitted { kind: ElementKind, id: Option<u32> },
    NotesChanged(NoteSource),
    NavigationChanged,
    PendingChanged(bool),
    MessagePosted(Message),
    PivotChanged,
    ClientModeChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

#[derive(Default)]
pub(super) struct Listeners {
    next: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(super) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, listener));
        id
    }

    pub(super) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Listeners run in subscription order.
    pub(super) fn notify(&mut self, event: &StoreEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }
}
