//! Scoped keyboard bindings.
//!
//! A view binds a key to a message for as long as it holds the returned
//! [`KeyBinding`]; dropping the guard removes the binding. Key names are
//! matched case-insensitively.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// A key the app reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    /// Any other key, by lowercase name.
    Named(String),
}

impl Key {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "enter" | "return" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => write!(f, "Enter"),
            Self::Escape => write!(f, "Escape"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

struct Registry<M> {
    next_id: u64,
    bindings: Vec<(u64, Key, M)>,
}

/// Registry of active key bindings producing messages of type `M`.
pub struct Keymap<M> {
    registry: Arc<Mutex<Registry<M>>>,
}

impl<M> Clone for Keymap<M> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<M: Clone + Send + 'static> Default for Keymap<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone + Send + 'static> Keymap<M> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                bindings: Vec::new(),
            })),
        }
    }

    /// Bind `key` to `message` until the returned guard is dropped.
    #[must_use = "the binding is removed as soon as the guard is dropped"]
    pub fn bind(&self, key: Key, message: M) -> KeyBinding {
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.bindings.push((id, key.clone(), message));
            id
        };
        tracing::trace!(%key, id, "Key bound");

        let weak: Weak<Mutex<Registry<M>>> = Arc::downgrade(&self.registry);
        KeyBinding {
            unbind: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    lock(&registry).bindings.retain(|(bound, _, _)| *bound != id);
                }
            })),
        }
    }

    /// Messages bound to `key`, in binding order.
    pub fn dispatch(&self, key: &Key) -> Vec<M> {
        lock(&self.registry)
            .bindings
            .iter()
            .filter(|(_, bound, _)| bound == key)
            .map(|(_, _, message)| message.clone())
            .collect()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        lock(&self.registry).bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<M>(registry: &Mutex<Registry<M>>) -> std::sync::MutexGuard<'_, Registry<M>> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Guard for a live binding.
pub struct KeyBinding {
    unbind: Option<Box<dyn FnOnce() + Send>>,
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding").finish_non_exhaustive()
    }
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        if let Some(unbind) = self.unbind.take() {
            unbind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Close,
        Focus,
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Key::parse("eSCApe"), Key::Escape);
        assert_eq!(Key::parse("ENTER"), Key::Enter);
        assert_eq!(Key::parse("F5"), Key::Named("f5".into()));
        assert_eq!(Key::parse("f5"), Key::parse("F5"));
    }

    #[test]
    fn test_dispatch_bound_key() {
        let keymap = Keymap::new();
        let _focus = keymap.bind(Key::Enter, Msg::Focus);
        let _close = keymap.bind(Key::Escape, Msg::Close);

        assert_eq!(keymap.dispatch(&Key::parse("escape")), vec![Msg::Close]);
        assert_eq!(keymap.dispatch(&Key::Enter), vec![Msg::Focus]);
        assert!(keymap.dispatch(&Key::parse("tab")).is_empty());
    }

    #[test]
    fn test_drop_deregisters() {
        let keymap = Keymap::new();
        let binding = keymap.bind(Key::Escape, Msg::Close);
        assert_eq!(keymap.len(), 1);

        drop(binding);
        assert!(keymap.is_empty());
        assert!(keymap.dispatch(&Key::Escape).is_empty());
    }

    #[test]
    fn test_drop_only_removes_own_binding() {
        let keymap = Keymap::new();
        let first = keymap.bind(Key::Escape, Msg::Close);
        let second = keymap.bind(Key::Escape, Msg::Focus);
        assert_eq!(keymap.dispatch(&Key::Escape), vec![Msg::Close, Msg::Focus]);

        drop(first);
        assert_eq!(keymap.dispatch(&Key::Escape), vec![Msg::Focus]);
        drop(second);
        assert!(keymap.is_empty());
    }

    #[test]
    fn test_guard_outlives_keymap() {
        let keymap = Keymap::new();
        let binding = keymap.bind(Key::Enter, Msg::Focus);
        drop(keymap);
        drop(binding);
    }
}
