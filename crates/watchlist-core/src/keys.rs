use std::sync::{Arc, Mutex, MutexGuard, Weak};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Other(String),
}

impl Key {
    /// Key codes are matched case-insensitively ("Escape", "escape", "Esc").
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FocusSearch,
    CloseDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Always,
    /// Ignored while a text input has focus
    UnlessTyping,
}

#[derive(Debug)]
struct Binding {
    id: u64,
    key: Key,
    action: Action,
    scope: Scope,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    bindings: Vec<Binding>,
}

/// Key handlers owned by whichever part of the view is currently mounted.
///
/// `subscribe` hands back a [`Subscription`]; the binding lives exactly as
/// long as that value.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    registry: Arc<Mutex<Registry>>,
}

#[must_use = "the binding is removed as soon as the subscription is dropped"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
        // Bindings stay consistent even if a holder panicked mid-update
        registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self, key: Key, action: Action, scope: Scope) -> Subscription {
        let mut registry = Self::lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.bindings.push(Binding {
            id,
            key,
            action,
            scope,
        });

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Actions bound to `key`, in subscription order.
    pub fn dispatch(&self, key: &Key, typing: bool) -> Vec<Action> {
        Self::lock(&self.registry)
            .bindings
            .iter()
            .filter(|b| &b.key == key)
            .filter(|b| !(typing && b.scope == Scope::UnlessTyping))
            .map(|b| b.action)
            .collect()
    }

    pub fn len(&self) -> usize {
        Self::lock(&self.registry).bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            KeyBindings::lock(&registry).bindings.retain(|b| b.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes_case_insensitive() {
        assert_eq!(Key::from_code("Escape"), Key::Escape);
        assert_eq!(Key::from_code("ESC"), Key::Escape);
        assert_eq!(Key::from_code("enter"), Key::Enter);
        assert_eq!(Key::from_code("KeyA"), Key::Other("keya".to_string()));
    }

    #[test]
    fn test_dropping_subscription_unbinds() {
        let keys = KeyBindings::new();
        let sub = keys.subscribe(Key::Escape, Action::CloseDetail, Scope::Always);
        assert_eq!(keys.dispatch(&Key::Escape, false), vec![Action::CloseDetail]);

        drop(sub);
        assert!(keys.dispatch(&Key::Escape, false).is_empty());
        assert!(keys.is_empty());
    }

    #[test]
    fn test_unless_typing_scope() {
        let keys = KeyBindings::new();
        let _enter = keys.subscribe(Key::Enter, Action::FocusSearch, Scope::UnlessTyping);
        let _esc = keys.subscribe(Key::Escape, Action::CloseDetail, Scope::Always);

        assert!(keys.dispatch(&Key::Enter, true).is_empty());
        assert_eq!(keys.dispatch(&Key::Enter, false), vec![Action::FocusSearch]);
        assert_eq!(keys.dispatch(&Key::Escape, true), vec![Action::CloseDetail]);
    }

    #[test]
    fn test_subscription_outliving_bindings() {
        let keys = KeyBindings::new();
        let sub = keys.subscribe(Key::Enter, Action::FocusSearch, Scope::Always);
        drop(keys);
        drop(sub);
    }
}
