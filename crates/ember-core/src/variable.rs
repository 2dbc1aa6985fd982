// Copyright 2025 the ember authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the engine's named variable store (console/config bus).
//!
//! Variables are string-keyed values that gameplay code and the console can
//! change at runtime. Subsystems subscribe to the change channel and react
//! immediately (e.g. the physics world watches the `gravity` variable).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A value a named variable can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarValue {
    /// A floating-point value.
    Float(f32),
    /// A boolean flag.
    Bool(bool),
    /// A free-form string.
    Str(String),
}

impl VarValue {
    /// Returns the value as a float, if it is one.
    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            VarValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Notification sent on the change channel whenever a variable is set.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableChange {
    /// The variable's name.
    pub name: String,
    /// The new value.
    pub value: VarValue,
}

/// The engine's named variable store.
///
/// Every `set` both updates the stored value and broadcasts a
/// [`VariableChange`] to every watcher.
#[derive(Debug, Default)]
pub struct Variables {
    values: HashMap<String, VarValue>,
    watchers: Vec<flume::Sender<VariableChange>>,
}

impl Variables {
    /// Creates an empty variable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable and notifies every watcher.
    ///
    /// Watchers whose receiver has been dropped are pruned here.
    pub fn set(&mut self, name: impl Into<String>, value: VarValue) {
        let name = name.into();
        self.values.insert(name.clone(), value.clone());
        let change = VariableChange { name, value };
        self.watchers
            .retain(|watcher| watcher.send(change.clone()).is_ok());
    }

    /// Convenience for `set(name, VarValue::Float(value))`.
    pub fn set_float(&mut self, name: impl Into<String>, value: f32) {
        self.set(name, VarValue::Float(value));
    }

    /// Returns the current value of a variable, if set.
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.values.get(name)
    }

    /// Returns the current float value of a variable, if set and a float.
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.values.get(name).and_then(VarValue::as_float)
    }

    /// Returns a receiver for change notifications.
    ///
    /// Each watcher gets its own queue, so every change reaches every
    /// watching subsystem independently.
    pub fn watch(&mut self) -> flume::Receiver<VariableChange> {
        let (sender, receiver) = flume::unbounded();
        self.watchers.push(sender);
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_stores_and_notifies() {
        let mut vars = Variables::new();
        let rx = vars.watch();

        vars.set_float("gravity", 9.81);

        assert_eq!(vars.get_float("gravity"), Some(9.81));
        let change = rx.try_recv().expect("change notification");
        assert_eq!(change.name, "gravity");
        assert_eq!(change.value, VarValue::Float(9.81));
    }

    #[test]
    fn get_float_rejects_other_kinds() {
        let mut vars = Variables::new();
        vars.set("debug", VarValue::Bool(true));
        assert_eq!(vars.get_float("debug"), None);
        assert_eq!(vars.get_float("missing"), None);
    }

    #[test]
    fn every_watcher_sees_every_change() {
        let mut vars = Variables::new();
        let physics = vars.watch();
        let audio = vars.watch();

        vars.set_float("gravity", 1.62);

        let seen = physics.try_recv().expect("physics notification");
        assert_eq!(seen.name, "gravity");
        let seen = audio.try_recv().expect("audio notification");
        assert_eq!(seen.value, VarValue::Float(1.62));
    }

    #[test]
    fn dropped_watcher_is_pruned() {
        let mut vars = Variables::new();
        let rx = vars.watch();
        drop(rx);

        // Must not error or leak; the surviving watcher still hears changes.
        let rx = vars.watch();
        vars.set_float("gravity", 9.81);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn overwrite_publishes_each_change() {
        let mut vars = Variables::new();
        let rx = vars.watch();

        vars.set_float("gravity", 9.81);
        vars.set_float("gravity", 1.62);

        assert_eq!(rx.try_iter().count(), 2);
        assert_eq!(vars.get_float("gravity"), Some(1.62));
    }
}
