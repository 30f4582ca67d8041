//! Soft uniqueness: deriving a fresh name inside a list of named items.
//!
//! [`unique_name`] keeps the historical behaviour where an item named exactly
//! like the requested base is renamed to `<base>_0` as a side effect. Callers
//! that must not touch existing items use [`plan_unique_name`] and decide
//! themselves whether to [`NamePlan::apply`] the rename.

use std::collections::BTreeSet;

/// Anything with a mutable short name
pub trait Named {
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }

    fn set_name(&mut self, name: String) {
        *self = name;
    }
}

/// Outcome of a uniqueness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePlan {
    /// Name that is free once the rename (if any) is applied
    pub name: String,
    /// Position of the item named exactly like the base and the name it
    /// must receive
    pub rename: Option<(usize, String)>,
}

impl NamePlan {
    /// Perform the planned rename and return the fresh name
    pub fn apply<T: Named>(self, items: &mut [T]) -> String {
        if let Some((index, new_name)) = self.rename
            && let Some(item) = items.get_mut(index)
        {
            item.set_name(new_name);
        }
        self.name
    }
}

/// Compute a fresh name for `base` without modifying `items`.
///
/// The suffix is one past the highest existing one; when that would overflow
/// the lowest unused positive suffix is taken instead.
pub fn plan_unique_name<T: Named>(items: &[T], base: &str) -> NamePlan {
    let mut exact = None;
    let mut found = false;
    let mut taken = BTreeSet::new();

    for (index, item) in items.iter().enumerate() {
        let name = item.name();
        if name == base {
            found = true;
            exact.get_or_insert(index);
        } else if let Some(number) = numbered_suffix(name, base) {
            found = true;
            taken.insert(number);
        }
    }

    if !found {
        return NamePlan {
            name: base.to_string(),
            rename: None,
        };
    }

    let highest = taken.last().copied().unwrap_or(0);
    let next = highest
        .checked_add(1)
        .unwrap_or_else(|| (1u64..).find(|n| !taken.contains(n)).unwrap_or(1));
    NamePlan {
        name: format!("{}_{}", base, next),
        rename: exact.map(|index| (index, format!("{}_0", base))),
    }
}

/// Fresh name for `base` in `items`; an item named exactly `base` is renamed
/// to `<base>_0` in place
pub fn unique_name<T: Named>(items: &mut [T], base: &str) -> String {
    plan_unique_name(items, base).apply(items)
}

/// `N` when `name` is `<base>_<N>`
fn numbered_suffix(name: &str, base: &str) -> Option<u64> {
    let digits = name.strip_prefix(base)?.strip_prefix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
