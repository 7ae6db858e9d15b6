use std::ops::Index;

use super::AttributeUsage;

/// The attributes enabled for a set of primitives, in declaration order.
///
/// Each [AttributeUsage] appears at most once; re-inserting an attribute keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeTable {
    usages: Vec<AttributeUsage>,
}

impl AttributeTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable an attribute. Returns `false` if it was already enabled.
    pub fn insert(&mut self, usage: AttributeUsage) -> bool {
        if self.contains(usage) {
            return false;
        }
        self.usages.push(usage);
        true
    }

    /// Disable an attribute. Returns `false` if it wasn't enabled.
    pub fn remove(&mut self, usage: AttributeUsage) -> bool {
        match self.usages.iter().position(|u| *u == usage) {
            Some(i) => {
                self.usages.remove(i);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, usage: AttributeUsage) -> bool {
        self.usages.contains(&usage)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.usages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[AttributeUsage] {
        &self.usages
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeUsage> {
        self.usages.iter()
    }

    pub fn clear(&mut self) {
        self.usages.clear();
    }
}

impl Index<usize> for AttributeTable {
    type Output = AttributeUsage;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.usages[index]
    }
}

impl FromIterator<AttributeUsage> for AttributeTable {
    fn from_iter<T: IntoIterator<Item = AttributeUsage>>(iter: T) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

impl Extend<AttributeUsage> for AttributeTable {
    fn extend<T: IntoIterator<Item = AttributeUsage>>(&mut self, iter: T) {
        for usage in iter {
            self.insert(usage);
        }
    }
}

impl<'t> IntoIterator for &'t AttributeTable {
    type Item = &'t AttributeUsage;
    type IntoIter = std::slice::Iter<'t, AttributeUsage>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
